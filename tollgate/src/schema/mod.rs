//! Schema engines hosted by this crate in addition to the codec combinators
//! re-exported from `tollgate_core::schema`.

#[cfg(feature = "validation")]
mod garde_schema;

#[cfg(feature = "validation")]
pub use garde_schema::Garde;
pub use tollgate_core::schema::*;
