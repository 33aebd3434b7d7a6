//! The decoding capability validation steps depend on.
//!
//! A [`Schema`] checks a raw JSON value and returns either the decoded (and
//! possibly coerced) value or the list of issues it found. [`codec`] provides
//! a combinator implementation; other engines plug in by implementing the
//! trait.

pub mod codec;

pub use codec::{
    Codec, array, boolean, boolean_from_string, integer, literal, null, number,
    number_from_string, object, optional, string, union,
};

use crate::issue::{Issue, Path};
use serde_json::Value;
use std::sync::Arc;

pub type DecodeResult = Result<Value, Vec<Issue>>;

pub type SharedSchema = Arc<dyn Schema>;

pub trait Schema: Send + Sync {
    /// Type name recorded in issue paths.
    fn name(&self) -> String;

    /// Decodes `raw` found at `path`, reporting issues relative to it.
    fn validate(&self, raw: &Value, path: &Path) -> DecodeResult;

    /// Whether an enclosing object may omit this field entirely.
    fn accepts_missing(&self) -> bool {
        false
    }

    /// Decodes `raw` as a root value.
    fn decode(&self, raw: &Value) -> DecodeResult {
        self.validate(raw, &Path::root(self.name()))
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn validate(&self, raw: &Value, path: &Path) -> DecodeResult {
        (**self).validate(raw, path)
    }

    fn accepts_missing(&self) -> bool {
        (**self).accepts_missing()
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn validate(&self, raw: &Value, path: &Path) -> DecodeResult {
        (**self).validate(raw, path)
    }

    fn accepts_missing(&self) -> bool {
        (**self).accepts_missing()
    }
}

impl<S: Schema + ?Sized> Schema for &S {
    fn name(&self) -> String {
        (**self).name()
    }

    fn validate(&self, raw: &Value, path: &Path) -> DecodeResult {
        (**self).validate(raw, path)
    }

    fn accepts_missing(&self) -> bool {
        (**self).accepts_missing()
    }
}

pub trait SchemaExt: Schema + Sized + 'static {
    /// Erases the schema type so it can be held by validation steps.
    fn shared(self) -> SharedSchema {
        Arc::new(self)
    }
}

impl<S: Schema + 'static> SchemaExt for S {}
