pub mod settings;

pub use settings::{Settings, ValidationSettings, load_config_sources};
