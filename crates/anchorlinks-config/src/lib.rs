pub mod config;
pub mod error;
pub mod templates;

pub use config::{CompatibilitySlugKind, Config};
pub use error::ConfigError;
