pub mod config;
pub mod error;
pub mod types;

pub use config::{AssistantConfig, AtivosConfig, GeneralConfig};
pub use error::{AtivosError, Result};
pub use types::*;
