pub mod config;
pub mod error;

pub use config::{AssistantConfig, FallbackStrategy, GeneralConfig, JourneyConfig};
pub use error::{JourneyError, Result};
