pub mod charts;
pub mod config;
pub mod loader;
pub mod models;
pub mod settings;

pub use charts::*;
pub use config::{AlgorithmConfig, AppConfig, ConfigError};
pub use loader::{DataLoader, LoaderError};
pub use models::*;
pub use settings::*;
