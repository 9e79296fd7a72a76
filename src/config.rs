use dotenv::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_ENV_VAR: &str = "ROUTE_CHARTS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Un algoritmo a cargar: su GeoJSON, su escenario y los vehículos usados.
///
/// `runs` lista GeoJSON de ejecuciones adicionales con el mismo escenario, para los
/// diagramas de caja.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlgorithmConfig {
    pub id: u32,
    pub name: String,
    pub geojson: String,
    pub scenario: String,
    #[serde(default)]
    pub vehicles: Vec<u32>,
    #[serde(default)]
    pub runs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    pub vehicles: Option<String>,
    pub depots: Option<String>,
    #[serde(default)]
    pub algorithms: Vec<AlgorithmConfig>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("charts")
}

impl AppConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        info!("Loading configuration from {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Lee la ruta del archivo desde `ROUTE_CHARTS_CONFIG` (también desde `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let path = env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(path)
    }
}
