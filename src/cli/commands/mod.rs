pub mod analysis;
pub mod config;
pub mod run;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{info, warn};

/// Load configuration from `--config` (or `metrics.toml`) plus environment,
/// then apply command-line overrides
pub(crate) fn load_config(path: Option<&Path>, reference_date: Option<NaiveDate>) -> AppResult<AppConfig> {
    let mut config = match AppConfig::load(path) {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            warn!("Failed to load configuration: {}", e);
            return Err(AppError::Config(format!("Configuration error: {}", e)));
        }
    };
    if reference_date.is_some() {
        config.reference_date = reference_date;
    }
    Ok(config)
}

/// Write output to file with safe directory creation
pub(crate) fn write_output_to_file(path: &Path, content: &str, description: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    println!("{} written to: {}", description, path.display());
    Ok(())
}
