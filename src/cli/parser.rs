use crate::result::{CcBuildError, Result};
use std::path::PathBuf;

pub struct CliParser;

impl CliParser {
    /// Checks an explicitly passed `--config` path before it is loaded.
    pub fn validate_config_path(path: &str) -> Result<PathBuf> {
        let config_path = PathBuf::from(path);

        if !config_path.exists() {
            return Err(CcBuildError::NotFound(
                format!("Configuration file not found: {}", path).into(),
            ));
        }

        if !config_path.is_file() {
            return Err(CcBuildError::Config(
                format!("Configuration path is not a file: {}", path).into(),
            ));
        }

        Ok(config_path)
    }
}
