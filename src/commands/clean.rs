use crate::build::compiledb::COMPILE_COMMANDS_FILE;
use crate::build::BuildConfig;
use crate::cli::parser::CliParser;
use crate::result::{CcBuildError, Result};
use crate::utils::console;
use std::path::{Path, PathBuf};
use tokio::fs;

pub async fn execute(config_path: Option<&str>) -> Result<()> {
    let mut cmd = CleanCommand::new();
    cmd.execute(config_path.map(|s| s.to_string())).await
}

#[derive(Default)]
pub struct CleanCommand;

impl CleanCommand {
    pub fn new() -> Self {
        Self
    }

    /// Removes the object directory, the binary directory and any
    /// compilation database left behind by `build --compile-commands`.
    /// Directories that are already absent are not an error.
    pub async fn execute(&mut self, config_path: Option<String>) -> Result<()> {
        let config_file = match config_path {
            Some(path) => CliParser::validate_config_path(&path)?,
            None => {
                let default_path = PathBuf::from("ccbuild.toml");
                if !default_path.exists() {
                    return Err(CcBuildError::NotFound(
                        "Configuration file 'ccbuild.toml' not found. Run 'ccbuild setup' to create it."
                            .into(),
                    ));
                }
                default_path
            }
        };

        let config = BuildConfig::from_file(&config_file.display().to_string()).await?;

        log::info!("Cleaning build products for target '{}'", config.build.target);

        for dir in [&config.build.object_dir, &config.build.binary_dir] {
            if dir.exists() {
                fs::remove_dir_all(dir).await?;
                console::info(format!("Removed {}", dir.display()));
            } else {
                log::debug!("Directory {} already absent", dir.display());
            }
        }

        if Path::new(COMPILE_COMMANDS_FILE).exists() {
            fs::remove_file(COMPILE_COMMANDS_FILE).await?;
            console::info(format!("Removed {}", COMPILE_COMMANDS_FILE));
        }

        println!("Clean complete.");

        Ok(())
    }
}
