use crate::result::{CcBuildError, Result};
use std::path::Path;
use tokio::fs;

const DEFAULT_CONFIG: &str = r#"# ccbuild project configuration

[build]
compiler = "clang"
linker = "clang"
source_dir = "src"
object_dir = "obj"
binary_dir = "bin"
target = "app"
sources = ["main.c"]

[build.includes]
paths = ["include"]

[build.cflags]
args = ["-std=c99", "-Wall", "-Werror", "-pedantic"]

# Preprocessor definitions, each as NAME=VALUE.
# Building with --debug additionally seeds DEBUG=1.
[build.defines]
values = []
"#;

pub async fn execute(force: bool) -> Result<()> {
    let mut cmd = SetupCommand::new();
    cmd.execute(force).await
}

#[derive(Default)]
pub struct SetupCommand;

impl SetupCommand {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(&mut self, force: bool) -> Result<()> {
        let config_file = "ccbuild.toml";

        log::info!("Starting setup process with force: {}", force);

        if Path::new(config_file).exists() && !force {
            log::warn!("ccbuild.toml already exists, setup aborted");
            return Err(CcBuildError::Config(
                "ccbuild.toml already exists. Use --force to overwrite.".into(),
            ));
        }

        fs::write(config_file, DEFAULT_CONFIG).await?;

        println!("ccbuild.toml created successfully!");
        println!();
        println!("Please edit ccbuild.toml to match your project:");
        println!("   - List your .c files in sources");
        println!("   - Update target to your binary name");
        println!("   - Adjust include paths if needed");
        println!("   - Add preprocessor definitions as required");
        println!();
        println!("Then run: ccbuild build");

        log::info!("Setup completed successfully");

        Ok(())
    }
}
