pub mod build;
pub mod clean;
pub mod setup;

use crate::result::Result;
use smol_str::SmolStr;

#[derive(Debug)]
pub enum CommandType {
    Build {
        config: Option<SmolStr>,
        verbose: bool,
        debug: bool,
        rebuild: bool,
        compile_commands: bool,
    },
    Setup {
        force: bool,
    },
    Clean {
        config: Option<SmolStr>,
    },
}

impl CommandType {
    pub async fn execute(self) -> Result<()> {
        match self {
            CommandType::Build {
                config,
                verbose,
                debug,
                rebuild,
                compile_commands,
            } => {
                build::execute(config.as_deref(), verbose, debug, rebuild, compile_commands).await
            }
            CommandType::Setup { force } => setup::execute(force).await,
            CommandType::Clean { config } => clean::execute(config.as_deref()).await,
        }
    }
}

#[derive(Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    pub async fn build_project(
        &mut self,
        config: Option<String>,
        verbose: bool,
        debug: bool,
        rebuild: bool,
        compile_commands: bool,
    ) -> Result<()> {
        CommandType::Build {
            config: config.map(|s| s.into()),
            verbose,
            debug,
            rebuild,
            compile_commands,
        }
        .execute()
        .await
    }

    pub async fn setup_project(&mut self, force: bool) -> Result<()> {
        CommandType::Setup { force }.execute().await
    }

    pub async fn clean_project(&mut self, config: Option<String>) -> Result<()> {
        CommandType::Clean {
            config: config.map(|s| s.into()),
        }
        .execute()
        .await
    }
}
