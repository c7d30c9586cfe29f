pub mod parser;

use crate::commands::CommandExecutor;
use crate::result::Result;
use clap::Parser;

#[derive(Parser)]
#[command(name = "ccbuild")]
#[command(about = "Incremental compile/link orchestrator for C projects")]
#[command(version = "0.1.0")]
#[command(arg_required_else_help = true)]
#[command(
    help_template = "{before-help}{name} v{version}\n\n{about-with-newline}\n{usage-heading} {usage}\n\n{all-args}{after-help}"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
pub enum Commands {
    #[command(about = "Build the project incrementally")]
    Build {
        #[arg(short, long, help = "Build configuration file")]
        config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        verbose: bool,

        #[arg(long, help = "Build in debug mode (seeds the DEBUG definition)")]
        debug: bool,

        #[arg(long, help = "Ignore timestamps and rebuild everything")]
        rebuild: bool,

        #[arg(long, help = "Write compile_commands.json for clang tooling")]
        compile_commands: bool,
    },

    #[command(about = "Setup project with default ccbuild.toml")]
    Setup {
        #[arg(long, help = "Force overwrite existing ccbuild.toml")]
        force: bool,
    },

    #[command(about = "Remove build products")]
    Clean {
        #[arg(short, long, help = "Build configuration file")]
        config: Option<String>,
    },
}

impl Default for Cli {
    fn default() -> Self {
        Self::parse()
    }
}

impl Cli {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn execute(self) -> Result<()> {
        let mut executor = CommandExecutor::new();

        match self.command {
            Commands::Build {
                config,
                verbose,
                debug,
                rebuild,
                compile_commands,
            } => {
                executor
                    .build_project(config, verbose, debug, rebuild, compile_commands)
                    .await
            }
            Commands::Setup { force } => executor.setup_project(force).await,
            Commands::Clean { config } => executor.clean_project(config).await,
        }
    }
}
