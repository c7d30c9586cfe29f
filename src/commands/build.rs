use crate::build::compiledb::COMPILE_COMMANDS_FILE;
use crate::build::config::object_file_name;
use crate::build::{BuildConfig, Builder, CompilationDatabase};
use crate::cli::parser::CliParser;
use crate::result::{CcBuildError, Result};
use crate::utils::CommandRunner;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

pub async fn execute(
    config_path: Option<&str>,
    verbose: bool,
    debug: bool,
    rebuild: bool,
    compile_commands: bool,
) -> Result<()> {
    let mut cmd = BuildCommand::new();
    cmd.execute(
        config_path.map(|s| s.to_string()),
        verbose,
        debug,
        rebuild,
        compile_commands,
    )
    .await
}

#[derive(Default)]
pub struct BuildCommand;

impl BuildCommand {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(
        &mut self,
        config_path: Option<String>,
        verbose: bool,
        debug: bool,
        rebuild: bool,
        compile_commands: bool,
    ) -> Result<()> {
        println!("Building project...");

        let build_spinner = ProgressBar::new_spinner();
        build_spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        build_spinner.set_message("Loading build configuration...");
        build_spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        let config = self.load_build_config(config_path, debug, rebuild).await?;

        log::info!(
            "Starting build for target '{}' with {} source file(s)",
            config.build.target,
            config.build.sources.len()
        );

        if verbose {
            build_spinner.finish_and_clear();
            println!("Build configuration:");
            println!("  Compiler: {}", config.build.compiler);
            println!("  Linker: {}", config.build.linker);
            println!("  Source root: {}", config.build.source_dir.display());
            println!(
                "  Target: {}",
                config
                    .build
                    .binary_dir
                    .join(config.build.target.as_str())
                    .display()
            );
            println!("  Sources: {} file(s)", config.build.sources.len());

            build_spinner.set_message("Resolving toolchain...");
            build_spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        } else {
            build_spinner.set_message("Resolving toolchain...");
        }

        let runner = CommandRunner::new();
        let compiler_path = runner.find_executable(config.build.compiler.as_str()).await?;
        let linker_path = runner.find_executable(config.build.linker.as_str()).await?;

        if verbose {
            build_spinner.finish_and_clear();
            println!("Using compiler: {}", compiler_path);
            println!("Using linker: {}", linker_path);
        }

        build_spinner.set_message("Compiling project...");
        log::info!("Using compiler: {}", compiler_path);
        log::info!("Using linker: {}", linker_path);

        let result = self.compile_project(config, compile_commands).await;
        build_spinner.finish_and_clear();

        result
    }

    async fn load_build_config(
        &self,
        config_path: Option<String>,
        debug: bool,
        rebuild: bool,
    ) -> Result<BuildConfig> {
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

        let mut config = BuildConfig::from_file(&config_file.display().to_string()).await?;

        // Command line flags win over whatever the file says.
        if debug {
            config.build.debug = true;
        }
        if rebuild {
            config.build.rebuild = true;
        }

        config.validate()?;
        Ok(config)
    }

    async fn compile_project(
        &self,
        config: BuildConfig,
        write_compile_commands: bool,
    ) -> Result<()> {
        let compile_start = Instant::now();
        let sources = config.build.sources.clone();
        let target = config.build.target.clone();

        let mut builder = Builder::new(config)?;
        let mut database = CompilationDatabase::new();
        let mut objects: Vec<PathBuf> = Vec::with_capacity(sources.len());

        for source in &sources {
            if write_compile_commands {
                database.record(&builder, source)?;
            }
            builder.compile(source).await?;
            objects.push(PathBuf::from(object_file_name(source)?.as_str()));
        }

        builder.link(&objects, target.as_str()).await?;

        let binary_path = builder.config().build.binary_dir.join(target.as_str());
        let time_str = format_duration(compile_start.elapsed());
        println!("Build successful: {} ({})", binary_path.display(), time_str);
        log::info!(
            "Build completed successfully: {} in {}",
            binary_path.display(),
            time_str
        );

        if write_compile_commands {
            database.write_to_file(COMPILE_COMMANDS_FILE).await?;
            println!(
                "Wrote {} ({} entries)",
                COMPILE_COMMANDS_FILE,
                database.len()
            );
        }

        Ok(())
    }
}

fn format_duration(duration: std::time::Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms >= 1000 {
        let seconds = duration.as_secs_f64();
        format!("{:.2}s", seconds)
    } else {
        format!("{}ms", total_ms)
    }
}
