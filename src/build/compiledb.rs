use crate::build::builder::Builder;
use crate::result::Result;
use serde::Serialize;
use std::path::Path;
use tokio::fs;

pub const COMPILE_COMMANDS_FILE: &str = "compile_commands.json";

/** Clang-style compilation database (`compile_commands.json`)
 *
 * One entry per compile step, in the `arguments` array form understood
 * by clangd, clang-tidy and friends. Entries are recorded even for
 * steps the build skipped as up to date, so editors always see the
 * whole project.
 */
#[derive(Debug, Default)]
pub struct CompilationDatabase {
    entries: Vec<CompileCommand>,
}

#[derive(Debug, Serialize)]
struct CompileCommand {
    directory: String,
    arguments: Vec<String>,
    file: String,
    output: String,
}

impl CompilationDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, builder: &Builder, source: impl AsRef<Path>) -> Result<()> {
        let source = source.as_ref();
        let arguments = builder.compile_command(source)?;
        let source_path = builder.config().build.source_dir.join(source);
        let object_path = builder.object_path(source)?;
        let directory = std::env::current_dir()?;

        self.entries.push(CompileCommand {
            directory: directory.display().to_string(),
            arguments,
            file: source_path.display().to_string(),
            output: object_path.display().to_string(),
        });
        Ok(())
    }

    pub async fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let payload = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path.as_ref(), payload).await?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
