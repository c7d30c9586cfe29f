use crate::result::{CcBuildError, Result};
use crate::utils::console;
use std::process::Stdio;
use tokio::process::Command;
use which::which;

/** Runs external toolchain commands and keeps the run-scoped failure tally
 *
 * # Behavior
 * - Every invocation is echoed as a `[>]` line before it runs
 * - The child inherits stdio, so compiler diagnostics stream straight through
 * - A nonzero exit status is non-fatal here: it emits a `[!]` warning naming
 *   the status code and bumps the tally, then returns Ok so the remaining
 *   compile steps still execute
 * - Only failing to spawn or wait on the child is an `Err` (Process)
 *
 * The tally is never decremented. The link step reads it through the owning
 * Builder and refuses to link once it is nonzero.
 */
#[derive(Default)]
pub struct CommandRunner {
    errors: u32,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_executable(&self, name: &str) -> Result<String> {
        match which(name) {
            Ok(path) => Ok(path.to_string_lossy().to_string()),
            Err(_) => Err(CcBuildError::NotFound(
                format!("Executable not found: {}", name).into(),
            )),
        }
    }

    pub async fn run(&mut self, argv: &[String]) -> Result<()> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| CcBuildError::process("Attempt to run an empty command"))?;

        console::command(argv.join(" "));

        let mut command = Command::new(program);
        command.args(args);
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());
        command.stdin(Stdio::inherit());

        let mut child = command.spawn().map_err(|e| {
            CcBuildError::Process(format!("Failed to start '{}': {}", program, e).into())
        })?;

        let status = child.wait().await.map_err(|e| {
            CcBuildError::Process(format!("Failed to wait for '{}': {}", program, e).into())
        })?;

        if !status.success() {
            console::warn(format!(
                "Command failed with returncode {}.",
                status.code().unwrap_or(-1)
            ));
            self.errors += 1;
        }

        Ok(())
    }

    pub fn error_count(&self) -> u32 {
        self.errors
    }
}
