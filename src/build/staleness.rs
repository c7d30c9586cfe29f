use crate::result::{CcBuildError, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/** Modification-time queries behind the skip decisions
 *
 * Staleness here is coarse: an output is current when it exists and is at
 * least as new as every named input. Only the named inputs are consulted,
 * so header dependencies are invisible, and equal timestamps count as
 * current on the output side. The link step applies its own, stricter rule
 * and never calls [`StalenessChecker::is_current`].
 */
pub struct StalenessChecker;

impl StalenessChecker {
    pub async fn modified_at(path: &Path) -> Result<SystemTime> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CcBuildError::NotFound(
                    format!(
                        "Attempt to get the last modified date of file '{}' which does not exist",
                        path.display()
                    )
                    .into(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(metadata.modified()?)
    }

    pub async fn is_current(output: &Path, inputs: &[PathBuf]) -> Result<bool> {
        let output_time = match fs::metadata(output).await {
            Ok(metadata) => metadata.modified()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("'{}' does not exist yet", output.display());
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        for input in inputs {
            let input_time = Self::modified_at(input).await?;
            if input_time > output_time {
                log::debug!(
                    "'{}' ({}) is newer than '{}' ({})",
                    input.display(),
                    format_timestamp(input_time),
                    output.display(),
                    format_timestamp(output_time)
                );
                return Ok(false);
            }
        }

        Ok(true)
    }
}

pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{File, FileTimes};
    use std::time::Duration;
    use tempfile::tempdir;

    fn write_with_mtime(path: &Path, mtime: SystemTime) {
        std::fs::write(path, "x").unwrap();
        let file = File::options().write(true).open(path).unwrap();
        file.set_times(FileTimes::new().set_modified(mtime)).unwrap();
    }

    #[tokio::test]
    async fn missing_output_is_never_current() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("a.c");
        std::fs::write(&input, "int main(void) { return 0; }").unwrap();

        let current = StalenessChecker::is_current(&temp.path().join("a.o"), &[input])
            .await
            .unwrap();
        assert!(!current);
    }

    #[tokio::test]
    async fn output_newer_than_all_inputs_is_current() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("a.c");
        let output = temp.path().join("a.o");
        let base = SystemTime::now() - Duration::from_secs(100);

        write_with_mtime(&input, base);
        write_with_mtime(&output, base + Duration::from_secs(50));

        assert!(StalenessChecker::is_current(&output, &[input])
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn strictly_newer_input_invalidates_the_output() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("a.c");
        let output = temp.path().join("a.o");
        let base = SystemTime::now() - Duration::from_secs(100);

        write_with_mtime(&output, base);
        write_with_mtime(&input, base + Duration::from_secs(50));

        assert!(!StalenessChecker::is_current(&output, &[input])
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn equal_timestamps_count_as_current() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("a.c");
        let output = temp.path().join("a.o");
        let base = SystemTime::now() - Duration::from_secs(100);

        write_with_mtime(&input, base);
        write_with_mtime(&output, base);

        assert!(StalenessChecker::is_current(&output, &[input])
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn missing_input_is_an_error() {
        let temp = tempdir().unwrap();
        let output = temp.path().join("a.o");
        std::fs::write(&output, "obj").unwrap();

        let result =
            StalenessChecker::is_current(&output, &[temp.path().join("gone.c")]).await;
        assert!(matches!(result, Err(CcBuildError::NotFound(_))));
    }

    #[tokio::test]
    async fn modified_at_rejects_missing_paths() {
        let temp = tempdir().unwrap();
        let result = StalenessChecker::modified_at(&temp.path().join("gone.c")).await;
        assert!(matches!(result, Err(CcBuildError::NotFound(_))));

        let present = temp.path().join("here.c");
        std::fs::write(&present, "x").unwrap();
        StalenessChecker::modified_at(&present).await.unwrap();
    }
}
