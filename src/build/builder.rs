use crate::build::config::{object_file_name, parse_define, BuildConfig};
use crate::build::definitions::DefinitionRegistry;
use crate::build::staleness::StalenessChecker;
use crate::result::{guard, CcBuildError, ErrorKind, Result};
use crate::utils::console;
use crate::utils::process::CommandRunner;
use std::path::{Path, PathBuf};
use tokio::fs;

const COMPILE_KINDS: &[ErrorKind] = &[ErrorKind::NotFound, ErrorKind::Io, ErrorKind::Process];
const LINK_KINDS: &[ErrorKind] = &[
    ErrorKind::AbortedBuild,
    ErrorKind::NotFound,
    ErrorKind::Io,
    ErrorKind::Process,
];
const UNDEFINE_KINDS: &[ErrorKind] = &[ErrorKind::NotFound];

/** Drives one build run: many compile steps feeding a single link step
 *
 * # Composition
 * - Owns the immutable [`BuildConfig`], the [`DefinitionRegistry`] seeded
 *   from it (`DEBUG=1` first when debug mode is on, then the configured
 *   defines in order) and the [`CommandRunner`] with its failure tally
 * - Steps execute strictly sequentially; a child process is fully waited
 *   on before the next step starts
 *
 * # Error Contract
 * Every public entry point passes its result through [`guard`], so the
 * kinds named in each method's documentation are the only ones callers
 * can observe; anything else is rewrapped as `Unexpected`.
 */
pub struct Builder {
    config: BuildConfig,
    definitions: DefinitionRegistry,
    runner: CommandRunner,
}

impl Builder {
    pub fn new(config: BuildConfig) -> Result<Self> {
        let mut definitions = DefinitionRegistry::new();

        if config.build.debug {
            definitions.define("DEBUG", "1");
        }

        for entry in config.seed_defines() {
            let (name, value) = parse_define(&entry)?;
            definitions.define(name, value);
        }

        Ok(Self {
            config,
            definitions,
            runner: CommandRunner::new(),
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn definitions(&self) -> &DefinitionRegistry {
        &self.definitions
    }

    pub fn error_count(&self) -> u32 {
        self.runner.error_count()
    }

    pub fn define(&mut self, name: &str, value: &str) {
        self.definitions.define(name, value);
    }

    /// Removes a seeded definition; `NotFound` when the name is absent.
    pub fn undefine(&mut self, name: &str) -> Result<()> {
        guard("undefine", UNDEFINE_KINDS, self.definitions.undefine(name))
    }

    /** Compiles one source file into its object file
     *
     * # Contract
     * 1. The source is resolved under the source root; `NotFound` if absent
     * 2. The object directory is created when missing
     * 3. When the object exists, rebuild mode is off and the object is at
     *    least as new as the source, the step logs a skip and returns
     *    without touching the compiler
     * 4. Otherwise runs `<cc> -c -o <obj> <cflags> <src> -I<dir>... -DK=V...`
     *
     * A compiler exiting nonzero is not an `Err` here: it lands in the
     * failure tally and only surfaces when [`Builder::link`] is called.
     * Error kinds: `NotFound`, `Io`, `Process`.
     */
    pub async fn compile(&mut self, source: impl AsRef<Path>) -> Result<()> {
        let result = self.compile_inner(source.as_ref()).await;
        guard("compile", COMPILE_KINDS, result)
    }

    async fn compile_inner(&mut self, source: &Path) -> Result<()> {
        let source_path = self.config.build.source_dir.join(source);
        if !source_path.exists() {
            return Err(CcBuildError::NotFound(
                format!(
                    "Attempt to build file '{}' which does not exist",
                    source_path.display()
                )
                .into(),
            ));
        }

        fs::create_dir_all(&self.config.build.object_dir).await?;

        let object_path = self.object_path(source)?;
        if object_path.exists()
            && !self.config.build.rebuild
            && StalenessChecker::is_current(&object_path, std::slice::from_ref(&source_path))
                .await?
        {
            console::info(format!(
                "File {} already up to date. Skipping",
                source_path.display()
            ));
            return Ok(());
        }

        let argv = self.compile_argv(&source_path, &object_path);
        self.runner.run(&argv).await
    }

    /** Links object files into the target binary
     *
     * # Contract
     * 1. A nonzero failure tally aborts immediately (`AbortedBuild`); the
     *    linker is never invoked once any compile step has failed
     * 2. The binary directory is created when missing
     * 3. Object names are resolved under the object directory; any missing
     *    object is `NotFound`
     * 4. The link is skipped only when rebuild mode is off, the binary
     *    exists, and every object is strictly older than it. An object
     *    with the same timestamp as the binary forces a relink, which is
     *    stricter than the compile-side rule
     * 5. Otherwise runs `<ld> -o <bin> <ldflags> <obj>...`
     *
     * Error kinds: `AbortedBuild`, `NotFound`, `Io`, `Process`.
     */
    pub async fn link(&mut self, objects: &[PathBuf], binary: &str) -> Result<()> {
        let result = self.link_inner(objects, binary).await;
        guard("link", LINK_KINDS, result)
    }

    async fn link_inner(&mut self, objects: &[PathBuf], binary: &str) -> Result<()> {
        if self.runner.error_count() > 0 {
            return Err(CcBuildError::aborted(
                "Errors encountered while building, aborting",
            ));
        }

        fs::create_dir_all(&self.config.build.binary_dir).await?;

        let object_paths: Vec<PathBuf> = objects
            .iter()
            .map(|object| self.config.build.object_dir.join(object))
            .collect();
        let binary_path = self.config.build.binary_dir.join(binary);

        let binary_time = if binary_path.exists() {
            Some(StalenessChecker::modified_at(&binary_path).await?)
        } else {
            None
        };

        // Keep checking every object even once the skip is lost: a missing
        // object must fail the link regardless of timestamps.
        let mut skip_link = !self.config.build.rebuild;
        for object_path in &object_paths {
            if !object_path.exists() {
                return Err(CcBuildError::NotFound(
                    format!(
                        "Attempt to link file '{}' which does not exist",
                        object_path.display()
                    )
                    .into(),
                ));
            }

            match binary_time {
                Some(binary_time) => {
                    if StalenessChecker::modified_at(object_path).await? >= binary_time {
                        skip_link = false;
                    }
                }
                None => skip_link = false,
            }
        }

        if skip_link {
            console::info(format!(
                "File {} already up to date. Skipping",
                binary_path.display()
            ));
            return Ok(());
        }

        let mut argv: Vec<String> = vec![
            self.config.build.linker.to_string(),
            "-o".to_string(),
            binary_path.display().to_string(),
        ];
        argv.extend(self.config.link_flags());
        argv.extend(object_paths.iter().map(|path| path.display().to_string()));

        self.runner.run(&argv).await
    }

    /// Object file path a source compiles to, without touching the filesystem.
    pub fn object_path(&self, source: impl AsRef<Path>) -> Result<PathBuf> {
        let name = object_file_name(source.as_ref())?;
        Ok(self.config.build.object_dir.join(name.as_str()))
    }

    /// Full compiler argv for a source, as `compile` would run it.
    pub fn compile_command(&self, source: impl AsRef<Path>) -> Result<Vec<String>> {
        let source = source.as_ref();
        let source_path = self.config.build.source_dir.join(source);
        let object_path = self.object_path(source)?;
        Ok(self.compile_argv(&source_path, &object_path))
    }

    fn compile_argv(&self, source_path: &Path, object_path: &Path) -> Vec<String> {
        let mut argv: Vec<String> = vec![
            self.config.build.compiler.to_string(),
            "-c".to_string(),
            "-o".to_string(),
            object_path.display().to_string(),
        ];
        argv.extend(self.config.compile_flags());
        argv.push(source_path.display().to_string());
        argv.extend(
            self.config
                .include_paths()
                .iter()
                .map(|dir| format!("-I{}", dir.display())),
        );
        argv.extend(self.definitions.render_flags());
        argv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::config::{BuildDefines, BuildIncludes};

    fn config_with(defines: &[&str], debug: bool) -> BuildConfig {
        let mut config = BuildConfig::default();
        config.build.debug = debug;
        if !defines.is_empty() {
            config.build.defines = Some(BuildDefines {
                values: defines.iter().map(|d| (*d).into()).collect(),
            });
        }
        config
    }

    #[test]
    fn debug_mode_seeds_the_debug_definition_first() {
        let builder = Builder::new(config_with(&["_CRT_SECURE_NO_WARNINGS=1"], true)).unwrap();
        assert_eq!(
            builder.definitions().render_flags(),
            vec!["-DDEBUG=1", "-D_CRT_SECURE_NO_WARNINGS=1"]
        );
    }

    #[test]
    fn release_mode_seeds_only_configured_defines() {
        let builder = Builder::new(config_with(&["A=1", "B=2"], false)).unwrap();
        assert_eq!(
            builder.definitions().render_flags(),
            vec!["-DA=1", "-DB=2"]
        );
    }

    #[test]
    fn malformed_seed_define_fails_construction() {
        let result = Builder::new(config_with(&["NOT A MACRO"], false));
        assert!(matches!(result, Err(CcBuildError::Config(_))));
    }

    #[test]
    fn compile_command_matches_the_documented_shape() {
        let mut builder = Builder::new(config_with(&[], false)).unwrap();
        builder.define("NDEBUG", "1");

        let argv = builder.compile_command("main.c").unwrap();
        let expected: Vec<String> = [
            "clang",
            "-c",
            "-o",
            "obj/main.o",
            "-std=c99",
            "-Wall",
            "-Werror",
            "-pedantic",
            "src/main.c",
            "-Iinclude",
            "-DNDEBUG=1",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(argv, expected);
    }

    #[test]
    fn compile_command_renders_every_include_directory() {
        let mut config = config_with(&[], false);
        config.build.includes = Some(BuildIncludes {
            paths: vec!["include".into(), "vendor/include".into()],
        });
        let builder = Builder::new(config).unwrap();

        let argv = builder.compile_command("main.c").unwrap();
        assert!(argv.contains(&"-Iinclude".to_string()));
        assert!(argv.contains(&"-Ivendor/include".to_string()));
    }

    #[test]
    fn object_paths_land_in_the_object_directory() {
        let builder = Builder::new(config_with(&[], false)).unwrap();
        assert_eq!(
            builder.object_path("frontend/lexer.c").unwrap(),
            PathBuf::from("obj/lexer.o")
        );
    }

    #[test]
    fn undefining_an_unknown_key_keeps_the_closed_contract() {
        let mut builder = Builder::new(config_with(&[], false)).unwrap();
        assert!(matches!(
            builder.undefine("MISSING"),
            Err(CcBuildError::NotFound(_))
        ));
    }
}
