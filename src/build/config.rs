use crate::result::{CcBuildError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const DEFAULT_INCLUDE_DIR: &str = "include";
pub const DEFAULT_COMPILE_FLAGS: &[&str] = &["-std=c99", "-Wall", "-Werror", "-pedantic"];

static MACRO_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub build: Build,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    #[serde(default = "default_compiler")]
    pub compiler: SmolStr,
    #[serde(default = "default_linker")]
    pub linker: SmolStr,
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_object_dir")]
    pub object_dir: PathBuf,
    #[serde(default = "default_binary_dir")]
    pub binary_dir: PathBuf,
    pub target: SmolStr,
    pub sources: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes: Option<BuildIncludes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cflags: Option<BuildArgs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldflags: Option<BuildArgs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defines: Option<BuildDefines>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub rebuild: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildIncludes {
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildArgs {
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDefines {
    pub values: Vec<SmolStr>,
}

fn default_compiler() -> SmolStr {
    "clang".into()
}

fn default_linker() -> SmolStr {
    "clang".into()
}

fn default_source_dir() -> PathBuf {
    "src".into()
}

fn default_object_dir() -> PathBuf {
    "obj".into()
}

fn default_binary_dir() -> PathBuf {
    "bin".into()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            build: Build {
                compiler: default_compiler(),
                linker: default_linker(),
                source_dir: default_source_dir(),
                object_dir: default_object_dir(),
                binary_dir: default_binary_dir(),
                target: "app".into(),
                sources: vec!["main.c".into()],
                includes: Some(BuildIncludes {
                    paths: vec![DEFAULT_INCLUDE_DIR.into()],
                }),
                cflags: Some(BuildArgs {
                    args: DEFAULT_COMPILE_FLAGS
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                }),
                ldflags: None,
                defines: None,
                debug: false,
                rebuild: false,
            },
        }
    }
}

impl BuildConfig {
    pub async fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: BuildConfig = toml::from_str(&content).map_err(|e| {
            CcBuildError::Config(format!("Invalid build config format: {}", e).into())
        })?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.build.compiler.is_empty() {
            return Err(CcBuildError::Config("Compiler cannot be empty".into()));
        }

        if self.build.linker.is_empty() {
            return Err(CcBuildError::Config("Linker cannot be empty".into()));
        }

        if self.build.target.is_empty() {
            return Err(CcBuildError::Config("Target binary cannot be empty".into()));
        }

        if self.build.sources.is_empty() {
            return Err(CcBuildError::Config(
                "At least one source file is required".into(),
            ));
        }

        // Two sources with the same stem would fight over one object file.
        let mut stems: HashMap<SmolStr, &PathBuf> = HashMap::new();
        for source in &self.build.sources {
            let object = object_file_name(source)?;
            if let Some(previous) = stems.insert(object.clone(), source) {
                return Err(CcBuildError::Config(
                    format!(
                        "Sources '{}' and '{}' both produce object file '{}'; rename one of them",
                        previous.display(),
                        source.display(),
                        object
                    )
                    .into(),
                ));
            }
        }

        for entry in self.seed_defines() {
            parse_define(&entry)?;
        }

        Ok(())
    }

    pub fn include_paths(&self) -> Vec<PathBuf> {
        match &self.build.includes {
            Some(includes) if !includes.paths.is_empty() => includes.paths.clone(),
            _ => vec![DEFAULT_INCLUDE_DIR.into()],
        }
    }

    pub fn compile_flags(&self) -> Vec<String> {
        match &self.build.cflags {
            Some(cflags) if !cflags.args.is_empty() => cflags.args.clone(),
            _ => DEFAULT_COMPILE_FLAGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn link_flags(&self) -> Vec<String> {
        self.build
            .ldflags
            .as_ref()
            .map(|flags| flags.args.clone())
            .unwrap_or_default()
    }

    pub fn seed_defines(&self) -> Vec<SmolStr> {
        self.build
            .defines
            .as_ref()
            .map(|defines| defines.values.clone())
            .unwrap_or_default()
    }
}

// Object files are named after the source stem: src/lexer.c -> lexer.o.
// Directory prefixes are dropped, only the final extension is stripped.
pub fn object_file_name(source: &Path) -> Result<SmolStr> {
    let stem = source.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
        CcBuildError::Config(
            format!("Cannot derive an object name from '{}'", source.display()).into(),
        )
    })?;

    Ok(format!("{}.o", stem).into())
}

pub fn parse_define(entry: &str) -> Result<(SmolStr, SmolStr)> {
    let (name, value) = entry.split_once('=').ok_or_else(|| {
        CcBuildError::Config(format!("Invalid define '{}': expected NAME=VALUE", entry).into())
    })?;

    if !MACRO_NAME_REGEX.is_match(name) {
        return Err(CcBuildError::Config(
            format!("Invalid define name '{}': not a valid macro identifier", name).into(),
        ));
    }

    Ok((name.into(), value.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_round_trips() {
        let config = BuildConfig::default();
        config.validate().unwrap();

        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: BuildConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.build.compiler, "clang");
        assert_eq!(parsed.build.sources, vec![PathBuf::from("main.c")]);
        assert_eq!(parsed.include_paths(), vec![PathBuf::from("include")]);
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let parsed: BuildConfig = toml::from_str(
            r#"
            [build]
            target = "thcc"
            sources = ["cli.c", "lexer.c", "parser.c"]
            "#,
        )
        .unwrap();

        assert_eq!(parsed.build.compiler, "clang");
        assert_eq!(parsed.build.source_dir, PathBuf::from("src"));
        assert_eq!(parsed.build.object_dir, PathBuf::from("obj"));
        assert_eq!(
            parsed.compile_flags(),
            vec!["-std=c99", "-Wall", "-Werror", "-pedantic"]
        );
        assert!(parsed.link_flags().is_empty());
        assert!(!parsed.build.rebuild);
        parsed.validate().unwrap();
    }

    #[test]
    fn empty_include_section_falls_back_to_default() {
        let mut config = BuildConfig::default();
        config.build.includes = Some(BuildIncludes { paths: vec![] });
        assert_eq!(config.include_paths(), vec![PathBuf::from("include")]);
    }

    #[test]
    fn empty_compiler_is_rejected() {
        let mut config = BuildConfig::default();
        config.build.compiler = "".into();
        assert!(matches!(
            config.validate(),
            Err(CcBuildError::Config(_))
        ));
    }

    #[test]
    fn colliding_object_names_are_rejected() {
        let mut config = BuildConfig::default();
        config.build.sources = vec!["frontend/main.c".into(), "backend/main.c".into()];
        let err = config.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("main.o"), "unexpected message: {}", message);
    }

    #[test]
    fn malformed_defines_are_rejected() {
        let mut config = BuildConfig::default();
        config.build.defines = Some(BuildDefines {
            values: vec!["DEBUG".into()],
        });
        assert!(config.validate().is_err());

        config.build.defines = Some(BuildDefines {
            values: vec!["1BAD=1".into()],
        });
        assert!(config.validate().is_err());

        config.build.defines = Some(BuildDefines {
            values: vec!["_CRT_SECURE_NO_WARNINGS=1".into(), "EMPTY=".into()],
        });
        config.validate().unwrap();
    }

    #[test]
    fn object_names_strip_directories_and_final_extension() {
        assert_eq!(
            object_file_name(Path::new("frontend/lexer.c")).unwrap(),
            "lexer.o"
        );
        assert_eq!(object_file_name(Path::new("main.c")).unwrap(), "main.o");
        assert_eq!(
            object_file_name(Path::new("archive.tar.c")).unwrap(),
            "archive.tar.o"
        );
        assert!(object_file_name(Path::new("")).is_err());
    }

    #[test]
    fn parse_define_splits_on_first_equals() {
        let (name, value) = parse_define("VERSION=\"1.2\"").unwrap();
        assert_eq!(name, "VERSION");
        assert_eq!(value, "\"1.2\"");

        let (name, value) = parse_define("EXPR=a=b").unwrap();
        assert_eq!(name, "EXPR");
        assert_eq!(value, "a=b");
    }
}
