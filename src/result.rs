use std::borrow::Cow;
use thiserror::Error;

/** Main Result type alias for ccbuild operations
 *
 * # Usage
 * ```no_run
 * use ccbuild::result::Result;
 *
 * async fn read_config() -> Result<String> {
 *     // Function automatically propagates CcBuildError
 *     let content = std::fs::read_to_string("ccbuild.toml")?;
 *     Ok(content)
 * }
 * ```
 */
pub type Result<T> = std::result::Result<T, CcBuildError>;

/** Error enumeration for the ccbuild application
 *
 * # Error Categories
 * - **Io**: File system and I/O operations
 * - **Process**: Spawning or waiting on the external compiler/linker
 * - **Config**: Build description parsing and validation errors
 * - **NotFound**: Missing sources, objects, executables or definitions
 * - **AbortedBuild**: A link refused because earlier compile steps failed
 * - **Json**: Compilation database serialization
 * - **Unexpected**: An error kind escaping a declared closed set
 *
 * # Design Notes
 * - Uses `Cow<'static, str>` for efficient string storage
 * - Automatic From implementations for common error types
 * - Every public build entry point declares which kinds it may return;
 *   anything else is rewrapped as `Unexpected` (see [`guard`])
 */
#[derive(Error, Debug)]
pub enum CcBuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process error: {0}")]
    Process(Cow<'static, str>),

    #[error("Config error: {0}")]
    Config(Cow<'static, str>),

    #[error("Not found: {0}")]
    NotFound(Cow<'static, str>),

    #[error("Build aborted: {0}")]
    AbortedBuild(Cow<'static, str>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected error kind in {function}: allowed kinds: {allowed}; got: {got}")]
    Unexpected {
        function: &'static str,
        allowed: Cow<'static, str>,
        got: &'static str,
    },
}

/** Discriminant-only view of [`CcBuildError`]
 *
 * Entry points name the kinds they are allowed to surface as a
 * `&'static [ErrorKind]` slice handed to [`guard`]. Keeping the kind
 * separate from the payload lets that check stay allocation-free.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Process,
    Config,
    NotFound,
    AbortedBuild,
    Json,
    Unexpected,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Io => "Io",
            ErrorKind::Process => "Process",
            ErrorKind::Config => "Config",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::AbortedBuild => "AbortedBuild",
            ErrorKind::Json => "Json",
            ErrorKind::Unexpected => "Unexpected",
        }
    }
}

/** Error constructor methods
 *
 * # Purpose
 * - Convenient constructors for the message-carrying variants
 * - Accept `&'static str` without allocation and `String` when dynamic
 *
 * # Usage Examples
 * ```ignore
 * use ccbuild::result::CcBuildError;
 *
 * return Err(CcBuildError::not_found(format!("File {} not found", name)));
 * return Err(CcBuildError::config("Compiler cannot be empty"));
 * ```
 */
impl CcBuildError {
    pub fn process(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Process(msg.into())
    }

    pub fn config(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn aborted(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::AbortedBuild(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CcBuildError::Io(_) => ErrorKind::Io,
            CcBuildError::Process(_) => ErrorKind::Process,
            CcBuildError::Config(_) => ErrorKind::Config,
            CcBuildError::NotFound(_) => ErrorKind::NotFound,
            CcBuildError::AbortedBuild(_) => ErrorKind::AbortedBuild,
            CcBuildError::Json(_) => ErrorKind::Json,
            CcBuildError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }
}

/** Normalizes an entry point's error result against a declared kind set
 *
 * # Behavior
 * - `Ok` values and errors whose kind is in `allowed` pass through untouched
 * - Any other error is replaced by [`CcBuildError::Unexpected`] carrying the
 *   entry point name, the allowed kind names and the offending kind name
 * - An `Unexpected` error passes through unchanged so the innermost
 *   context survives nested entry points
 *
 * # Usage
 * ```ignore
 * use ccbuild::result::{guard, ErrorKind};
 *
 * pub async fn compile(&mut self, source: &str) -> Result<()> {
 *     let result = self.compile_inner(source).await;
 *     guard("compile", &[ErrorKind::NotFound, ErrorKind::Io, ErrorKind::Process], result)
 * }
 * ```
 */
pub fn guard<T>(
    function: &'static str,
    allowed: &'static [ErrorKind],
    result: Result<T>,
) -> Result<T> {
    match result {
        Err(err) => {
            let kind = err.kind();
            if kind == ErrorKind::Unexpected || allowed.contains(&kind) {
                return Err(err);
            }
            let names: Vec<&'static str> = allowed.iter().map(ErrorKind::name).collect();
            Err(CcBuildError::Unexpected {
                function,
                allowed: names.join(", ").into(),
                got: kind.name(),
            })
        }
        ok => ok,
    }
}

/*
 * Error Handling Conventions:
 *
 * 1. Two severities exist at runtime:
 *    - Fatal: NotFound, AbortedBuild, Config, Process, Io and Json abort
 *      the whole run; there is no partial-success path.
 *    - Non-fatal: a compiler or linker exiting nonzero is NOT an error value
 *      at the call site. The CommandRunner warns, bumps its tally and
 *      returns Ok so independent compile steps keep executing. The link
 *      step converts a nonzero tally into a fatal AbortedBuild.
 *
 * 2. Closed taxonomy:
 *    - Builder entry points wrap their bodies with guard() so callers can
 *      match exhaustively on the kinds the documentation names.
 *    - guard() is the explicit-combinator replacement for interception of
 *      arbitrary exceptions: anything off-contract becomes Unexpected
 *      instead of leaking a surprise kind.
 *
 * 3. Message style:
 *    - Cow<'static, str> payloads avoid allocation for fixed messages.
 *    - Messages name the offending path or key; prefixes such as
 *      "Attempt to ..." match the console wording used by the steps.
 */

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> Result<()> {
        Err(CcBuildError::not_found("missing.c"))
    }

    #[test]
    fn guard_passes_allowed_kinds_through() {
        let result = guard("compile", &[ErrorKind::NotFound], not_found());
        assert!(matches!(result, Err(CcBuildError::NotFound(_))));
    }

    #[test]
    fn guard_rewraps_undeclared_kinds() {
        let result: Result<()> = guard(
            "undefine",
            &[ErrorKind::NotFound],
            Err(CcBuildError::config("bad description")),
        );
        match result {
            Err(CcBuildError::Unexpected {
                function,
                allowed,
                got,
            }) => {
                assert_eq!(function, "undefine");
                assert_eq!(allowed, "NotFound");
                assert_eq!(got, "Config");
            }
            other => panic!("expected Unexpected, got {:?}", other),
        }
    }

    #[test]
    fn guard_does_not_double_wrap() {
        let inner: Result<()> = guard(
            "inner",
            &[ErrorKind::Io],
            Err(CcBuildError::aborted("errors encountered")),
        );
        let outer = guard("outer", &[ErrorKind::NotFound], inner);
        match outer {
            Err(CcBuildError::Unexpected { function, got, .. }) => {
                assert_eq!(function, "inner");
                assert_eq!(got, "AbortedBuild");
            }
            other => panic!("expected Unexpected from inner, got {:?}", other),
        }
    }

    #[test]
    fn guard_leaves_ok_untouched() {
        let result = guard("compile", &[ErrorKind::NotFound], Ok(42));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn kinds_cover_every_variant() {
        assert_eq!(CcBuildError::process("x").kind(), ErrorKind::Process);
        assert_eq!(CcBuildError::config("x").kind(), ErrorKind::Config);
        assert_eq!(CcBuildError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(CcBuildError::aborted("x").kind(), ErrorKind::AbortedBuild);
        let io = CcBuildError::from(std::io::Error::other("x"));
        assert_eq!(io.kind(), ErrorKind::Io);
    }
}
