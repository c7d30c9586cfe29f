pub mod builder;
pub mod compiledb;
pub mod config;
pub mod definitions;
pub mod staleness;

pub use builder::Builder;
pub use compiledb::CompilationDatabase;
pub use config::BuildConfig;
pub use definitions::DefinitionRegistry;
pub use staleness::StalenessChecker;
