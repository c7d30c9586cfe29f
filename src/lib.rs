/// ccbuild - An incremental compile/link orchestrator for C projects
///
/// This crate provides a small build engine with focus on:
/// - Timestamp-based incremental rebuilds
/// - Explicit preprocessor definition bookkeeping
/// - Deferred failure reporting (compile errors gate the link step)
///
/// Main modules:
/// - build: Build configuration, staleness checks and the step orchestrator
/// - cli: Command-line interface parsing and execution
/// - commands: Implementation of the build, setup and clean commands
/// - result: Error handling and result types
/// - utils: Console reporting and external process execution
pub mod build;
pub mod cli;
pub mod commands;
pub mod result;
pub mod utils;
