pub mod console;
pub mod process;

pub use process::CommandRunner;
