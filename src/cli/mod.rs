// Command-line interface

pub mod args;
pub mod repl;

pub use args::CliArgs;
pub use repl::ChatRepl;
