//! Terminal presentation for the console: screen rendering and the interactive shell.

pub mod outputformatter;
pub mod repl;

pub use outputformatter::{render_notice, render_records, render_screen};
pub use repl::{dispatch, parse_command, run_repl, Command};
