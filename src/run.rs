mod cli;
mod repl;

pub(crate) use cli::{as_cli, Cli};
