//! FactCheck CLI library.
//!
//! Submits claims for verification, shows trust scores, manages the
//! account session and hosts the chat assistant from the terminal.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
