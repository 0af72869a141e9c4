//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
///
/// `path` is the file given with `--config`, if any.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let mut shown = config.clone();
            if !shown.ai.gemini_api_key.is_empty() {
                shown.ai.gemini_api_key = "********".to_string();
            }
            print!("{}", shown.to_toml()?);
            Ok(())
        }
        ConfigAction::Init { force } => {
            let target = match path {
                Some(p) => p.to_path_buf(),
                None => Config::path()?,
            };
            if target.exists() && !force {
                return Err(CliError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    target.display()
                )));
            }
            Config::default().save_to(&target)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote default configuration to {}", target.display()))
            );
            Ok(())
        }
    }
}
