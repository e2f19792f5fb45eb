#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use folio::SiteConfig;
use folio::config::ConfigError;
use tracing::debug;

use crate::error::{DemoError, Result};

#[derive(Debug, Clone, Args)]
pub struct CheckConfigArgs {
    /// File to validate (TOML, or JSON by extension).
    pub file: PathBuf,
}

/// Print `ok` with a summary, or every validation error and fail.
pub fn run_check_config(args: &CheckConfigArgs, out: &mut dyn Write) -> Result<()> {
    match SiteConfig::load(&args.file) {
        Ok(config) => {
            debug!(path = %args.file.display(), "config is valid");
            writeln!(
                out,
                "ok: {} section(s), root margin {}, thresholds {:?}",
                config.sections.len(),
                config.observer.root_margin,
                config.observer.thresholds
            )?;
            Ok(())
        }
        Err(ConfigError::Validation(errors)) => {
            for error in &errors {
                writeln!(out, "error: {error}")?;
            }
            Err(DemoError::exit(
                2,
                format!("{}: {} problem(s) found", args.file.display(), errors.len()),
            ))
        }
        Err(other) => Err(other.into()),
    }
}
