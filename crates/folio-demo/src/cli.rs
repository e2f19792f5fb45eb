#![forbid(unsafe_code)]

use std::io::Write;
use std::path::Path;

use clap::{Parser, Subcommand};
use folio::SiteConfig;
use folio::logging::{self, LogFormat};

use crate::check::{CheckConfigArgs, run_check_config};
use crate::error::Result;
use crate::scroll::{ScrollArgs, run_scroll};
use crate::sections::{SectionsArgs, run_sections};

#[derive(Debug, Parser)]
#[command(
    name = "folio-demo",
    about = "Simulate scrolling a folio page and watch the nav highlight follow",
    version
)]
pub struct Cli {
    /// Log output format on stderr (plain or json). Verbosity comes from
    /// FOLIO_LOG or RUST_LOG.
    #[arg(long, global = true, default_value = "plain")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the tracked sections in page order.
    Sections(SectionsArgs),

    /// Scroll through the page and print the active section per step.
    Scroll(ScrollArgs),

    /// Validate a site configuration file.
    #[command(name = "check-config")]
    CheckConfig(CheckConfigArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format)?;
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(cli, &mut out)
}

/// Dispatch a parsed command, writing its report to `out`.
pub fn run_with(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Sections(args) => run_sections(&args, out),
        Commands::Scroll(args) => run_scroll(&args, out),
        Commands::CheckConfig(args) => run_check_config(&args, out),
    }
}

/// The built-in site, or the validated file at `path`.
pub(crate) fn load_site(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => Ok(SiteConfig::load(path)?),
        None => Ok(SiteConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_log_format_after_subcommand() {
        let cli = Cli::try_parse_from(["folio-demo", "sections", "--log-format", "json"])
            .expect("valid args");
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Commands::Sections(_)));
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["folio-demo", "--log-format", "xml", "sections"]).is_err());
    }

    #[test]
    fn scroll_defaults() {
        let cli = Cli::try_parse_from(["folio-demo", "scroll"]).expect("valid args");
        let Commands::Scroll(args) = cli.command else {
            panic!("expected scroll");
        };
        assert_eq!(args.viewport_height, 1000.0);
        assert_eq!(args.step, 100.0);
        assert_eq!(args.to, None);
        assert!(!args.json);
    }

    #[test]
    fn check_config_requires_file() {
        assert!(Cli::try_parse_from(["folio-demo", "check-config"]).is_err());
    }

    #[test]
    fn missing_config_file_is_io_config_error() {
        let err = load_site(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("config error: I/O error"));
    }
}
