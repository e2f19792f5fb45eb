#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::load_site;
use crate::error::Result;

#[derive(Debug, Clone, Args)]
pub struct SectionsArgs {
    /// Site configuration (TOML, or JSON by extension).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print a JSON array instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SectionRow<'a> {
    id: &'a str,
    label: &'a str,
    anchor: String,
}

pub fn run_sections(args: &SectionsArgs, out: &mut dyn Write) -> Result<()> {
    let registry = load_site(args.config.as_deref())?.registry()?;
    let rows: Vec<SectionRow<'_>> = registry
        .iter()
        .map(|region| SectionRow {
            id: region.id().as_str(),
            label: region.label(),
            anchor: region.id().anchor(),
        })
        .collect();

    if args.json {
        serde_json::to_writer(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }
    let id_width = rows.iter().map(|r| r.id.len()).max().unwrap_or(0);
    for (idx, row) in rows.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {:<id_width$}  {:<12} {}",
            idx + 1,
            row.id,
            row.label,
            row.anchor
        )?;
    }
    Ok(())
}
