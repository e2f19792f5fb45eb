#![forbid(unsafe_code)]

//! Scroll simulation.
//!
//! Sections are stacked below the header at their configured heights and
//! watched by a [`LayoutSource`]. The viewport then moves from the top to
//! `--to` (default: the bottom of the page) in fixed steps, and each step
//! reports the active section and the nav bar as a reader would see it.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use folio::{LayoutSource, NavView, SiteConfig, VisibilityObserver};
use serde::Serialize;
use tracing::info;

use crate::cli::load_site;
use crate::error::{DemoError, Result};

/// Upper bound on simulated steps per run.
pub const MAX_STEPS: usize = 100_000;

#[derive(Debug, Clone, Args)]
pub struct ScrollArgs {
    /// Site configuration (TOML, or JSON by extension).
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = 1000.0)]
    pub viewport_height: f64,

    /// Defaults to the configured page width.
    #[arg(long)]
    pub viewport_width: Option<f64>,

    /// Pixels scrolled per step.
    #[arg(long, default_value_t = 100.0)]
    pub step: f64,

    /// Last scroll offset. Defaults to the bottom of the page.
    #[arg(long)]
    pub to: Option<f64>,

    /// Columns for the nav bar.
    #[arg(long, default_value_t = 72)]
    pub bar_width: usize,

    /// Only print steps where the active section changed.
    #[arg(long)]
    pub changes_only: bool,

    /// Print one JSON object per step.
    #[arg(long)]
    pub json: bool,
}

impl Default for ScrollArgs {
    fn default() -> Self {
        Self {
            config: None,
            viewport_height: 1000.0,
            viewport_width: None,
            step: 100.0,
            to: None,
            bar_width: 72,
            changes_only: false,
            json: false,
        }
    }
}

/// State after one scroll step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollStep {
    pub y: f64,
    pub active: String,
    /// The active section differs from the previous step.
    pub changed: bool,
    pub bar: String,
}

fn check_args(args: &ScrollArgs) -> Result<()> {
    if !(args.step.is_finite() && args.step > 0.0) {
        return Err(DemoError::invalid(format!(
            "--step must be > 0, got {}",
            args.step
        )));
    }
    if !(args.viewport_height.is_finite() && args.viewport_height > 0.0) {
        return Err(DemoError::invalid(format!(
            "--viewport-height must be > 0, got {}",
            args.viewport_height
        )));
    }
    if let Some(width) = args.viewport_width
        && !(width.is_finite() && width > 0.0)
    {
        return Err(DemoError::invalid(format!(
            "--viewport-width must be > 0, got {width}"
        )));
    }
    if let Some(to) = args.to
        && !(to.is_finite() && to >= 0.0)
    {
        return Err(DemoError::invalid(format!("--to must be >= 0, got {to}")));
    }
    Ok(())
}

/// Scroll through the page described by `site`.
pub fn simulate(site: &SiteConfig, args: &ScrollArgs) -> Result<Vec<ScrollStep>> {
    check_args(args)?;
    let page = site.page_layout();
    let end = args
        .to
        .unwrap_or_else(|| page.max_scroll(args.viewport_height));
    let expected = (end / args.step).ceil() + 1.0;
    if expected > MAX_STEPS as f64 {
        return Err(DemoError::invalid(format!(
            "{expected} steps requested; raise --step (limit {MAX_STEPS})"
        )));
    }

    let width = args.viewport_width.unwrap_or(page.width());
    let mut observer = VisibilityObserver::with_options(
        LayoutSource::new(width, args.viewport_height),
        site.registry()?,
        site.observer_options()?,
    );
    let report = observer.start(&page.containers());
    info!(
        observed = report.observed,
        missing = report.missing,
        page_height = page.total_height(),
        "page laid out"
    );
    let nav = NavView::new(observer.active().clone());

    let mut steps = Vec::new();
    let mut version = observer.active().version();
    let mut y = 0.0_f64;
    loop {
        observer.source_mut().scroll_to(y);
        let now = observer.active().version();
        steps.push(ScrollStep {
            y,
            active: observer.active().get().to_string(),
            changed: now != version,
            bar: nav.render_line(args.bar_width),
        });
        version = now;
        if y >= end {
            break;
        }
        y = (y + args.step).min(end);
    }
    Ok(steps)
}

pub fn run_scroll(args: &ScrollArgs, out: &mut dyn Write) -> Result<()> {
    let site = load_site(args.config.as_deref())?;
    let steps = simulate(&site, args)?;
    for step in steps.iter().filter(|s| s.changed || !args.changes_only) {
        if args.json {
            serde_json::to_writer(&mut *out, step)?;
            writeln!(out)?;
        } else {
            let mark = if step.changed { '*' } else { ' ' };
            writeln!(
                out,
                "{:>8.0} {mark} {:<12} {}",
                step.y, step.active, step.bar
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes(steps: &[ScrollStep]) -> Vec<(f64, &str)> {
        steps
            .iter()
            .filter(|s| s.changed)
            .map(|s| (s.y, s.active.as_str()))
            .collect()
    }

    #[test]
    fn default_page_visits_every_section_in_order() {
        let steps = simulate(&SiteConfig::default(), &ScrollArgs::default()).unwrap();
        assert_eq!(steps.first().map(|s| s.y), Some(0.0));
        assert_eq!(steps.last().map(|s| s.y), Some(4960.0));
        assert_eq!(
            changes(&steps),
            vec![
                (1200.0, "resume"),
                (2000.0, "experience"),
                (2800.0, "education"),
                (3600.0, "projects"),
                (4400.0, "skills"),
            ]
        );
    }

    #[test]
    fn first_step_is_about_and_unchanged() {
        let steps = simulate(&SiteConfig::default(), &ScrollArgs::default()).unwrap();
        assert_eq!(steps[0].active, "about");
        assert!(!steps[0].changed);
        assert!(steps[0].bar.starts_with("[About]"));
    }

    #[test]
    fn stops_at_requested_offset() {
        let args = ScrollArgs {
            to: Some(250.0),
            ..ScrollArgs::default()
        };
        let ys: Vec<f64> = simulate(&SiteConfig::default(), &args)
            .unwrap()
            .iter()
            .map(|s| s.y)
            .collect();
        assert_eq!(ys, vec![0.0, 100.0, 200.0, 250.0]);
    }

    #[test]
    fn rejects_bad_step() {
        for step in [0.0, -5.0, f64::NAN] {
            let args = ScrollArgs {
                step,
                ..ScrollArgs::default()
            };
            let err = simulate(&SiteConfig::default(), &args).unwrap_err();
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn caps_step_count() {
        let args = ScrollArgs {
            step: 0.001,
            ..ScrollArgs::default()
        };
        assert!(matches!(
            simulate(&SiteConfig::default(), &args),
            Err(DemoError::InvalidArgument { .. })
        ));
    }
}
