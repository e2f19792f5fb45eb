#![forbid(unsafe_code)]

//! Navigation view.
//!
//! [`NavView`] renders the region registry as a list of jump targets and
//! marks the entry matching the [`ActiveSection`]. It only reads the state.
//! Activating an entry yields a [`NavRequest`] for the host to perform the
//! anchor jump; the resulting scroll reaches the observer like any other and
//! the highlight follows from there.
//!
//! # Text bar
//!
//! [`NavView::render_line`] draws `[Label]` for the active entry and
//! ` Label ` for the rest. When the bar is wider than the available columns
//! the window slides right just far enough to keep the active entry visible,
//! then the tail is clipped at a column boundary.

use folio_core::{RegionId, RegionRegistry};
use folio_runtime::{ActiveSection, Subscription};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Class lists applied to nav list items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStyle {
    /// Classes on every item.
    pub base: String,
    /// Added to the active item.
    pub active: String,
    /// Added to every other item.
    pub inactive: String,
}

impl Default for NavStyle {
    fn default() -> Self {
        Self {
            base: "inline-block rounded-full px-3 py-1 text-sm transition-colors duration-300"
                .to_string(),
            active: "bg-black text-white".to_string(),
            inactive: "text-black".to_string(),
        }
    }
}

impl NavStyle {
    /// Full class attribute for an item.
    #[must_use]
    pub fn classes(&self, active: bool) -> String {
        let state = if active { &self.active } else { &self.inactive };
        match (self.base.is_empty(), state.is_empty()) {
            (true, _) => state.clone(),
            (false, true) => self.base.clone(),
            (false, false) => format!("{} {}", self.base, state),
        }
    }
}

/// Snapshot of one navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub id: RegionId,
    pub label: String,
    /// Same-document anchor, e.g. `#resume`.
    pub href: String,
    pub active: bool,
}

/// What the host should do after an entry is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavRequest {
    /// Jump to the anchor with the platform's native behavior.
    JumpTo { anchor: String },
}

/// Navigation list bound to an active-section state.
#[derive(Debug, Clone)]
pub struct NavView {
    active: ActiveSection,
    style: NavStyle,
}

impl NavView {
    #[must_use]
    pub fn new(active: ActiveSection) -> Self {
        Self {
            active,
            style: NavStyle::default(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: NavStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn style(&self) -> &NavStyle {
        &self.style
    }

    #[must_use]
    pub fn registry(&self) -> &RegionRegistry {
        self.active.registry()
    }

    /// Entries in registry order, exactly one of them active.
    #[must_use]
    pub fn entries(&self) -> Vec<NavEntry> {
        let current = self.active.get();
        self.registry()
            .iter()
            .map(|region| NavEntry {
                id: region.id().clone(),
                label: region.label().to_string(),
                href: region.id().anchor(),
                active: *region.id() == current,
            })
            .collect()
    }

    /// Markup for the top navigation list.
    ///
    /// Each `<li>` carries `data-section` so a host can toggle classes later
    /// without re-rendering.
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = String::from("<ul class=\"folio-nav\">\n");
        for entry in self.entries() {
            let id = html_escape(entry.id.as_str());
            html.push_str(&format!(
                "  <li data-section=\"{id}\" class=\"{}\"><a href=\"{}\">{}</a></li>\n",
                html_escape(&self.style.classes(entry.active)),
                html_escape(&entry.href),
                html_escape(&entry.label),
            ));
        }
        html.push_str("</ul>\n");
        html
    }

    /// One-line text bar clipped to `width` display columns.
    #[must_use]
    pub fn render_line(&self, width: usize) -> String {
        if width == 0 {
            return String::new();
        }
        let segments: Vec<(String, bool)> = self
            .entries()
            .into_iter()
            .map(|e| {
                if e.active {
                    (format!("[{}]", e.label), true)
                } else {
                    (format!(" {} ", e.label), false)
                }
            })
            .collect();

        let start = visible_start(&segments, width);
        let mut line = String::new();
        let mut used = 0usize;
        'outer: for (text, _) in &segments[start..] {
            for ch in text.chars() {
                let w = ch.width().unwrap_or(0);
                if used + w > width {
                    break 'outer;
                }
                line.push(ch);
                used += w;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(width, start, used, "nav.render_line");

        line
    }

    /// Request a jump to `id`.
    ///
    /// Never changes the active section. Unknown ids yield `None`.
    #[must_use]
    pub fn activate(&self, id: &str) -> Option<NavRequest> {
        let region = self.registry().get(id)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "nav.activate", region = id);

        Some(NavRequest::JumpTo {
            anchor: region.id().anchor(),
        })
    }

    /// Run `f` with the new id whenever the active entry changes.
    pub fn on_change(&self, f: impl Fn(&RegionId) + 'static) -> Subscription {
        self.active.subscribe(f)
    }
}

/// First segment to draw so the active one ends inside `width` columns.
fn visible_start(segments: &[(String, bool)], width: usize) -> usize {
    let Some(active) = segments.iter().position(|(_, active)| *active) else {
        return 0;
    };
    let widths: Vec<usize> = segments.iter().map(|(text, _)| text.width()).collect();
    let mut start = 0;
    let mut end: usize = widths[..=active].iter().sum();
    while end > width && start < active {
        end -= widths[start];
        start += 1;
    }
    start
}

fn html_escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}
