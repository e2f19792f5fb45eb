#![forbid(unsafe_code)]

//! The portfolio page: its trackable sections and a simple stacked layout.
//!
//! The page is a header followed by the registered sections in order and an
//! unregistered contact block at the bottom. [`PageLayout`] turns that into
//! document-space boxes so a [`LayoutSource`](folio_runtime::LayoutSource)
//! can scroll through it without a browser.

use std::collections::HashMap;

use folio_core::{Rect, RegionId, RegionRegistry};

/// Registered sections in page order, as `(id, label)`.
pub const SECTIONS: [(&str, &str); 6] = [
    ("about", "About"),
    ("resume", "Resume"),
    ("experience", "Experience"),
    ("education", "Education"),
    ("projects", "Projects"),
    ("skills", "Skills"),
];

/// Rendered after the last section but never tracked.
pub const CONTACT_ID: &str = "contact";

/// Height of the sticky header plus hero above the first section.
pub const HEADER_OFFSET: f64 = 560.0;
pub const SECTION_HEIGHT: f64 = 800.0;
pub const CONTACT_HEIGHT: f64 = 600.0;
pub const PAGE_WIDTH: f64 = 1280.0;

/// The registry for [`SECTIONS`].
#[must_use]
pub fn default_registry() -> RegionRegistry {
    RegionRegistry::from_pairs(SECTIONS).expect("site sections are non-empty and unique")
}

/// Blocks stacked top to bottom below a fixed header.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    width: f64,
    header_offset: f64,
    blocks: Vec<(RegionId, f64)>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::for_registry(&default_registry(), SECTION_HEIGHT).block(CONTACT_ID, CONTACT_HEIGHT)
    }
}

impl PageLayout {
    /// An empty page of the given width whose first block starts at
    /// `header_offset`.
    #[must_use]
    pub fn new(width: f64, header_offset: f64) -> Self {
        Self {
            width,
            header_offset,
            blocks: Vec::new(),
        }
    }

    /// Every registered region at `section_height`, with the default width
    /// and header.
    #[must_use]
    pub fn for_registry(registry: &RegionRegistry, section_height: f64) -> Self {
        registry
            .ids()
            .fold(Self::new(PAGE_WIDTH, HEADER_OFFSET), |page, id| {
                page.block(id.clone(), section_height)
            })
    }

    /// Append a block below the current last one.
    #[must_use]
    pub fn block(mut self, id: impl Into<RegionId>, height: f64) -> Self {
        self.blocks.push((id.into(), height));
        self
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn header_offset(&self) -> f64 {
        self.header_offset
    }

    /// Block boxes in page order.
    #[must_use]
    pub fn rects(&self) -> Vec<(RegionId, Rect)> {
        let mut top = self.header_offset;
        self.blocks
            .iter()
            .map(|(id, height)| {
                let rect = Rect::new(0.0, top, self.width, *height);
                top += height;
                (id.clone(), rect)
            })
            .collect()
    }

    #[must_use]
    pub fn rect(&self, id: &str) -> Option<Rect> {
        self.rects()
            .into_iter()
            .find_map(|(block, rect)| (block == id).then_some(rect))
    }

    /// Container map for [`VisibilityObserver::start`](folio_runtime::VisibilityObserver::start).
    #[must_use]
    pub fn containers(&self) -> HashMap<RegionId, Rect> {
        self.rects().into_iter().collect()
    }

    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.header_offset + self.blocks.iter().map(|(_, h)| h).sum::<f64>()
    }

    /// Largest scroll offset for a viewport of `viewport_height`.
    #[must_use]
    pub fn max_scroll(&self, viewport_height: f64) -> f64 {
        (self.total_height() - viewport_height).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_follows_page_order() {
        let registry = default_registry();
        let ids: Vec<&str> = registry.ids().map(RegionId::as_str).collect();
        assert_eq!(
            ids,
            ["about", "resume", "experience", "education", "projects", "skills"]
        );
        assert_eq!(registry.first().id(), "about");
        assert_eq!(registry.label("skills"), Some("Skills"));
    }

    #[test]
    fn contact_is_laid_out_but_not_registered() {
        let page = PageLayout::default();
        assert!(page.containers().contains_key(CONTACT_ID));
        assert!(!default_registry().contains(CONTACT_ID));
    }

    #[test]
    fn blocks_stack_below_header() {
        let page = PageLayout::new(1000.0, 100.0)
            .block("a", 300.0)
            .block("b", 50.0);
        assert_eq!(page.rect("a"), Some(Rect::new(0.0, 100.0, 1000.0, 300.0)));
        assert_eq!(page.rect("b"), Some(Rect::new(0.0, 400.0, 1000.0, 50.0)));
        assert_eq!(page.rect("c"), None);
        assert_eq!(page.total_height(), 450.0);
        assert_eq!(page.max_scroll(200.0), 250.0);
        assert_eq!(page.max_scroll(900.0), 0.0);
    }

    #[test]
    fn default_page_height() {
        let page = PageLayout::default();
        assert_eq!(page.total_height(), 560.0 + 6.0 * 800.0 + 600.0);
    }
}
