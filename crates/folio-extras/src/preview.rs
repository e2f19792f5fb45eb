#![forbid(unsafe_code)]

//! Document preview.
//!
//! Rendering is delegated to a [`DocumentLoader`]; the preview only tracks
//! which file and page to show and whether loading worked. A load failure is
//! logged and shown as a [`PreviewState::Failed`] state, never a panic.

use std::fmt;
use std::num::NonZeroU32;

use tracing::{debug, error};

/// File shown when no other path is configured.
pub const DEFAULT_DOCUMENT: &str = "/Resume.pdf";

/// What the loader learned about a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentInfo {
    pub page_count: u32,
}

/// Fetches and parses documents.
pub trait DocumentLoader {
    fn load(&mut self, path: &str) -> Result<DocumentInfo, LoadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    message: String,
}

impl LoadError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Pending,
    Ready { page: u32, page_count: u32 },
    Failed(String),
}

/// A single-page preview of one document.
#[derive(Debug, Clone)]
pub struct DocumentPreview {
    path: String,
    page: NonZeroU32,
    state: PreviewState,
}

impl Default for DocumentPreview {
    fn default() -> Self {
        Self {
            path: DEFAULT_DOCUMENT.to_string(),
            page: NonZeroU32::MIN,
            state: PreviewState::Pending,
        }
    }
}

impl DocumentPreview {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: NonZeroU32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn page(&self) -> NonZeroU32 {
        self.page
    }

    #[must_use]
    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// Load the document and settle the state.
    pub fn load<L: DocumentLoader + ?Sized>(&mut self, loader: &mut L) -> &PreviewState {
        let page = self.page.get();
        self.state = match loader.load(&self.path) {
            Ok(info) if page <= info.page_count => {
                debug!(path = %self.path, page, page_count = info.page_count, "document ready");
                PreviewState::Ready {
                    page,
                    page_count: info.page_count,
                }
            }
            Ok(info) => {
                let reason = format!(
                    "page {page} is beyond the last page ({})",
                    info.page_count
                );
                error!(path = %self.path, page, page_count = info.page_count, "document page out of range");
                PreviewState::Failed(reason)
            }
            Err(err) => {
                error!(path = %self.path, error = %err, "document failed to load");
                PreviewState::Failed(err.to_string())
            }
        };
        &self.state
    }
}
