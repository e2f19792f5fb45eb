#![forbid(unsafe_code)]

//! Site configuration.
//!
//! A [`SiteConfig`] describes the tracked sections, the activation band, and
//! the page geometry used for headless simulation. Every field has a default
//! reproducing the built-in site, so a file only needs to state what differs.
//!
//! ```toml
//! [[sections]]
//! id = "about"
//! label = "About"
//!
//! [[sections]]
//! id = "projects"
//! label = "Projects"
//! height = 1400.0
//!
//! [observer]
//! root_margin = "0px 0px -70% 0px"
//! thresholds = [0.1]
//!
//! [layout]
//! header_offset = 560.0
//! ```

use std::path::Path;

use folio_core::{
    DEFAULT_ROOT_MARGIN, DEFAULT_THRESHOLD, ObserverOptions, Region, RegionRegistry, RootMargin,
};
use serde::{Deserialize, Serialize};

use crate::site::{self, PageLayout};

/// Top-level site configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Tracked sections in page order. The first one is active initially.
    pub sections: Vec<SectionConfig>,
    pub observer: ObserverConfig,
    pub layout: LayoutConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            sections: site::SECTIONS
                .iter()
                .map(|(id, label)| SectionConfig {
                    id: (*id).to_string(),
                    label: (*label).to_string(),
                    height: None,
                })
                .collect(),
            observer: ObserverConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub label: String,
    /// Simulated height; falls back to `layout.section_height`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Activation band settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// CSS margin shorthand applied to the viewport.
    pub root_margin: RootMargin,
    pub thresholds: Vec<f64>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            root_margin: DEFAULT_ROOT_MARGIN,
            thresholds: vec![DEFAULT_THRESHOLD],
        }
    }
}

/// Page geometry for simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f64,
    /// Space above the first section.
    pub header_offset: f64,
    pub section_height: f64,
    /// Untracked content after the last section (the contact block).
    pub trailing_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: site::PAGE_WIDTH,
            header_offset: site::HEADER_OFFSET,
            section_height: site::SECTION_HEIGHT,
            trailing_height: site::CONTACT_HEIGHT,
        }
    }
}

impl SiteConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load a file by extension (`.json` is JSON, anything else TOML) and
    /// validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Check every field.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.sections.is_empty() {
            errors.push("sections must not be empty".into());
        }
        for (idx, section) in self.sections.iter().enumerate() {
            if section.id.trim().is_empty() {
                errors.push(format!("sections[{idx}].id must not be blank"));
            } else if section.id.contains(|c: char| c.is_whitespace() || c == '#') {
                errors.push(format!(
                    "sections[{idx}].id {:?} is not a usable anchor",
                    section.id
                ));
            }
            if let Some(first) = self.sections[..idx].iter().position(|s| s.id == section.id) {
                errors.push(format!(
                    "sections[{idx}].id {:?} duplicates sections[{first}]",
                    section.id
                ));
            }
            if section.label.trim().is_empty() {
                errors.push(format!("sections[{idx}].label must not be blank"));
            }
            if let Some(height) = section.height
                && !positive(height)
            {
                errors.push(format!("sections[{idx}].height must be > 0, got {height}"));
            }
        }

        for (idx, t) in self.observer.thresholds.iter().enumerate() {
            if !(0.0..=1.0).contains(t) {
                errors.push(format!("observer.thresholds[{idx}] must be in [0, 1], got {t}"));
            }
        }

        if !positive(self.layout.width) {
            errors.push(format!("layout.width must be > 0, got {}", self.layout.width));
        }
        if !non_negative(self.layout.header_offset) {
            errors.push(format!(
                "layout.header_offset must be >= 0, got {}",
                self.layout.header_offset
            ));
        }
        if !positive(self.layout.section_height) {
            errors.push(format!(
                "layout.section_height must be > 0, got {}",
                self.layout.section_height
            ));
        }
        if !non_negative(self.layout.trailing_height) {
            errors.push(format!(
                "layout.trailing_height must be >= 0, got {}",
                self.layout.trailing_height
            ));
        }

        errors
    }

    /// Build the region registry.
    pub fn registry(&self) -> Result<RegionRegistry, ConfigError> {
        RegionRegistry::new(
            self.sections
                .iter()
                .map(|s| Region::new(s.id.as_str(), s.label.as_str())),
        )
        .map_err(|e| ConfigError::Validation(vec![e.to_string()]))
    }

    /// Build the observer options.
    pub fn observer_options(&self) -> Result<ObserverOptions, ConfigError> {
        ObserverOptions::new(
            self.observer.root_margin,
            self.observer.thresholds.iter().copied(),
        )
        .map_err(|e| ConfigError::Validation(vec![e.to_string()]))
    }

    /// Stack the sections, then the untracked trailing block when it has a
    /// height.
    #[must_use]
    pub fn page_layout(&self) -> PageLayout {
        let layout = &self.layout;
        let page = self.sections.iter().fold(
            PageLayout::new(layout.width, layout.header_offset),
            |page, s| page.block(s.id.as_str(), s.height.unwrap_or(layout.section_height)),
        );
        if layout.trailing_height > 0.0 {
            page.block(site::CONTACT_ID, layout.trailing_height)
        } else {
            page
        }
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

// ---------------------------------------------------------------------------

/// Errors that can occur when loading a site configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
