#![forbid(unsafe_code)]

//! Region registry.
//!
//! A [`RegionRegistry`] is the fixed, ordered list of content regions that
//! can become active. It is built once at startup and never changes; clones
//! share the same backing storage.
//!
//! # Invariants
//!
//! 1. The registry is never empty, so [`RegionRegistry::first`] always exists.
//! 2. Region ids are unique within a registry.
//! 3. Iteration order is registration order (document order on the page).

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Stable identifier of a region. Doubles as the anchor target (`#id`) and
/// the DOM lookup key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(Arc<str>);

impl RegionId {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Same-document anchor for this region, e.g. `#resume`.
    #[must_use]
    pub fn anchor(&self) -> String {
        format!("#{}", self.0)
    }
}

impl Deref for RegionId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RegionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl PartialEq<str> for RegionId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for RegionId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionId({:?})", &*self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RegionId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RegionId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <String as serde::Deserialize>::deserialize(deserializer).map(Self::from)
    }
}

/// One trackable content block: an id plus the label shown in navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    id: RegionId,
    label: String,
}

impl Region {
    #[must_use]
    pub fn new(id: impl Into<RegionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &RegionId {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Fixed, ordered set of trackable regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRegistry {
    regions: Arc<[Region]>,
}

impl RegionRegistry {
    /// Build a registry, checking that it is non-empty and ids are unique.
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Result<Self, RegistryError> {
        let regions: Vec<Region> = regions.into_iter().collect();
        if regions.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (idx, region) in regions.iter().enumerate() {
            if regions[..idx].iter().any(|r| r.id == region.id) {
                return Err(RegistryError::DuplicateId(region.id.clone()));
            }
        }
        Ok(Self {
            regions: regions.into(),
        })
    }

    /// Build a registry from `(id, label)` pairs.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, RegistryError> {
        Self::new(pairs.into_iter().map(|(id, label)| Region::new(id, label)))
    }

    /// The first registered region; the default active one.
    #[must_use]
    pub fn first(&self) -> &Region {
        &self.regions[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Region> + '_ {
        self.regions.iter()
    }

    pub fn ids(&self) -> impl ExactSizeIterator<Item = &RegionId> + '_ {
        self.regions.iter().map(Region::id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id.as_str() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Registration index of `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.regions.iter().position(|r| r.id.as_str() == id)
    }

    #[must_use]
    pub fn label(&self, id: &str) -> Option<&str> {
        self.get(id).map(Region::label)
    }
}

impl<'a> IntoIterator for &'a RegionRegistry {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

/// Construction-time registry defects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No regions were supplied.
    Empty,
    /// The same id was registered twice.
    DuplicateId(RegionId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "region registry must contain at least one region"),
            Self::DuplicateId(id) => write!(f, "duplicate region id {:?}", id.as_str()),
        }
    }
}

impl std::error::Error for RegistryError {}
