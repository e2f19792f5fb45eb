#![forbid(unsafe_code)]

//! CSS-style root margins.
//!
//! A [`RootMargin`] grows or shrinks the intersection root before target
//! boxes are tested against it. It uses the same shorthand as the
//! `rootMargin` option of a browser `IntersectionObserver`, so the value
//! round-trips to the web host unchanged:
//!
//! ```
//! use folio_core::margin::{Length, RootMargin};
//!
//! let margin: RootMargin = "0px 0px -70% 0px".parse().unwrap();
//! assert_eq!(margin.bottom, Length::Percent(-70.0));
//! assert_eq!(margin.to_string(), "0px 0px -70% 0px");
//! ```
//!
//! # Resolution
//!
//! Percentages resolve against the root height for `top`/`bottom` and the
//! root width for `left`/`right`. Negative values shrink the root.

use std::fmt;
use std::str::FromStr;

use crate::geometry::Rect;

/// One margin component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of the root extent along the same axis.
    Percent(f64),
}

impl Length {
    pub const ZERO: Self = Self::Px(0.0);

    /// Resolve against the root extent along this component's axis.
    #[inline]
    #[must_use]
    pub fn resolve(self, basis: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

impl FromStr for Length {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || MarginParseError::InvalidLength(s.to_owned());

        let (number, percent) = if let Some(n) = s.strip_suffix("px") {
            (n, false)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, true)
        } else {
            // Unitless values are only legal for zero.
            (s, false)
        };

        let value: f64 = number.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        if number.len() == s.len() && value != 0.0 {
            return Err(invalid());
        }
        Ok(if percent {
            Length::Percent(value)
        } else {
            Length::Px(value)
        })
    }
}

/// Four-sided margin applied to the intersection root.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    /// No margin: the root is used as-is.
    pub const NONE: Self = Self {
        top: Length::ZERO,
        right: Length::ZERO,
        bottom: Length::ZERO,
        left: Length::ZERO,
    };

    /// Create a margin from its four components in CSS order.
    #[must_use]
    pub const fn new(top: Length, right: Length, bottom: Length, left: Length) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Parse CSS margin shorthand with one to four components.
    pub fn parse(s: &str) -> Result<Self, MarginParseError> {
        let parts = s
            .split_whitespace()
            .map(str::parse::<Length>)
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [] => Err(MarginParseError::Empty),
            [all] => Ok(Self::new(*all, *all, *all, *all)),
            [vertical, horizontal] => Ok(Self::new(*vertical, *horizontal, *vertical, *horizontal)),
            [top, horizontal, bottom] => Ok(Self::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(Self::new(*top, *right, *bottom, *left)),
            _ => Err(MarginParseError::WrongArity(parts.len())),
        }
    }

    /// Apply the margin to a root rectangle.
    #[must_use]
    pub fn apply(&self, root: Rect) -> Rect {
        root.outset(
            self.top.resolve(root.height),
            self.right.resolve(root.width),
            self.bottom.resolve(root.height),
            self.left.resolve(root.width),
        )
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl FromStr for RootMargin {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RootMargin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RootMargin {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors produced while parsing a [`RootMargin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarginParseError {
    /// The input had no components.
    Empty,
    /// More than four components were given.
    WrongArity(usize),
    /// A component was not a finite `px`/`%` length (or bare `0`).
    InvalidLength(String),
}

impl fmt::Display for MarginParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "root margin is empty"),
            Self::WrongArity(n) => write!(f, "root margin takes 1 to 4 lengths, got {n}"),
            Self::InvalidLength(s) => write!(f, "invalid margin length {s:?} (expected px or %)"),
        }
    }
}

impl std::error::Error for MarginParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_four_components() {
        let m = RootMargin::parse("0px 0px -70% 0px").unwrap();
        assert_eq!(
            m,
            RootMargin::new(
                Length::Px(0.0),
                Length::Px(0.0),
                Length::Percent(-70.0),
                Length::Px(0.0)
            )
        );
    }

    #[test]
    fn shorthand_expands_like_css() {
        let one = RootMargin::parse("10px").unwrap();
        assert_eq!(one.left, Length::Px(10.0));
        assert_eq!(one.bottom, Length::Px(10.0));

        let two = RootMargin::parse("5% 2px").unwrap();
        assert_eq!(two.top, Length::Percent(5.0));
        assert_eq!(two.bottom, Length::Percent(5.0));
        assert_eq!(two.right, Length::Px(2.0));
        assert_eq!(two.left, Length::Px(2.0));

        let three = RootMargin::parse("1px 2px 3px").unwrap();
        assert_eq!(three.top, Length::Px(1.0));
        assert_eq!(three.left, Length::Px(2.0));
        assert_eq!(three.bottom, Length::Px(3.0));
    }

    #[test]
    fn bare_zero_is_allowed_other_unitless_values_are_not() {
        assert_eq!(RootMargin::parse("0").unwrap(), RootMargin::NONE);
        assert_eq!(
            RootMargin::parse("10"),
            Err(MarginParseError::InvalidLength("10".into()))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(RootMargin::parse("   "), Err(MarginParseError::Empty));
        assert_eq!(
            RootMargin::parse("1px 1px 1px 1px 1px"),
            Err(MarginParseError::WrongArity(5))
        );
        assert!(matches!(
            RootMargin::parse("1em"),
            Err(MarginParseError::InvalidLength(_))
        ));
        assert!(matches!(
            RootMargin::parse("NaNpx"),
            Err(MarginParseError::InvalidLength(_))
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let m = RootMargin::parse("0px 0px -70% 0px").unwrap();
        assert_eq!(m.to_string(), "0px 0px -70% 0px");
        assert_eq!(RootMargin::parse(&m.to_string()).unwrap(), m);
        assert_eq!(Length::Percent(12.5).to_string(), "12.5%");
    }

    #[test]
    fn negative_bottom_percent_keeps_top_slice_of_root() {
        let m = RootMargin::parse("0px 0px -70% 0px").unwrap();
        let band = m.apply(Rect::new(0.0, 500.0, 1200.0, 1000.0));
        assert_eq!(band.y, 500.0);
        assert_eq!(band.width, 1200.0);
        assert!((band.height - 300.0).abs() < 1e-9);
    }

    #[test]
    fn horizontal_percent_resolves_against_width() {
        let m = RootMargin::parse("0px 10% 0px 10%").unwrap();
        let band = m.apply(Rect::from_size(1000.0, 500.0));
        assert_eq!(band.x, -100.0);
        assert_eq!(band.width, 1200.0);
        assert_eq!(band.height, 500.0);
    }
}
