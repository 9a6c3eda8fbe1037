//! Resolved settings for one patch run
//!
//! `GroupingConfig` is built once from the CLI and the config file, validated,
//! and then shared read-only by every stage.

use crate::core::errors::{BuildError, BuildResult};
use crate::features::LOCALE_FEATURES;
use std::fmt;
use std::str::FromStr;

/// Default feature that turns grouping on
pub const DEFAULT_FEATURE: &str = "calt";

/// Default gap: as wide as the comma
pub const DEFAULT_GAP: &str = ",";

/// How wide the gap between two digit groups is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GapSize {
    /// Font units; the sign picks the side the gap is placed on
    Literal(f64),
    /// As wide as the glyph mapped to this character
    WidthOf(char),
}

impl FromStr for GapSize {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(value) = s.trim().parse::<f64>() {
            if value.is_finite() {
                return Ok(GapSize::Literal(value));
            }
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(GapSize::WidthOf(ch)),
            _ => Err(BuildError::Configuration(format!(
                "gap size '{s}' is neither a number nor a single character"
            ))),
        }
    }
}

impl fmt::Display for GapSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapSize::Literal(value) => write!(f, "{value}"),
            GapSize::WidthOf(ch) => write!(f, "{ch}"),
        }
    }
}

/// How the patched font is renamed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStyle {
    /// Keep every name
    Off,
    /// Append " with Numderline"
    Simple,
    /// Append a suffix describing the options used
    Detailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupingConfig {
    pub gap: GapSize,
    /// `None` picks 1.0, or a squish that fits the gap in monospace mode
    pub squish_x: Option<f64>,
    pub squish_y: f64,
    pub monospace: bool,
    /// Also squish the font's own digits
    pub squish_all: bool,
    pub debug_annotate: bool,
    /// Feature that switches grouping on
    pub feature_tag: String,
    pub dot_separator: char,
    pub comma_separator: char,
    pub hex: bool,
    pub rename: RenameStyle,
    /// Substring replacements applied to output file names
    pub reserved_names: Vec<(String, String)>,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            gap: GapSize::WidthOf(','),
            squish_x: None,
            squish_y: 1.0,
            monospace: false,
            squish_all: false,
            debug_annotate: false,
            feature_tag: DEFAULT_FEATURE.to_string(),
            dot_separator: '.',
            comma_separator: ',',
            hex: true,
            rename: RenameStyle::Detailed,
            reserved_names: vec![("Source".to_string(), "Sauce".to_string())],
        }
    }
}

impl GroupingConfig {
    /// The reduced behaviour of the first patcher: decimal only, proportional,
    /// short rename suffix
    pub fn legacy() -> Self {
        Self {
            hex: false,
            monospace: false,
            rename: RenameStyle::Simple,
            ..Self::default()
        }
    }

    /// Check option values before any font is opened
    pub fn validate(&self) -> BuildResult<()> {
        let tag = &self.feature_tag;
        if tag.is_empty() || tag.len() > 4 || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(BuildError::Configuration(format!(
                "feature tag '{tag}' must be 1 to 4 ASCII letters or digits"
            )));
        }
        if LOCALE_FEATURES.iter().any(|(locale, _)| locale == tag) {
            return Err(BuildError::Configuration(format!(
                "feature tag '{tag}' is reserved for a separator style"
            )));
        }
        if let Some(sx) = self.squish_x {
            if !(sx > 0.0 && sx.is_finite()) {
                return Err(BuildError::Configuration(format!(
                    "horizontal squish {sx} must be a positive number"
                )));
            }
        }
        if !(self.squish_y > 0.0 && self.squish_y.is_finite()) {
            return Err(BuildError::Configuration(format!(
                "vertical squish {} must be a positive number",
                self.squish_y
            )));
        }
        if self.dot_separator == self.comma_separator {
            return Err(BuildError::Configuration(
                "dot and comma separators must differ".to_string(),
            ));
        }
        Ok(())
    }

    /// Horizontal squish for a font whose digits are `digit_width` wide and
    /// whose resolved gap is `gap`. A negative monospace gap narrows cells
    /// instead of opening a strip, so it needs no squish.
    pub fn effective_squish_x(&self, digit_width: f64, gap: f64) -> f64 {
        match self.squish_x {
            Some(sx) => sx,
            None if self.monospace && digit_width > 0.0 && gap > 0.0 => {
                (1.0 - gap / (3.0 * digit_width)).max(0.1)
            }
            None => 1.0,
        }
    }
}
