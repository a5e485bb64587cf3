//! Inline style declarations.
//!
//! Mirrors the behaviour of an element's inline style: declarations keep
//! insertion order, setting an existing property replaces it in place, and
//! reading an unset property yields an empty string.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered list of inline CSS declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    /// Create an empty style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Parse a `prop: value; prop: value` string.
    ///
    /// Empty segments are ignored, so trailing semicolons are accepted.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let mut style = Self::new();
        for segment in input.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, value) = segment
                .split_once(':')
                .ok_or_else(|| CoreError::InvalidDeclaration(segment.to_string()))?;
            let (name, value) = (name.trim(), value.trim());
            if name.is_empty() || value.is_empty() {
                return Err(CoreError::InvalidDeclaration(segment.to_string()));
            }
            style.set(name, value);
        }
        Ok(style)
    }

    /// Builder form of [`Style::set`].
    #[must_use]
    pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// Set a property, replacing an existing declaration in place.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        match self.declarations.iter_mut().find(|(p, _)| p == property) {
            Some((_, existing)) => *existing = value,
            None => self.declarations.push((property.to_string(), value)),
        }
    }

    /// Remove a property. Returns the previous value, if any.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self.declarations.iter().position(|(p, _)| p == property)?;
        Some(self.declarations.remove(index).1)
    }

    /// Get a property value, or `""` when unset.
    #[must_use]
    pub fn get(&self, property: &str) -> &str {
        self.declarations
            .iter()
            .find(|(p, _)| p == property)
            .map_or("", |(_, v)| v.as_str())
    }

    /// Check whether a property is set.
    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.declarations.iter().any(|(p, _)| p == property)
    }

    /// Read a property as a pixel length. Unset properties read as `0`.
    pub fn px(&self, property: &str) -> Result<f32, CoreError> {
        parse_px(self.get(property))
    }

    /// Append every declaration of `other`, overriding duplicates.
    pub fn extend(&mut self, other: &Self) {
        for (property, value) in &other.declarations {
            self.set(property, value.clone());
        }
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Check if there are no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterate over `(property, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_str()))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{property}: {value};")?;
        }
        Ok(())
    }
}

/// Format a pixel length the way style values are written.
#[must_use]
pub fn format_px(value: f32) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}px")
    }
}

/// Parse `"12px"`, `"12"` or `""` (zero) into a float.
pub fn parse_px(value: &str) -> Result<f32, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoreError::InvalidLength(value.to_string()))
}
