//! TOML configuration for text controls.

use crate::autosize::{BoxSizing, RowBounds};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a [`TextareaConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or has the wrong shape
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// A field parsed but is out of range
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Persistent settings for a [`crate::Textarea`].
///
/// ```
/// use fieldkit_widgets::TextareaConfig;
///
/// let config = TextareaConfig::from_toml_str("min_rows = 3\nmax_rows = 8").unwrap();
/// assert_eq!(config.min_rows, 3);
/// assert_eq!(config.font_size, 16.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextareaConfig {
    /// Minimum visible rows
    pub min_rows: u32,
    /// Maximum visible rows, unbounded when unset
    pub max_rows: Option<u32>,
    /// Placeholder text
    pub placeholder: Option<String>,
    /// Font size in pixels
    pub font_size: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
    /// Padding on every side, in pixels
    pub padding: f32,
    /// Border width on every side, in pixels
    pub border: f32,
    /// Box model for the height style
    pub box_sizing: BoxSizing,
}

impl Default for TextareaConfig {
    fn default() -> Self {
        Self {
            min_rows: RowBounds::DEFAULT_MIN_ROWS,
            max_rows: None,
            placeholder: None,
            font_size: 16.0,
            line_height: 1.5,
            padding: 8.0,
            border: 1.0,
            box_sizing: BoxSizing::BorderBox,
        }
    }
}

impl TextareaConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("font_size", self.font_size)?;
        positive("line_height", self.line_height)?;
        non_negative("padding", self.padding)?;
        non_negative("border", self.border)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            message: format!("must be greater than 0, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            message: format!("must not be negative, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = TextareaConfig::from_toml_str("").unwrap();
        assert_eq!(config, TextareaConfig::default());
    }

    #[test]
    fn test_full_document() {
        let config = TextareaConfig::from_toml_str(
            r#"
            min_rows = 2
            max_rows = 5
            placeholder = "Write a message"
            font_size = 14.0
            line_height = 1.25
            padding = 4.0
            border = 0.0
            box_sizing = "content-box"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_rows, Some(5));
        assert_eq!(config.placeholder.as_deref(), Some("Write a message"));
        assert_eq!(config.font_size, 14.0);
        assert_eq!(config.box_sizing, BoxSizing::ContentBox);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TextareaConfig::from_toml_str("rows = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_bad_box_sizing_rejected() {
        let err = TextareaConfig::from_toml_str("box_sizing = \"padding-box\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_validation() {
        let err = TextareaConfig::from_toml_str("font_size = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "font_size",
                ..
            }
        ));

        let err = TextareaConfig::from_toml_str("padding = -1.0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for 'padding': must not be negative, got -1"
        );
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TextareaConfig {
            max_rows: Some(9),
            placeholder: Some("hi".to_string()),
            ..TextareaConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(TextareaConfig::from_toml_str(&text).unwrap(), config);
    }
}
