//! Optional YAML overrides for the normalizer's alias table, keyword
//! lexicon, and accepted date formats.
//!
//! ```yaml
//! aliases:
//!   timestamp: [tgl_posting]
//!   raw_text: [isi_konten]
//! keywords:
//!   positive: { mantap: 0.5 }
//!   negative: { kecewa: -0.5 }
//! date_formats: ["%d %m %Y"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Canonical fields a source column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Timestamp,
    Platform,
    Sentiment,
    MediaType,
    RawText,
    Location,
    Likes,
    Shares,
    Comments,
    Views,
    Engagements,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 11] = [
        CanonicalField::Timestamp,
        CanonicalField::Platform,
        CanonicalField::Sentiment,
        CanonicalField::MediaType,
        CanonicalField::RawText,
        CanonicalField::Location,
        CanonicalField::Likes,
        CanonicalField::Shares,
        CanonicalField::Comments,
        CanonicalField::Views,
        CanonicalField::Engagements,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KeywordOverrides {
    #[serde(default)]
    pub positive: BTreeMap<String, f64>,
    #[serde(default)]
    pub negative: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NormalizeOverrides {
    /// Extra aliases per field, tried before the built-in ones.
    #[serde(default)]
    pub aliases: BTreeMap<CanonicalField, Vec<String>>,
    #[serde(default)]
    pub keywords: KeywordOverrides,
    /// Extra `strftime` formats, tried before the built-in ones.
    #[serde(default)]
    pub date_formats: Vec<String>,
}

/// Load and validate normalization overrides from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_overrides(path: &Path) -> Result<NormalizeOverrides, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::OverridesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_overrides(&content)
}

/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_overrides(content: &str) -> Result<NormalizeOverrides, ConfigError> {
    let overrides: NormalizeOverrides = serde_yaml::from_str(content)?;
    validate_overrides(&overrides)?;
    Ok(overrides)
}

fn validate_overrides(overrides: &NormalizeOverrides) -> Result<(), ConfigError> {
    for (field, aliases) in &overrides.aliases {
        if aliases.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "alias for {field:?} must be non-empty"
            )));
        }
    }

    for (word, weight) in &overrides.keywords.positive {
        if word.trim().is_empty() {
            return Err(ConfigError::Validation(
                "positive keyword must be non-empty".to_string(),
            ));
        }
        if !(*weight > 0.0 && *weight <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "positive keyword '{word}' has weight {weight}; must be in (0, 1]"
            )));
        }
    }

    for (word, weight) in &overrides.keywords.negative {
        if word.trim().is_empty() {
            return Err(ConfigError::Validation(
                "negative keyword must be non-empty".to_string(),
            ));
        }
        if !(*weight < 0.0 && *weight >= -1.0) {
            return Err(ConfigError::Validation(format!(
                "negative keyword '{word}' has weight {weight}; must be in [-1, 0)"
            )));
        }
    }

    for format in &overrides.date_formats {
        if format.trim().is_empty()
            || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
        {
            return Err(ConfigError::Validation(format!(
                "invalid date format '{format}'"
            )));
        }
    }

    Ok(())
}
