//! Declarative field override profiles
//!
//! A profile lists the overrides for one type pair in YAML:
//!
//! ```yaml
//! fields:
//!   - destination: IntField
//!     source: Int
//!   - destination: Total
//!     compute: sum_lines
//! ```
//!
//! `compute` names a function registered with
//! [`crate::MapperConfig::register_compute`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Overrides for one (source, destination) type pair
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FieldMapProfile {
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

/// One destination field override
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FieldRule {
    pub destination: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Name of a registered compute function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute: Option<String>,
}

/// Error reading or writing a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, "{} at line {line}, column {column}", self.message)
            }
            _ => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ProfileError {}

impl FieldMapProfile {
    /// Parse a profile from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error when YAML parsing fails.
    pub fn parse(yaml: &str) -> Result<Self, ProfileError> {
        serde_yaml::from_str(yaml).map_err(|e| ProfileError {
            message: format!("Failed to parse profile: {e}"),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
        })
    }

    /// Parse a profile from a file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn parse_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path).map_err(|e| ProfileError {
            message: format!("Failed to read {}: {e}", path.display()),
            line: None,
            column: None,
        })?;
        let profile = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), rules = profile.fields.len(), "loaded field map profile");
        Ok(profile)
    }

    /// Serialize the profile to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails.
    pub fn to_yaml(&self) -> Result<String, ProfileError> {
        serde_yaml::to_string(self).map_err(|e| ProfileError {
            message: format!("Failed to serialize profile: {e}"),
            line: None,
            column: None,
        })
    }
}
