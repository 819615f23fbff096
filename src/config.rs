use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fields::SigningFields;

/// Settings for a signing session.
///
/// Algorithm parameters are fixed and deliberately absent here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Field values a new session starts with.
    #[serde(default = "SigningFields::example")]
    pub initial_fields: SigningFields,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_fields: SigningFields::example(),
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }
}
