//! Typed settings file.
//!
//! Holds values that are generated once and then kept (admin token hash,
//! token signing secret) together with the tag normalization table. The file
//! is JSON; keys this crate does not know are carried through a
//! load/patch/save round-trip untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::utils::tag_normalizer::{TagNormalizationRule, default_rules};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write settings file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("settings file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSettings {
    /// Hex HMAC-SHA256 of the admin bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_signing_secret: Option<String>,

    /// Ordered substitution table for tag names. Empty means built-in rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_normalization: Vec<TagNormalizationRule>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Named fields to overwrite in [`BlogSettings::update`]. `None` leaves a
/// field as it is.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub admin_token_hash: Option<String>,
    pub token_signing_secret: Option<String>,
    pub tag_normalization: Option<Vec<TagNormalizationRule>>,
}

impl BlogSettings {
    /// Reads the settings file. A missing file yields default settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] on I/O failures other than "not found"
    /// and [`SettingsError::Parse`] on malformed JSON.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Settings file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the settings file through a sibling temp file and a rename, so
    /// readers never observe a half-written file.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };

        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)
    }

    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(hash) = patch.admin_token_hash {
            self.admin_token_hash = Some(hash);
        }
        if let Some(secret) = patch.token_signing_secret {
            self.token_signing_secret = Some(secret);
        }
        if let Some(rules) = patch.tag_normalization {
            self.tag_normalization = rules;
        }
    }

    /// Loads the file, applies `patch` and saves it back.
    pub fn update(path: &Path, patch: SettingsPatch) -> Result<Self, SettingsError> {
        let mut settings = Self::load(path)?;
        settings.apply(patch);
        settings.save(path)?;
        Ok(settings)
    }

    /// The configured tag table, or the built-in one when none is set.
    pub fn tag_rules(&self) -> Vec<TagNormalizationRule> {
        if self.tag_normalization.is_empty() {
            default_rules()
        } else {
            self.tag_normalization.clone()
        }
    }
}
