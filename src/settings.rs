use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_SETTINGS_FILE: &str = "calculator_settings.json";
pub const DEFAULT_DISPLAY_NAME: &str = "User";
pub const DEFAULT_PRECISION: u32 = 2;
/// Digits beyond this exceed what an `f64` result carries.
pub const MAX_PRECISION: u32 = 15;
/// Every operator token the evaluator implements, in the order they are offered.
pub const AVAILABLE_OPERATIONS: &[&str] = &["+", "-", "*", "/", "^", "sqrt"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "UserName")]
    pub display_name: String,
    #[serde(rename = "Precision", deserialize_with = "deserialize_precision")]
    pub precision: u32,
    #[serde(rename = "AllowedOperations")]
    pub allowed_operations: AllowedOperations,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            precision: DEFAULT_PRECISION,
            allowed_operations: AllowedOperations::default(),
        }
    }
}

fn deserialize_precision<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let precision = u32::deserialize(deserializer)?;
    if precision > MAX_PRECISION {
        return Err(serde::de::Error::custom(format!(
            "precision {} exceeds the maximum of {}",
            precision, MAX_PRECISION
        )));
    }
    Ok(precision)
}

/// Parses a user supplied precision, rejecting values above [`MAX_PRECISION`].
pub fn parse_precision(text: &str) -> Option<u32> {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|precision| *precision <= MAX_PRECISION)
}

impl Settings {
    /// Trims the display name, falling back to the default when it is blank,
    /// and caps the precision at [`MAX_PRECISION`].
    pub fn normalized(mut self) -> Self {
        self.precision = self.precision.min(MAX_PRECISION);
        let trimmed = self.display_name.trim();
        self.display_name = if trimmed.is_empty() {
            DEFAULT_DISPLAY_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }
}

/// The operator tokens a session may use. Matching ignores case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedOperations(Vec<String>);

impl Default for AllowedOperations {
    fn default() -> Self {
        AVAILABLE_OPERATIONS.iter().map(|op| op.to_string()).collect()
    }
}

impl FromIterator<String> for AllowedOperations {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl AllowedOperations {
    /// Splits a comma separated list, dropping blank entries.
    pub fn parse_list(text: &str) -> Self {
        text.split(',')
            .map(str::trim)
            .filter(|op| !op.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn permits(&self, op: &str) -> bool {
        let op = op.to_lowercase();
        self.0.iter().any(|allowed| allowed.to_lowercase() == op)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for AllowedOperations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unable to access settings file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Settings file is not valid JSON")]
    Format(#[from] serde_json::Error),
}

/// Reads and writes [`Settings`] as a JSON file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_FILE)
    }
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when no settings file exists yet.
    pub fn load(&self) -> Result<Option<Settings>, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file");
                return Ok(None);
            }
            Err(source) => return Err(self.io_error(source)),
        };
        let settings: Settings = serde_json::from_str(&json)?;
        debug!(path = %self.path.display(), ?settings, "loaded settings");
        Ok(Some(settings.normalized()))
    }

    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json).map_err(|source| self.io_error(source))?;
        info!(path = %self.path.display(), "saved settings");
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
