//! Loading application declarations from YAML or JSON.
//!
//! A whole [`AppSpec`] can be written as a document instead of Rust builder
//! calls. Handlers are attached afterwards by command name.
//!
//! # Example YAML
//!
//! ```yaml
//! name: tool
//! version: "1.0.0"
//! flags:
//!   - name: "debug, d"
//!     usage: enable debug output
//! commands:
//!   - name: deploy
//!     short_name: d
//!     example: tool deploy web --replicas 3
//!     arguments:
//!       - name: service
//!       - name: region
//!         optional: true
//!     flags:
//!       - name: "replicas, r"
//!         kind: int
//!         default: 1
//!       - name: tag
//!         kind: string_list
//! ```

use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

use crate::AppSpec;

/// Errors raised while loading a declaration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AppSpec {
    /// Loads a declaration from a file.
    ///
    /// Files ending in `.json` are read as JSON; anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be opened, or the
    /// matching parse variant if the document is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let spec = if is_json {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        Ok(spec)
    }

    /// Parses a YAML declaration.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdkit_core::{AppSpec, FlagKind};
    ///
    /// let app = AppSpec::from_yaml_str("
    /// name: tool
    /// commands:
    ///   - name: run
    ///     flags:
    ///       - name: 'count, c'
    ///         kind: int
    /// ").unwrap();
    /// assert_eq!(app.commands[0].flags[0].kind, FlagKind::Int);
    /// ```
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a JSON declaration.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
