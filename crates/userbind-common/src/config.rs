//! Runtime configuration file reader.
//!
//! The file is a list of `key = value` lines. Blank lines and lines starting
//! with `#` are ignored, and values may be wrapped in single or double quotes.
//! Keys may contain spaces (`config passwd = yes`) and may repeat.
//!
//! A [`ConfigFile`] is an immutable snapshot of the parsed entries. Lookups go
//! through a [`ConfigCursor`], which scans forward from its current position
//! and must be rewound before a fresh query.

use std::path::Path;

use crate::error::{Result, UserbindError};

/// Read access to configuration values with rewindable scanning.
pub trait ConfigReader {
    /// Resets the scan position to the start of the configuration.
    fn rewind(&mut self);

    /// Returns the next value for `key` after the current scan position,
    /// advancing past it.
    fn get_value(&mut self, key: &str) -> Option<String>;

    /// Returns the next value for `key` as a boolean, or `default` when the
    /// key does not occur after the current scan position.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a recognised boolean spelling.
    fn get_bool(&mut self, key: &str, default: bool) -> Result<bool> {
        match self.get_value(key) {
            Some(value) => parse_bool(&value).ok_or_else(|| UserbindError::Config {
                message: format!("unsupported value for boolean key '{key}': '{value}'"),
            }),
            None => {
                tracing::trace!(key, default, "key not set, using default");
                Ok(default)
            }
        }
    }
}

/// Parsed configuration entries in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    entries: Vec<(String, String)>,
}

impl ConfigFile {
    /// Parses configuration text.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut entries = Vec::new();
        for (lineno, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!(line = lineno + 1, "ignoring configuration line without '='");
                continue;
            };
            entries.push((key.trim().to_string(), unquote(value.trim()).to_string()));
        }
        Self { entries }
    }

    /// Loads and parses the configuration file at `path`.
    ///
    /// A missing file yields an empty configuration, so every key takes its
    /// built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::parse(&text);
                tracing::debug!(path = %path.display(), entries = config.len(), "loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "configuration file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(UserbindError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Number of parsed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the configuration has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a cursor positioned at the start of the configuration.
    #[must_use]
    pub const fn cursor(&self) -> ConfigCursor<'_> {
        ConfigCursor {
            config: self,
            position: 0,
        }
    }
}

/// Scoped scanning handle over a [`ConfigFile`].
#[derive(Debug, Clone)]
pub struct ConfigCursor<'a> {
    config: &'a ConfigFile,
    position: usize,
}

impl ConfigReader for ConfigCursor<'_> {
    fn rewind(&mut self) {
        self.position = 0;
    }

    fn get_value(&mut self, key: &str) -> Option<String> {
        let config = self.config;
        let (offset, (_, value)) = config
            .entries
            .get(self.position..)?
            .iter()
            .enumerate()
            .find(|(_, (k, _))| k == key)?;
        self.position += offset + 1;
        Some(value.clone())
    }
}

/// Parses a boolean configuration value.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" | "1" => Some(true),
        "no" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
