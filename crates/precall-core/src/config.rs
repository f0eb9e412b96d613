//! Pass options, as handed over by whoever hosts the pass (plugin options JSON
//! or a `precall.toml` next to the sources).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::keywords::DEFAULT_KEYWORD;
use crate::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "precall.toml";

/// A single keyword or a list of keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordOption {
    One(String),
    Many(Vec<String>),
}

impl KeywordOption {
    pub fn names(&self) -> Vec<String> {
        match self {
            KeywordOption::One(name) => vec![name.clone()],
            KeywordOption::Many(names) => names.clone(),
        }
    }
}

impl Default for KeywordOption {
    fn default() -> Self {
        KeywordOption::One(DEFAULT_KEYWORD.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrecallOptions {
    /// Keyword(s) recognized as expansion triggers
    pub value: KeywordOption,

    /// Rewrite `import`/`require` specifiers that start with a keyword invocation
    pub rewrite_specifiers: bool,

    /// Name given to executed fragments instead of the enclosing file's name
    pub filename: Option<String>,
}

impl Default for PrecallOptions {
    fn default() -> Self {
        Self {
            value: KeywordOption::default(),
            rewrite_specifiers: true,
            filename: None,
        }
    }
}

impl PrecallOptions {
    pub fn with_keywords<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value = KeywordOption::Many(names.into_iter().map(Into::into).collect());
        self
    }

    /// Parse plugin-style options, e.g. `{"value": ["precall", "gen"]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from an explicit file, or from `precall.toml` in the
    /// working directory, falling back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::load_from_file(&local);
        }
        debug!("no {} found, using default options", CONFIG_FILE_NAME);
        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let options: Self = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), keywords = ?options.value, "loaded options");
        Ok(options)
    }
}
