use std::collections::HashSet;

use itertools::Itertools;
use regex::Regex;

use crate::config::KeywordOption;
use crate::{Error, Result};

pub const DEFAULT_KEYWORD: &str = "precall";

/// The configured trigger names, in configuration order and without duplicates.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    names: Vec<String>,
    lookup: HashSet<String>,
    pattern: MatchPattern,
}

impl KeywordSet {
    pub fn from_option(option: &KeywordOption) -> Result<Self> {
        Self::from_names(option.names())
    }

    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).unique().collect();
        config_ensure!(!names.is_empty(), "at least one keyword must be configured");
        for name in &names {
            config_ensure!(
                is_identifier(name),
                "keyword {:?} is not a valid identifier",
                name
            );
        }
        let lookup = names.iter().cloned().collect();
        let pattern = MatchPattern::new(&names)?;
        Ok(Self {
            names,
            lookup,
            pattern,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn pattern(&self) -> &MatchPattern {
        &self.pattern
    }
}

/// Recognizes `<keyword>(` or `` <keyword>` `` at the start of a string.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    regex: Regex,
}

impl MatchPattern {
    fn new(names: &[String]) -> Result<Self> {
        let alternatives = names.iter().map(|name| regex::escape(name)).join("|");
        let regex = Regex::new(&format!("^(?:{alternatives})[(`]"))
            .map_err(|e| Error::Config(format!("cannot build keyword pattern: {e}")))?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
