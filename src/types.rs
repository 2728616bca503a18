//! Domain types
//!
//! Keys and values share one grammar: a non-empty run of ASCII letters,
//! digits, `*`, `/` or `_`. This keeps every command a single
//! whitespace-separated line, both on the wire and in the WAL.

use std::fmt;

use crate::error::{KvError, Result};

fn is_valid_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '*' | '/' | '_'))
}

/// A validated key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    pub fn new(raw: &str) -> Result<Self> {
        if !is_valid_token(raw) {
            return Err(KvError::InvalidKey);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Value(String);

impl Value {
    pub fn new(raw: &str) -> Result<Self> {
        if !is_valid_token(raw) {
            return Err(KvError::InvalidValue);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
