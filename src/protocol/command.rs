//! Command definitions
//!
//! Represents commands from clients (and lines replayed from the WAL).

use std::fmt;
use std::str::FromStr;

use crate::error::{KvError, Result};
use crate::types::{Key, Value};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Get,
    Set,
    Del,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Get => "GET",
            CommandType::Set => "SET",
            CommandType::Del => "DEL",
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: Key },

    /// Set a key to a value
    Set { key: Key, value: Value },

    /// Delete a key
    Del { key: Key },
}

impl Command {
    /// Parse one request line.
    ///
    /// The key is validated before the verb, so `FOO b-r` reports an
    /// invalid key rather than an unknown command.
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(KvError::InvalidCommand);
        }

        let verb = tokens[0].to_ascii_uppercase();
        let key = Key::new(tokens[1])?;

        match (verb.as_str(), tokens.len()) {
            ("GET", 2) => Ok(Command::Get { key }),
            ("DEL", 2) => Ok(Command::Del { key }),
            ("SET", 3) => {
                let value = Value::new(tokens[2])?;
                Ok(Command::Set { key, value })
            }
            _ => Err(KvError::InvalidCommand),
        }
    }

    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Del { .. } => CommandType::Del,
        }
    }

    pub fn key(&self) -> &Key {
        match self {
            Command::Get { key } | Command::Set { key, .. } | Command::Del { key } => key,
        }
    }

    /// Canonical request line (no trailing newline)
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Get { key } => write!(f, "GET {}", key),
            Command::Set { key, value } => write!(f, "SET {} {}", key, value),
            Command::Del { key } => write!(f, "DEL {}", key),
        }
    }
}

impl FromStr for Command {
    type Err = KvError;

    fn from_str(s: &str) -> Result<Self> {
        Command::parse(s)
    }
}
