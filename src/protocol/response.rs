//! Response definitions
//!
//! Represents responses to clients, one line each.

use crate::error::KvError;

const OK_LINE: &str = "OK";
const ERR_PREFIX: &str = "ERR ";
const NOT_FOUND_MESSAGE: &str = "key not found";

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Mutation applied
    Ok,

    /// Value for a GET
    Value(String),

    /// GET on an absent key
    NotFound,

    /// Any other failure
    Error(String),
}

impl Response {
    /// Map an error to the response a client sees
    pub fn from_error(err: &KvError) -> Self {
        match err {
            KvError::KeyNotFound => Response::NotFound,
            other => Response::Error(other.to_string()),
        }
    }

    /// Render as one line (no trailing newline)
    pub fn to_line(&self) -> String {
        match self {
            Response::Ok => OK_LINE.to_string(),
            Response::Value(value) => value.clone(),
            Response::NotFound => format!("{}{}", ERR_PREFIX, NOT_FOUND_MESSAGE),
            Response::Error(message) => format!("{}{}", ERR_PREFIX, message),
        }
    }

    /// Parse a response line received from the server
    pub fn parse_line(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == OK_LINE {
            return Response::Ok;
        }
        match line.strip_prefix(ERR_PREFIX) {
            Some(NOT_FOUND_MESSAGE) => Response::NotFound,
            Some(message) => Response::Error(message.to_string()),
            None => Response::Value(line.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::NotFound | Response::Error(_))
    }
}
