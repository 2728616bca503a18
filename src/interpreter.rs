//! Command interpreter
//!
//! Turns a request line into an application call. The TCP server, the
//! CLI REPL and WAL recovery all go through [`Interpreter::execute`].

use std::sync::Arc;

use crate::error::{KvError, Result};
use crate::protocol::{Command, Response};
use crate::types::{Key, Value};
use crate::wal::CommandExecutor;

/// Operations the interpreter dispatches to
pub trait Application {
    fn get(&self, key: &Key) -> Result<Value>;
    fn set(&self, key: Key, value: Value) -> Result<()>;
    fn delete(&self, key: &Key) -> Result<()>;
}

impl<A: Application + ?Sized> Application for &A {
    fn get(&self, key: &Key) -> Result<Value> {
        (**self).get(key)
    }

    fn set(&self, key: Key, value: Value) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &Key) -> Result<()> {
        (**self).delete(key)
    }
}

impl<A: Application + ?Sized> Application for Arc<A> {
    fn get(&self, key: &Key) -> Result<Value> {
        (**self).get(key)
    }

    fn set(&self, key: Key, value: Value) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &Key) -> Result<()> {
        (**self).delete(key)
    }
}

/// Parses request lines and executes them against an [`Application`]
pub struct Interpreter<A> {
    app: A,
}

impl<A: Application> Interpreter<A> {
    pub fn new(app: A) -> Self {
        Self { app }
    }

    /// Parse and execute one line
    pub fn execute(&self, line: &str) -> Result<Response> {
        match Command::parse(line)? {
            Command::Get { key } => {
                let value = self.app.get(&key)?;
                Ok(Response::Value(value.into_string()))
            }
            Command::Set { key, value } => {
                self.app.set(key, value)?;
                Ok(Response::Ok)
            }
            Command::Del { key } => {
                self.app.delete(&key)?;
                Ok(Response::Ok)
            }
        }
    }

    /// Execute one line, folding failures into an error response
    pub fn handle(&self, line: &str) -> Response {
        match self.execute(line.trim()) {
            Ok(response) => response,
            Err(e) => {
                if !matches!(e, KvError::KeyNotFound) {
                    tracing::debug!(line, error = %e, "command failed");
                }
                Response::from_error(&e)
            }
        }
    }
}

impl<A: Application> CommandExecutor for Interpreter<A> {
    fn execute(&self, line: &str) -> Result<Response> {
        Interpreter::execute(self, line)
    }
}
