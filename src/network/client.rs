//! TCP Client
//!
//! Blocking line-oriented client used by the CLI and the tests.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{KvError, Result};
use crate::protocol::{read_response, write_line, Command, Response};

/// Longest response line the client accepts
const MAX_RESPONSE_SIZE: usize = 64 * 1024;

/// A connection to a WalKV server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to `addr`; `timeout` bounds the connect and every read/write
    pub fn connect(addr: &str, timeout: Option<Duration>) -> Result<Self> {
        let target = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| KvError::Network(format!("cannot resolve {}", addr)))?;

        let stream = match timeout {
            Some(t) => TcpStream::connect_timeout(&target, t)?,
            None => TcpStream::connect(target)?,
        };
        stream.set_nodelay(true)?;
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
        })
    }

    /// Send a raw request line and return the parsed response
    pub fn send(&mut self, line: &str) -> Result<Response> {
        write_line(&mut self.writer, line.trim())?;
        read_response(&mut self.reader, MAX_RESPONSE_SIZE)
    }

    /// Send a typed command
    pub fn execute(&mut self, command: &Command) -> Result<Response> {
        self.send(&command.to_line())
    }
}
