//! Protocol Module
//!
//! Newline-delimited text protocol shared by the TCP server, the CLI and
//! the WAL (persisted lines use the request grammar verbatim).
//!
//! ### Requests
//! ```text
//! GET <key>
//! SET <key> <value>
//! DEL <key>
//! ```
//! Verbs are case-insensitive; keys and values are `[A-Za-z0-9*/_]+`.
//!
//! ### Responses
//! ```text
//! OK                  mutation applied
//! <value>             GET hit
//! ERR key not found   GET miss
//! ERR <message>       any other failure
//! ```

mod codec;
mod command;
mod response;

pub use codec::{read_line, read_response, write_line, write_response};
pub use command::{Command, CommandType};
pub use response::Response;
