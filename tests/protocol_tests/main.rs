//! Tests for the wire protocol
//!
//! These tests verify:
//! - Command parsing (arity, case, validation order)
//! - Response rendering and parsing
//! - Line framing limits

mod command_tests;
