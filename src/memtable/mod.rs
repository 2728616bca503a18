//! MemTable Module
//!
//! In-memory key-value map backing every read.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Many concurrent readers, writers serialized by the lock
//! - Deletion removes the key outright (the WAL holds history)
//!
//! ## Data Structure Choice
//! `BTreeMap` wrapped in a `parking_lot::RwLock`: ordered keys make
//! `keys()` deterministic, and the write lock is held only for a single
//! insert or remove.

mod table;

pub use table::MemTable;
