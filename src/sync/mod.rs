//! Synchronization primitives
//!
//! ## Completion handles
//! A one-shot result slot shared by a producer ([`Resolver`]) and any
//! number of consumers ([`Waiter`]). The WAL hands a `Waiter` back to every
//! writer and resolves it once the writer's batch has been flushed.
//!
//! ```text
//!  writer thread                flusher thread
//!  ─────────────                ──────────────
//!  submit() ──► Waiter          Resolver ◄── LogEntry
//!  wait() ..... blocked ......  resolve(Ok / Err)
//!  ◄──────────── woken ─────────┘
//! ```

mod completion;

pub use completion::{completion_pair, Resolver, Waiter};
