//! The error kinds the core distinguishes (SPEC_FULL.md §7).
//!
//! *Not found* is deliberately **not** one of these variants: query
//! functions return `Option<Value>`, never `Err`, for a missing key. Every
//! narrower error type further down the stack (engine I/O, cache, strategy)
//! converts into this enum via `#[from]`, following the one-error-enum-per-
//! crate-plus-a-top-level-aggregate convention used throughout this
//! codebase.

use crate::types::AddrSlot;
use thiserror::Error;

/// Top-level error type returned by the DB manager and everything it calls.
#[derive(Debug, Error)]
pub enum Error {
    /// Any failure from the underlying LSM engine (I/O, corruption the
    /// engine itself detected, etc.).
    #[error("engine I/O error: {0}")]
    EngineIo(String),

    /// A RangeList byte blob failed to deserialize. Treated as *not found*
    /// for that key by the caller after being logged, never surfaced
    /// through a query's `Option` return.
    #[error("corrupt range list for {addr_slot}: {reason}")]
    CorruptRangeList {
        /// The key whose range list could not be read.
        addr_slot: AddrSlot,
        /// Human-readable deserialization failure.
        reason: String,
    },

    /// Pending batch bytes exceeded the hard ceiling before any flush
    /// freed space, and a forced flush still left it over.
    #[error("batch overflow: {pending_bytes} bytes pending exceeds hard ceiling {ceiling_bytes}")]
    BatchOverflow {
        /// Bytes pending at the time of the overflow.
        pending_bytes: usize,
        /// The hard ceiling that was exceeded.
        ceiling_bytes: usize,
    },

    /// The strategy factory was asked for a name it doesn't recognize.
    #[error("unknown storage strategy: {0:?}")]
    StrategyUnknown(String),

    /// The database is already open; returns the existing handle instead
    /// of failing (idempotent warn).
    #[error("database already open at {0}")]
    AlreadyOpen(String),

    /// An operation was attempted before `open` was called.
    #[error("database is not open")]
    NotOpen,
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
