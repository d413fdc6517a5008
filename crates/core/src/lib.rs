//! Core types for ledgerkv
//!
//! This crate defines the domain vocabulary shared by every other crate in
//! the workspace:
//!
//! - [`types`]: `AddrSlot`, `Version`, `RangeId`, `DataRecord`, `Value`
//! - [`range_list`]: the per-AddrSlot [`RangeList`] and its wire encoding
//! - [`error`]: the layered [`Error`] enum and [`Result`] alias
//!
//! Nothing in this crate touches the underlying LSM engine or defines the
//! storage-strategy contract; those live in `ledgerkv-engine` and
//! `ledgerkv-storage` respectively, to keep this crate free of the
//! engine dependency.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod range_list;
pub mod types;

pub use error::{Error, Result};
pub use range_list::RangeList;
pub use types::{AddrSlot, DataRecord, RangeId, Value, Version};
