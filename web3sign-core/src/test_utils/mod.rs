//! Test utilities and helpers for web3sign
//!
//! Fixtures, instrumented stores and channel helpers shared by the unit
//! tests across the crate.

pub mod async_helpers;
pub mod fixtures;
pub mod stores;

pub use async_helpers::*;
pub use fixtures::*;
pub use stores::*;
