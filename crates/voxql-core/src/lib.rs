//! # voxql-core
//!
//! Core types shared across the voxql crates:
//! - [`ResultSet`]: ordered, column-keyed rows produced by the query executor
//! - [`Stage`]: the per-request pipeline state machine
//! - Response types returned by the HTTP surface and the CLI
//! - Cross-cutting error types

pub mod errors;
pub mod responses;
pub mod result_set;
pub mod stage;

pub use errors::CoreError;
pub use result_set::{ResultSet, Row};
pub use stage::Stage;
