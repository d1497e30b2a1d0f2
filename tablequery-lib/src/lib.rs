//! Tabular data query controller
//!
//! Tracks the filter, sort and pagination state of a remote-backed table,
//! compiles it into a canonical request, fetches the matching page and
//! reconciles the response back into view state.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod query;

mod controller;

pub use controller::*;
