//! Stockroom
//!
//! An in-memory inventory rules engine: the domain logic of a warehouse
//! admin tool expressed as pure, synchronous operations over a state
//! snapshot. Covers multi-location stock aggregation, reorder evaluation,
//! a stock-adjustment approval workflow, customer-specific pricing
//! overlays, incoming-shipment intake, and an audit trail.
//!
//! Every mutating operation takes an [`AppState`] reference and returns a
//! fresh snapshot; the input is never modified, including on error paths.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod errors;
pub mod fixtures;
pub mod media;
pub mod models;
pub mod queries;
pub mod services;
pub mod state;

pub use errors::ServiceError;
pub use state::AppState;
