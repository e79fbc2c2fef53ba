//! Core of the KwaGround job board and fare tracker.
//!
//! Catalog filtering, geo-proximity lookups, form validation and the payment
//! confirmation flow live here; the binary wires them into an HTTP service and
//! a command line.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod forms;
pub mod geo;
pub mod intake;
pub mod payments;
pub mod session;
pub mod store;
pub mod telemetry;
