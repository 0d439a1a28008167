//! Operation layer for the atelier geocoding subsystem.
//!
//! The HTTP route wiring lives outside this workspace; it mounts the
//! typed operations in [`ops`] and serializes their outputs as-is.

pub mod error;
pub mod ops;

pub use error::{ErrorDetail, ErrorResponse, OpError};
