//! Client code for the atelier geocoding subsystem.
//!
//! This crate provides the upstream geocoding API client, the
//! single-address resolver with in-flight coalescing, and the rate-paced
//! batch resolver shared by the server operations and the back-fill tool.

pub mod batch;
pub mod geocode;
pub mod resolve;

pub use batch::{BatchOptions, BatchResolver};
pub use geocode::{Coordinates, GeocodeError, GeocodeProvider, GeocodeRequest, GeocoderConfig, LocationIqClient};
pub use resolve::{GeocodeResolver, Resolution, ResolveError};
