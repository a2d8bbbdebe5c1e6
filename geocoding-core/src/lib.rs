//! Core library for the `geocode` CLI.
//!
//! This crate defines:
//! - A minimal client for the Mapbox v5 geocoding API (forward and reverse)
//! - An injectable HTTP transport, with a `reqwest` default
//! - Configuration handling for the CLI
//!
//! Successful responses are returned as untyped JSON; the client does not
//! model the API's feature collection.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod transport;

pub use client::{BASE_URL, ClientSettings, GeocodeClient, ProximityFormat};
pub use config::Config;
pub use error::GeocodeError;
pub use model::{BoundingBox, Dataset, LngLat};
pub use transport::{HttpTransport, ReqwestTransport, TransportError, TransportResponse};
