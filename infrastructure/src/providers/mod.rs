//! Backend client adapters

pub mod http_client;

pub use http_client::{DEFAULT_BASE_URL, HttpBackendClient};
