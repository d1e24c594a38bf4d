//! REST API client module for the school management backend.
//!
//! This module provides the `ApiClient` for fetching the student roster and
//! the secondary analytics endpoints, plus `EndpointSource` adapters that
//! expose each analytics endpoint through the `AnalyticsSource` trait.
//!
//! Requests carry a JWT bearer token when one is set on the client.

pub mod client;
pub mod error;

pub use client::{ApiClient, EndpointSource};
pub use error::ApiError;
