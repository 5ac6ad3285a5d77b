//! CDN REST API client

pub mod certificates;
pub mod client;
pub mod common;
pub mod domains;
pub mod error;
pub mod origins;
pub mod services;
pub mod traffic_policies;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use certificates::Certificate;
pub use client::{Client, RetryConfig};
pub use domains::Domain;
pub use error::ApiError;
pub use origins::Origin;
pub use services::Service;
pub use traffic_policies::TrafficPolicy;
