//! Test helpers for the CDN API

use super::{Client, RetryConfig};

/// Client with fast retries for mock servers
#[allow(clippy::disallowed_methods)]
pub fn create_test_client(url: &str) -> Client {
    Client::with_config(
        url,
        "test-token",
        true,
        RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            timeout_seconds: 5,
        },
    )
    .unwrap()
}
