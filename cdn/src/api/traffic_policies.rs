//! Traffic policy API implementation
//!
//! Every service has exactly one traffic policy. It cannot be created or
//! destroyed, only written with PUT; DELETE resets it to round robin.

use super::common::{api_path, PathSegment, API_PREFIX};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficPolicy {
    #[serde(default, skip_serializing)]
    pub service_id: String,
    /// Tag selecting the balancing mode: round_robin, failover, least_latency
    pub mode: String,
    /// Only meaningful for failover
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_origin_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky_sessions: Option<bool>,
}

pub struct TrafficPoliciesApi<'a> {
    client: &'a Client,
}

fn path(service_id: &str) -> String {
    api_path(&[
        API_PREFIX,
        PathSegment::Literal("services"),
        PathSegment::Id(service_id),
        PathSegment::Literal("traffic-policy"),
    ])
}

impl<'a> TrafficPoliciesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, service_id: &str) -> Result<TrafficPolicy, ApiError> {
        let mut policy: TrafficPolicy = self.client.get(&path(service_id)).await?;
        policy.service_id = service_id.to_string();
        Ok(policy)
    }

    pub async fn put(&self, policy: &TrafficPolicy) -> Result<TrafficPolicy, ApiError> {
        let mut written: TrafficPolicy = self.client.put(&path(&policy.service_id), policy).await?;
        written.service_id = policy.service_id.clone();
        Ok(written)
    }

    /// Reset the policy to its default
    pub async fn reset(&self, service_id: &str) -> Result<(), ApiError> {
        self.client.delete(&path(service_id)).await
    }
}
