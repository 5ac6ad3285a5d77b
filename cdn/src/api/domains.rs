//! Domain API implementation
//!
//! Domains live under a service and cannot be changed once attached; a new
//! hostname means a new domain.

use super::common::{api_path, PathSegment, API_PREFIX};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Part of the path, never sent in the body
    #[serde(default, skip_serializing)]
    pub service_id: String,
    pub hostname: String,
    /// pending, active or failed
    #[serde(default, skip_serializing)]
    pub status: Option<String>,
}

pub struct DomainsApi<'a> {
    client: &'a Client,
}

fn collection(service_id: &str) -> String {
    api_path(&[
        API_PREFIX,
        PathSegment::Literal("services"),
        PathSegment::Id(service_id),
        PathSegment::Literal("domains"),
    ])
}

fn item(service_id: &str, domain_id: &str) -> String {
    format!(
        "{}{}",
        collection(service_id),
        api_path(&[PathSegment::Id(domain_id)])
    )
}

impl<'a> DomainsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, service_id: &str, domain_id: &str) -> Result<Domain, ApiError> {
        let mut domain: Domain = self.client.get(&item(service_id, domain_id)).await?;
        if domain.service_id.is_empty() {
            domain.service_id = service_id.to_string();
        }
        Ok(domain)
    }

    pub async fn create(&self, domain: &Domain) -> Result<Domain, ApiError> {
        let mut created: Domain = self
            .client
            .post(&collection(&domain.service_id), domain)
            .await?;
        if created.service_id.is_empty() {
            created.service_id = domain.service_id.clone();
        }
        Ok(created)
    }

    pub async fn delete(&self, service_id: &str, domain_id: &str) -> Result<(), ApiError> {
        self.client.delete(&item(service_id, domain_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::Server;

    #[test]
    fn paths_nest_under_service() {
        assert_eq!(item("svc-1", "d 1"), "/v1/services/svc-1/domains/d%201");
    }

    #[tokio::test]
    async fn get_fills_service_from_path() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/services/svc-1/domains/dom-1")
            .with_body(r#"{"data":{"id":"dom-1","hostname":"cdn.example.com","status":"active"}}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let domain = client.domains().get("svc-1", "dom-1").await.unwrap();

        assert_eq!(domain.service_id, "svc-1");
        assert_eq!(domain.status.as_deref(), Some("active"));
    }
}
