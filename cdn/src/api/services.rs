//! Service API implementation

use super::common::{api_path, PathSegment, API_PREFIX};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

const SERVICES: PathSegment<'static> = PathSegment::Literal("services");

/// A CDN service: the top-level container for domains, origins and policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http2_enabled: Option<bool>,
    /// Assigned by the API
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
}

pub struct ServicesApi<'a> {
    client: &'a Client,
}

impl<'a> ServicesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &str) -> Result<Service, ApiError> {
        self.client
            .get(&api_path(&[API_PREFIX, SERVICES, PathSegment::Id(id)]))
            .await
    }

    pub async fn create(&self, service: &Service) -> Result<Service, ApiError> {
        self.client
            .post(&api_path(&[API_PREFIX, SERVICES]), service)
            .await
    }

    pub async fn update(&self, service: &Service) -> Result<Service, ApiError> {
        self.client
            .put(
                &api_path(&[API_PREFIX, SERVICES, PathSegment::Id(&service.id)]),
                service,
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&api_path(&[API_PREFIX, SERVICES, PathSegment::Id(id)]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn create_posts_without_computed_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/services")
            .match_body(Matcher::Json(serde_json::json!({"name": "edge"})))
            .with_status(201)
            .with_body(
                r#"{"data":{"id":"svc-1","name":"edge","created_at":"2024-05-01T10:00:00Z"}}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let created = client
            .services()
            .create(&Service {
                id: String::new(),
                name: "edge".to_string(),
                comment: None,
                http2_enabled: None,
                created_at: None,
            })
            .await
            .unwrap();

        assert_eq!(created.id, "svc-1");
        assert_eq!(created.created_at.as_deref(), Some("2024-05-01T10:00:00Z"));
        mock.assert_async().await;
    }
}
