//! Origin API implementation

use super::common::{api_path, PathSegment, API_PREFIX};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

/// Backend the edge fetches content from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing)]
    pub service_id: String,
    pub name: String,
    pub address: String,
    pub port: u16,
    pub use_tls: bool,
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_header_name: Option<String>,
    /// Write-only: accepted on create/update, never returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_header_value: Option<String>,
}

pub struct OriginsApi<'a> {
    client: &'a Client,
}

fn collection(service_id: &str) -> String {
    api_path(&[
        API_PREFIX,
        PathSegment::Literal("services"),
        PathSegment::Id(service_id),
        PathSegment::Literal("origins"),
    ])
}

fn item(service_id: &str, origin_id: &str) -> String {
    format!(
        "{}{}",
        collection(service_id),
        api_path(&[PathSegment::Id(origin_id)])
    )
}

impl<'a> OriginsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, service_id: &str, origin_id: &str) -> Result<Origin, ApiError> {
        let origin: Origin = self.client.get(&item(service_id, origin_id)).await?;
        Ok(scoped(origin, service_id))
    }

    pub async fn create(&self, origin: &Origin) -> Result<Origin, ApiError> {
        let created: Origin = self
            .client
            .post(&collection(&origin.service_id), origin)
            .await?;
        Ok(scoped(created, &origin.service_id))
    }

    pub async fn update(&self, origin: &Origin) -> Result<Origin, ApiError> {
        let updated: Origin = self
            .client
            .put(&item(&origin.service_id, &origin.id), origin)
            .await?;
        Ok(scoped(updated, &origin.service_id))
    }

    pub async fn delete(&self, service_id: &str, origin_id: &str) -> Result<(), ApiError> {
        self.client.delete(&item(service_id, origin_id)).await
    }
}

fn scoped(mut origin: Origin, service_id: &str) -> Origin {
    if origin.service_id.is_empty() {
        origin.service_id = service_id.to_string();
    }
    origin
}
