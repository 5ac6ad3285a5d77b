//! TLS certificate API implementation

use super::common::{api_path, PathSegment, API_PREFIX};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

const CERTIFICATES: PathSegment<'static> = PathSegment::Literal("certificates");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub certificate_pem: String,
    /// Write-only: accepted on upload, never returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// RFC 3339 expiry, derived by the API from the certificate
    #[serde(default, skip_serializing)]
    pub not_after: Option<String>,
}

pub struct CertificatesApi<'a> {
    client: &'a Client,
}

impl<'a> CertificatesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &str) -> Result<Certificate, ApiError> {
        self.client
            .get(&api_path(&[API_PREFIX, CERTIFICATES, PathSegment::Id(id)]))
            .await
    }

    pub async fn create(&self, certificate: &Certificate) -> Result<Certificate, ApiError> {
        self.client
            .post(&api_path(&[API_PREFIX, CERTIFICATES]), certificate)
            .await
    }

    /// Replace the certificate material in place
    pub async fn update(&self, certificate: &Certificate) -> Result<Certificate, ApiError> {
        self.client
            .put(
                &api_path(&[API_PREFIX, CERTIFICATES, PathSegment::Id(&certificate.id)]),
                certificate,
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&api_path(&[API_PREFIX, CERTIFICATES, PathSegment::Id(id)]))
            .await
    }
}
