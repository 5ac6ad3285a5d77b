//! cdn_certificate resource

use crate::api::{Certificate, Client};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tfadapter::validator::StringPatternValidator;
use tfadapter::{
    AttributeBuilder, ConversionError, DeclarativeModel, EntityAdapter, EntityIdentity,
    RemoteError, Schema, SchemaBuilder, SecretField,
};

pub const TYPE_NAME: &str = "cdn_certificate";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CertificateModel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub certificate_pem: String,
    #[serde(default)]
    pub private_key: SecretField<String>,
    /// Expiry in UTC, RFC 3339 with second precision
    #[serde(default)]
    pub not_after: Option<String>,
}

impl DeclarativeModel for CertificateModel {
    fn merge_secrets(&mut self, prior: &Self) {
        self.private_key.overlay(&prior.private_key);
    }
}

pub struct CertificateAdapter {
    client: Client,
}

impl CertificateAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn normalize_not_after(raw: &str) -> Result<String, ConversionError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true))
        .map_err(|e| {
            ConversionError::attribute(
                "not_after",
                format!("'{}' is not an RFC 3339 timestamp: {}", raw, e),
            )
        })
}

#[async_trait]
impl EntityAdapter for CertificateAdapter {
    type Model = CertificateModel;
    type Wire = Certificate;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, obj: Certificate) -> Result<Certificate, RemoteError> {
        self.client
            .certificates()
            .create(&obj)
            .await
            .map_err(RemoteError::from)
    }

    async fn read(&self, identity: &EntityIdentity) -> Result<Certificate, RemoteError> {
        self.client
            .certificates()
            .get(identity.entity_id())
            .await
            .map_err(RemoteError::from)
    }

    async fn update(&self, obj: Certificate) -> Result<Certificate, RemoteError> {
        self.client
            .certificates()
            .update(&obj)
            .await
            .map_err(RemoteError::from)
    }

    async fn delete(&self, identity: &EntityIdentity) -> Result<(), RemoteError> {
        self.client
            .certificates()
            .delete(identity.entity_id())
            .await
            .map_err(RemoteError::from)
    }

    fn get_id(&self, model: &CertificateModel) -> EntityIdentity {
        EntityIdentity::id(model.id.as_str())
    }

    fn resource_to_obj(&self, model: &CertificateModel) -> Result<Certificate, ConversionError> {
        Ok(Certificate {
            id: model.id.clone(),
            name: model.name.clone(),
            certificate_pem: model.certificate_pem.clone(),
            private_key: model.private_key.get().cloned(),
            not_after: model.not_after.clone(),
        })
    }

    fn obj_to_resource(&self, obj: Certificate) -> Result<CertificateModel, ConversionError> {
        let not_after = obj
            .not_after
            .as_deref()
            .map(normalize_not_after)
            .transpose()?;

        Ok(CertificateModel {
            id: obj.id,
            name: obj.name,
            certificate_pem: obj.certificate_pem,
            private_key: obj.private_key.into(),
            not_after,
        })
    }

    fn model_from_identity(&self, identity: &EntityIdentity) -> CertificateModel {
        CertificateModel {
            id: identity.entity_id().to_string(),
            ..Default::default()
        }
    }

    fn adopt_identity(&self, submitted: &CertificateModel, obj: &Certificate) -> CertificateModel {
        CertificateModel {
            id: super::assigned(&obj.id, &submitted.id),
            ..submitted.clone()
        }
    }
}

fn pem_pattern() -> regex::Regex {
    regex::Regex::new(r"^-----BEGIN CERTIFICATE-----[\s\S]+-----END CERTIFICATE-----\s*$")
        .unwrap_or_else(|e| panic!("certificate pattern is invalid: {}", e))
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("TLS certificate served by the CDN edge")
        .attribute(
            AttributeBuilder::string("id")
                .description("Certificate identifier assigned by the API")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("name")
                .description("Certificate name")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("certificate_pem")
                .description("PEM-encoded certificate chain")
                .required()
                .validator(StringPatternValidator::new(
                    pem_pattern(),
                    "a PEM-encoded certificate",
                ))
                .build(),
        )
        .attribute(
            AttributeBuilder::string("private_key")
                .description("PEM-encoded private key; write-only")
                .required()
                .sensitive()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("not_after")
                .description("Expiry timestamp (RFC 3339, UTC)")
                .computed()
                .build(),
        )
        .build()
}
