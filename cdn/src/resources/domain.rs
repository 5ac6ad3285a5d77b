//! cdn_domain resource
//!
//! A hostname attached to a service. Domains are immutable: changing the
//! hostname replaces the domain, so there is no update call.

use crate::api::{Client, Domain};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tfadapter::validator::StringPatternValidator;
use tfadapter::{
    AttributeBuilder, ConversionError, DeclarativeModel, EntityAdapter, EntityIdentity,
    IdentityKind, RemoteError, Schema, SchemaBuilder,
};

pub const TYPE_NAME: &str = "cdn_domain";

const STATUSES: &[&str] = &["pending", "active", "failed"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainModel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl DeclarativeModel for DomainModel {}

pub struct DomainAdapter {
    client: Client,
}

impl DomainAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntityAdapter for DomainAdapter {
    type Model = DomainModel;
    type Wire = Domain;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn identity_kind(&self) -> IdentityKind {
        IdentityKind::Composite
    }

    fn supports_update(&self) -> bool {
        false
    }

    async fn create(&self, obj: Domain) -> Result<Domain, RemoteError> {
        self.client.domains().create(&obj).await.map_err(RemoteError::from)
    }

    async fn read(&self, identity: &EntityIdentity) -> Result<Domain, RemoteError> {
        let service_id = identity.parent_id().unwrap_or_default();
        self.client
            .domains()
            .get(service_id, identity.entity_id())
            .await
            .map_err(RemoteError::from)
    }

    async fn delete(&self, identity: &EntityIdentity) -> Result<(), RemoteError> {
        let service_id = identity.parent_id().unwrap_or_default();
        self.client
            .domains()
            .delete(service_id, identity.entity_id())
            .await
            .map_err(RemoteError::from)
    }

    fn get_id(&self, model: &DomainModel) -> EntityIdentity {
        EntityIdentity::scoped(model.service_id.as_str(), model.id.as_str())
    }

    fn resource_to_obj(&self, model: &DomainModel) -> Result<Domain, ConversionError> {
        if model.service_id.is_empty() {
            return Err(ConversionError::attribute("service_id", "must be set"));
        }
        Ok(Domain {
            id: model.id.clone(),
            service_id: model.service_id.clone(),
            hostname: model.hostname.clone(),
            status: model.status.clone(),
        })
    }

    fn obj_to_resource(&self, obj: Domain) -> Result<DomainModel, ConversionError> {
        if let Some(status) = &obj.status {
            if !STATUSES.contains(&status.as_str()) {
                return Err(ConversionError::unknown_variant("status", status, STATUSES));
            }
        }
        Ok(DomainModel {
            id: obj.id,
            service_id: obj.service_id,
            hostname: obj.hostname,
            status: obj.status,
        })
    }

    fn model_from_identity(&self, identity: &EntityIdentity) -> DomainModel {
        DomainModel {
            id: identity.entity_id().to_string(),
            service_id: identity.parent_id().unwrap_or_default().to_string(),
            ..Default::default()
        }
    }

    fn adopt_identity(&self, submitted: &DomainModel, obj: &Domain) -> DomainModel {
        DomainModel {
            id: super::assigned(&obj.id, &submitted.id),
            service_id: super::assigned(&obj.service_id, &submitted.service_id),
            ..submitted.clone()
        }
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Attaches a hostname to a CDN service. Import with `<service_id>,<domain_id>`.")
        .attribute(
            AttributeBuilder::string("id")
                .description("Domain identifier assigned by the API")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("service_id")
                .description("Service the domain belongs to")
                .required()
                .requires_replace()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("hostname")
                .description("Fully-qualified hostname, optionally a *. wildcard")
                .required()
                .requires_replace()
                .validator(StringPatternValidator::hostname())
                .build(),
        )
        .attribute(
            AttributeBuilder::string("status")
                .description("Provisioning status: pending, active or failed")
                .computed()
                .build(),
        )
        .build()
}
