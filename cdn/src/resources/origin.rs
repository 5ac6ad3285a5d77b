//! cdn_origin resource

use crate::api::{Client, Origin};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tfadapter::validator::{NumberRangeValidator, StringLengthValidator, StringPatternValidator};
use tfadapter::{
    AttributeBuilder, ConversionError, DeclarativeModel, EntityAdapter, EntityIdentity,
    IdentityKind, RemoteError, Schema, SchemaBuilder, SecretField,
};

pub const TYPE_NAME: &str = "cdn_origin";

fn default_port() -> u16 {
    443
}

fn default_use_tls() -> bool {
    true
}

fn default_weight() -> u32 {
    100
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OriginModel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub auth_header_name: Option<String>,
    #[serde(default)]
    pub auth_header_value: SecretField<String>,
}

impl DeclarativeModel for OriginModel {
    fn merge_secrets(&mut self, prior: &Self) {
        self.auth_header_value.overlay(&prior.auth_header_value);
    }
}

pub struct OriginAdapter {
    client: Client,
}

impl OriginAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntityAdapter for OriginAdapter {
    type Model = OriginModel;
    type Wire = Origin;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn identity_kind(&self) -> IdentityKind {
        IdentityKind::Composite
    }

    async fn create(&self, obj: Origin) -> Result<Origin, RemoteError> {
        self.client.origins().create(&obj).await.map_err(RemoteError::from)
    }

    async fn read(&self, identity: &EntityIdentity) -> Result<Origin, RemoteError> {
        self.client
            .origins()
            .get(identity.parent_id().unwrap_or_default(), identity.entity_id())
            .await
            .map_err(RemoteError::from)
    }

    async fn update(&self, obj: Origin) -> Result<Origin, RemoteError> {
        self.client.origins().update(&obj).await.map_err(RemoteError::from)
    }

    async fn delete(&self, identity: &EntityIdentity) -> Result<(), RemoteError> {
        self.client
            .origins()
            .delete(identity.parent_id().unwrap_or_default(), identity.entity_id())
            .await
            .map_err(RemoteError::from)
    }

    fn get_id(&self, model: &OriginModel) -> EntityIdentity {
        EntityIdentity::scoped(model.service_id.as_str(), model.id.as_str())
    }

    fn resource_to_obj(&self, model: &OriginModel) -> Result<Origin, ConversionError> {
        if model.service_id.is_empty() {
            return Err(ConversionError::attribute("service_id", "must be set"));
        }
        if model.auth_header_value.is_set() && model.auth_header_name.is_none() {
            return Err(ConversionError::attribute(
                "auth_header_name",
                "required when auth_header_value is set",
            ));
        }
        Ok(Origin {
            id: model.id.clone(),
            service_id: model.service_id.clone(),
            name: model.name.clone(),
            address: model.address.clone(),
            port: model.port,
            use_tls: model.use_tls,
            weight: model.weight,
            auth_header_name: model.auth_header_name.clone(),
            auth_header_value: model.auth_header_value.get().cloned(),
        })
    }

    fn obj_to_resource(&self, obj: Origin) -> Result<OriginModel, ConversionError> {
        Ok(OriginModel {
            id: obj.id,
            service_id: obj.service_id,
            name: obj.name,
            address: obj.address,
            port: obj.port,
            use_tls: obj.use_tls,
            weight: obj.weight,
            auth_header_name: obj.auth_header_name,
            auth_header_value: obj.auth_header_value.into(),
        })
    }

    fn model_from_identity(&self, identity: &EntityIdentity) -> OriginModel {
        OriginModel {
            id: identity.entity_id().to_string(),
            service_id: identity.parent_id().unwrap_or_default().to_string(),
            ..Default::default()
        }
    }

    fn adopt_identity(&self, submitted: &OriginModel, obj: &Origin) -> OriginModel {
        OriginModel {
            id: super::assigned(&obj.id, &submitted.id),
            service_id: super::assigned(&obj.service_id, &submitted.service_id),
            ..submitted.clone()
        }
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Backend a CDN service fetches content from. Import with `<service_id>,<origin_id>`.")
        .attribute(
            AttributeBuilder::string("id")
                .description("Origin identifier assigned by the API")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("service_id")
                .description("Service the origin belongs to")
                .required()
                .requires_replace()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("name")
                .description("Origin name, unique within the service")
                .required()
                .validator(StringLengthValidator {
                    min: Some(1),
                    max: Some(64),
                })
                .build(),
        )
        .attribute(
            AttributeBuilder::string("address")
                .description("Hostname of the backend")
                .required()
                .validator(StringPatternValidator::hostname())
                .build(),
        )
        .attribute(
            AttributeBuilder::number("port")
                .description("Backend port, 443 by default")
                .optional()
                .computed()
                .validator(NumberRangeValidator {
                    min: Some(1.0),
                    max: Some(65535.0),
                })
                .build(),
        )
        .attribute(
            AttributeBuilder::bool("use_tls")
                .description("Connect to the backend over TLS, true by default")
                .optional()
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::number("weight")
                .description("Share of traffic between 1 and 100, 100 by default")
                .optional()
                .computed()
                .validator(NumberRangeValidator {
                    min: Some(1.0),
                    max: Some(100.0),
                })
                .build(),
        )
        .attribute(
            AttributeBuilder::string("auth_header_name")
                .description("Header sent to the backend to authenticate the edge")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("auth_header_value")
                .description("Value of the authentication header; write-only")
                .optional()
                .sensitive()
                .build(),
        )
        .build()
}
