//! cdn_service resource

use crate::api::{Client, Service};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tfadapter::validator::StringLengthValidator;
use tfadapter::{
    AttributeBuilder, ConversionError, DeclarativeModel, EntityAdapter, EntityIdentity,
    RemoteError, Schema, SchemaBuilder,
};

pub const TYPE_NAME: &str = "cdn_service";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceModel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub http2_enabled: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl DeclarativeModel for ServiceModel {}

pub struct ServiceAdapter {
    client: Client,
}

impl ServiceAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntityAdapter for ServiceAdapter {
    type Model = ServiceModel;
    type Wire = Service;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, obj: Service) -> Result<Service, RemoteError> {
        self.client.services().create(&obj).await.map_err(RemoteError::from)
    }

    async fn read(&self, identity: &EntityIdentity) -> Result<Service, RemoteError> {
        self.client.services().get(identity.entity_id()).await.map_err(RemoteError::from)
    }

    async fn update(&self, obj: Service) -> Result<Service, RemoteError> {
        self.client.services().update(&obj).await.map_err(RemoteError::from)
    }

    async fn delete(&self, identity: &EntityIdentity) -> Result<(), RemoteError> {
        self.client.services().delete(identity.entity_id()).await.map_err(RemoteError::from)
    }

    fn get_id(&self, model: &ServiceModel) -> EntityIdentity {
        EntityIdentity::id(model.id.as_str())
    }

    fn resource_to_obj(&self, model: &ServiceModel) -> Result<Service, ConversionError> {
        Ok(Service {
            id: model.id.clone(),
            name: model.name.clone(),
            comment: model.comment.clone(),
            http2_enabled: model.http2_enabled,
            created_at: model.created_at.clone(),
        })
    }

    fn obj_to_resource(&self, obj: Service) -> Result<ServiceModel, ConversionError> {
        if obj.id.is_empty() {
            return Err(ConversionError::attribute("id", "missing from API response"));
        }
        Ok(ServiceModel {
            id: obj.id,
            name: obj.name,
            comment: obj.comment,
            http2_enabled: obj.http2_enabled,
            created_at: obj.created_at,
        })
    }

    fn model_from_identity(&self, identity: &EntityIdentity) -> ServiceModel {
        ServiceModel {
            id: identity.entity_id().to_string(),
            ..Default::default()
        }
    }

    fn adopt_identity(&self, submitted: &ServiceModel, obj: &Service) -> ServiceModel {
        ServiceModel {
            id: super::assigned(&obj.id, &submitted.id),
            ..submitted.clone()
        }
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages a CDN service, the container for domains, origins and traffic policy")
        .attribute(
            AttributeBuilder::string("id")
                .description("Service identifier assigned by the API")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("name")
                .description("Human-readable service name")
                .required()
                .validator(StringLengthValidator {
                    min: Some(1),
                    max: Some(255),
                })
                .build(),
        )
        .attribute(
            AttributeBuilder::string("comment")
                .description("Free-form description")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::bool("http2_enabled")
                .description("Serve HTTP/2 at the edge")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("created_at")
                .description("Creation timestamp")
                .computed()
                .build(),
        )
        .build()
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::Server;
    use std::sync::Arc;
    use tfadapter::{LifecycleCoordinator, MutationSerializer, ReadOutcome};

    fn adapter(url: &str) -> ServiceAdapter {
        ServiceAdapter::new(create_test_client(url))
    }

    #[test]
    fn model_survives_wire_round_trip() {
        let adapter = adapter("http://localhost");
        let model = ServiceModel {
            id: "svc-1".to_string(),
            name: "edge".to_string(),
            comment: Some("main site".to_string()),
            http2_enabled: Some(true),
            created_at: Some("2024-05-01T10:00:00Z".to_string()),
        };

        let obj = adapter.resource_to_obj(&model).unwrap();
        assert_eq!(adapter.obj_to_resource(obj).unwrap(), model);
    }

    #[test]
    fn bare_model_survives_wire_round_trip() {
        let adapter = adapter("http://localhost");
        let model = ServiceModel {
            id: "svc-1".to_string(),
            name: "edge".to_string(),
            ..Default::default()
        };

        let obj = adapter.resource_to_obj(&model).unwrap();
        assert_eq!(adapter.obj_to_resource(obj).unwrap(), model);
    }

    #[tokio::test]
    async fn create_returns_service_with_assigned_id() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/services")
            .with_status(201)
            .with_body(r#"{"data":{"id":"1","name":"x"}}"#)
            .create_async()
            .await;

        let coordinator = LifecycleCoordinator::new(Arc::new(MutationSerializer::new()));
        let created = coordinator
            .create(
                &adapter(&server.url()),
                &ServiceModel {
                    name: "x".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(created.id, "1");
        assert_eq!(created.name, "x");
    }

    #[tokio::test]
    async fn deleted_service_reads_as_absent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/services/1")
            .with_status(404)
            .with_body(r#"{"errors":["service not found"]}"#)
            .expect(1)
            .create_async()
            .await;

        let coordinator = LifecycleCoordinator::new(Arc::new(MutationSerializer::new()));
        let outcome = coordinator
            .read(
                &adapter(&server.url()),
                &ServiceModel {
                    id: "1".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome, ReadOutcome::Absent);
        mock.assert_async().await;
    }
}
