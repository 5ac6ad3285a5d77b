//! cdn_traffic_policy resource
//!
//! The traffic policy always exists for a service, so create writes it with
//! PUT and destroy resets it to the default. The resource id is the service id.

use crate::api::{Client, TrafficPolicy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tfadapter::validator::OneOfValidator;
use tfadapter::{
    AttributeBuilder, ConversionError, CreateMode, DeclarativeModel, EntityAdapter,
    EntityIdentity, RemoteError, Schema, SchemaBuilder,
};

pub const TYPE_NAME: &str = "cdn_traffic_policy";

const MODES: &[&str] = &["round_robin", "failover", "least_latency"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum BalancingMode {
    RoundRobin,
    Failover { primary_origin_id: String },
    LeastLatency,
}

impl BalancingMode {
    fn parse(mode: &str, primary_origin_id: Option<&str>) -> Result<Self, ConversionError> {
        let parsed = match mode {
            "round_robin" => BalancingMode::RoundRobin,
            "least_latency" => BalancingMode::LeastLatency,
            "failover" => {
                let primary = primary_origin_id.filter(|id| !id.is_empty()).ok_or_else(|| {
                    ConversionError::attribute(
                        "primary_origin_id",
                        "required when mode is failover",
                    )
                })?;
                return Ok(BalancingMode::Failover {
                    primary_origin_id: primary.to_string(),
                });
            }
            other => return Err(ConversionError::unknown_variant("mode", other, MODES)),
        };

        if primary_origin_id.is_some() {
            return Err(ConversionError::attribute(
                "primary_origin_id",
                format!("only valid when mode is failover, not {}", mode),
            ));
        }
        Ok(parsed)
    }

    fn tag(&self) -> &'static str {
        match self {
            BalancingMode::RoundRobin => "round_robin",
            BalancingMode::Failover { .. } => "failover",
            BalancingMode::LeastLatency => "least_latency",
        }
    }

    fn primary_origin_id(&self) -> Option<String> {
        match self {
            BalancingMode::Failover { primary_origin_id } => Some(primary_origin_id.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrafficPolicyModel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub primary_origin_id: Option<String>,
    #[serde(default)]
    pub sticky_sessions: Option<bool>,
}

impl DeclarativeModel for TrafficPolicyModel {}

pub struct TrafficPolicyAdapter {
    client: Client,
}

impl TrafficPolicyAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntityAdapter for TrafficPolicyAdapter {
    type Model = TrafficPolicyModel;
    type Wire = TrafficPolicy;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::Update
    }

    async fn create(&self, obj: TrafficPolicy) -> Result<TrafficPolicy, RemoteError> {
        Err(RemoteError::Other(format!(
            "traffic policy for service {} cannot be created, only written",
            obj.service_id
        )))
    }

    async fn read(&self, identity: &EntityIdentity) -> Result<TrafficPolicy, RemoteError> {
        self.client
            .traffic_policies()
            .get(identity.entity_id())
            .await
            .map_err(RemoteError::from)
    }

    async fn update(&self, obj: TrafficPolicy) -> Result<TrafficPolicy, RemoteError> {
        self.client
            .traffic_policies()
            .put(&obj)
            .await
            .map_err(RemoteError::from)
    }

    async fn delete(&self, identity: &EntityIdentity) -> Result<(), RemoteError> {
        self.client
            .traffic_policies()
            .reset(identity.entity_id())
            .await
            .map_err(RemoteError::from)
    }

    fn get_id(&self, model: &TrafficPolicyModel) -> EntityIdentity {
        EntityIdentity::id(model.service_id.as_str())
    }

    fn resource_to_obj(&self, model: &TrafficPolicyModel) -> Result<TrafficPolicy, ConversionError> {
        if model.service_id.is_empty() {
            return Err(ConversionError::attribute("service_id", "must be set"));
        }
        let mode = BalancingMode::parse(&model.mode, model.primary_origin_id.as_deref())?;

        Ok(TrafficPolicy {
            service_id: model.service_id.clone(),
            mode: mode.tag().to_string(),
            primary_origin_id: mode.primary_origin_id(),
            sticky_sessions: model.sticky_sessions,
        })
    }

    fn obj_to_resource(&self, obj: TrafficPolicy) -> Result<TrafficPolicyModel, ConversionError> {
        let mode = BalancingMode::parse(&obj.mode, obj.primary_origin_id.as_deref())?;

        Ok(TrafficPolicyModel {
            id: obj.service_id.clone(),
            service_id: obj.service_id,
            mode: mode.tag().to_string(),
            primary_origin_id: mode.primary_origin_id(),
            sticky_sessions: obj.sticky_sessions,
        })
    }

    fn model_from_identity(&self, identity: &EntityIdentity) -> TrafficPolicyModel {
        TrafficPolicyModel {
            id: identity.entity_id().to_string(),
            service_id: identity.entity_id().to_string(),
            ..Default::default()
        }
    }

    fn adopt_identity(&self, submitted: &TrafficPolicyModel, obj: &TrafficPolicy) -> TrafficPolicyModel {
        let service_id = super::assigned(&obj.service_id, &submitted.service_id);
        TrafficPolicyModel {
            id: service_id.clone(),
            service_id,
            ..submitted.clone()
        }
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Load-balancing policy of a CDN service. Destroying it restores round robin.")
        .attribute(
            AttributeBuilder::string("id")
                .description("Same as service_id")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("service_id")
                .description("Service the policy applies to")
                .required()
                .requires_replace()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("mode")
                .description("Balancing mode: round_robin, failover or least_latency")
                .required()
                .validator(OneOfValidator::new(MODES))
                .build(),
        )
        .attribute(
            AttributeBuilder::string("primary_origin_id")
                .description("Origin that receives traffic while healthy; failover only")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::bool("sticky_sessions")
                .description("Pin clients to the origin that served them first")
                .optional()
                .build(),
        )
        .build()
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};
    use std::sync::Arc;
    use tfadapter::{LifecycleCoordinator, LifecycleError, MutationSerializer, Phase, ReadOutcome};

    fn model() -> TrafficPolicyModel {
        TrafficPolicyModel {
            id: "svc-1".to_string(),
            service_id: "svc-1".to_string(),
            mode: "failover".to_string(),
            primary_origin_id: Some("o-1".to_string()),
            sticky_sessions: Some(true),
        }
    }

    fn coordinator() -> LifecycleCoordinator {
        LifecycleCoordinator::new(Arc::new(MutationSerializer::new()))
    }

    #[test]
    fn model_survives_wire_round_trip() {
        let adapter = TrafficPolicyAdapter::new(create_test_client("http://localhost"));
        let obj = adapter.resource_to_obj(&model()).unwrap();
        assert_eq!(adapter.obj_to_resource(obj).unwrap(), model());
    }

    #[test]
    fn round_robin_policy_survives_wire_round_trip() {
        let adapter = TrafficPolicyAdapter::new(create_test_client("http://localhost"));
        for mode in ["round_robin", "least_latency"] {
            let model = TrafficPolicyModel {
                mode: mode.to_string(),
                primary_origin_id: None,
                sticky_sessions: None,
                ..model()
            };

            let obj = adapter.resource_to_obj(&model).unwrap();
            assert_eq!(adapter.obj_to_resource(obj).unwrap(), model);
        }
    }

    #[test]
    fn failover_requires_primary_origin() {
        let adapter = TrafficPolicyAdapter::new(create_test_client("http://localhost"));
        let mut model = model();
        model.primary_origin_id = None;

        let err = adapter.resource_to_obj(&model).unwrap_err();
        assert_eq!(err.attribute.as_deref(), Some("primary_origin_id"));

        model.mode = "round_robin".to_string();
        assert!(adapter.resource_to_obj(&model).is_ok());
    }

    #[test]
    fn unknown_mode_is_rejected_in_both_directions() {
        let adapter = TrafficPolicyAdapter::new(create_test_client("http://localhost"));
        let mut model = model();
        model.mode = "geo".to_string();
        model.primary_origin_id = None;
        assert_eq!(
            adapter.resource_to_obj(&model).unwrap_err().attribute.as_deref(),
            Some("mode")
        );

        let obj = TrafficPolicy {
            service_id: "svc-1".to_string(),
            mode: "geo".to_string(),
            primary_origin_id: None,
            sticky_sessions: None,
        };
        assert_eq!(
            adapter.obj_to_resource(obj).unwrap_err().attribute.as_deref(),
            Some("mode")
        );
    }

    #[tokio::test]
    async fn create_writes_with_put() {
        let mut server = Server::new_async().await;
        let post = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/v1/services/svc-1/traffic-policy")
            .match_body(Matcher::PartialJson(
                serde_json::json!({"mode": "failover", "primary_origin_id": "o-1"}),
            ))
            .with_body(r#"{"data":{"mode":"failover","primary_origin_id":"o-1","sticky_sessions":true}}"#)
            .expect(1)
            .create_async()
            .await;

        let adapter = TrafficPolicyAdapter::new(create_test_client(&server.url()));
        let mut planned = model();
        planned.id = String::new();

        let created = coordinator().create(&adapter, &planned).await.unwrap();

        assert_eq!(created, model());
        put.assert_async().await;
        post.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_mode_in_response_is_unreconciled() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/v1/services/svc-1/traffic-policy")
            .with_body(r#"{"data":{"mode":"geo"}}"#)
            .create_async()
            .await;

        let adapter = TrafficPolicyAdapter::new(create_test_client(&server.url()));
        let err = coordinator().create(&adapter, &model()).await.unwrap_err();

        match err {
            LifecycleError::Unreconciled { phase, source, .. } => {
                assert_eq!(phase, Phase::Create);
                assert!(source.message.contains("geo"));
            }
            other => panic!("expected Unreconciled, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_mode_on_read_is_stale() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/services/svc-1/traffic-policy")
            .with_body(r#"{"data":{"mode":"geo"}}"#)
            .create_async()
            .await;

        let adapter = TrafficPolicyAdapter::new(create_test_client(&server.url()));
        let outcome = coordinator().read(&adapter, &model()).await.unwrap();

        assert!(matches!(outcome, ReadOutcome::Stale { .. }));
    }

    #[tokio::test]
    async fn destroy_resets_policy() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/v1/services/svc-1/traffic-policy")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let adapter = TrafficPolicyAdapter::new(create_test_client(&server.url()));
        coordinator().delete(&adapter, &model()).await.unwrap();

        mock.assert_async().await;
    }
}
