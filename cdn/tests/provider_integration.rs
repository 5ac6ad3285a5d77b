#![allow(clippy::disallowed_methods)]

use cdn::CdnProvider;
use mockito::{Matcher, Server};
use std::collections::HashMap;
use tfadapter::resource::{
    CreateResourceRequest, DeleteResourceRequest, ImportResourceStateRequest, ModifyPlanRequest,
    ReadResourceRequest, UpdateResourceRequest,
};
use tfadapter::{
    AttributePath, ConfigureProviderRequest, Dynamic, DynamicValue, Provider, Resource,
};

fn object(values: Vec<(&str, Dynamic)>) -> DynamicValue {
    DynamicValue::new(Dynamic::Map(
        values
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<HashMap<_, _>>(),
    ))
}

fn text(s: &str) -> Dynamic {
    Dynamic::String(s.to_string())
}

async fn configured_resource(url: String, name: &str) -> Box<dyn Resource> {
    let mut provider = CdnProvider::new();
    let response = provider
        .configure(ConfigureProviderRequest {
            config: object(vec![
                ("endpoint", Dynamic::String(url)),
                ("api_token", text("secret-token")),
                ("max_retries", Dynamic::Number(1.0)),
            ]),
        })
        .await;
    assert!(!response.diagnostics.has_errors());

    provider.create_resource(name).await.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn origin_lifecycle_against_mock_api() {
    let mut server = Server::new_async().await;
    let origin_body = r#"{"data":{"id":"o-1","name":"primary","address":"origin.example.com","port":443,"use_tls":true,"weight":100,"auth_header_name":"X-Origin-Auth"}}"#;

    let create = server
        .mock("POST", "/v1/services/svc-1/origins")
        .match_header("authorization", "Bearer secret-token")
        .match_header("x-request-id", Matcher::Any)
        .match_body(Matcher::PartialJson(serde_json::json!({
            "name": "primary",
            "port": 443,
            "auth_header_value": "s3cret"
        })))
        .with_status(201)
        .with_body(origin_body)
        .expect(1)
        .create_async()
        .await;
    let read = server
        .mock("GET", "/v1/services/svc-1/origins/o-1")
        .with_body(origin_body)
        .create_async()
        .await;

    let resource = configured_resource(server.url(), "cdn_origin").await;

    let planned = object(vec![
        ("id", Dynamic::Unknown),
        ("service_id", text("svc-1")),
        ("name", text("primary")),
        ("address", text("origin.example.com")),
        ("port", Dynamic::Unknown),
        ("use_tls", Dynamic::Unknown),
        ("weight", Dynamic::Unknown),
        ("auth_header_name", text("X-Origin-Auth")),
        ("auth_header_value", text("s3cret")),
    ]);
    let created = resource
        .create(CreateResourceRequest {
            type_name: "cdn_origin".to_string(),
            planned_state: planned.clone(),
            config: planned,
        })
        .await;
    assert!(!created.diagnostics.has_errors());
    assert_eq!(
        created.new_state.get_string(&AttributePath::new("id")).unwrap(),
        "o-1"
    );
    assert_eq!(
        created.new_state.get_number(&AttributePath::new("port")).unwrap(),
        443.0
    );
    assert_eq!(
        created
            .new_state
            .get_string(&AttributePath::new("auth_header_value"))
            .unwrap(),
        "s3cret"
    );

    let refreshed = resource
        .read(ReadResourceRequest {
            type_name: "cdn_origin".to_string(),
            current_state: created.new_state.clone(),
        })
        .await;
    assert!(!refreshed.diagnostics.has_errors());
    let refreshed_state = refreshed.new_state.unwrap();
    assert_eq!(
        refreshed_state
            .get_string(&AttributePath::new("auth_header_value"))
            .unwrap(),
        "s3cret"
    );

    create.assert_async().await;
    read.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn service_update_fills_computed_from_prior_state() {
    let mut server = Server::new_async().await;
    let update = server
        .mock("PUT", "/v1/services/svc-1")
        .match_body(Matcher::PartialJson(serde_json::json!({"name": "renamed"})))
        .with_body(r#"{"data":{"id":"svc-1","name":"renamed","created_at":"2024-05-01T10:00:00Z"}}"#)
        .expect(1)
        .create_async()
        .await;

    let resource = configured_resource(server.url(), "cdn_service").await;

    let prior = object(vec![
        ("id", text("svc-1")),
        ("name", text("edge")),
        ("created_at", text("2024-05-01T10:00:00Z")),
    ]);
    let planned = object(vec![
        ("id", Dynamic::Unknown),
        ("name", text("renamed")),
        ("created_at", Dynamic::Unknown),
    ]);

    let response = resource
        .update(UpdateResourceRequest {
            type_name: "cdn_service".to_string(),
            prior_state: prior,
            planned_state: planned.clone(),
            config: planned,
        })
        .await;

    assert!(!response.diagnostics.has_errors());
    assert_eq!(
        response.new_state.get_string(&AttributePath::new("name")).unwrap(),
        "renamed"
    );
    update.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn domain_import_then_delete() {
    let mut server = Server::new_async().await;
    let get = server
        .mock("GET", "/v1/services/svc-1/domains/dom-1")
        .with_body(r#"{"data":{"id":"dom-1","hostname":"cdn.example.com","status":"pending"}}"#)
        .expect(1)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/v1/services/svc-1/domains/dom-1")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let resource = configured_resource(server.url(), "cdn_domain").await;

    let imported = resource
        .import_state(ImportResourceStateRequest {
            type_name: "cdn_domain".to_string(),
            id: "svc-1,dom-1".to_string(),
        })
        .await;
    assert!(!imported.diagnostics.has_errors());
    assert_eq!(imported.imported_resources.len(), 1);
    let state = imported.imported_resources[0].state.clone();
    assert_eq!(
        state.get_string(&AttributePath::new("service_id")).unwrap(),
        "svc-1"
    );

    let deleted = resource
        .delete(DeleteResourceRequest {
            type_name: "cdn_domain".to_string(),
            prior_state: state,
        })
        .await;
    assert!(!deleted.diagnostics.has_errors());

    get.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn domain_hostname_change_requires_replacement() {
    let mut server = Server::new_async().await;
    let any_call = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let resource = configured_resource(server.url(), "cdn_domain").await;
    let prior = object(vec![
        ("id", text("dom-1")),
        ("service_id", text("svc-1")),
        ("hostname", text("cdn.example.com")),
        ("status", text("active")),
    ]);
    let planned = object(vec![
        ("id", text("dom-1")),
        ("service_id", text("svc-1")),
        ("hostname", text("www.example.com")),
        ("status", Dynamic::Unknown),
    ]);

    let plan = resource
        .modify_plan(ModifyPlanRequest {
            type_name: "cdn_domain".to_string(),
            config: planned.clone(),
            prior_state: prior.clone(),
            proposed_new_state: planned.clone(),
        })
        .await;
    assert_eq!(plan.requires_replace, vec![AttributePath::new("hostname")]);

    let response = resource
        .update(UpdateResourceRequest {
            type_name: "cdn_domain".to_string(),
            prior_state: prior.clone(),
            planned_state: planned.clone(),
            config: planned,
        })
        .await;
    assert!(response.diagnostics.has_errors());
    assert_eq!(response.new_state, prior);
    any_call.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn traffic_policy_delete_of_missing_service_is_reported() {
    let mut server = Server::new_async().await;
    let _reset = server
        .mock("DELETE", "/v1/services/svc-9/traffic-policy")
        .with_status(404)
        .with_body(r#"{"errors":["service not found"]}"#)
        .create_async()
        .await;

    let resource = configured_resource(server.url(), "cdn_traffic_policy").await;

    let response = resource
        .delete(DeleteResourceRequest {
            type_name: "cdn_traffic_policy".to_string(),
            prior_state: object(vec![
                ("id", text("svc-9")),
                ("service_id", text("svc-9")),
                ("mode", text("round_robin")),
            ]),
        })
        .await;

    assert!(response.diagnostics.has_errors());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_each_post_once() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/v1/services")
        .with_status(201)
        .with_body(r#"{"data":{"id":"svc-1","name":"edge"}}"#)
        .expect(5)
        .create_async()
        .await;

    let resource = configured_resource(server.url(), "cdn_service").await;
    let planned = object(vec![("id", Dynamic::Unknown), ("name", text("edge"))]);

    let responses = futures::future::join_all((0..5).map(|_| {
        resource.create(CreateResourceRequest {
            type_name: "cdn_service".to_string(),
            planned_state: planned.clone(),
            config: planned.clone(),
        })
    }))
    .await;

    for response in responses {
        assert!(!response.diagnostics.has_errors());
        tokio_test::assert_ok!(response.new_state.get_string(&AttributePath::new("id")));
    }
    create.assert_async().await;
}
