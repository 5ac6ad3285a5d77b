//! Resource implementations

pub mod certificate;
pub mod domain;
pub mod origin;
pub mod service;
pub mod traffic_policy;

use crate::provider_data::CdnProviderData;
use std::collections::HashMap;
use tfadapter::{ManagedResource, Resource, Schema};

/// Every resource type name this provider registers
pub const RESOURCE_TYPES: &[&str] = &[
    service::TYPE_NAME,
    domain::TYPE_NAME,
    origin::TYPE_NAME,
    certificate::TYPE_NAME,
    traffic_policy::TYPE_NAME,
];

/// Build the resource registered under `name`
pub fn build(name: &str, data: &CdnProviderData) -> Option<Box<dyn Resource>> {
    let client = data.client.clone();
    let coordinator = data.coordinator.clone();

    let resource: Box<dyn Resource> = match name {
        service::TYPE_NAME => Box::new(ManagedResource::new(
            service::ServiceAdapter::new(client),
            coordinator,
            service::schema(),
        )),
        domain::TYPE_NAME => Box::new(ManagedResource::new(
            domain::DomainAdapter::new(client),
            coordinator,
            domain::schema(),
        )),
        origin::TYPE_NAME => Box::new(ManagedResource::new(
            origin::OriginAdapter::new(client),
            coordinator,
            origin::schema(),
        )),
        certificate::TYPE_NAME => Box::new(ManagedResource::new(
            certificate::CertificateAdapter::new(client),
            coordinator,
            certificate::schema(),
        )),
        traffic_policy::TYPE_NAME => Box::new(ManagedResource::new(
            traffic_policy::TrafficPolicyAdapter::new(client),
            coordinator,
            traffic_policy::schema(),
        )),
        _ => return None,
    };
    Some(resource)
}

/// Identity value the remote reported, falling back to the submitted one
fn assigned(remote: &str, submitted: &str) -> String {
    if remote.is_empty() {
        submitted.to_string()
    } else {
        remote.to_string()
    }
}

pub fn schemas() -> HashMap<String, Schema> {
    let mut schemas = HashMap::new();
    schemas.insert(service::TYPE_NAME.to_string(), service::schema());
    schemas.insert(domain::TYPE_NAME.to_string(), domain::schema());
    schemas.insert(origin::TYPE_NAME.to_string(), origin::schema());
    schemas.insert(certificate::TYPE_NAME.to_string(), certificate::schema());
    schemas.insert(traffic_policy::TYPE_NAME.to_string(), traffic_policy::schema());
    schemas
}
