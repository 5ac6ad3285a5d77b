//! Provider trait: configuration and the resource registry

use crate::resource::Resource;
use crate::schema::Schema;
use crate::types::{Config, Diagnostics};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub struct ConfigureProviderRequest {
    pub config: Config,
}

pub struct ConfigureProviderResponse {
    pub diagnostics: Diagnostics,
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider type name, e.g. "cdn"
    fn type_name(&self) -> &str;

    /// Schema of the provider block itself
    fn schema(&self) -> Schema;

    /// Called once before any resource is created
    async fn configure(&mut self, request: ConfigureProviderRequest) -> ConfigureProviderResponse;

    /// Build the resource registered under `name`; fails before configure
    async fn create_resource(&self, name: &str) -> Result<Box<dyn Resource>>;

    /// Schemas of every registered resource, keyed by type name
    async fn resource_schemas(&self) -> HashMap<String, Schema>;
}
