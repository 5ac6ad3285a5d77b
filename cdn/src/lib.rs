pub mod api;
pub mod config;
pub mod provider_data;
pub mod resources;

use async_trait::async_trait;
use config::ProviderConfig;
use provider_data::CdnProviderData;
use std::collections::HashMap;
use tfadapter::{
    AttributeBuilder, ConfigureProviderRequest, ConfigureProviderResponse, Diagnostics,
    LifecycleError, Provider, Resource, Schema, SchemaBuilder,
};

pub struct CdnProvider {
    data: Option<CdnProviderData>,
}

impl Default for CdnProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CdnProvider {
    pub fn new() -> Self {
        Self { data: None }
    }

    pub fn is_configured(&self) -> bool {
        self.data.is_some()
    }

    fn connect(&mut self, config: &ProviderConfig, diagnostics: &mut Diagnostics) {
        match api::Client::with_config(
            &config.endpoint,
            &config.api_token,
            config.insecure,
            config.retry_config(),
        ) {
            Ok(client) => {
                tracing::info!("Configured CDN provider for {}", client.base_url());
                self.data = Some(CdnProviderData::new(client, config));
            }
            Err(e) => {
                diagnostics.add_error(format!("Failed to create API client: {}", e), None::<String>);
            }
        }
    }
}

#[async_trait]
impl Provider for CdnProvider {
    fn type_name(&self) -> &str {
        "cdn"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages services, domains, origins and certificates on a CDN")
            .attribute(
                AttributeBuilder::string("endpoint")
                    .description("Base URL of the CDN management API (CDN_ENDPOINT)")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("api_token")
                    .description("Bearer token for the management API (CDN_API_TOKEN)")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("insecure")
                    .description("Skip TLS certificate verification")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("timeout_seconds")
                    .description("Per-request timeout, 30 by default")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("max_retries")
                    .description("Retries for failed reads, 3 by default")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("serialize_reads")
                    .description("Run reads one at a time alongside mutations")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("log_level")
                    .description("Install a log subscriber at this level: error, warn, info, debug or trace (CDN_LOG)")
                    .optional()
                    .build(),
            )
            .build()
    }

    async fn configure(&mut self, request: ConfigureProviderRequest) -> ConfigureProviderResponse {
        let mut diagnostics = Diagnostics::new();

        match ProviderConfig::resolve(&request.config) {
            Ok(config) => {
                if let Some(level) = config.log_level {
                    if !tfadapter::logging::init(level) {
                        tracing::debug!("Log subscriber already installed, keeping it");
                    }
                }
                self.connect(&config, &mut diagnostics);
            }
            Err(config_diags) => diagnostics.extend(config_diags),
        }

        ConfigureProviderResponse { diagnostics }
    }

    async fn create_resource(&self, name: &str) -> tfadapter::Result<Box<dyn Resource>> {
        let data = self
            .data
            .as_ref()
            .ok_or(LifecycleError::ProviderNotConfigured)?;

        resources::build(name, data).ok_or_else(|| LifecycleError::UnknownResource(name.to_string()))
    }

    async fn resource_schemas(&self) -> HashMap<String, Schema> {
        static SCHEMAS: std::sync::OnceLock<HashMap<String, Schema>> = std::sync::OnceLock::new();

        SCHEMAS.get_or_init(resources::schemas).clone()
    }
}
