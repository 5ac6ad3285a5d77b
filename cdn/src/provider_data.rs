//! Provider data shared by every resource after configure

use crate::api::Client;
use crate::config::ProviderConfig;
use tfadapter::{LifecycleCoordinator, MutationSerializer};

#[derive(Clone)]
pub struct CdnProviderData {
    pub client: Client,
    pub coordinator: LifecycleCoordinator,
}

impl CdnProviderData {
    /// All coordinators share the process-wide mutation serializer
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            coordinator: LifecycleCoordinator::new(MutationSerializer::global())
                .with_read_policy(config.read_policy()),
        }
    }
}
