//! Lifecycle coordinator
//!
//! Drives create/read/update/delete/import for any [`EntityAdapter`]:
//! model→wire conversion, the remote call under the [`MutationSerializer`],
//! error interpretation (drift vs failure) and wire→model conversion.
//!
//! Every call is independent and stateless. There is no retry anywhere in
//! here: each remote failure is reported once, with the phase that failed.
//! Conversions run outside the lock.

use crate::adapter::{CreateMode, DeclarativeModel, EntityAdapter};
use crate::error::{ConversionError, LifecycleError, Phase, RemoteError, Result};
use crate::identity::EntityIdentity;
use crate::serializer::MutationSerializer;
use crate::types::DynamicValue;
use std::sync::Arc;

/// Whether remote reads take the mutation lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Reads run concurrently with each other and with mutations
    #[default]
    Concurrent,
    /// Reads are ordered with mutations, for clients that are not safe under
    /// concurrent read+write
    Serialized,
}

/// Result of a read
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<M> {
    /// The entity exists; this is its observed state
    Found(M),
    /// The entity is gone (drift); drop it from tracked state
    Absent,
    /// The entity exists but its remote object could not be converted; the
    /// prior model is handed back unchanged
    Stale { prior: M, reason: ConversionError },
}

/// Generic sequencing of lifecycle operations
#[derive(Clone)]
pub struct LifecycleCoordinator {
    serializer: Arc<MutationSerializer>,
    read_policy: ReadPolicy,
}

impl LifecycleCoordinator {
    pub fn new(serializer: Arc<MutationSerializer>) -> Self {
        Self {
            serializer,
            read_policy: ReadPolicy::default(),
        }
    }

    pub fn with_read_policy(mut self, read_policy: ReadPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }

    pub fn serializer(&self) -> &Arc<MutationSerializer> {
        &self.serializer
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    /// Create the entity a model describes and return its observed state
    pub async fn create<A: EntityAdapter>(&self, adapter: &A, model: &A::Model) -> Result<A::Model> {
        let kind = adapter.type_name();
        let obj = adapter
            .resource_to_obj(model)
            .map_err(|source| conversion(Phase::Create, kind, source))?;
        let identity = adapter.get_id(model);

        tracing::debug!("Creating {} ({:?} mode)", kind, adapter.create_mode());
        let created = match adapter.create_mode() {
            CreateMode::Create => self.serializer.run(|| adapter.create(obj)).await,
            CreateMode::Update => self.serializer.run(|| adapter.update(obj)).await,
        }
        .map_err(|source| remote(Phase::Create, kind, &identity, source))?;

        reconcile(adapter, Phase::Create, model, created)
    }

    /// Observe the current remote state of the entity a model describes
    pub async fn read<A: EntityAdapter>(
        &self,
        adapter: &A,
        model: &A::Model,
    ) -> Result<ReadOutcome<A::Model>> {
        let kind = adapter.type_name();
        let identity = adapter.get_id(model);

        if identity.is_incomplete() {
            tracing::warn!("{} has no usable identity ('{}'), treating as gone", kind, identity);
            return Ok(ReadOutcome::Absent);
        }

        tracing::debug!("Reading {} '{}'", kind, identity);
        let result = match self.read_policy {
            ReadPolicy::Concurrent => adapter.read(&identity).await,
            ReadPolicy::Serialized => self.serializer.run(|| adapter.read(&identity)).await,
        };

        let obj = match result {
            Ok(obj) => obj,
            Err(RemoteError::NotFound(message)) => {
                tracing::warn!("{} '{}' no longer exists: {}", kind, identity, message);
                return Ok(ReadOutcome::Absent);
            }
            Err(source) => return Err(remote(Phase::Read, kind, &identity, source)),
        };

        match adapter.obj_to_resource(obj) {
            Ok(mut observed) => {
                observed.merge_secrets(model);
                Ok(ReadOutcome::Found(observed))
            }
            Err(reason) => {
                tracing::warn!(
                    "Could not convert {} '{}', keeping prior state: {}",
                    kind,
                    identity,
                    reason
                );
                Ok(ReadOutcome::Stale {
                    prior: model.clone(),
                    reason,
                })
            }
        }
    }

    /// Apply a model to an existing entity and return its observed state
    pub async fn update<A: EntityAdapter>(&self, adapter: &A, model: &A::Model) -> Result<A::Model> {
        let kind = adapter.type_name();
        if !adapter.supports_update() {
            return Err(LifecycleError::UpdateUnsupported {
                kind: kind.to_string(),
            });
        }

        let obj = adapter
            .resource_to_obj(model)
            .map_err(|source| conversion(Phase::Update, kind, source))?;
        let identity = adapter.get_id(model);

        tracing::debug!("Updating {} '{}'", kind, identity);
        let updated = self
            .serializer
            .run(|| adapter.update(obj))
            .await
            .map_err(|source| remote(Phase::Update, kind, &identity, source))?;

        reconcile(adapter, Phase::Update, model, updated)
    }

    /// Delete the entity a model describes
    ///
    /// A NotFound from the remote client is reported like any other failure.
    pub async fn delete<A: EntityAdapter>(&self, adapter: &A, model: &A::Model) -> Result<()> {
        let kind = adapter.type_name();
        let identity = adapter.get_id(model);
        if identity.is_incomplete() {
            return Err(LifecycleError::MissingIdentity {
                phase: Phase::Delete,
                kind: kind.to_string(),
            });
        }

        tracing::debug!("Deleting {} '{}'", kind, identity);
        self.serializer
            .run(|| adapter.delete(&identity))
            .await
            .map_err(|source| remote(Phase::Delete, kind, &identity, source))
    }

    /// Resolve an externally supplied id into the entity's full model
    pub async fn import<A: EntityAdapter>(&self, adapter: &A, raw_id: &str) -> Result<A::Model> {
        let kind = adapter.type_name();
        let identity = EntityIdentity::parse(adapter.identity_kind(), raw_id)?;
        let seed = adapter.model_from_identity(&identity);

        match self.read(adapter, &seed).await {
            Ok(ReadOutcome::Found(model)) => Ok(model),
            Ok(ReadOutcome::Absent) => Err(LifecycleError::ImportNotFound {
                kind: kind.to_string(),
                identity: identity.to_string(),
            }),
            Ok(ReadOutcome::Stale { reason, .. }) => Err(conversion(Phase::Import, kind, reason)),
            Err(LifecycleError::Remote { kind, identity, source, .. }) => Err(LifecycleError::Remote {
                phase: Phase::Import,
                kind,
                identity,
                source,
            }),
            Err(e) => Err(e),
        }
    }
}

// Wire→model after a successful mutation. Failure here leaves a live remote
// entity whose state cannot be reported; the error carries the state to record
// instead, addressed by the identity the remote assigned.
fn reconcile<A: EntityAdapter>(
    adapter: &A,
    phase: Phase,
    submitted: &A::Model,
    obj: A::Wire,
) -> Result<A::Model> {
    let adopted = adapter.adopt_identity(submitted, &obj);

    match adapter.obj_to_resource(obj) {
        Ok(mut observed) => {
            observed.merge_secrets(submitted);
            Ok(observed)
        }
        Err(source) => {
            let identity = adapter.get_id(&adopted);
            tracing::error!(
                "{} of {} '{}' succeeded but the response could not be converted: {}",
                phase,
                adapter.type_name(),
                identity,
                source
            );
            Err(LifecycleError::Unreconciled {
                phase,
                kind: adapter.type_name().to_string(),
                identity: identity_label(&identity),
                state: DynamicValue::from_model(&adopted).ok(),
                source,
            })
        }
    }
}

fn conversion(phase: Phase, kind: &str, source: ConversionError) -> LifecycleError {
    LifecycleError::Conversion {
        phase,
        kind: kind.to_string(),
        source,
    }
}

fn remote(phase: Phase, kind: &str, identity: &EntityIdentity, source: RemoteError) -> LifecycleError {
    LifecycleError::Remote {
        phase,
        kind: kind.to_string(),
        identity: identity_label(identity),
        source,
    }
}

fn identity_label(identity: &EntityIdentity) -> String {
    if identity.is_incomplete() {
        format!("{} (pending)", identity)
    } else {
        identity.to_string()
    }
}
