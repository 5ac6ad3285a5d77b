//! Entity adapter contract
//!
//! Each managed entity kind implements [`EntityAdapter`] once. The adapter
//! knows three things only: how to address an entity, how to translate
//! between the declarative model and the remote API's object, and which
//! remote call backs each lifecycle operation. Sequencing, locking and error
//! interpretation live in [`crate::coordinator::LifecycleCoordinator`].
//!
//! Adapters hold no business logic and no state beyond the remote client.

use crate::error::{ConversionError, RemoteError};
use crate::identity::{EntityIdentity, IdentityKind};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Schema-shaped desired/observed state of one managed entity
///
/// Models are decoded from and encoded into engine values with serde.
pub trait DeclarativeModel: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Copy write-only values from `prior` into `self` where `self` has none
    ///
    /// Implement this for every model that carries a
    /// [`crate::secret::SecretField`]; the default does nothing.
    fn merge_secrets(&mut self, _prior: &Self) {}
}

/// Which remote call backs the create operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// The entity is created with the remote create call
    Create,
    /// The entity always exists remotely (e.g. per-parent settings) and is
    /// "created" by writing it with the remote update call
    Update,
}

/// Per-entity-kind translation and remote-call capability set
#[async_trait]
pub trait EntityAdapter: Send + Sync {
    type Model: DeclarativeModel;
    type Wire: Send + Sync;

    /// Resource type name, e.g. "cdn_origin"
    fn type_name(&self) -> &'static str;

    fn identity_kind(&self) -> IdentityKind {
        IdentityKind::Bare
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::Create
    }

    /// Entities that return false are create/read/delete only
    fn supports_update(&self) -> bool {
        true
    }

    async fn create(&self, obj: Self::Wire) -> Result<Self::Wire, RemoteError>;

    async fn read(&self, identity: &EntityIdentity) -> Result<Self::Wire, RemoteError>;

    async fn update(&self, obj: Self::Wire) -> Result<Self::Wire, RemoteError> {
        let _ = obj;
        Err(RemoteError::Other(format!(
            "{} does not support in-place update",
            self.type_name()
        )))
    }

    async fn delete(&self, identity: &EntityIdentity) -> Result<(), RemoteError>;

    /// Derive the identity of the entity a model describes. Pure, never fails;
    /// an id that is not yet known yields an incomplete identity.
    fn get_id(&self, model: &Self::Model) -> EntityIdentity;

    /// Build the remote object for a model
    fn resource_to_obj(&self, model: &Self::Model) -> Result<Self::Wire, ConversionError>;

    /// Build the model for a remote object
    fn obj_to_resource(&self, obj: Self::Wire) -> Result<Self::Model, ConversionError>;

    /// Seed model for import: identity attributes set, everything else empty
    fn model_from_identity(&self, identity: &EntityIdentity) -> Self::Model;

    /// The submitted model carrying the identity the remote assigned in `obj`
    ///
    /// Used when a mutation succeeded but `obj` could not be converted: this
    /// is what gets recorded so the live entity can still be addressed.
    fn adopt_identity(&self, submitted: &Self::Model, obj: &Self::Wire) -> Self::Model;
}
