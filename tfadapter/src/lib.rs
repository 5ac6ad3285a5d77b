//! tfadapter - generic resource lifecycle adapter
//!
//! Maps a declarative engine's create/read/update/delete/import calls onto
//! imperative remote APIs. Each entity kind implements [`EntityAdapter`];
//! [`LifecycleCoordinator`] sequences the calls, serializes mutations through
//! a [`MutationSerializer`], turns NotFound reads into drift and overlays
//! write-only secrets. [`ManagedResource`] exposes an adapter to the engine.

// Core modules
pub mod error;
pub mod identity;
pub mod secret;
pub mod types;

// Lifecycle
pub mod adapter;
pub mod coordinator;
pub mod serializer;

// Engine surface
pub mod provider;
pub mod resource;
pub mod schema;
pub mod validator;

pub mod logging;

// Re-exports for convenience
pub use adapter::{CreateMode, DeclarativeModel, EntityAdapter};
pub use coordinator::{LifecycleCoordinator, ReadOutcome, ReadPolicy};
pub use error::{ConversionError, LifecycleError, Phase, RemoteError, Result};
pub use identity::{EntityIdentity, IdentityKind};
pub use logging::LogLevel;
pub use provider::{ConfigureProviderRequest, ConfigureProviderResponse, Provider};
pub use resource::{ManagedResource, Resource};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use secret::SecretField;
pub use serializer::MutationSerializer;
pub use types::{AttributePath, Diagnostic, Diagnostics, Dynamic, DynamicValue};
