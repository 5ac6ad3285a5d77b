//! Error types for tfadapter
//!
//! Three layers of failure show up during a lifecycle call: the remote client
//! ([`RemoteError`]), model/wire translation ([`ConversionError`]) and the
//! coordinator itself ([`LifecycleError`]), which wraps the other two with the
//! phase that failed.

use crate::types::DynamicValue;
use std::fmt;

/// Lifecycle phase a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Create => "create",
            Phase::Read => "read",
            Phase::Update => "update",
            Phase::Delete => "delete",
            Phase::Import => "import",
        };
        f.write_str(name)
    }
}

/// Error returned by a remote client operation
///
/// Remote clients MUST classify failures here instead of leaving callers to
/// inspect error text. `NotFound` is the only variant the coordinator
/// interprets (as drift on read).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("{0}")]
    Other(String),
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }
}

/// Model/wire translation failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ConversionError {
    pub attribute: Option<String>,
    pub message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            attribute: None,
            message: message.into(),
        }
    }

    /// Conversion failure tied to a single attribute
    pub fn attribute(attribute: &str, message: impl Into<String>) -> Self {
        Self {
            attribute: Some(attribute.to_string()),
            message: format!("{}: {}", attribute, message.into()),
        }
    }

    /// Unrecognised enum tag in either direction
    pub fn unknown_variant(attribute: &str, value: &str, expected: &[&str]) -> Self {
        Self::attribute(
            attribute,
            format!("unrecognised value '{}', expected one of {:?}", value, expected),
        )
    }
}

/// Error type for lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("{phase} failed: could not convert {kind} model: {source}")]
    Conversion {
        phase: Phase,
        kind: String,
        #[source]
        source: ConversionError,
    },

    #[error("{phase} failed: remote error for {kind} '{identity}': {source}")]
    Remote {
        phase: Phase,
        kind: String,
        identity: String,
        #[source]
        source: RemoteError,
    },

    #[error("{phase} succeeded remotely but {kind} '{identity}' could not be converted back: {source}")]
    Unreconciled {
        phase: Phase,
        kind: String,
        identity: String,
        /// State to record for the live entity: the submitted model with
        /// the identity the remote assigned
        state: Option<DynamicValue>,
        #[source]
        source: ConversionError,
    },

    #[error("invalid identity '{input}': expected {expected}")]
    IdentityFormat { input: String, expected: String },

    #[error("{kind} does not support in-place update")]
    UpdateUnsupported { kind: String },

    #[error("{phase} failed: {kind} has no identity in state")]
    MissingIdentity { phase: Phase, kind: String },

    #[error("cannot import {kind} '{identity}': it does not exist")]
    ImportNotFound { kind: String, identity: String },

    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Provider not configured")]
    ProviderNotConfigured,

    #[error("Unknown resource type: {0}")]
    UnknownResource(String),
}

impl LifecycleError {
    /// Phase the failure belongs to, when it is tied to one
    pub fn phase(&self) -> Option<Phase> {
        match self {
            LifecycleError::Conversion { phase, .. }
            | LifecycleError::Remote { phase, .. }
            | LifecycleError::Unreconciled { phase, .. }
            | LifecycleError::MissingIdentity { phase, .. } => Some(*phase),
            LifecycleError::UpdateUnsupported { .. } => Some(Phase::Update),
            LifecycleError::ImportNotFound { .. } => Some(Phase::Import),
            _ => None,
        }
    }
}

/// Result type alias for tfadapter operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
