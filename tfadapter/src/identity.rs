//! Entity identities
//!
//! An entity is addressed either by a bare id or, when it lives under a
//! parent (a domain under a service), by the pair. Import ids for scoped
//! entities use the form `parent,entity`.

use crate::error::{LifecycleError, Result};
use std::fmt;

/// Delimiter between parent and entity in a composite import id
pub const COMPOSITE_DELIMITER: char = ',';

/// Key addressing one remote entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityIdentity {
    Id(String),
    Scoped { parent: String, entity: String },
}

/// Shape of the identity an entity kind uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    Bare,
    Composite,
}

impl EntityIdentity {
    pub fn id(id: impl Into<String>) -> Self {
        EntityIdentity::Id(id.into())
    }

    pub fn scoped(parent: impl Into<String>, entity: impl Into<String>) -> Self {
        EntityIdentity::Scoped {
            parent: parent.into(),
            entity: entity.into(),
        }
    }

    /// Parse an externally supplied id into the shape `kind` requires
    pub fn parse(kind: IdentityKind, raw: &str) -> Result<Self> {
        match kind {
            IdentityKind::Bare => {
                if raw.is_empty() {
                    return Err(LifecycleError::IdentityFormat {
                        input: raw.to_string(),
                        expected: "a non-empty id".to_string(),
                    });
                }
                Ok(EntityIdentity::Id(raw.to_string()))
            }
            IdentityKind::Composite => Self::parse_composite(raw),
        }
    }

    /// Split `parent,entity` into exactly two non-empty parts
    pub fn parse_composite(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split(COMPOSITE_DELIMITER).collect();
        match parts.as_slice() {
            [parent, entity] if !parent.is_empty() && !entity.is_empty() => {
                Ok(EntityIdentity::scoped(*parent, *entity))
            }
            _ => Err(LifecycleError::IdentityFormat {
                input: raw.to_string(),
                expected: format!(
                    "<parent_id>{}<entity_id> with both parts non-empty",
                    COMPOSITE_DELIMITER
                ),
            }),
        }
    }

    /// Id of the entity itself, without its parent
    pub fn entity_id(&self) -> &str {
        match self {
            EntityIdentity::Id(id) => id,
            EntityIdentity::Scoped { entity, .. } => entity,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            EntityIdentity::Id(_) => None,
            EntityIdentity::Scoped { parent, .. } => Some(parent),
        }
    }

    /// True when any part is empty, e.g. an id not yet assigned by the API
    pub fn is_incomplete(&self) -> bool {
        match self {
            EntityIdentity::Id(id) => id.is_empty(),
            EntityIdentity::Scoped { parent, entity } => parent.is_empty() || entity.is_empty(),
        }
    }
}

impl fmt::Display for EntityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityIdentity::Id(id) => f.write_str(id),
            EntityIdentity::Scoped { parent, entity } => {
                write!(f, "{}{}{}", parent, COMPOSITE_DELIMITER, entity)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_id_splits_into_parent_and_entity() {
        let identity = EntityIdentity::parse_composite("abc,def").unwrap();
        assert_eq!(identity, EntityIdentity::scoped("abc", "def"));
        assert_eq!(identity.parent_id(), Some("abc"));
        assert_eq!(identity.entity_id(), "def");
        assert_eq!(identity.to_string(), "abc,def");
    }

    #[test]
    fn malformed_composite_ids_are_rejected() {
        for raw in ["abc", "abc,", ",def", "a,b,c", "", ","] {
            let err = EntityIdentity::parse_composite(raw).unwrap_err();
            match err {
                LifecycleError::IdentityFormat { input, expected } => {
                    assert_eq!(input, raw);
                    assert!(expected.contains("<parent_id>,<entity_id>"));
                }
                other => panic!("expected IdentityFormat for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn bare_ids_are_taken_verbatim() {
        let identity = EntityIdentity::parse(IdentityKind::Bare, "svc,1").unwrap();
        assert_eq!(identity, EntityIdentity::id("svc,1"));
        assert!(EntityIdentity::parse(IdentityKind::Bare, "").is_err());
    }

    #[test]
    fn incomplete_identities_are_detected() {
        assert!(EntityIdentity::id("").is_incomplete());
        assert!(EntityIdentity::scoped("svc", "").is_incomplete());
        assert!(!EntityIdentity::scoped("svc", "dom").is_incomplete());
    }
}
