//! Write-only attribute handling
//!
//! Remote APIs never echo secrets (private keys, credentials) back. A model
//! marks such attributes as [`SecretField`]; after every lifecycle call the
//! coordinator overlays the previously known value onto the converted result
//! through [`crate::adapter::DeclarativeModel::merge_secrets`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute the remote API accepts but never returns
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretField<T>(Option<T>);

impl<T> SecretField<T> {
    pub fn new(value: T) -> Self {
        Self(Some(value))
    }

    pub fn empty() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T: Clone> SecretField<T> {
    /// Re-apply the prior value when the remote response carried none
    pub fn overlay(&mut self, prior: &SecretField<T>) {
        if self.0.is_none() {
            self.0 = prior.0.clone();
        }
    }
}

impl<T> From<Option<T>> for SecretField<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for SecretField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("SecretField(<redacted>)"),
            None => f.write_str("SecretField(None)"),
        }
    }
}
