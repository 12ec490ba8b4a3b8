//! Caller identity used for tenant isolation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// The subject of the caller's access token. Every row is scoped to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// # Errors
    ///
    /// Returns `CoreError::Unauthenticated` for a blank subject.
    pub fn parse(subject: &str) -> Result<Self, CoreError> {
        let trimmed = subject.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Unauthenticated("empty subject claim".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
