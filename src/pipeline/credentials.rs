//! Registry credentials
//!
//! Credentials are scoped to a single run and injected from outside (CLI or
//! environment); they are never part of the pipeline configuration file.
//! The secret token must not leak through `Debug`, logs, or serialization.

use super::errors::ValidationError;
use super::types::Validate;
use std::fmt;

/// An opaque secret token
///
/// Wraps the raw value so that formatting it anywhere prints a redaction
/// marker. The raw bytes are only reachable through [`Secret::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a raw secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw value for handing to the registry login
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

/// Credentials for one registry, scoped to one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Registry host to authenticate against
    pub registry: String,

    /// User name
    pub username: String,

    /// Opaque token
    pub secret: Secret,
}

impl Credentials {
    /// Creates credentials for a registry
    pub fn new(
        registry: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            registry: registry.into(),
            username: username.into(),
            secret: Secret::new(secret),
        }
    }
}

impl Validate for Credentials {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.registry.is_empty() {
            return Err(ValidationError::MissingCredential {
                field: "registry".to_string(),
            });
        }
        if self.username.is_empty() {
            return Err(ValidationError::MissingCredential {
                field: "username".to_string(),
            });
        }
        if self.secret.is_empty() {
            return Err(ValidationError::MissingCredential {
                field: "secret".to_string(),
            });
        }
        Ok(())
    }
}
