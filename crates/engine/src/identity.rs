//! Verified caller identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable key of an authenticated user: their normalized email address.
///
/// An `Identity` is only ever produced by signup/login or by verifying a
/// credential; the engine never mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(email: impl AsRef<str>) -> Self {
        Self(normalize_email(email.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `other` names this same identity.
    pub fn matches(&self, other: &str) -> bool {
        self.0 == normalize_email(other)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub(crate) fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}
