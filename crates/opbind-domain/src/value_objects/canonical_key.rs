//! Canonical operation key

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Deterministic string identifying one operation across build time and run time
///
/// Produced only by [`canonicalize`](crate::canonical::canonicalize).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub(crate) fn from_canonical(value: String) -> Self {
        Self(value)
    }

    /// Borrow the key text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning its text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CanonicalKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CanonicalKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
