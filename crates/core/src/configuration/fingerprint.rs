//! Configuration fingerprints

use std::fmt::{Display, Formatter, Result as FmtResult};

use sha2::{Digest, Sha256};

use super::Configuration;

/// Content hash of a canonical configuration.
///
/// An absent configuration fingerprints to the empty string, which never collides with the hash
/// of any configuration, including an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprints an optional configuration.
    pub fn of(configuration: Option<&Configuration>) -> Self {
        configuration.map_or_else(Self::default, |configuration| {
            Self(format!(
                "{:x}",
                Sha256::digest(configuration.canonical_json().as_bytes())
            ))
        })
    }

    /// Hex digest, or the empty string for no configuration.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the fingerprint of an absent configuration.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
