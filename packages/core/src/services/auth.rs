//! Session capability
//!
//! Writes require a [`Session`]. Holding one is the proof of
//! authentication; the engine never compares identities itself. Sessions
//! are issued at the transport boundary, here by a [`SessionRegistry`] that
//! maps opaque bearer tokens to owners.

use std::collections::HashMap;
use thiserror::Error;

/// An authenticated identity, attached as `owner` to the records it creates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    owner: String,
}

impl Session {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid session entry '{entry}': expected token=owner")]
pub struct InvalidSessionEntry {
    pub entry: String,
}

/// Bearer token to session lookup.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `token=owner` pairs separated by commas.
    ///
    /// ```rust
    /// use numtree_core::services::SessionRegistry;
    ///
    /// let registry = SessionRegistry::from_pairs("t1=alice@example.com, t2=bob@example.com").unwrap();
    /// assert_eq!(registry.authenticate("t2").unwrap().owner(), "bob@example.com");
    /// assert!(registry.authenticate("nope").is_none());
    /// ```
    pub fn from_pairs(pairs: &str) -> Result<Self, InvalidSessionEntry> {
        let mut registry = Self::new();
        for entry in pairs.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (token, owner) = entry
                .split_once('=')
                .map(|(t, o)| (t.trim(), o.trim()))
                .filter(|(t, o)| !t.is_empty() && !o.is_empty())
                .ok_or_else(|| InvalidSessionEntry {
                    entry: entry.to_string(),
                })?;
            registry.insert(token, owner);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, token: impl Into<String>, owner: impl Into<String>) {
        self.sessions.insert(token.into(), Session::new(owner));
    }

    pub fn authenticate(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs() {
        let registry = SessionRegistry::from_pairs("abc=alice@example.com,def = bob").unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.authenticate("abc"),
            Some(Session::new("alice@example.com"))
        );
        assert_eq!(registry.authenticate("def").unwrap().owner(), "bob");
    }

    #[test]
    fn test_from_pairs_empty_and_invalid() {
        assert!(SessionRegistry::from_pairs("").unwrap().is_empty());
        assert!(SessionRegistry::from_pairs(" , ").unwrap().is_empty());

        let err = SessionRegistry::from_pairs("abc=alice,broken").unwrap_err();
        assert_eq!(err.entry, "broken");
        assert!(SessionRegistry::from_pairs("=alice").is_err());
        assert!(SessionRegistry::from_pairs("abc=").is_err());
    }
}
