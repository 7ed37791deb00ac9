#![forbid(unsafe_code)]

//! Block identifiers.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a board block.
///
/// The empty id is reserved for blocks that have not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutId(String);

impl LayoutId {
    /// Create an id from any string-like value.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The reserved "not yet assigned" id.
    #[must_use]
    pub const fn unassigned() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn is_assigned(&self) -> bool {
        !self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayoutId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for LayoutId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&LayoutId> for LayoutId {
    fn from(id: &LayoutId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for LayoutId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LayoutId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deterministic id source: `{prefix}{n}` with `n` increasing from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    prefix: String,
    next: u64,
}

impl IdGenerator {
    pub const DEFAULT_PREFIX: &'static str = "block-";

    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Produce the next id.
    pub fn next_id(&mut self) -> LayoutId {
        let id = LayoutId(format!("{}{}", self.prefix, self.next));
        self.next = self.next.wrapping_add(1);
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}
