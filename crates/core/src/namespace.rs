//! Owner/slug reference to a hosted project.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::named::Named;

/// Identifies a project by the user or organization that owns it and its slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectNamespace {
    pub owner: String,
    pub slug: String,
}

impl ProjectNamespace {
    pub fn new(owner: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            slug: slug.into(),
        }
    }

    /// Build a namespace from two nullable columns. Both must be set.
    pub fn from_parts(owner: Option<String>, slug: Option<String>) -> Option<Self> {
        match (owner, slug) {
            (Some(owner), Some(slug)) => Some(Self { owner, slug }),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.slug)
    }
}

impl Named for ProjectNamespace {
    fn name(&self) -> Option<&str> {
        Some(&self.slug)
    }
}
