//! Ordered, deduplicated tag set with an immutable derived first tag

use serde::Serialize;

use super::market_app::{AppMode, MarketApp};
use crate::error::{CoreError, CoreResult};

/// Tags being edited.
///
/// Invariants: `tags[0]` is the mode-derived tag and never changes; no two tags
/// share the same trimmed value; no tag is blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    /// Only the derived tag (publishing a new entry)
    #[must_use]
    pub fn new(mode: AppMode) -> Self {
        Self {
            tags: vec![mode.derived_tag()],
        }
    }

    /// Derived tag plus the entry's stored tags; the stored first tag is regenerated
    #[must_use]
    pub fn for_app(app: &MarketApp) -> Self {
        let mut set = Self::new(app.mode);
        for tag in app.tags.iter().skip(1) {
            set.add(tag);
        }
        set
    }

    /// Append a tag.
    ///
    /// Returns `false` (no-op) for blank input or a value already present.
    pub fn add(&mut self, text: &str) -> bool {
        let tag = text.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove a user tag.
    ///
    /// Returns `Ok(false)` when the tag is not present; the derived tag is rejected.
    pub fn remove(&mut self, text: &str) -> CoreResult<bool> {
        let tag = text.trim();
        if tag == self.derived() {
            return Err(CoreError::ValidationError(format!(
                "The mode tag '{tag}' cannot be removed"
            )));
        }
        match self.tags.iter().skip(1).position(|t| t == tag) {
            Some(pos) => {
                self.tags.remove(pos + 1);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        let tag = text.trim();
        self.tags.iter().any(|t| t == tag)
    }

    /// The derived (first) tag
    #[must_use]
    pub fn derived(&self) -> &str {
        &self.tags[0]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.tags.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Never true; the derived tag is always present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
