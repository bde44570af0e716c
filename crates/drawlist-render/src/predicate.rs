//! Tag predicates selecting which material-tagged work takes part in a draw.

use drawlist_core::hash::NameHash;

use crate::error::{RenderError, RenderResult};

/// Maximum number of tags a [`Predicate`] can hold.
pub const MAX_PREDICATE_TAGS: usize = 32;

/// An ordered, bounded set of tags.
///
/// A predicate matches a tag list when the two share at least one tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    tags: Vec<NameHash>,
}

impl Predicate {
    pub fn new() -> Self {
        Self {
            tags: Vec::with_capacity(MAX_PREDICATE_TAGS),
        }
    }

    /// Build a predicate from a list of tags, dropping any past the maximum.
    pub fn from_tags(tags: &[NameHash]) -> Self {
        let mut predicate = Self::new();
        for &tag in tags {
            if predicate.add_tag(tag).is_err() {
                break;
            }
        }
        predicate
    }

    /// Append a tag.
    ///
    /// When the predicate already holds [`MAX_PREDICATE_TAGS`] tags the new tag
    /// is dropped and `OutOfResources` is returned.
    pub fn add_tag(&mut self, tag: NameHash) -> RenderResult<()> {
        if self.tags.len() >= MAX_PREDICATE_TAGS {
            tracing::error!(
                "Predicate is full ({} tags), dropping tag {:#x}",
                MAX_PREDICATE_TAGS,
                tag
            );
            return Err(RenderError::OutOfResources {
                resource: "predicate tags",
            });
        }
        self.tags.push(tag);
        Ok(())
    }

    pub fn tags(&self) -> &[NameHash] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Whether any tag of `tags` is also in this predicate.
    pub fn matches(&self, tags: &[NameHash]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }
}

/// Whether an optional predicate accepts a tag list. A missing predicate
/// accepts everything.
#[inline]
pub(crate) fn accepts(predicate: Option<&Predicate>, tags: &[NameHash]) -> bool {
    predicate.is_none_or(|p| p.matches(tags))
}
