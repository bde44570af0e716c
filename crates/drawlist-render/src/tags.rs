//! Registry of material tag lists.
//!
//! Materials are classified by a list of tags. The list is identified by a
//! [`TagListKey`], the order-sensitive hash of its tags, which is what render
//! list entries and render objects carry.

use drawlist_core::alloc::HashMap;
use drawlist_core::hash::{NameHash, hash_names};

/// Opaque identifier of a material's tag list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TagListKey(pub u64);

#[derive(Debug, Default)]
pub struct TagListRegistry {
    lists: HashMap<TagListKey, Vec<NameHash>>,
}

impl TagListRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag list and return its key. Identical lists share a key.
    pub fn register(&mut self, tags: &[NameHash]) -> TagListKey {
        let key = TagListKey(hash_names(tags));
        self.lists.entry(key).or_insert_with(|| tags.to_vec());
        key
    }

    /// Tags behind `key`. Unknown keys have no tags.
    pub fn tags(&self, key: TagListKey) -> &[NameHash] {
        self.lists.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
