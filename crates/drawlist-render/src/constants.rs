//! Named shader constants.

use drawlist_core::alloc::HashMap;
use drawlist_core::hash::NameHash;
use drawlist_core::math::Vec4;

/// Shader constants keyed by name hash. Each constant is one or more `Vec4`s.
#[derive(Debug, Clone, Default)]
pub struct NamedConstantBuffer {
    values: HashMap<NameHash, Vec<Vec4>>,
}

impl NamedConstantBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a constant, replacing any previous value.
    pub fn set(&mut self, name: NameHash, values: &[Vec4]) {
        let slot = self.values.entry(name).or_default();
        slot.clear();
        slot.extend_from_slice(values);
    }

    pub fn get(&self, name: NameHash) -> Option<&[Vec4]> {
        self.values.get(&name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: NameHash) -> bool {
        self.values.contains_key(&name)
    }

    pub fn remove(&mut self, name: NameHash) -> Option<Vec<Vec4>> {
        self.values.remove(&name)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NameHash, &[Vec4])> {
        self.values.iter().map(|(name, values)| (*name, values.as_slice()))
    }
}
