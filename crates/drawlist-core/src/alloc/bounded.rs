use std::ops::{Deref, DerefMut};

/// A vector that never grows past the capacity it was created with.
///
/// Storage is reserved up front and reused after [`BoundedVec::clear`], so a
/// table that is refilled every frame does not allocate in steady state.
#[derive(Debug, Clone)]
pub struct BoundedVec<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BoundedVec<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, returning its index.
    ///
    /// When the vector is full the value is handed back in `Err`.
    pub fn try_push(&mut self, value: T) -> Result<usize, T> {
        if self.is_full() {
            return Err(value);
        }
        self.items.push(value);
        Ok(self.items.len() - 1)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T> Deref for BoundedVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for BoundedVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<'a, T> IntoIterator for &'a BoundedVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
