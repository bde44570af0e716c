//! Per-frame dispatch registry.

use drawlist_core::alloc::BoundedVec;

use super::{DispatchHandle, RenderListDispatch};

/// Fixed-capacity table of the dispatches registered this frame.
pub struct DispatchRegistry {
    dispatches: BoundedVec<Box<dyn RenderListDispatch>>,
}

impl DispatchRegistry {
    /// `capacity` is clamped so that no handle collides with [`DispatchHandle::INVALID`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dispatches: BoundedVec::with_capacity(capacity.min(DispatchHandle::INVALID.index())),
        }
    }

    /// Register a dispatch for the current frame.
    ///
    /// When the registry is full the dispatch is dropped, an error is logged
    /// and [`DispatchHandle::INVALID`] is returned.
    pub fn register(&mut self, dispatch: Box<dyn RenderListDispatch>) -> DispatchHandle {
        match self.dispatches.try_push(dispatch) {
            Ok(index) => DispatchHandle(index as u8),
            Err(_) => {
                tracing::error!(
                    "Dispatch registry is full ({} dispatches), dropping registration",
                    self.dispatches.capacity()
                );
                DispatchHandle::INVALID
            }
        }
    }

    pub fn get_mut(&mut self, handle: DispatchHandle) -> Option<&mut (dyn RenderListDispatch + 'static)> {
        if !handle.is_valid() {
            return None;
        }
        self.dispatches
            .get_mut(handle.index())
            .map(|dispatch| dispatch.as_mut())
    }

    /// Whether `handle` names a dispatch with a visibility hook.
    pub fn has_visibility(&self, handle: DispatchHandle) -> bool {
        handle.is_valid()
            && self
                .dispatches
                .get(handle.index())
                .is_some_and(|dispatch| dispatch.has_visibility())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn RenderListDispatch>> {
        self.dispatches.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.dispatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatches.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.dispatches.capacity()
    }

    pub fn clear(&mut self) {
        self.dispatches.clear();
    }
}
