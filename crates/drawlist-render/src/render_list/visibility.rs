//! Memoized visibility pass.

use drawlist_core::hash::hash_bytes;
use drawlist_core::math::{Frustum, Mat4};
use drawlist_core::profiling::profile_function;

use super::{DispatchRegistry, RenderListEntry, Visibility, VisibilityParams};

/// What the last visibility pass was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrustumMemo {
    /// Nothing computed since the last reset.
    #[default]
    Unset,
    /// Every entry marked fully visible, no frustum.
    NoCulling,
    /// Culled against the frustum matrix with this hash.
    Hash(u64),
}

/// Hash of the 16 floats of a frustum matrix.
pub fn frustum_hash(matrix: &Mat4) -> u64 {
    hash_bytes(bytemuck::bytes_of(&matrix.to_cols_array()))
}

#[derive(Debug, Default)]
pub struct VisibilityCache {
    memo: FrustumMemo,
}

impl VisibilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memo(&self) -> FrustumMemo {
        self.memo
    }

    pub fn reset(&mut self) {
        self.memo = FrustumMemo::Unset;
    }

    /// Compute the visibility of every arena entry.
    ///
    /// Without a frustum matrix every entry becomes [`Visibility::Full`].
    /// With one, entries are walked in arena order in runs sharing a
    /// dispatch, and each run is handed once to its dispatch's visibility
    /// hook. Runs whose dispatch has no hook are fully visible. A matrix
    /// identical to the previous call's is not recomputed.
    ///
    /// Returns `true` when visibility was recomputed.
    pub fn cull(
        &mut self,
        entries: &mut [RenderListEntry],
        dispatches: &mut DispatchRegistry,
        frustum_matrix: Option<&Mat4>,
    ) -> bool {
        profile_function!();
        let Some(matrix) = frustum_matrix else {
            for entry in entries.iter_mut() {
                entry.visibility = Visibility::Full;
            }
            self.memo = FrustumMemo::NoCulling;
            return true;
        };

        let hash = frustum_hash(matrix);
        if self.memo == FrustumMemo::Hash(hash) {
            return false;
        }

        let frustum = Frustum::from_view_projection(matrix);
        let mut start = 0;
        while start < entries.len() {
            let handle = entries[start].dispatch;
            let end = start
                + entries[start..]
                    .iter()
                    .position(|entry| entry.dispatch != handle)
                    .unwrap_or(entries.len() - start);
            let run = &mut entries[start..end];

            match dispatches.get_mut(handle) {
                Some(dispatch) if dispatch.has_visibility() => {
                    dispatch.visibility(&mut VisibilityParams {
                        frustum: &frustum,
                        entries: run,
                    });
                }
                _ => {
                    for entry in run.iter_mut() {
                        entry.visibility = Visibility::Full;
                    }
                }
            }
            start = end;
        }

        self.memo = FrustumMemo::Hash(hash);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_list::{DispatchHandle, DispatchParams, RenderListDispatch};
    use drawlist_core::math::Vec3;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Culls entries behind the camera plane `z > 0` and counts its calls.
    struct CullPositiveZ {
        calls: Rc<Cell<usize>>,
    }

    impl RenderListDispatch for CullPositiveZ {
        fn dispatch(&mut self, _params: &mut DispatchParams<'_>) {}

        fn has_visibility(&self) -> bool {
            true
        }

        fn visibility(&mut self, params: &mut VisibilityParams<'_>) {
            self.calls.set(self.calls.get() + 1);
            for entry in params.entries.iter_mut() {
                entry.visibility = if entry.world_position.z > 0.0 {
                    Visibility::None
                } else {
                    Visibility::Full
                };
            }
        }
    }

    fn entry(dispatch: DispatchHandle, z: f32) -> RenderListEntry {
        RenderListEntry {
            dispatch,
            world_position: Vec3::new(0.0, 0.0, z),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_frustum_marks_everything_visible() {
        let mut registry = DispatchRegistry::with_capacity(1);
        let mut entries = vec![entry(DispatchHandle::INVALID, 1.0); 3];
        let mut cache = VisibilityCache::new();

        assert!(cache.cull(&mut entries, &mut registry, None));
        assert!(entries.iter().all(|e| e.visibility == Visibility::Full));
        assert_eq!(cache.memo(), FrustumMemo::NoCulling);
    }

    #[test]
    fn test_one_call_per_run_and_memoized() {
        let calls = Rc::new(Cell::new(0));
        let mut registry = DispatchRegistry::with_capacity(4);
        let culling = registry.register(Box::new(CullPositiveZ {
            calls: calls.clone(),
        }));

        let mut entries = vec![
            entry(culling, 1.0),
            entry(culling, -1.0),
            entry(DispatchHandle::INVALID, 1.0),
            entry(culling, 2.0),
        ];
        let mut cache = VisibilityCache::new();
        let matrix = Mat4::IDENTITY;

        assert!(cache.cull(&mut entries, &mut registry, Some(&matrix)));
        assert_eq!(calls.get(), 2);
        assert_eq!(
            entries.iter().map(|e| e.visibility).collect::<Vec<_>>(),
            vec![
                Visibility::None,
                Visibility::Full,
                Visibility::Full,
                Visibility::None
            ]
        );

        assert!(!cache.cull(&mut entries, &mut registry, Some(&matrix)));
        assert_eq!(calls.get(), 2);

        let moved = Mat4::from_translation(Vec3::X);
        assert!(cache.cull(&mut entries, &mut registry, Some(&moved)));
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_null_frustum_after_culling_resets_to_full() {
        let calls = Rc::new(Cell::new(0));
        let mut registry = DispatchRegistry::with_capacity(1);
        let culling = registry.register(Box::new(CullPositiveZ { calls }));
        let mut entries = vec![entry(culling, 1.0)];
        let mut cache = VisibilityCache::new();

        cache.cull(&mut entries, &mut registry, Some(&Mat4::IDENTITY));
        assert_eq!(entries[0].visibility, Visibility::None);

        cache.cull(&mut entries, &mut registry, None);
        assert_eq!(entries[0].visibility, Visibility::Full);

        // The memo no longer holds the matrix hash, so the frustum is re-evaluated
        assert!(cache.cull(&mut entries, &mut registry, Some(&Mat4::IDENTITY)));
    }
}
