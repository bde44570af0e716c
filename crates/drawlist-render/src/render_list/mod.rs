//! Render-list scheduling.
//!
//! Producers allocate [`RenderListEntry`]s from the per-frame arena, fill them
//! in and submit them. At draw time the engine partitions the submitted
//! entries by material tag list, culls them through the producers' visibility
//! hooks, builds sort keys, sorts, and hands maximal batches back to the
//! producers through [`RenderListDispatch::dispatch`].

pub mod arena;
pub mod dispatch;
pub mod range;
pub mod sort;
pub mod visibility;

pub use arena::{RenderListArena, RenderListSpan};
pub use dispatch::DispatchRegistry;
pub use range::{Range, RangePartitioner};
pub use sort::{DEPTH_RANGE, SortValue};
pub use visibility::{FrustumMemo, VisibilityCache};

use drawlist_core::math::{Frustum, Vec3};

use crate::error::RenderResult;
use crate::render_object::{RenderObject, RenderObjectList};
use crate::tags::TagListKey;

/// Mask applied to [`RenderListEntry::batch_key`].
pub const BATCH_KEY_MASK: u32 = 0x00ff_ffff;

/// Largest usable [`RenderListEntry::minor_order`].
pub const MAX_MINOR_ORDER: u8 = 15;

/// Coarse ordering band. Bands never interleave after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum MajorOrder {
    BeforeWorld = 0,
    /// Ordered by depth instead of the explicit `order`.
    #[default]
    World = 1,
    AfterWorld = 2,
}

/// Visibility of an entry against the current frustum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Unknown,
    None,
    Full,
}

/// Handle of a dispatch registered for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchHandle(pub u8);

impl DispatchHandle {
    /// Returned when the registry is full. Entries carrying it are never dispatched.
    pub const INVALID: DispatchHandle = DispatchHandle(u8::MAX);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for DispatchHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// One unit of deferred draw work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderListEntry {
    pub world_position: Vec3,
    /// Producer-defined back reference, e.g. a component index.
    pub user_data: u64,
    /// Sort key for non-world entries.
    pub order: u32,
    /// Grouping value, only the low 24 bits are used.
    pub batch_key: u32,
    pub tag_list_key: TagListKey,
    /// Secondary order within a batch key, `0..=15`.
    pub minor_order: u8,
    pub major_order: MajorOrder,
    pub dispatch: DispatchHandle,
    pub visibility: Visibility,
}

impl Default for RenderListEntry {
    fn default() -> Self {
        Self {
            world_position: Vec3::ZERO,
            user_data: 0,
            order: 0,
            batch_key: 0,
            tag_list_key: TagListKey::default(),
            minor_order: 0,
            major_order: MajorOrder::World,
            dispatch: DispatchHandle::INVALID,
            visibility: Visibility::Unknown,
        }
    }
}

/// Stage of the dispatch cycle a callback is invoked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOperation {
    /// Sent to every registered dispatch before any batch.
    Begin,
    /// One maximal run of sorted entries.
    Batch,
    /// Sent to every registered dispatch after all batches.
    End,
}

/// Arguments of [`RenderListDispatch::dispatch`].
pub struct DispatchParams<'a> {
    pub operation: DispatchOperation,
    /// The whole entry arena.
    pub entries: &'a [RenderListEntry],
    /// Arena indices of the batch, in sorted order. Empty for `Begin` and `End`.
    pub indices: &'a [u32],
    pub render_objects: &'a mut RenderObjectList,
}

impl DispatchParams<'_> {
    /// Entries of the batch in sorted order.
    pub fn batch(&self) -> impl Iterator<Item = &RenderListEntry> + '_ {
        self.indices
            .iter()
            .map(move |&index| &self.entries[index as usize])
    }

    /// Queue a render object for the draw executor.
    pub fn add_to_render(&mut self, object: RenderObject) -> RenderResult<()> {
        self.render_objects.push(object)
    }
}

/// Arguments of [`RenderListDispatch::visibility`].
pub struct VisibilityParams<'a> {
    pub frustum: &'a Frustum,
    /// A contiguous run of arena entries sharing this dispatch.
    pub entries: &'a mut [RenderListEntry],
}

/// A producer kind that turns batches of entries into draw work.
///
/// Handlers must not allocate or submit render-list entries while they are
/// being called.
pub trait RenderListDispatch {
    fn dispatch(&mut self, params: &mut DispatchParams<'_>);

    /// Whether [`RenderListDispatch::visibility`] decides entry visibility.
    /// When `false` the entries are treated as fully visible.
    fn has_visibility(&self) -> bool {
        false
    }

    /// Set `visibility` on each entry of the run.
    fn visibility(&mut self, _params: &mut VisibilityParams<'_>) {}
}
