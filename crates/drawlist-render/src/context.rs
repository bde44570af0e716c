//! The render context: per-frame state of the render-list engine.

use std::sync::Arc;

use drawlist_core::config::RenderConfig;
use drawlist_core::geometry::Rect;
use drawlist_core::hash::NameHash;
use drawlist_core::math::{Mat4, Vec4};
use drawlist_core::profiling::profile_function;
use drawlist_graphics::{ClearFlags, DeviceState, GraphicsDevice, MaterialHandle, TextureHandle};

use crate::constants::NamedConstantBuffer;
use crate::error::{RenderError, RenderResult};
use crate::executor::{self, DrawOverrides, DrawStats};
use crate::predicate::Predicate;
use crate::render_list::sort::RenderListSorter;
use crate::render_list::{
    DispatchHandle, DispatchRegistry, FrustumMemo, Range, RangePartitioner, RenderListArena,
    RenderListDispatch, RenderListEntry, RenderListSpan, VisibilityCache,
};
use crate::render_object::{MAX_TEXTURE_COUNT, RenderObject, RenderObjectList};
use crate::tags::{TagListKey, TagListRegistry};

/// Statistics of one [`RenderContext::draw_render_list`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderListStats {
    /// Submitted entries.
    pub entries: usize,
    pub ranges: usize,
    /// Ranges rejected by the predicate.
    pub skipped_ranges: usize,
    /// Entries that entered the sort buffer.
    pub sorted: usize,
    /// Entries left out as not visible.
    pub culled: usize,
    pub batches: usize,
    pub draw: DrawStats,
}

/// Owns every piece of per-frame render-list state.
///
/// A frame runs `begin`, then producers call `render_list_alloc` /
/// `render_list_submit` and `render_list_make_dispatch`, then `end`, then any
/// number of `draw_render_list` calls. All calls happen on the thread that
/// owns the graphics device.
///
/// A context created with [`RenderContext::new`] has no device attached. It
/// accepts submissions but draw calls fail with [`RenderError::InvalidContext`].
pub struct RenderContext {
    config: RenderConfig,
    device: Option<Arc<dyn GraphicsDevice>>,

    arena: RenderListArena,
    dispatches: DispatchRegistry,
    ranges: RangePartitioner,
    visibility: VisibilityCache,
    sorter: RenderListSorter,
    render_objects: RenderObjectList,
    tag_lists: TagListRegistry,

    view: Mat4,
    projection: Mat4,
    overrides: DrawOverrides,
}

impl RenderContext {
    pub fn new(config: RenderConfig) -> Self {
        tracing::debug!(
            "Creating render context (dispatches: {}, render objects: {})",
            config.dispatch_capacity(),
            config.max_render_objects
        );
        Self {
            arena: RenderListArena::with_capacity(config.initial_render_list_capacity),
            dispatches: DispatchRegistry::with_capacity(config.dispatch_capacity()),
            ranges: RangePartitioner::new(),
            visibility: VisibilityCache::new(),
            sorter: RenderListSorter::new(),
            render_objects: RenderObjectList::with_capacity(config.max_render_objects),
            tag_lists: TagListRegistry::new(),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            overrides: DrawOverrides::default(),
            device: None,
            config,
        }
    }

    pub fn with_device(config: RenderConfig, device: Arc<dyn GraphicsDevice>) -> Self {
        let mut context = Self::new(config);
        context.attach_device(device);
        context
    }

    pub fn attach_device(&mut self, device: Arc<dyn GraphicsDevice>) {
        self.device = Some(device);
    }

    pub fn detach_device(&mut self) -> Option<Arc<dyn GraphicsDevice>> {
        self.device.take()
    }

    pub fn device(&self) -> Option<&Arc<dyn GraphicsDevice>> {
        self.device.as_ref()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    // Frame lifecycle

    /// Start a frame, dropping all entries, dispatches, ranges and render
    /// objects of the previous one.
    pub fn begin(&mut self) {
        profile_function!();
        self.arena.reset();
        self.dispatches.clear();
        self.ranges.reset();
        self.visibility.reset();
        self.sorter.clear();
        self.render_objects.clear();
    }

    /// Finish submission for the frame and partition the submitted entries.
    pub fn end(&mut self) {
        profile_function!();
        let (entries, indices) = self.arena.split_mut();
        self.ranges.build(entries, indices);
    }

    // Submission

    /// Reserve `count` entries.
    ///
    /// The returned span is valid until the next call. Populate it through
    /// [`RenderContext::render_list_entries_mut`], then submit.
    pub fn render_list_alloc(&mut self, count: usize) -> RenderListSpan {
        self.arena.alloc(count)
    }

    pub fn render_list_entries_mut(&mut self, span: RenderListSpan) -> &mut [RenderListEntry] {
        self.arena.span_mut(span)
    }

    /// All entries in the arena, indexed by arena index.
    pub fn render_list_entries(&self) -> &[RenderListEntry] {
        self.arena.entries()
    }

    /// Commit arena entries `begin..end` from the last allocation.
    ///
    /// Any unused tail of the allocation is released. Committing entries
    /// invalidates the ranges and the visibility memo.
    pub fn render_list_submit(&mut self, begin: u32, end: u32) {
        if self.arena.submit(begin, end) > 0 {
            self.ranges.invalidate();
            self.visibility.reset();
        }
    }

    /// Convenience for submitting a whole span.
    pub fn render_list_submit_span(&mut self, span: RenderListSpan) {
        self.render_list_submit(span.begin, span.end);
    }

    /// Register a dispatch for this frame.
    ///
    /// Returns [`DispatchHandle::INVALID`] when the registry is full.
    pub fn render_list_make_dispatch(
        &mut self,
        dispatch: Box<dyn RenderListDispatch>,
    ) -> DispatchHandle {
        self.dispatches.register(dispatch)
    }

    /// Number of submitted entries.
    pub fn render_list_len(&self) -> usize {
        self.arena.submitted()
    }

    /// Current tag-list ranges, rebuilt lazily by `end` and draw calls.
    pub fn ranges(&self) -> &[Range] {
        self.ranges.ranges()
    }

    pub fn ranges_dirty(&self) -> bool {
        self.ranges.is_dirty()
    }

    pub fn frustum_memo(&self) -> FrustumMemo {
        self.visibility.memo()
    }

    // Tag lists

    pub fn register_tag_list(&mut self, tags: &[NameHash]) -> TagListKey {
        self.tag_lists.register(tags)
    }

    pub fn tag_list(&self, key: TagListKey) -> &[NameHash] {
        self.tag_lists.tags(key)
    }

    // Camera

    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
    }

    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }

    // Call-level overrides

    /// Override texture `unit` for every drawn object, or clear the override.
    pub fn set_texture(&mut self, unit: u32, texture: Option<TextureHandle>) -> RenderResult<()> {
        let Some(slot) = self.overrides.textures.get_mut(unit as usize) else {
            tracing::error!(
                "Texture unit {} out of range (max {})",
                unit,
                MAX_TEXTURE_COUNT - 1
            );
            return Err(RenderError::InvalidParameter {
                message: format!(
                    "texture unit {} must be less than {}",
                    unit, MAX_TEXTURE_COUNT
                ),
            });
        };
        *slot = texture;
        Ok(())
    }

    /// Draw every object with `material` instead of its own.
    pub fn enable_material(&mut self, material: MaterialHandle) {
        self.overrides.material = Some(material);
    }

    pub fn disable_material(&mut self) {
        self.overrides.material = None;
    }

    pub fn overrides(&self) -> &DrawOverrides {
        &self.overrides
    }

    // Render objects

    /// Queue a render object for the next [`RenderContext::draw`].
    pub fn add_to_render(&mut self, object: RenderObject) -> RenderResult<()> {
        self.render_objects.push(object)
    }

    pub fn clear_render_objects(&mut self) {
        self.render_objects.clear();
    }

    pub fn render_objects(&self) -> &[RenderObject] {
        self.render_objects.as_slice()
    }

    // Device commands

    fn attached_device(&self) -> RenderResult<&dyn GraphicsDevice> {
        self.device.as_deref().ok_or(RenderError::InvalidContext)
    }

    /// Clear the buffers selected by `flags` of the current render target.
    pub fn clear(
        &self,
        flags: ClearFlags,
        color: Vec4,
        depth: f32,
        stencil: u32,
    ) -> RenderResult<()> {
        self.attached_device()?.clear(flags, color, depth, stencil);
        Ok(())
    }

    pub fn set_viewport(&self, rect: Rect<i32>) -> RenderResult<()> {
        self.attached_device()?.set_viewport(rect);
        Ok(())
    }

    pub fn set_scissor(&self, rect: Rect<i32>) -> RenderResult<()> {
        self.attached_device()?.set_scissor(rect);
        Ok(())
    }

    /// Toggle a device state. The change becomes part of the baseline the
    /// next draw restores to.
    pub fn set_state_enabled(&self, state: DeviceState, enabled: bool) -> RenderResult<()> {
        self.attached_device()?.set_state_enabled(state, enabled);
        Ok(())
    }

    // Draw family

    /// Draw the queued render objects.
    pub fn draw(
        &mut self,
        predicate: Option<&Predicate>,
        constants: Option<&NamedConstantBuffer>,
    ) -> RenderResult<DrawStats> {
        let device = self.attached_device()?;
        Ok(executor::execute(
            device,
            self.render_objects.as_slice(),
            &self.tag_lists,
            predicate,
            constants,
            &self.overrides,
        ))
    }

    /// Cull, sort and dispatch the render list, then draw the render objects
    /// the dispatches produced.
    ///
    /// `frustum_matrix` is the view-projection matrix to cull against. `None`
    /// disables culling.
    pub fn draw_render_list(
        &mut self,
        predicate: Option<&Predicate>,
        constants: Option<&NamedConstantBuffer>,
        frustum_matrix: Option<&Mat4>,
    ) -> RenderResult<RenderListStats> {
        profile_function!();
        let Some(device) = self.device.clone() else {
            return Err(RenderError::InvalidContext);
        };

        self.render_objects.clear();

        let (entries, indices) = self.arena.split_mut();
        self.ranges.build(entries, indices);
        let skipped_ranges = self.ranges.apply_predicate(predicate, &self.tag_lists);

        self.visibility.cull(
            self.arena.entries_mut(),
            &mut self.dispatches,
            frustum_matrix,
        );

        let view_proj = self.view_proj();
        let keys = self.sorter.build_keys(
            self.arena.entries(),
            self.arena.indices(),
            self.ranges.ranges(),
            &view_proj,
        );
        self.sorter.sort();
        let batches = self.sorter.dispatch(
            self.arena.entries(),
            &mut self.dispatches,
            &mut self.render_objects,
        );

        let draw = executor::execute(
            &*device,
            self.render_objects.as_slice(),
            &self.tag_lists,
            predicate,
            constants,
            &self.overrides,
        );

        let stats = RenderListStats {
            entries: self.arena.submitted(),
            ranges: self.ranges.ranges().len(),
            skipped_ranges,
            sorted: keys.sorted,
            culled: keys.culled,
            batches,
            draw,
        };
        tracing::trace!("Render list drawn: {:?}", stats);
        Ok(stats)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}
