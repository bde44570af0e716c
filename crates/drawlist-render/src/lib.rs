//! Drawlist Render
//!
//! The render-list engine: producers enqueue [`RenderListEntry`]s every frame,
//! the engine culls, sorts and batches them, hands the batches back to the
//! producers' [`RenderListDispatch`] implementations, and replays the
//! resulting [`RenderObject`]s against a [`GraphicsDevice`] with minimal state
//! changes.
//!
//! ```rust
//! use drawlist_render::{
//!     DispatchOperation, DispatchParams, MajorOrder, RenderContext, RenderListDispatch,
//! };
//!
//! struct Sprites;
//!
//! impl RenderListDispatch for Sprites {
//!     fn dispatch(&mut self, params: &mut DispatchParams<'_>) {
//!         if params.operation == DispatchOperation::Batch {
//!             // Build one render object for the whole batch here
//!         }
//!     }
//! }
//!
//! let mut context = RenderContext::default();
//! context.begin();
//! let dispatch = context.render_list_make_dispatch(Box::new(Sprites));
//! let span = context.render_list_alloc(2);
//! for entry in context.render_list_entries_mut(span) {
//!     entry.dispatch = dispatch;
//!     entry.major_order = MajorOrder::AfterWorld;
//! }
//! context.render_list_submit_span(span);
//! context.end();
//! assert_eq!(context.ranges().len(), 1);
//! ```
//!
//! [`GraphicsDevice`]: drawlist_graphics::GraphicsDevice

pub mod constants;
pub mod context;
pub mod error;
pub mod executor;
pub mod predicate;
pub mod render_list;
pub mod render_object;
pub mod tags;

pub use constants::NamedConstantBuffer;
pub use context::{RenderContext, RenderListStats};
pub use error::{RenderError, RenderResult};
pub use executor::{DrawOverrides, DrawStats};
pub use predicate::{MAX_PREDICATE_TAGS, Predicate};
pub use render_list::{
    DispatchHandle, DispatchOperation, DispatchParams, MajorOrder, Range, RenderListDispatch,
    RenderListEntry, RenderListSpan, Visibility, VisibilityParams,
};
pub use render_object::{
    IndexBinding, MAX_TEXTURE_COUNT, RenderObject, RenderObjectList, StencilTestParams,
};
pub use tags::{TagListKey, TagListRegistry};
