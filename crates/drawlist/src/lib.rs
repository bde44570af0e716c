//! Drawlist - render-list scheduling and batching
//!
//! Producers enqueue draw requests every frame; drawlist culls invisible
//! work, groups it into batches that minimize state changes, and drives a
//! graphics device through a small number of calls.
//!
//! - **Core**: logging, puffin profiling, collections, hashing, math, config
//! - **Graphics**: the `GraphicsDevice` seam and the pipeline state model
//! - **Render**: the render context, render list and draw executor
//!
//! # Quick Start
//!
//! ```rust
//! use drawlist::prelude::*;
//!
//! struct Debug;
//!
//! impl RenderListDispatch for Debug {
//!     fn dispatch(&mut self, _params: &mut DispatchParams<'_>) {}
//! }
//!
//! let config = RenderConfig::default();
//! drawlist::init(&config);
//!
//! let mut context = RenderContext::new(config);
//! drawlist::begin_frame(&mut context);
//!
//! let dispatch = context.render_list_make_dispatch(Box::new(Debug));
//! let span = context.render_list_alloc(1);
//! context.render_list_entries_mut(span)[0].dispatch = dispatch;
//! context.render_list_submit_span(span);
//! context.end();
//!
//! // No device is attached, so drawing is rejected
//! assert!(context.draw_render_list(None, None, None).is_err());
//! ```

mod setup;

pub use setup::{begin_frame, init};

// Re-export sub-crates
pub use drawlist_core as core;
pub use drawlist_core::math;
pub use drawlist_graphics as graphics;
pub use drawlist_render as render;

/// Prelude module for convenient imports
pub mod prelude {
    pub use drawlist_core::config::{ProfilingMode, RenderConfig};
    pub use drawlist_core::hash::{NameHash, hash_str};

    // Core math types
    pub use drawlist_core::math::{Frustum, Mat4, Vec3, Vec4};

    // Device types
    pub use drawlist_graphics::{
        GraphicsDevice, MaterialHandle, PipelineState, TextureHandle, VertexDeclarationHandle,
    };

    // Render types
    pub use drawlist_render::{
        DispatchHandle, DispatchOperation, DispatchParams, DrawStats, MajorOrder,
        NamedConstantBuffer, Predicate, RenderContext, RenderError, RenderListDispatch,
        RenderListEntry, RenderListStats, RenderObject, RenderResult, TagListKey, Visibility,
        VisibilityParams,
    };
}
