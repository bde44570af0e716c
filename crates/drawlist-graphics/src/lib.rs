//! Graphics device seam for drawlist.
//!
//! The render-list engine never talks to a GPU API directly. Everything it
//! needs from the device goes through the object-safe [`GraphicsDevice`]
//! trait defined here, together with the value types that cross that seam.
//!
//! # Overview
//!
//! - [`GraphicsDevice`] - Trait for the fixed-function calls the draw executor issues
//! - [`PipelineState`] - Field-comparable snapshot of fixed-function device state
//! - Opaque handles (`MaterialHandle`, `TextureHandle`, ...) compared only for equality
//! - `MockGraphicsDevice` - Recording implementation for tests (requires `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use drawlist_graphics::{DeviceState, GraphicsDevice, MockGraphicsDevice};
//!
//! let mock = MockGraphicsDevice::new();
//! mock.set_state_enabled(DeviceState::Blend, true);
//!
//! assert!(mock.pipeline_state().blend_enabled);
//! assert_eq!(mock.count_state_changes(), 1);
//! # }
//! ```
//!
//! # Design
//!
//! Methods on [`GraphicsDevice`] take `&self`, so a device can be shared as
//! `Arc<dyn GraphicsDevice>` between the render context and the producers.
//! Implementations use interior mutability where they need to record state.

pub mod device;
#[cfg(feature = "mock")]
pub mod mock;
pub mod pipeline_state;
pub mod types;

// Re-export main types at crate root
pub use device::*;
#[cfg(feature = "mock")]
pub use mock::*;
pub use pipeline_state::*;
pub use types::*;
