//! Trait abstracting the graphics device.
//!
//! The `GraphicsDevice` trait is the only path by which the draw executor
//! reaches the GPU. Backends implement it over their API of choice; tests use
//! `MockGraphicsDevice`.

use drawlist_core::geometry::Rect;
use drawlist_core::hash::NameHash;
use drawlist_core::math::Vec4;

use crate::pipeline_state::PipelineState;
use crate::types::*;

/// Fixed-function device operations used by the render-list engine.
///
/// # Borrow Checking Pattern
///
/// Methods take `&self` (shared reference). This allows:
/// - The render context and producers to share one device (via `Arc`)
/// - Mock implementations to use interior mutability (`Mutex`)
/// - No lifetime parameters propagating through the render context
///
/// # Example
///
/// ```rust,no_run
/// use drawlist_graphics::{BlendFactor, DeviceState, GraphicsDevice};
///
/// fn enable_alpha_blending(device: &dyn GraphicsDevice) {
///     device.set_state_enabled(DeviceState::Blend, true);
///     device.set_blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
/// }
/// ```
pub trait GraphicsDevice: Send + Sync {
    // State queries

    /// Current fixed-function state of the device.
    fn pipeline_state(&self) -> PipelineState;

    // Fixed-function state

    fn set_state_enabled(&self, state: DeviceState, enabled: bool);

    fn set_blend_func(&self, src: BlendFactor, dst: BlendFactor);

    fn set_color_mask(&self, mask: ColorMask);

    fn set_depth_mask(&self, write: bool);

    fn set_depth_func(&self, func: CompareFunc);

    fn set_stencil_mask(&self, mask: u8);

    fn set_stencil_func(&self, face: FaceType, func: CompareFunc, reference: u8, mask: u8);

    fn set_stencil_op(
        &self,
        face: FaceType,
        stencil_fail: StencilOp,
        depth_fail: StencilOp,
        pass: StencilOp,
    );

    fn set_cull_face(&self, face: FaceType);

    fn set_face_winding(&self, winding: FaceWinding);

    // Framebuffer

    fn set_viewport(&self, rect: Rect<i32>);

    fn set_scissor(&self, rect: Rect<i32>);

    fn clear(&self, flags: ClearFlags, color: Vec4, depth: f32, stencil: u32);

    // Bindings

    /// Bind the program and default bindings of a material.
    fn bind_material(&self, material: MaterialHandle);

    /// Upload a named shader constant to the bound material.
    fn set_constant(&self, name: NameHash, values: &[Vec4]);

    fn enable_texture(&self, unit: u32, texture: TextureHandle);

    fn disable_texture(&self, unit: u32, texture: TextureHandle);

    fn enable_vertex_declaration(
        &self,
        declaration: VertexDeclarationHandle,
        vertex_buffer: BufferHandle,
    );

    fn disable_vertex_declaration(&self, declaration: VertexDeclarationHandle);

    // Draws

    fn draw(&self, primitive: PrimitiveType, first: u32, count: u32);

    fn draw_indexed(
        &self,
        primitive: PrimitiveType,
        first: u32,
        count: u32,
        index_type: IndexType,
        index_buffer: BufferHandle,
    );
}
