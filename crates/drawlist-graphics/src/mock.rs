//! Mock implementation of GraphicsDevice for testing.
//!
//! This module provides a device that records every call and tracks the
//! pipeline state those calls would produce, without touching a GPU.

use drawlist_core::geometry::Rect;
use drawlist_core::hash::NameHash;
use drawlist_core::math::Vec4;
use parking_lot::Mutex;

use crate::device::GraphicsDevice;
use crate::pipeline_state::{PipelineState, StencilFaceState};
use crate::types::*;

/// Records a device call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    SetStateEnabled {
        state: DeviceState,
        enabled: bool,
    },
    SetBlendFunc {
        src: BlendFactor,
        dst: BlendFactor,
    },
    SetColorMask(ColorMask),
    SetDepthMask(bool),
    SetDepthFunc(CompareFunc),
    SetStencilMask(u8),
    SetStencilFunc {
        face: FaceType,
        func: CompareFunc,
        reference: u8,
        mask: u8,
    },
    SetStencilOp {
        face: FaceType,
        stencil_fail: StencilOp,
        depth_fail: StencilOp,
        pass: StencilOp,
    },
    SetCullFace(FaceType),
    SetFaceWinding(FaceWinding),
    SetViewport(Rect<i32>),
    SetScissor(Rect<i32>),
    Clear {
        flags: ClearFlags,
        color: Vec4,
        depth: f32,
        stencil: u32,
    },
    BindMaterial(MaterialHandle),
    SetConstant {
        name: NameHash,
        values: Vec<Vec4>,
    },
    EnableTexture {
        unit: u32,
        texture: TextureHandle,
    },
    DisableTexture {
        unit: u32,
        texture: TextureHandle,
    },
    EnableVertexDeclaration {
        declaration: VertexDeclarationHandle,
        vertex_buffer: BufferHandle,
    },
    DisableVertexDeclaration(VertexDeclarationHandle),
    Draw {
        primitive: PrimitiveType,
        first: u32,
        count: u32,
    },
    DrawIndexed {
        primitive: PrimitiveType,
        first: u32,
        count: u32,
        index_type: IndexType,
        index_buffer: BufferHandle,
    },
}

impl DeviceCall {
    /// Whether this call changes fixed-function pipeline state.
    pub fn is_state_change(&self) -> bool {
        matches!(
            self,
            DeviceCall::SetStateEnabled { .. }
                | DeviceCall::SetBlendFunc { .. }
                | DeviceCall::SetColorMask(_)
                | DeviceCall::SetDepthMask(_)
                | DeviceCall::SetDepthFunc(_)
                | DeviceCall::SetStencilMask(_)
                | DeviceCall::SetStencilFunc { .. }
                | DeviceCall::SetStencilOp { .. }
                | DeviceCall::SetCullFace(_)
                | DeviceCall::SetFaceWinding(_)
        )
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, DeviceCall::Draw { .. } | DeviceCall::DrawIndexed { .. })
    }
}

/// Mock implementation of GraphicsDevice for testing.
///
/// # Borrow Checking Pattern: Interior Mutability
///
/// Methods take `&self` but need to mutate internal state (record calls).
/// `parking_lot::Mutex` keeps the mock `Send + Sync` as the trait requires.
///
/// # Example
///
/// ```rust
/// use drawlist_graphics::{GraphicsDevice, MockGraphicsDevice, PrimitiveType};
///
/// let mock = MockGraphicsDevice::new();
/// mock.draw(PrimitiveType::Triangles, 0, 3);
///
/// assert_eq!(mock.count_draws(), 1);
/// ```
pub struct MockGraphicsDevice {
    /// Recorded calls for verification
    calls: Mutex<Vec<DeviceCall>>,

    /// State the recorded calls have produced
    state: Mutex<PipelineState>,
}

impl MockGraphicsDevice {
    /// Create a mock device in the default pipeline state.
    pub fn new() -> Self {
        Self::with_state(PipelineState::default())
    }

    /// Create a mock device starting from a specific pipeline state.
    pub fn with_state(state: PipelineState) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            state: Mutex::new(state),
        }
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().clone()
    }

    /// Count recorded calls matching a predicate.
    pub fn count_matching(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    /// Count draw and indexed draw calls.
    pub fn count_draws(&self) -> usize {
        self.count_matching(DeviceCall::is_draw)
    }

    /// Count fixed-function state changes.
    pub fn count_state_changes(&self) -> usize {
        self.count_matching(DeviceCall::is_state_change)
    }

    /// Count material binds.
    pub fn count_material_binds(&self) -> usize {
        self.count_matching(|call| matches!(call, DeviceCall::BindMaterial(_)))
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: DeviceCall) {
        self.calls.lock().push(call);
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn pipeline_state(&self) -> PipelineState {
        *self.state.lock()
    }

    fn set_state_enabled(&self, state: DeviceState, enabled: bool) {
        {
            let mut current = self.state.lock();
            match state {
                DeviceState::DepthTest => current.depth_test_enabled = enabled,
                DeviceState::StencilTest => current.stencil_enabled = enabled,
                DeviceState::Blend => current.blend_enabled = enabled,
                DeviceState::CullFace => current.culling_enabled = enabled,
                DeviceState::PolygonOffsetFill => current.polygon_offset_fill_enabled = enabled,
                // Scissor is not part of the pipeline state snapshot
                DeviceState::ScissorTest => {}
            }
        }
        self.record(DeviceCall::SetStateEnabled { state, enabled });
    }

    fn set_blend_func(&self, src: BlendFactor, dst: BlendFactor) {
        {
            let mut current = self.state.lock();
            current.blend_src_factor = src;
            current.blend_dst_factor = dst;
        }
        self.record(DeviceCall::SetBlendFunc { src, dst });
    }

    fn set_color_mask(&self, mask: ColorMask) {
        self.state.lock().write_color_mask = mask;
        self.record(DeviceCall::SetColorMask(mask));
    }

    fn set_depth_mask(&self, write: bool) {
        self.state.lock().write_depth = write;
        self.record(DeviceCall::SetDepthMask(write));
    }

    fn set_depth_func(&self, func: CompareFunc) {
        self.state.lock().depth_test_func = func;
        self.record(DeviceCall::SetDepthFunc(func));
    }

    fn set_stencil_mask(&self, mask: u8) {
        self.state.lock().write_stencil_mask = mask;
        self.record(DeviceCall::SetStencilMask(mask));
    }

    fn set_stencil_func(&self, face: FaceType, func: CompareFunc, reference: u8, mask: u8) {
        {
            let mut current = self.state.lock();
            current.stencil_reference = reference;
            current.stencil_compare_mask = mask;
            if matches!(face, FaceType::Front | FaceType::FrontAndBack) {
                current.stencil_front.func = func;
            }
            if matches!(face, FaceType::Back | FaceType::FrontAndBack) {
                current.stencil_back.func = func;
            }
        }
        self.record(DeviceCall::SetStencilFunc {
            face,
            func,
            reference,
            mask,
        });
    }

    fn set_stencil_op(
        &self,
        face: FaceType,
        stencil_fail: StencilOp,
        depth_fail: StencilOp,
        pass: StencilOp,
    ) {
        {
            let mut current = self.state.lock();
            let apply = |target: &mut StencilFaceState| {
                target.op_stencil_fail = stencil_fail;
                target.op_depth_fail = depth_fail;
                target.op_pass = pass;
            };
            if matches!(face, FaceType::Front | FaceType::FrontAndBack) {
                apply(&mut current.stencil_front);
            }
            if matches!(face, FaceType::Back | FaceType::FrontAndBack) {
                apply(&mut current.stencil_back);
            }
        }
        self.record(DeviceCall::SetStencilOp {
            face,
            stencil_fail,
            depth_fail,
            pass,
        });
    }

    fn set_cull_face(&self, face: FaceType) {
        self.state.lock().cull_face_type = face;
        self.record(DeviceCall::SetCullFace(face));
    }

    fn set_face_winding(&self, winding: FaceWinding) {
        self.state.lock().face_winding = winding;
        self.record(DeviceCall::SetFaceWinding(winding));
    }

    fn set_viewport(&self, rect: Rect<i32>) {
        self.record(DeviceCall::SetViewport(rect));
    }

    fn set_scissor(&self, rect: Rect<i32>) {
        self.record(DeviceCall::SetScissor(rect));
    }

    fn clear(&self, flags: ClearFlags, color: Vec4, depth: f32, stencil: u32) {
        self.record(DeviceCall::Clear {
            flags,
            color,
            depth,
            stencil,
        });
    }

    fn bind_material(&self, material: MaterialHandle) {
        self.record(DeviceCall::BindMaterial(material));
    }

    fn set_constant(&self, name: NameHash, values: &[Vec4]) {
        self.record(DeviceCall::SetConstant {
            name,
            values: values.to_vec(),
        });
    }

    fn enable_texture(&self, unit: u32, texture: TextureHandle) {
        self.record(DeviceCall::EnableTexture { unit, texture });
    }

    fn disable_texture(&self, unit: u32, texture: TextureHandle) {
        self.record(DeviceCall::DisableTexture { unit, texture });
    }

    fn enable_vertex_declaration(
        &self,
        declaration: VertexDeclarationHandle,
        vertex_buffer: BufferHandle,
    ) {
        self.record(DeviceCall::EnableVertexDeclaration {
            declaration,
            vertex_buffer,
        });
    }

    fn disable_vertex_declaration(&self, declaration: VertexDeclarationHandle) {
        self.record(DeviceCall::DisableVertexDeclaration(declaration));
    }

    fn draw(&self, primitive: PrimitiveType, first: u32, count: u32) {
        self.record(DeviceCall::Draw {
            primitive,
            first,
            count,
        });
    }

    fn draw_indexed(
        &self,
        primitive: PrimitiveType,
        first: u32,
        count: u32,
        index_type: IndexType,
        index_buffer: BufferHandle,
    ) {
        self.record(DeviceCall::DrawIndexed {
            primitive,
            first,
            count,
            index_type,
            index_buffer,
        });
    }
}
