//! Pipeline state model.
//!
//! [`PipelineState`] is a plain value snapshot of every fixed-function toggle,
//! function and mask the device exposes. Two snapshots are compared field by
//! field with [`PipelineState::diff`], which reports the changed field groups
//! as [`StateChanges`]. Each group maps to exactly one device call, so the
//! number of set bits is the number of calls needed to move between states.

use bitflags::bitflags;

use crate::types::{BlendFactor, ColorMask, CompareFunc, FaceType, FaceWinding, StencilOp};

/// Stencil test configuration for one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilFaceState {
    pub func: CompareFunc,
    pub op_stencil_fail: StencilOp,
    pub op_depth_fail: StencilOp,
    pub op_pass: StencilOp,
}

impl Default for StencilFaceState {
    fn default() -> Self {
        Self {
            func: CompareFunc::Always,
            op_stencil_fail: StencilOp::Keep,
            op_depth_fail: StencilOp::Keep,
            op_pass: StencilOp::Keep,
        }
    }
}

/// Snapshot of fixed-function device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineState {
    pub write_color_mask: ColorMask,
    pub write_depth: bool,
    pub write_stencil_mask: u8,
    pub depth_test_enabled: bool,
    pub depth_test_func: CompareFunc,
    pub stencil_enabled: bool,
    pub stencil_front: StencilFaceState,
    pub stencil_back: StencilFaceState,
    pub stencil_reference: u8,
    pub stencil_compare_mask: u8,
    pub blend_enabled: bool,
    pub blend_src_factor: BlendFactor,
    pub blend_dst_factor: BlendFactor,
    pub culling_enabled: bool,
    pub cull_face_type: FaceType,
    pub face_winding: FaceWinding,
    pub polygon_offset_fill_enabled: bool,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            write_color_mask: ColorMask::all(),
            write_depth: true,
            write_stencil_mask: 0xff,
            depth_test_enabled: false,
            depth_test_func: CompareFunc::Less,
            stencil_enabled: false,
            stencil_front: StencilFaceState::default(),
            stencil_back: StencilFaceState::default(),
            stencil_reference: 0,
            stencil_compare_mask: 0xff,
            blend_enabled: false,
            blend_src_factor: BlendFactor::One,
            blend_dst_factor: BlendFactor::Zero,
            culling_enabled: false,
            cull_face_type: FaceType::Back,
            face_winding: FaceWinding::Ccw,
            polygon_offset_fill_enabled: false,
        }
    }
}

bitflags! {
    /// Field groups that differ between two [`PipelineState`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateChanges: u32 {
        const COLOR_MASK = 1 << 0;
        const DEPTH_MASK = 1 << 1;
        const STENCIL_MASK = 1 << 2;
        const DEPTH_TEST = 1 << 3;
        const DEPTH_FUNC = 1 << 4;
        const STENCIL_TEST = 1 << 5;
        /// Front func, reference or compare mask.
        const STENCIL_FUNC_FRONT = 1 << 6;
        /// Back func, reference or compare mask.
        const STENCIL_FUNC_BACK = 1 << 7;
        const STENCIL_OP_FRONT = 1 << 8;
        const STENCIL_OP_BACK = 1 << 9;
        const BLEND = 1 << 10;
        const BLEND_FUNC = 1 << 11;
        const CULL_FACE = 1 << 12;
        const CULL_FACE_TYPE = 1 << 13;
        const FACE_WINDING = 1 << 14;
        const POLYGON_OFFSET_FILL = 1 << 15;
    }
}

impl PipelineState {
    /// Compare `self` against `target` and report which field groups differ.
    pub fn diff(&self, target: &PipelineState) -> StateChanges {
        let mut changes = StateChanges::empty();

        changes.set(
            StateChanges::COLOR_MASK,
            self.write_color_mask != target.write_color_mask,
        );
        changes.set(StateChanges::DEPTH_MASK, self.write_depth != target.write_depth);
        changes.set(
            StateChanges::STENCIL_MASK,
            self.write_stencil_mask != target.write_stencil_mask,
        );
        changes.set(
            StateChanges::DEPTH_TEST,
            self.depth_test_enabled != target.depth_test_enabled,
        );
        changes.set(
            StateChanges::DEPTH_FUNC,
            self.depth_test_func != target.depth_test_func,
        );
        changes.set(
            StateChanges::STENCIL_TEST,
            self.stencil_enabled != target.stencil_enabled,
        );

        let reference_changed = self.stencil_reference != target.stencil_reference
            || self.stencil_compare_mask != target.stencil_compare_mask;
        changes.set(
            StateChanges::STENCIL_FUNC_FRONT,
            reference_changed || self.stencil_front.func != target.stencil_front.func,
        );
        changes.set(
            StateChanges::STENCIL_FUNC_BACK,
            reference_changed || self.stencil_back.func != target.stencil_back.func,
        );
        changes.set(
            StateChanges::STENCIL_OP_FRONT,
            !same_stencil_ops(&self.stencil_front, &target.stencil_front),
        );
        changes.set(
            StateChanges::STENCIL_OP_BACK,
            !same_stencil_ops(&self.stencil_back, &target.stencil_back),
        );

        changes.set(StateChanges::BLEND, self.blend_enabled != target.blend_enabled);
        changes.set(
            StateChanges::BLEND_FUNC,
            self.blend_src_factor != target.blend_src_factor
                || self.blend_dst_factor != target.blend_dst_factor,
        );
        changes.set(
            StateChanges::CULL_FACE,
            self.culling_enabled != target.culling_enabled,
        );
        changes.set(
            StateChanges::CULL_FACE_TYPE,
            self.cull_face_type != target.cull_face_type,
        );
        changes.set(
            StateChanges::FACE_WINDING,
            self.face_winding != target.face_winding,
        );
        changes.set(
            StateChanges::POLYGON_OFFSET_FILL,
            self.polygon_offset_fill_enabled != target.polygon_offset_fill_enabled,
        );

        changes
    }
}

fn same_stencil_ops(a: &StencilFaceState, b: &StencilFaceState) -> bool {
    a.op_stencil_fail == b.op_stencil_fail
        && a.op_depth_fail == b.op_depth_fail
        && a.op_pass == b.op_pass
}
