//! Draw executor.
//!
//! Replays render objects against a [`GraphicsDevice`], emitting device calls
//! only for bindings and pipeline state that actually change, and restores the
//! device's pipeline state when done.

use drawlist_core::math::Vec4;
use drawlist_core::profiling::profile_function;
use drawlist_graphics::{
    ClearFlags, DeviceState, FaceType, GraphicsDevice, MaterialHandle, PipelineState,
    StateChanges, TextureHandle,
};

use crate::constants::NamedConstantBuffer;
use crate::predicate::{Predicate, accepts};
use crate::render_object::{MAX_TEXTURE_COUNT, RenderObject};
use crate::tags::TagListRegistry;

/// Call-level overrides applied to every object of a draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawOverrides {
    pub material: Option<MaterialHandle>,
    pub textures: [Option<TextureHandle>; MAX_TEXTURE_COUNT],
}

/// Statistics of one executor run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub objects_drawn: u32,
    /// Objects rejected by the predicate or with no vertices.
    pub objects_skipped: u32,
    pub draw_calls: u32,
    pub material_binds: u32,
    /// Fixed-function state calls, including the final restore.
    pub state_changes: u32,
    pub texture_binds: u32,
    pub stencil_clears: u32,
}

/// Draw `objects` in order.
pub fn execute(
    device: &dyn GraphicsDevice,
    objects: &[RenderObject],
    tag_lists: &TagListRegistry,
    predicate: Option<&Predicate>,
    constants: Option<&NamedConstantBuffer>,
    overrides: &DrawOverrides,
) -> DrawStats {
    profile_function!();
    let mut stats = DrawStats::default();
    let baseline = device.pipeline_state();
    let mut active = baseline;
    let mut bound_material = None;

    for object in objects {
        if object.vertex_count == 0 || !accepts(predicate, tag_lists.tags(object.tag_list_key)) {
            stats.objects_skipped += 1;
            continue;
        }

        let material = overrides.material.unwrap_or(object.material);
        if bound_material != Some(material) {
            device.bind_material(material);
            bound_material = Some(material);
            stats.material_binds += 1;
        }

        for (name, values) in object.constants.iter() {
            if !constants.is_some_and(|call| call.contains(name)) {
                device.set_constant(name, values);
            }
        }
        if let Some(call) = constants {
            for (name, values) in call.iter() {
                device.set_constant(name, values);
            }
        }

        let desired = object.desired_state(&baseline);
        stats.state_changes += apply_state(device, active.diff(&desired), &desired);
        active = desired;

        if object.stencil_test.is_some_and(|stencil| stencil.clear_buffer) {
            device.clear(ClearFlags::STENCIL, Vec4::ZERO, 1.0, 0);
            stats.stencil_clears += 1;
        }

        let mut textures = [None; MAX_TEXTURE_COUNT];
        for (unit, slot) in textures.iter_mut().enumerate() {
            *slot = overrides.textures[unit].or(object.textures[unit]);
            if let Some(texture) = *slot {
                device.enable_texture(unit as u32, texture);
                stats.texture_binds += 1;
            }
        }

        device.enable_vertex_declaration(object.vertex_declaration, object.vertex_buffer);
        match object.index {
            Some(index) => device.draw_indexed(
                object.primitive_type,
                object.vertex_start,
                object.vertex_count,
                index.index_type,
                index.buffer,
            ),
            None => device.draw(
                object.primitive_type,
                object.vertex_start,
                object.vertex_count,
            ),
        }
        device.disable_vertex_declaration(object.vertex_declaration);

        for (unit, texture) in textures.iter().enumerate() {
            if let Some(texture) = *texture {
                device.disable_texture(unit as u32, texture);
            }
        }

        stats.draw_calls += 1;
        stats.objects_drawn += 1;
    }

    stats.state_changes += apply_state(device, active.diff(&baseline), &baseline);
    stats
}

/// Issue one device call per changed field group, moving the device to `target`.
/// Returns the number of calls issued.
pub fn apply_state(
    device: &dyn GraphicsDevice,
    changes: StateChanges,
    target: &PipelineState,
) -> u32 {
    if changes.is_empty() {
        return 0;
    }

    if changes.contains(StateChanges::COLOR_MASK) {
        device.set_color_mask(target.write_color_mask);
    }
    if changes.contains(StateChanges::DEPTH_MASK) {
        device.set_depth_mask(target.write_depth);
    }
    if changes.contains(StateChanges::STENCIL_MASK) {
        device.set_stencil_mask(target.write_stencil_mask);
    }
    if changes.contains(StateChanges::DEPTH_TEST) {
        device.set_state_enabled(DeviceState::DepthTest, target.depth_test_enabled);
    }
    if changes.contains(StateChanges::DEPTH_FUNC) {
        device.set_depth_func(target.depth_test_func);
    }
    if changes.contains(StateChanges::STENCIL_TEST) {
        device.set_state_enabled(DeviceState::StencilTest, target.stencil_enabled);
    }
    if changes.contains(StateChanges::STENCIL_FUNC_FRONT) {
        device.set_stencil_func(
            FaceType::Front,
            target.stencil_front.func,
            target.stencil_reference,
            target.stencil_compare_mask,
        );
    }
    if changes.contains(StateChanges::STENCIL_FUNC_BACK) {
        device.set_stencil_func(
            FaceType::Back,
            target.stencil_back.func,
            target.stencil_reference,
            target.stencil_compare_mask,
        );
    }
    if changes.contains(StateChanges::STENCIL_OP_FRONT) {
        let face = &target.stencil_front;
        device.set_stencil_op(
            FaceType::Front,
            face.op_stencil_fail,
            face.op_depth_fail,
            face.op_pass,
        );
    }
    if changes.contains(StateChanges::STENCIL_OP_BACK) {
        let face = &target.stencil_back;
        device.set_stencil_op(
            FaceType::Back,
            face.op_stencil_fail,
            face.op_depth_fail,
            face.op_pass,
        );
    }
    if changes.contains(StateChanges::BLEND) {
        device.set_state_enabled(DeviceState::Blend, target.blend_enabled);
    }
    if changes.contains(StateChanges::BLEND_FUNC) {
        device.set_blend_func(target.blend_src_factor, target.blend_dst_factor);
    }
    if changes.contains(StateChanges::CULL_FACE) {
        device.set_state_enabled(DeviceState::CullFace, target.culling_enabled);
    }
    if changes.contains(StateChanges::CULL_FACE_TYPE) {
        device.set_cull_face(target.cull_face_type);
    }
    if changes.contains(StateChanges::FACE_WINDING) {
        device.set_face_winding(target.face_winding);
    }
    if changes.contains(StateChanges::POLYGON_OFFSET_FILL) {
        device.set_state_enabled(
            DeviceState::PolygonOffsetFill,
            target.polygon_offset_fill_enabled,
        );
    }

    changes.bits().count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawlist_graphics::{BlendFactor, FaceWinding, MockGraphicsDevice};

    #[test]
    fn test_apply_state_reaches_target() {
        let device = MockGraphicsDevice::new();
        let target = PipelineState {
            depth_test_enabled: true,
            blend_enabled: true,
            blend_src_factor: BlendFactor::SrcAlpha,
            face_winding: FaceWinding::Cw,
            stencil_reference: 7,
            ..Default::default()
        };

        let changes = device.pipeline_state().diff(&target);
        let issued = apply_state(&device, changes, &target);

        assert_eq!(issued as usize, device.count_state_changes());
        assert_eq!(device.pipeline_state(), target);
    }

    #[test]
    fn test_no_changes_issue_nothing() {
        let device = MockGraphicsDevice::new();
        let state = device.pipeline_state();

        assert_eq!(apply_state(&device, StateChanges::empty(), &state), 0);
        assert_eq!(device.call_count(), 0);
    }
}
