//! Draw executor tests against the recording mock device.

use std::sync::Arc;

use drawlist_core::config::RenderConfig;
use drawlist_core::hash::hash_str;
use drawlist_core::math::Vec4;
use drawlist_graphics::{
    BlendFactor, BufferHandle, ClearFlags, CompareFunc, DeviceCall, FaceType, FaceWinding,
    GraphicsDevice,
    IndexType, MaterialHandle, MockGraphicsDevice, PipelineState, StencilFaceState,
    TextureHandle, VertexDeclarationHandle,
};
use drawlist_render::{
    DispatchOperation, DispatchParams, IndexBinding, MajorOrder, NamedConstantBuffer, Predicate,
    RenderContext, RenderError, RenderListDispatch, RenderListEntry, RenderObject,
    StencilTestParams,
};

fn setup() -> (Arc<MockGraphicsDevice>, RenderContext) {
    setup_with(RenderConfig::default(), PipelineState::default())
}

fn setup_with(
    config: RenderConfig,
    state: PipelineState,
) -> (Arc<MockGraphicsDevice>, RenderContext) {
    let device = Arc::new(MockGraphicsDevice::with_state(state));
    let mut context = RenderContext::with_device(config, device.clone());
    context.begin();
    (device, context)
}

fn object(material: u64) -> RenderObject {
    let mut object = RenderObject::new(
        MaterialHandle(material),
        BufferHandle(1),
        VertexDeclarationHandle(1),
    );
    object.vertex_count = 6;
    object
}

fn alpha_blended(material: u64) -> RenderObject {
    RenderObject {
        blend_factors: Some((BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)),
        ..object(material)
    }
}

#[test]
fn test_draw_without_device_is_invalid_context() {
    let mut context = RenderContext::new(RenderConfig::default());
    context.add_to_render(object(1)).unwrap();

    assert_eq!(context.draw(None, None), Err(RenderError::InvalidContext));
}

#[test]
fn test_identical_state_emits_one_sequence() {
    let (device, mut context) = setup();
    context.add_to_render(alpha_blended(1)).unwrap();
    context.add_to_render(alpha_blended(1)).unwrap();

    let stats = context.draw(None, None).unwrap();

    let calls = device.calls();
    let draws: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, call)| call.is_draw())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(draws.len(), 2);

    let before_first = calls[..draws[0]].iter().filter(|c| c.is_state_change()).count();
    let between = calls[draws[0]..draws[1]]
        .iter()
        .filter(|c| c.is_state_change())
        .count();
    assert_eq!(before_first, 1);
    assert_eq!(between, 0);

    // One change in, one restore out
    assert_eq!(stats.state_changes, 2);
    assert_eq!(device.count_state_changes(), 2);
}

#[test]
fn test_state_is_restored_to_baseline() {
    let baseline = PipelineState {
        depth_test_enabled: true,
        blend_enabled: true,
        face_winding: FaceWinding::Cw,
        ..Default::default()
    };
    let (device, mut context) = setup_with(RenderConfig::default(), baseline);

    context.add_to_render(alpha_blended(1)).unwrap();
    context
        .add_to_render(RenderObject {
            face_winding: Some(FaceWinding::Ccw),
            stencil_test: Some(StencilTestParams {
                front: StencilFaceState {
                    func: CompareFunc::Equal,
                    ..Default::default()
                },
                reference: 3,
                ..Default::default()
            }),
            ..object(1)
        })
        .unwrap();

    context.draw(None, None).unwrap();

    assert_eq!(device.pipeline_state(), baseline);
    assert!(device.calls().iter().any(|call| matches!(
        call,
        DeviceCall::SetStencilFunc {
            face: FaceType::Front,
            func: CompareFunc::Equal,
            reference: 3,
            ..
        }
    )));
}

#[test]
fn test_material_rebinds_only_on_change() {
    let (device, mut context) = setup();
    for material in [1, 1, 2, 2, 1] {
        context.add_to_render(object(material)).unwrap();
    }

    let stats = context.draw(None, None).unwrap();

    assert_eq!(stats.material_binds, 3);
    assert_eq!(device.count_material_binds(), 3);
    assert_eq!(stats.draw_calls, 5);
}

#[test]
fn test_material_override() {
    let (device, mut context) = setup();
    context.add_to_render(object(1)).unwrap();
    context.add_to_render(object(2)).unwrap();

    context.enable_material(MaterialHandle(9));
    context.draw(None, None).unwrap();

    assert_eq!(
        device.count_matching(|call| matches!(call, DeviceCall::BindMaterial(_))),
        1
    );
    assert!(device.calls().contains(&DeviceCall::BindMaterial(MaterialHandle(9))));

    context.disable_material();
    device.clear_calls();
    context.draw(None, None).unwrap();
    assert_eq!(device.count_material_binds(), 2);
}

#[test]
fn test_texture_override_wins_and_units_are_released() {
    let (device, mut context) = setup();
    let mut textured = object(1);
    textured.textures[0] = Some(TextureHandle(1));
    textured.textures[2] = Some(TextureHandle(2));
    context.add_to_render(textured).unwrap();

    context.set_texture(0, Some(TextureHandle(5))).unwrap();
    let stats = context.draw(None, None).unwrap();

    let calls = device.calls();
    assert!(calls.contains(&DeviceCall::EnableTexture {
        unit: 0,
        texture: TextureHandle(5)
    }));
    assert!(calls.contains(&DeviceCall::EnableTexture {
        unit: 2,
        texture: TextureHandle(2)
    }));
    assert!(!calls.contains(&DeviceCall::EnableTexture {
        unit: 0,
        texture: TextureHandle(1)
    }));
    assert_eq!(
        device.count_matching(|call| matches!(call, DeviceCall::DisableTexture { .. })),
        2
    );
    assert_eq!(stats.texture_binds, 2);
}

#[test]
fn test_call_level_constants_win() {
    let (device, mut context) = setup();
    let tint = hash_str("tint");
    let offset = hash_str("offset");

    let mut obj = object(1);
    obj.constants.set(tint, &[Vec4::ONE]);
    obj.constants.set(offset, &[Vec4::X]);
    context.add_to_render(obj).unwrap();

    let mut call_constants = NamedConstantBuffer::new();
    call_constants.set(tint, &[Vec4::ZERO]);
    context.draw(None, Some(&call_constants)).unwrap();

    let constants: Vec<DeviceCall> = device
        .calls()
        .into_iter()
        .filter(|call| matches!(call, DeviceCall::SetConstant { .. }))
        .collect();
    assert_eq!(constants.len(), 2);
    assert!(constants.contains(&DeviceCall::SetConstant {
        name: offset,
        values: vec![Vec4::X]
    }));
    assert_eq!(
        constants.last(),
        Some(&DeviceCall::SetConstant {
            name: tint,
            values: vec![Vec4::ZERO]
        })
    );
}

#[test]
fn test_predicate_and_empty_objects_are_skipped() {
    let (device, mut context) = setup();
    let gui = context.register_tag_list(&[hash_str("gui")]);
    let world = context.register_tag_list(&[hash_str("world")]);

    context
        .add_to_render(RenderObject {
            tag_list_key: gui,
            ..object(1)
        })
        .unwrap();
    context
        .add_to_render(RenderObject {
            tag_list_key: world,
            ..object(1)
        })
        .unwrap();
    context
        .add_to_render(RenderObject {
            tag_list_key: gui,
            vertex_count: 0,
            ..object(1)
        })
        .unwrap();

    let predicate = Predicate::from_tags(&[hash_str("gui")]);
    let stats = context.draw(Some(&predicate), None).unwrap();

    assert_eq!(stats.objects_drawn, 1);
    assert_eq!(stats.objects_skipped, 2);
    assert_eq!(device.count_draws(), 1);
}

#[test]
fn test_indexed_draw() {
    let (device, mut context) = setup();
    context
        .add_to_render(RenderObject {
            index: Some(IndexBinding {
                buffer: BufferHandle(7),
                index_type: IndexType::U32,
            }),
            vertex_start: 3,
            ..object(1)
        })
        .unwrap();

    context.draw(None, None).unwrap();

    let calls = device.calls();
    assert!(calls.iter().any(|call| matches!(
        call,
        DeviceCall::DrawIndexed {
            first: 3,
            count: 6,
            index_type: IndexType::U32,
            index_buffer: BufferHandle(7),
            ..
        }
    )));
    let enable = calls
        .iter()
        .position(|call| matches!(call, DeviceCall::EnableVertexDeclaration { .. }));
    let disable = calls
        .iter()
        .position(|call| matches!(call, DeviceCall::DisableVertexDeclaration(_)));
    assert!(enable < disable);
}

#[test]
fn test_stencil_clear_precedes_its_draw() {
    let (device, mut context) = setup();
    context.add_to_render(object(1)).unwrap();
    context
        .add_to_render(RenderObject {
            stencil_test: Some(StencilTestParams {
                clear_buffer: true,
                ..Default::default()
            }),
            ..object(1)
        })
        .unwrap();

    let stats = context.draw(None, None).unwrap();
    assert_eq!(stats.stencil_clears, 1);

    let calls = device.calls();
    let clears: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, call)| matches!(call, DeviceCall::Clear { .. }))
        .map(|(i, _)| i)
        .collect();
    let draws: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, call)| call.is_draw())
        .map(|(i, _)| i)
        .collect();

    assert_eq!(clears.len(), 1);
    assert_eq!(draws.len(), 2);
    assert!(draws[0] < clears[0] && clears[0] < draws[1]);
    assert!(matches!(
        calls[clears[0]],
        DeviceCall::Clear {
            flags: ClearFlags::STENCIL,
            stencil: 0,
            ..
        }
    ));
}

#[test]
fn test_render_object_list_overflow() {
    let (device, mut context) = setup_with(
        RenderConfig {
            max_render_objects: 2,
            ..Default::default()
        },
        PipelineState::default(),
    );

    assert!(context.add_to_render(object(1)).is_ok());
    assert!(context.add_to_render(object(1)).is_ok());
    assert!(matches!(
        context.add_to_render(object(1)),
        Err(RenderError::OutOfResources { .. })
    ));

    // The frame renders whatever fit
    context.draw(None, None).unwrap();
    assert_eq!(device.count_draws(), 2);
}

/// Emits one render object per batch.
struct Quads;

impl RenderListDispatch for Quads {
    fn dispatch(&mut self, params: &mut DispatchParams<'_>) {
        if params.operation != DispatchOperation::Batch {
            return;
        }
        let count = params.indices.len() as u32;
        let material = params.batch().next().map_or(0, |entry| entry.batch_key as u64);
        let _ = params.add_to_render(RenderObject {
            vertex_count: count * 6,
            ..object(material)
        });
    }
}

#[test]
fn test_render_list_feeds_executor() {
    let (device, mut context) = setup();
    let dispatch = context.render_list_make_dispatch(Box::new(Quads));

    let span = context.render_list_alloc(3);
    for (i, entry) in context.render_list_entries_mut(span).iter_mut().enumerate() {
        *entry = RenderListEntry {
            dispatch,
            batch_key: if i == 1 { 2 } else { 1 },
            order: i as u32,
            major_order: MajorOrder::AfterWorld,
            ..Default::default()
        };
    }
    context.render_list_submit_span(span);
    context.end();

    let stats = context.draw_render_list(None, None, None).unwrap();

    assert_eq!(stats.batches, 3);
    assert_eq!(stats.draw.draw_calls, 3);
    assert_eq!(context.render_objects().len(), 3);
    assert_eq!(device.count_draws(), 3);
    assert_eq!(device.count_material_binds(), 3);

    // Render objects are rebuilt on every render-list draw
    context.draw_render_list(None, None, None).unwrap();
    assert_eq!(context.render_objects().len(), 3);
}
