//! Drives a few frames of two producers through a render context backed by
//! the recording mock device, logging the per-frame statistics.
//!
//! Run with: cargo run -p drawlist --example frame_loop

use std::sync::Arc;

use drawlist::graphics::{BufferHandle, MockGraphicsDevice};
use drawlist::prelude::*;

const SPRITE_COUNT: usize = 64;

/// World-space sprites batched by atlas page, culled against the frustum.
struct Sprites;

impl RenderListDispatch for Sprites {
    fn dispatch(&mut self, params: &mut DispatchParams<'_>) {
        if params.operation != DispatchOperation::Batch {
            return;
        }
        let page = params.batch().next().map_or(0, |entry| entry.batch_key);
        let mut object = RenderObject::new(
            MaterialHandle(1),
            BufferHandle(page as u64),
            VertexDeclarationHandle(1),
        );
        object.vertex_count = params.indices.len() as u32 * 6;
        object.textures[0] = Some(TextureHandle(page as u64));
        let _ = params.add_to_render(object);
    }

    fn has_visibility(&self) -> bool {
        true
    }

    fn visibility(&mut self, params: &mut VisibilityParams<'_>) {
        for entry in params.entries.iter_mut() {
            entry.visibility = if params.frustum.intersects_sphere(entry.world_position, 0.5) {
                Visibility::Full
            } else {
                Visibility::None
            };
        }
    }
}

/// Screen-space labels drawn after the world, in explicit order.
struct Labels;

impl RenderListDispatch for Labels {
    fn dispatch(&mut self, params: &mut DispatchParams<'_>) {
        if params.operation != DispatchOperation::Batch {
            return;
        }
        let mut object = RenderObject::new(
            MaterialHandle(2),
            BufferHandle(100),
            VertexDeclarationHandle(2),
        );
        object.vertex_count = params.indices.len() as u32 * 6;
        object.blend_factors = Some((
            drawlist::graphics::BlendFactor::SrcAlpha,
            drawlist::graphics::BlendFactor::OneMinusSrcAlpha,
        ));
        let _ = params.add_to_render(object);
    }
}

fn main() {
    let config = RenderConfig {
        profiling: ProfilingMode::On,
        ..Default::default()
    };
    drawlist::init(&config);

    let device = Arc::new(MockGraphicsDevice::new());
    let mut context = RenderContext::with_device(config, device.clone());
    context.set_projection_matrix(Mat4::perspective_rh_gl(1.0, 16.0 / 9.0, 0.1, 100.0));

    for frame in 0..3 {
        drawlist::begin_frame(&mut context);
        let eye = Vec3::new(frame as f32 * 4.0, 2.0, 15.0);
        context.set_view_matrix(Mat4::look_at_rh(eye, Vec3::new(eye.x, 0.0, 0.0), Vec3::Y));

        let sprites = context.render_list_make_dispatch(Box::new(Sprites));
        let span = context.render_list_alloc(SPRITE_COUNT);
        for (i, entry) in context.render_list_entries_mut(span).iter_mut().enumerate() {
            entry.world_position = Vec3::new((i % 16) as f32 * 2.0 - 16.0, 0.0, -((i / 16) as f32));
            entry.batch_key = (i % 3) as u32;
            entry.dispatch = sprites;
            entry.major_order = MajorOrder::World;
        }
        context.render_list_submit_span(span);

        let labels = context.render_list_make_dispatch(Box::new(Labels));
        let span = context.render_list_alloc(4);
        for (i, entry) in context.render_list_entries_mut(span).iter_mut().enumerate() {
            entry.order = 4 - i as u32;
            entry.dispatch = labels;
            entry.major_order = MajorOrder::AfterWorld;
        }
        context.render_list_submit_span(span);
        context.end();

        let frustum = context.view_proj();
        device.clear_calls();
        match context.draw_render_list(None, None, Some(&frustum)) {
            Ok(stats) => tracing::info!(
                "Frame {}: {} entries, {} culled, {} batches, {} draw calls, {} state changes, {} device calls",
                frame,
                stats.entries,
                stats.culled,
                stats.batches,
                stats.draw.draw_calls,
                stats.draw.state_changes,
                device.call_count()
            ),
            Err(err) => tracing::error!("Frame {} failed: {}", frame, err),
        }
    }
}
