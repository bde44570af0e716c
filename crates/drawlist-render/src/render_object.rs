//! Render objects consumed by the draw executor.

use drawlist_core::alloc::BoundedVec;
use drawlist_core::math::Mat4;
use drawlist_graphics::{
    BlendFactor, BufferHandle, ColorMask, FaceWinding, IndexType, MaterialHandle, PipelineState,
    PrimitiveType, StencilFaceState, TextureHandle, VertexDeclarationHandle,
};

use crate::constants::NamedConstantBuffer;
use crate::error::{RenderError, RenderResult};
use crate::tags::TagListKey;

/// Number of texture units a render object can bind.
pub const MAX_TEXTURE_COUNT: usize = 8;

/// Stencil configuration a render object applies while it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilTestParams {
    pub front: StencilFaceState,
    /// Used only when `separate_face_states` is set, otherwise `front` applies to both faces.
    pub back: StencilFaceState,
    pub reference: u8,
    pub reference_mask: u8,
    /// Stencil write mask.
    pub buffer_mask: u8,
    pub color_buffer_mask: ColorMask,
    pub separate_face_states: bool,
    /// Clear the stencil buffer before this object is drawn.
    pub clear_buffer: bool,
}

impl Default for StencilTestParams {
    fn default() -> Self {
        Self {
            front: StencilFaceState::default(),
            back: StencilFaceState::default(),
            reference: 0,
            reference_mask: 0xff,
            buffer_mask: 0xff,
            color_buffer_mask: ColorMask::all(),
            separate_face_states: false,
            clear_buffer: false,
        }
    }
}

impl StencilTestParams {
    fn apply_to(&self, state: &mut PipelineState) {
        state.stencil_front = self.front;
        state.stencil_back = if self.separate_face_states {
            self.back
        } else {
            self.front
        };
        state.stencil_reference = self.reference;
        state.stencil_compare_mask = self.reference_mask;
        state.write_stencil_mask = self.buffer_mask;
        state.write_color_mask = self.color_buffer_mask;
    }
}

/// Index buffer binding of an indexed render object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBinding {
    pub buffer: BufferHandle,
    pub index_type: IndexType,
}

/// A concrete draw produced by a batch dispatch.
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub material: MaterialHandle,
    pub tag_list_key: TagListKey,
    pub world_transform: Mat4,
    pub vertex_buffer: BufferHandle,
    pub vertex_declaration: VertexDeclarationHandle,
    pub index: Option<IndexBinding>,
    pub primitive_type: PrimitiveType,
    pub vertex_start: u32,
    pub vertex_count: u32,
    pub textures: [Option<TextureHandle>; MAX_TEXTURE_COUNT],
    pub constants: NamedConstantBuffer,

    // Pipeline state overrides, `None` keeps the baseline
    pub blend_factors: Option<(BlendFactor, BlendFactor)>,
    pub stencil_test: Option<StencilTestParams>,
    pub face_winding: Option<FaceWinding>,
}

impl RenderObject {
    pub fn new(
        material: MaterialHandle,
        vertex_buffer: BufferHandle,
        vertex_declaration: VertexDeclarationHandle,
    ) -> Self {
        Self {
            material,
            tag_list_key: TagListKey::default(),
            world_transform: Mat4::IDENTITY,
            vertex_buffer,
            vertex_declaration,
            index: None,
            primitive_type: PrimitiveType::Triangles,
            vertex_start: 0,
            vertex_count: 0,
            textures: [None; MAX_TEXTURE_COUNT],
            constants: NamedConstantBuffer::new(),
            blend_factors: None,
            stencil_test: None,
            face_winding: None,
        }
    }

    /// Pipeline state this object wants, starting from `baseline`.
    pub fn desired_state(&self, baseline: &PipelineState) -> PipelineState {
        let mut state = *baseline;
        if let Some((src, dst)) = self.blend_factors {
            state.blend_src_factor = src;
            state.blend_dst_factor = dst;
        }
        if let Some(stencil) = &self.stencil_test {
            stencil.apply_to(&mut state);
        }
        if let Some(winding) = self.face_winding {
            state.face_winding = winding;
        }
        state
    }
}

/// Fixed-capacity list of render objects for one frame.
pub struct RenderObjectList {
    objects: BoundedVec<RenderObject>,
    warned_full: bool,
}

impl RenderObjectList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: BoundedVec::with_capacity(capacity),
            warned_full: false,
        }
    }

    /// Append an object.
    ///
    /// When the list is full the object is dropped. The first overflow over the
    /// lifetime of the list logs a warning, later ones are silent.
    pub fn push(&mut self, object: RenderObject) -> RenderResult<()> {
        if self.objects.try_push(object).is_err() {
            if !self.warned_full {
                tracing::warn!(
                    "Render object list is full ({} objects), dropping further objects",
                    self.objects.capacity()
                );
                self.warned_full = true;
            }
            return Err(RenderError::OutOfResources {
                resource: "render object list",
            });
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.objects.capacity()
    }

    pub fn as_slice(&self) -> &[RenderObject] {
        self.objects.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderObject> {
        self.objects.iter()
    }
}
