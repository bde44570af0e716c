/// Fast mathematical operations using SIMD-accelerated `glam` types.
///
/// This module re-exports all types and functions from the [`glam`] crate.
///
/// # Examples
///
/// ```
/// use drawlist_core::math::{Mat4, Vec3};
///
/// let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
/// let proj = Mat4::perspective_rh_gl(1.0, 16.0 / 9.0, 0.1, 100.0);
/// let view_proj = proj * view;
/// # let _ = view_proj;
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}

pub use fast::*;

/// Index of each plane in [`Frustum::planes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum FrustumPlane {
    Left = 0,
    Right = 1,
    Bottom = 2,
    Top = 3,
    Near = 4,
    Far = 5,
}

/// A view frustum as six inward-facing planes.
///
/// Each plane is stored as `(normal.x, normal.y, normal.z, distance)` with a
/// unit-length normal, so `plane.xyz.dot(p) + plane.w` is the signed distance
/// of `p` from the plane. Points with a non-negative distance to all six
/// planes are inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract the frustum of a view-projection matrix.
    ///
    /// Uses the OpenGL clip convention (`-w <= z <= w`).
    pub fn from_view_projection(view_proj: &Mat4) -> Self {
        let r0 = view_proj.row(0);
        let r1 = view_proj.row(1);
        let r2 = view_proj.row(2);
        let r3 = view_proj.row(3);

        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r3 + r2, r3 - r2].map(normalize_plane);
        Self { planes }
    }

    pub fn plane(&self, plane: FrustumPlane) -> Vec4 {
        self.planes[plane as usize]
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.truncate().dot(point) + plane.w >= 0.0)
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.truncate().dot(center) + plane.w >= -radius)
    }

    /// Conservative box test: only rejects boxes fully outside one plane.
    pub fn intersects_aabb(&self, min: Vec3, max: Vec3) -> bool {
        self.planes.iter().all(|plane| {
            let normal = plane.truncate();
            // Corner furthest along the plane normal
            let positive = Vec3::select(normal.cmpge(Vec3::ZERO), max, min);
            normal.dot(positive) + plane.w >= 0.0
        })
    }
}

fn normalize_plane(plane: Vec4) -> Vec4 {
    let length = plane.truncate().length();
    if length > f32::EPSILON {
        plane / length
    } else {
        plane
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_frustum_is_clip_cube() {
        let frustum = Frustum::from_view_projection(&Mat4::IDENTITY);

        assert!(frustum.contains_point(Vec3::ZERO));
        assert!(frustum.contains_point(Vec3::new(1.0, -1.0, 1.0)));
        assert!(!frustum.contains_point(Vec3::new(2.0, 0.0, 0.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -1.5)));
    }

    #[test]
    fn test_sphere_straddling_plane_intersects() {
        let frustum = Frustum::from_view_projection(&Mat4::IDENTITY);

        assert!(frustum.intersects_sphere(Vec3::new(1.5, 0.0, 0.0), 1.0));
        assert!(!frustum.intersects_sphere(Vec3::new(3.0, 0.0, 0.0), 1.0));
    }

    #[test]
    fn test_aabb_test() {
        let frustum = Frustum::from_view_projection(&Mat4::IDENTITY);

        assert!(frustum.intersects_aabb(Vec3::splat(0.5), Vec3::splat(2.0)));
        assert!(!frustum.intersects_aabb(Vec3::new(2.0, 2.0, 2.0), Vec3::splat(3.0)));
    }

    #[test]
    fn test_planes_are_normalized() {
        let proj = Mat4::perspective_rh_gl(1.2, 1.5, 0.1, 50.0);
        let frustum = Frustum::from_view_projection(&proj);

        for plane in frustum.planes {
            assert!((plane.truncate().length() - 1.0).abs() < 1e-4);
        }
        // Camera looks down -Z
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -5.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 5.0)));
    }
}
