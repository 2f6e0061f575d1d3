//! Triangle mesh geometry for the Lux scene model.
//!
//! Meshes are stored in object space as an indexed triangle list. Winding is
//! counter-clockwise when viewed from the front, so the face normal
//! `(p1 - p0) × (p2 - p0)` points out of closed shapes. The builders below
//! cover the shapes the demo scenes use; anything else can be assembled with
//! [`Mesh::new`].

use lux_math::Vec3;

/// Edges closer to parallel than this (as the sine of their angle) don't
/// define a usable face normal.
pub const DEGENERATE_SINE: f32 = 1e-6;

/// A mesh consisting of vertex positions and triangle indices.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        if indices.len() % 3 != 0 {
            log::warn!(
                "Mesh index count {} is not a multiple of 3, trailing indices are ignored",
                indices.len()
            );
        }
        Self { positions, indices }
    }

    /// A flat `width` × `height` rectangle in the XY plane, centered on the
    /// origin and facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let positions = vec![
            Vec3::new(-hw, hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
        ];
        Self::new(positions, vec![0, 2, 1, 2, 3, 1])
    }

    /// An axis-aligned box centered on the origin with outward-facing
    /// triangles. Each face has its own four vertices.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;

        // (normal, u, v) with u × v == normal
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in faces {
            let center = normal * half;
            let u = u * half;
            let v = v * half;
            let base = positions.len() as u32;

            positions.extend_from_slice(&[
                center - u - v,
                center + u - v,
                center + u + v,
                center - u + v,
            ]);
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(positions, indices)
    }

    /// A latitude/longitude sphere of the given radius.
    ///
    /// `width_segments` slices run around the Y axis, `height_segments`
    /// stacks run from pole to pole. The pole rows are fans, so no triangle
    /// collapses to zero area.
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        use std::f32::consts::{PI, TAU};

        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let row_len = width_segments + 1;

        let mut positions = Vec::with_capacity(((height_segments + 1) * row_len) as usize);
        for iy in 0..=height_segments {
            let theta = iy as f32 / height_segments as f32 * PI;
            for ix in 0..=width_segments {
                let phi = ix as f32 / width_segments as f32 * TAU;
                positions.push(Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                ));
            }
        }

        let mut indices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row_len + ix + 1;
                let b = iy * row_len + ix;
                let c = (iy + 1) * row_len + ix;
                let d = (iy + 1) * row_len + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self::new(positions, indices)
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as `[v0, v1, v2]` vertex triplets.
    ///
    /// Triangles referencing a vertex that doesn't exist are skipped with a
    /// warning.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |chunk| {
            let fetch = |i: u32| self.positions.get(i as usize).copied();
            match (fetch(chunk[0]), fetch(chunk[1]), fetch(chunk[2])) {
                (Some(v0), Some(v1), Some(v2)) => Some([v0, v1, v2]),
                _ => {
                    log::warn!(
                        "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                        chunk[0],
                        chunk[1],
                        chunk[2],
                        self.positions.len()
                    );
                    None
                }
            }
        })
    }

    /// Unit face normal of a triangle, or `None` when it is degenerate.
    ///
    /// A triangle counts as degenerate when the sine of the angle between
    /// its edges at `v0` is below [`DEGENERATE_SINE`], which also covers
    /// zero-area and collapsed triangles.
    pub fn face_normal(triangle: &[Vec3; 3]) -> Option<Vec3> {
        let [v0, v1, v2] = *triangle;
        let (e1, e2) = (v1 - v0, v2 - v0);
        let cross = e1.cross(e2);
        if cross.length() <= DEGENERATE_SINE * e1.length() * e2.length() {
            return None;
        }
        cross.try_normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid(tri: &[Vec3; 3]) -> Vec3 {
        (tri[0] + tri[1] + tri[2]) / 3.0
    }

    #[test]
    fn test_mesh_creation() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2]);

        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_face_normal_ccw() {
        // CCW viewed from +Z produces normal pointing +Z
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let normal = Mesh::face_normal(&tri).unwrap();

        assert!((normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_face_has_no_normal() {
        let collinear = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        let collapsed = [Vec3::Y, Vec3::Y, Vec3::Y];

        // A sliver whose edges are almost parallel
        let sliver = [
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1e-7, 0.0),
        ];

        assert!(Mesh::face_normal(&collinear).is_none());
        assert!(Mesh::face_normal(&collapsed).is_none());
        assert!(Mesh::face_normal(&sliver).is_none());
    }

    #[test]
    fn test_triangles_skips_bad_indices() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        // Second triangle references vertex 9
        let mesh = Mesh::new(positions.clone(), vec![0, 1, 2, 1, 9, 2, 1, 3, 2]);
        let triangles: Vec<_> = mesh.triangles().collect();

        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0], [positions[0], positions[1], positions[2]]);
        assert_eq!(triangles[1], [positions[1], positions[3], positions[2]]);
    }

    #[test]
    fn test_plane_faces_positive_z() {
        let plane = Mesh::plane(2.0, 1.0);

        assert_eq!(plane.triangle_count(), 2);
        for tri in plane.triangles() {
            let normal = Mesh::face_normal(&tri).unwrap();
            assert!((normal - Vec3::Z).length() < 1e-6);
            for v in tri {
                assert!(v.x.abs() <= 1.0 && v.y.abs() <= 0.5 && v.z == 0.0);
            }
        }
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let cuboid = Mesh::cuboid(1.0, 2.0, 3.0);

        assert_eq!(cuboid.positions.len(), 24);
        assert_eq!(cuboid.triangle_count(), 12);
        for tri in cuboid.triangles() {
            let normal = Mesh::face_normal(&tri).unwrap();
            assert!(normal.dot(centroid(&tri)) > 0.0);
            for v in tri {
                assert!((v.abs() - Vec3::new(0.5, 1.0, 1.5)).length() < 1e-6);
            }
        }
    }

    #[test]
    fn test_uv_sphere_is_closed_and_outward() {
        let radius = 0.5;
        let sphere = Mesh::uv_sphere(radius, 8, 4);

        // Two pole fans plus two full quad rows
        assert_eq!(sphere.triangle_count(), 8 + 8 + 2 * 8 * 2);
        for v in &sphere.positions {
            assert!((v.length() - radius).abs() < 1e-5);
        }
        for tri in sphere.triangles() {
            let normal = Mesh::face_normal(&tri).expect("no degenerate triangles");
            assert!(normal.dot(centroid(&tri)) > 0.0);
        }
    }
}
