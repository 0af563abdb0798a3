//! Procedural mesh generation for the supported solids.

use std::f64::consts::{PI, TAU};

use glam::{DVec3, Vec3};

use crate::error::{EncodeError, EncodeResult};

/// Largest vertex count addressable with u16 indices.
pub const MAX_VERTICES: u64 = u16::MAX as u64 + 1;

/// How the cube shares vertices between its faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexSharing {
    /// 8 corner vertices shared by all faces.
    ///
    /// Each corner carries the average of its three face normals, so shading
    /// is smoothed across edges. This is a known fidelity loss compared to
    /// [`VertexSharing::PerFace`].
    #[default]
    Shared,
    /// 24 vertices, 4 per face, each with its face's axis-aligned normal.
    PerFace,
}

/// The closed set of solids the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolidKind {
    /// Latitude/longitude tessellated sphere.
    Sphere {
        radius: f64,
        lat_segments: u32,
        lon_segments: u32,
    },
    /// Axis-aligned cube centered on the origin.
    Cube {
        sharing: VertexSharing,
        half_extent: f64,
    },
}

impl SolidKind {
    /// Number of vertices [`generate`] will emit for this solid.
    #[must_use]
    pub fn vertex_count(&self) -> u64 {
        match *self {
            Self::Sphere {
                lat_segments,
                lon_segments,
                ..
            } => (u64::from(lat_segments) + 1) * (u64::from(lon_segments) + 1),
            Self::Cube {
                sharing: VertexSharing::Shared,
                ..
            } => 8,
            Self::Cube {
                sharing: VertexSharing::PerFace,
                ..
            } => 24,
        }
    }
}

/// Generated triangle mesh.
///
/// Positions stay in double precision until they are packed, so meshes
/// anchored at earth-centered coordinates keep their local shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions in meters.
    pub positions: Vec<DVec3>,
    /// Unit vertex normals.
    pub normals: Vec<Vec3>,
    /// Counter-clockwise triangle list.
    pub indices: Vec<u16>,
}

impl Mesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Positions narrowed to the single precision stored in the container.
    #[must_use]
    pub fn positions_f32(&self) -> Vec<Vec3> {
        self.positions.iter().map(|p| p.as_vec3()).collect()
    }

    /// Check the topology invariants every generated mesh must satisfy.
    pub fn validate(&self) -> EncodeResult<()> {
        let invalid = |detail: String| EncodeError::DegenerateInput {
            context: "mesh topology",
            detail,
        };

        if self.normals.len() != self.positions.len() {
            return Err(invalid(format!(
                "{} normals for {} positions",
                self.normals.len(),
                self.positions.len()
            )));
        }
        check_vertex_count(self.positions.len() as u64)?;
        if !self.indices.len().is_multiple_of(3) {
            return Err(invalid(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }

        let count = self.positions.len();
        for (t, tri) in self.indices.chunks_exact(3).enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| usize::from(i) >= count) {
                return Err(invalid(format!(
                    "triangle {t} references vertex {index} of {count}"
                )));
            }
            if tri[0] == tri[1] || tri[0] == tri[2] || tri[1] == tri[2] {
                return Err(invalid(format!("triangle {t} repeats a vertex: {tri:?}")));
            }
        }

        Ok(())
    }
}

/// Fail if `vertex_count` cannot be addressed by u16 indices.
pub fn check_vertex_count(vertex_count: u64) -> EncodeResult<()> {
    if vertex_count > MAX_VERTICES {
        return Err(EncodeError::IndexOverflow { vertex_count });
    }
    Ok(())
}

/// Generate the mesh for `solid`, translated by `center`.
///
/// Pass `DVec3::ZERO` for an object-space mesh, or an ECEF anchor to bake
/// the absolute position into the vertices.
pub fn generate(solid: &SolidKind, center: DVec3) -> EncodeResult<Mesh> {
    if !center.is_finite() {
        return Err(EncodeError::DegenerateInput {
            context: "mesh center",
            detail: format!("{center} is not finite"),
        });
    }

    match *solid {
        SolidKind::Sphere {
            radius,
            lat_segments,
            lon_segments,
        } => {
            check_size("sphere radius", radius)?;
            if lat_segments == 0 || lon_segments == 0 {
                return Err(EncodeError::InvalidTessellation {
                    lat_segments,
                    lon_segments,
                });
            }
            check_vertex_count(solid.vertex_count())?;
            Ok(uv_sphere(center, radius, lat_segments, lon_segments))
        }
        SolidKind::Cube {
            sharing,
            half_extent,
        } => {
            check_size("cube half extent", half_extent)?;
            Ok(cube(center, half_extent, sharing))
        }
    }
}

fn check_size(context: &'static str, value: f64) -> EncodeResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EncodeError::DegenerateInput {
            context,
            detail: format!("{value} is not a positive finite size"),
        });
    }
    Ok(())
}

/// Row-major sphere with duplicated seam column and full pole rows.
///
/// The pole rows collapse to a point, so the first and last ring of
/// triangles have zero area.
fn uv_sphere(center: DVec3, radius: f64, lat_segments: u32, lon_segments: u32) -> Mesh {
    let columns = lon_segments + 1;
    let vertex_count = ((lat_segments + 1) * columns) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);

    for i in 0..=lat_segments {
        let theta = PI * f64::from(i) / f64::from(lat_segments);
        let (sin_theta, cos_theta) = theta.sin_cos();

        for j in 0..=lon_segments {
            let phi = TAU * f64::from(j) / f64::from(lon_segments);
            let (sin_phi, cos_phi) = phi.sin_cos();

            let unit = DVec3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            positions.push(center + radius * unit);
            normals.push(unit.as_vec3());
        }
    }

    let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);
    for i in 0..lat_segments {
        for j in 0..lon_segments {
            // Vertex count was checked against u16 range before generation.
            let first = (i * columns + j) as u16;
            let second = first + columns as u16;

            // Counter-clockwise seen from outside: phi before theta.
            indices.extend_from_slice(&[first, first + 1, second]);
            indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    Mesh {
        positions,
        normals,
        indices,
    }
}

/// Corner sign vectors; bit order is not significant, faces index into this.
const CORNERS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Face normal and its corners, counter-clockwise seen from outside.
const FACES: [([f32; 3], [u16; 4]); 6] = [
    ([0.0, 0.0, 1.0], [4, 5, 6, 7]),
    ([0.0, 0.0, -1.0], [0, 3, 2, 1]),
    ([1.0, 0.0, 0.0], [1, 2, 6, 5]),
    ([-1.0, 0.0, 0.0], [0, 4, 7, 3]),
    ([0.0, 1.0, 0.0], [3, 7, 6, 2]),
    ([0.0, -1.0, 0.0], [0, 1, 5, 4]),
];

fn quad_triangles(q: [u16; 4]) -> [u16; 6] {
    [q[0], q[1], q[2], q[0], q[2], q[3]]
}

fn cube(center: DVec3, half_extent: f64, sharing: VertexSharing) -> Mesh {
    let corner = |c: u16| center + half_extent * DVec3::from_array(CORNERS[usize::from(c)]);

    match sharing {
        VertexSharing::Shared => {
            let positions = (0..8).map(corner).collect();
            let normals = CORNERS
                .iter()
                .map(|c| DVec3::from_array(*c).normalize().as_vec3())
                .collect();
            let indices = FACES
                .iter()
                .flat_map(|(_, quad)| quad_triangles(*quad))
                .collect();

            Mesh {
                positions,
                normals,
                indices,
            }
        }
        VertexSharing::PerFace => {
            let mut mesh = Mesh::default();
            for (face, (normal, quad)) in FACES.iter().enumerate() {
                let base = (face * 4) as u16;
                for &c in quad {
                    mesh.positions.push(corner(c));
                    mesh.normals.push(Vec3::from_array(*normal));
                }
                mesh.indices
                    .extend(quad_triangles([base, base + 1, base + 2, base + 3]));
            }
            mesh
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sphere(radius: f64, lat_segments: u32, lon_segments: u32) -> SolidKind {
        SolidKind::Sphere {
            radius,
            lat_segments,
            lon_segments,
        }
    }

    fn triangle_normal(mesh: &Mesh, tri: &[u16]) -> DVec3 {
        let a = mesh.positions[usize::from(tri[0])];
        let b = mesh.positions[usize::from(tri[1])];
        let c = mesh.positions[usize::from(tri[2])];
        (b - a).cross(c - a)
    }

    #[test]
    fn test_sphere_counts() {
        let mesh = generate(&sphere(1.5, 32, 64), DVec3::ZERO).unwrap();
        assert_eq!(mesh.vertex_count(), 2145);
        assert_eq!(mesh.indices.len(), 12288);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_sphere_first_row_indices() {
        let mesh = generate(&sphere(1.0, 2, 3), DVec3::ZERO).unwrap();
        assert_eq!(&mesh.indices[..6], &[0, 1, 4, 4, 1, 5]);
    }

    #[test]
    fn test_sphere_faces_outward() {
        let mesh = generate(&sphere(2.0, 8, 16), DVec3::ZERO).unwrap();
        for tri in mesh.indices.chunks_exact(3) {
            let n = triangle_normal(&mesh, tri);
            if n.length() < 1e-9 {
                // Pole triangles collapse to zero area.
                continue;
            }
            let centroid = tri
                .iter()
                .map(|&i| mesh.positions[usize::from(i)])
                .sum::<DVec3>()
                / 3.0;
            assert!(n.dot(centroid) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn test_sphere_rejects_zero_segments() {
        assert_eq!(
            generate(&sphere(1.0, 0, 8), DVec3::ZERO),
            Err(EncodeError::InvalidTessellation {
                lat_segments: 0,
                lon_segments: 8
            })
        );
    }

    #[test]
    fn test_sphere_rejects_bad_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                generate(&sphere(radius, 4, 4), DVec3::ZERO),
                Err(EncodeError::DegenerateInput { .. })
            ));
        }
    }

    #[test]
    fn test_sphere_index_ceiling() {
        // 256 x 255 -> 257 * 256 = 65792 vertices.
        assert_eq!(
            generate(&sphere(1.0, 256, 255), DVec3::ZERO),
            Err(EncodeError::IndexOverflow {
                vertex_count: 65792
            })
        );
        // 255 x 255 -> 65536 vertices, the largest addressable mesh.
        let mesh = generate(&sphere(1.0, 255, 255), DVec3::ZERO).unwrap();
        assert_eq!(mesh.vertex_count() as u64, MAX_VERTICES);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_rejects_non_finite_center() {
        assert!(matches!(
            generate(&sphere(1.0, 4, 4), DVec3::new(f64::NAN, 0.0, 0.0)),
            Err(EncodeError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_shared_cube() {
        let solid = SolidKind::Cube {
            sharing: VertexSharing::Shared,
            half_extent: 1.5,
        };
        let mesh = generate(&solid, DVec3::ZERO).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        mesh.validate().unwrap();

        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(p.abs().abs_diff_eq(DVec3::splat(1.5), 0.0));
            // Averaged corner normal points the same way as the corner.
            assert!(p.normalize().as_vec3().abs_diff_eq(*n, 1e-6));
        }
    }

    #[test]
    fn test_per_face_cube() {
        let solid = SolidKind::Cube {
            sharing: VertexSharing::PerFace,
            half_extent: 0.5,
        };
        let mesh = generate(&solid, DVec3::ZERO).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        mesh.validate().unwrap();

        for tri in mesh.indices.chunks_exact(3) {
            let face_normal = triangle_normal(&mesh, tri).normalize().as_vec3();
            for &i in tri {
                assert!(face_normal.abs_diff_eq(mesh.normals[usize::from(i)], 1e-6));
            }
        }
    }

    #[test]
    fn test_cube_winding_outward() {
        let solid = SolidKind::Cube {
            sharing: VertexSharing::Shared,
            half_extent: 1.0,
        };
        let mesh = generate(&solid, DVec3::ZERO).unwrap();
        for tri in mesh.indices.chunks_exact(3) {
            let centroid = tri
                .iter()
                .map(|&i| mesh.positions[usize::from(i)])
                .sum::<DVec3>();
            assert!(triangle_normal(&mesh, tri).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_cube_translated() {
        let center = DVec3::new(10.0, -20.0, 30.0);
        let solid = SolidKind::Cube {
            sharing: VertexSharing::PerFace,
            half_extent: 1.0,
        };
        let mesh = generate(&solid, center).unwrap();
        for p in &mesh.positions {
            assert!((*p - center).abs().abs_diff_eq(DVec3::ONE, 1e-12));
        }
    }

    #[test]
    fn test_validate_catches_bad_topology() {
        let mut mesh = generate(
            &SolidKind::Cube {
                sharing: VertexSharing::Shared,
                half_extent: 1.0,
            },
            DVec3::ZERO,
        )
        .unwrap();

        let mut out_of_range = mesh.clone();
        out_of_range.indices[0] = 8;
        assert!(out_of_range.validate().is_err());

        let mut repeated = mesh.clone();
        repeated.indices[1] = repeated.indices[0];
        assert!(repeated.validate().is_err());

        mesh.indices.pop();
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_sphere_equator_triangle_faces_outward() {
        // Equator at i = 2 of 4; the first quad starts on the +X axis.
        let mesh = generate(&sphere(1.0, 4, 8), DVec3::ZERO).unwrap();
        let quad = 2 * 8;
        let tri = &mesh.indices[quad * 6..quad * 6 + 3];
        let n = triangle_normal(&mesh, tri);
        assert!(n.x > 0.0, "equator triangle {tri:?} has normal {n}");

        let outward = mesh
            .indices
            .chunks_exact(3)
            .filter(|tri| triangle_normal(&mesh, tri).length() > 1e-9)
            .all(|tri| {
                let a = mesh.positions[usize::from(tri[0])];
                triangle_normal(&mesh, tri).dot(a) > 0.0
            });
        assert!(outward);
    }

    proptest! {
        #[test]
        fn prop_sphere_geometry(
            radius in 0.01f64..100.0,
            lat_segments in 1u32..48,
            lon_segments in 1u32..48,
        ) {
            let center = DVec3::new(-3_957_000.0, 3_350_000.0, 3_697_000.0);
            let mesh = generate(&sphere(radius, lat_segments, lon_segments), center).unwrap();

            prop_assert_eq!(
                mesh.indices.len() as u32,
                6 * lat_segments * lon_segments
            );
            prop_assert!(mesh.validate().is_ok());
            for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
                prop_assert!((n.length() - 1.0).abs() < 1e-5);
                prop_assert!(((*p - center).length() - radius).abs() < 1e-4);
            }
        }
    }
}
