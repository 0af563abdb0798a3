//! Packing typed vertex and index arrays into one flat little-endian buffer.

use glam::Vec3;

use crate::error::EncodeResult;
use crate::mesh::{Mesh, check_vertex_count};

/// Byte written into alignment gaps inside the flat buffer.
pub const FILLER_BYTE: u8 = 0;

/// Scalar type of each component in a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    F32,
    U16,
}

impl ComponentType {
    /// Size in bytes, which is also the required alignment.
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::U16 => 2,
        }
    }

    /// glTF `componentType` code.
    #[must_use]
    pub fn gl_code(self) -> u32 {
        match self {
            Self::F32 => 5126,
            Self::U16 => 5123,
        }
    }
}

/// Number and arrangement of components per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape {
    Vec3,
    Scalar,
}

impl ElementShape {
    #[must_use]
    pub fn component_count(self) -> usize {
        match self {
            Self::Vec3 => 3,
            Self::Scalar => 1,
        }
    }

    /// glTF accessor `type` string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vec3 => "VEC3",
            Self::Scalar => "SCALAR",
        }
    }
}

/// Intended GPU binding of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionTarget {
    VertexAttribute,
    Index,
}

impl RegionTarget {
    /// glTF buffer-view `target` code.
    #[must_use]
    pub fn gl_code(self) -> u32 {
        match self {
            Self::VertexAttribute => 34962,
            Self::Index => 34963,
        }
    }
}

/// A typed span of the flat buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRegion {
    /// Start offset in bytes, a multiple of the component size.
    pub offset: usize,
    /// Length in bytes, excluding any trailing padding.
    pub length: usize,
    pub component_type: ComponentType,
    pub shape: ElementShape,
    /// Number of elements (not components).
    pub count: usize,
    pub target: RegionTarget,
}

impl ByteRegion {
    /// First byte past the region.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Borrowed input array for [`pack`].
#[derive(Debug, Clone, Copy)]
pub enum TypedArray<'a> {
    /// Float triples, bound as a vertex attribute.
    Vec3F32(&'a [Vec3]),
    /// 16-bit scalars, bound as triangle indices.
    ScalarU16(&'a [u16]),
}

impl TypedArray<'_> {
    fn component_type(&self) -> ComponentType {
        match self {
            Self::Vec3F32(_) => ComponentType::F32,
            Self::ScalarU16(_) => ComponentType::U16,
        }
    }

    fn shape(&self) -> ElementShape {
        match self {
            Self::Vec3F32(_) => ElementShape::Vec3,
            Self::ScalarU16(_) => ElementShape::Scalar,
        }
    }

    fn target(&self) -> RegionTarget {
        match self {
            Self::Vec3F32(_) => RegionTarget::VertexAttribute,
            Self::ScalarU16(_) => RegionTarget::Index,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Vec3F32(values) => values.len(),
            Self::ScalarU16(values) => values.len(),
        }
    }

    fn write_le(&self, out: &mut Vec<u8>) {
        match self {
            Self::Vec3F32(values) => {
                for v in *values {
                    for c in v.to_array() {
                        out.extend_from_slice(&c.to_le_bytes());
                    }
                }
            }
            Self::ScalarU16(values) => {
                for v in *values {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
        }
    }
}

/// Flat buffer plus the layout of each packed array, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedBuffer {
    pub data: Vec<u8>,
    pub regions: Vec<ByteRegion>,
}

/// Append `filler` until `buffer.len()` is a multiple of `alignment`.
pub fn pad_to_alignment(buffer: &mut Vec<u8>, alignment: usize, filler: u8) {
    let padding = (alignment - buffer.len() % alignment) % alignment;
    buffer.resize(buffer.len() + padding, filler);
}

/// Pack `arrays` back to back in the given order.
///
/// Each region starts at a multiple of its component size. Regions whose
/// predecessor already ends aligned follow it with no gap.
#[must_use]
pub fn pack(arrays: &[TypedArray<'_>]) -> PackedBuffer {
    let total: usize = arrays
        .iter()
        .map(|a| a.len() * a.shape().component_count() * a.component_type().size())
        .sum();
    let mut data = Vec::with_capacity(total + arrays.len() * 4);
    let mut regions = Vec::with_capacity(arrays.len());

    for array in arrays {
        let component_type = array.component_type();
        pad_to_alignment(&mut data, component_type.size(), FILLER_BYTE);

        let offset = data.len();
        array.write_le(&mut data);
        regions.push(ByteRegion {
            offset,
            length: data.len() - offset,
            component_type,
            shape: array.shape(),
            count: array.len(),
            target: array.target(),
        });
    }

    PackedBuffer { data, regions }
}

/// Axis-aligned bounds of the packed positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Component-wise min and max, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(
            Self {
                min: *first,
                max: *first,
            },
            |b, p| Self {
                min: b.min.min(*p),
                max: b.max.max(*p),
            },
        ))
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// A mesh packed as positions, normals, then indices.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedMesh {
    pub data: Vec<u8>,
    pub positions: ByteRegion,
    pub normals: ByteRegion,
    pub indices: ByteRegion,
    /// Bounds of the single-precision positions actually written.
    pub bounds: Option<Bounds>,
}

/// Pack a generated mesh in the conventional attribute order.
pub fn pack_mesh(mesh: &Mesh) -> EncodeResult<PackedMesh> {
    check_vertex_count(mesh.positions.len() as u64)?;

    let positions = mesh.positions_f32();
    let bounds = Bounds::from_points(&positions);
    let PackedBuffer { data, regions } = pack(&[
        TypedArray::Vec3F32(&positions),
        TypedArray::Vec3F32(&mesh.normals),
        TypedArray::ScalarU16(&mesh.indices),
    ]);

    Ok(PackedMesh {
        data,
        positions: regions[0],
        normals: regions[1],
        indices: regions[2],
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{SolidKind, VertexSharing, generate};
    use glam::DVec3;

    fn assert_contiguous(buffer: &PackedBuffer) {
        let mut cursor = 0;
        for region in &buffer.regions {
            assert!(region.offset >= cursor, "regions overlap");
            assert!(
                region.offset - cursor < region.component_type.size(),
                "gap larger than alignment padding"
            );
            assert_eq!(region.offset % region.component_type.size(), 0);
            assert_eq!(
                region.length,
                region.count * region.shape.component_count() * region.component_type.size()
            );
            cursor = region.end();
        }
        assert_eq!(cursor, buffer.data.len());
    }

    #[test]
    fn test_pack_empty() {
        let packed = pack(&[]);
        assert!(packed.data.is_empty());
        assert!(packed.regions.is_empty());
    }

    #[test]
    fn test_pack_back_to_back() {
        let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
        let normals = [Vec3::Y, Vec3::Y];
        let indices = [0u16, 1, 0];
        let packed = pack(&[
            TypedArray::Vec3F32(&positions),
            TypedArray::Vec3F32(&normals),
            TypedArray::ScalarU16(&indices),
        ]);

        assert_eq!(packed.data.len(), 24 + 24 + 6);
        assert_eq!(packed.regions[1].offset, 24);
        assert_eq!(packed.regions[2].offset, 48);
        assert_eq!(packed.regions[2].target, RegionTarget::Index);
        assert_eq!(&packed.data[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&packed.data[48..50], &0u16.to_le_bytes());
        assert_eq!(&packed.data[50..52], &1u16.to_le_bytes());
        assert_contiguous(&packed);
    }

    #[test]
    fn test_pack_pads_floats_after_odd_indices() {
        let indices = [0u16, 1, 2];
        let positions = [Vec3::X];
        let packed = pack(&[
            TypedArray::ScalarU16(&indices),
            TypedArray::Vec3F32(&positions),
        ]);

        // 6 index bytes, 2 filler bytes, 12 float bytes.
        assert_eq!(packed.regions[1].offset, 8);
        assert_eq!(&packed.data[6..8], &[FILLER_BYTE; 2]);
        assert_eq!(packed.data.len(), 20);
        assert_contiguous(&packed);
    }

    #[test]
    fn test_pad_to_alignment() {
        let mut buffer = vec![1u8; 5];
        pad_to_alignment(&mut buffer, 4, 0x20);
        assert_eq!(buffer, vec![1, 1, 1, 1, 1, 0x20, 0x20, 0x20]);

        pad_to_alignment(&mut buffer, 4, 0x20);
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn test_bounds_match_naive_scan() {
        let mesh = generate(
            &SolidKind::Sphere {
                radius: 1.5,
                lat_segments: 7,
                lon_segments: 11,
            },
            DVec3::new(100.0, -50.0, 25.0),
        )
        .unwrap();
        let packed = pack_mesh(&mesh).unwrap();
        let bounds = packed.bounds.unwrap();

        let positions = mesh.positions_f32();
        for axis in 0..3 {
            let values = positions.iter().map(|p| p[axis]);
            let min = values.clone().fold(f32::INFINITY, f32::min);
            let max = values.fold(f32::NEG_INFINITY, f32::max);
            assert_eq!(bounds.min[axis], min);
            assert_eq!(bounds.max[axis], max);
        }
    }

    #[test]
    fn test_bounds_empty() {
        assert_eq!(Bounds::from_points(&[]), None);
    }

    #[test]
    fn test_pack_mesh_layout() {
        let mesh = generate(
            &SolidKind::Cube {
                sharing: VertexSharing::Shared,
                half_extent: 1.5,
            },
            DVec3::ZERO,
        )
        .unwrap();
        let packed = pack_mesh(&mesh).unwrap();

        assert_eq!(packed.positions.offset, 0);
        assert_eq!(packed.positions.length, 96);
        assert_eq!(packed.normals.offset, 96);
        assert_eq!(packed.indices.offset, 192);
        assert_eq!(packed.indices.count, 36);
        assert_eq!(packed.indices.offset % 2, 0);
        assert_eq!(packed.data.len(), 192 + 72);

        let bounds = packed.bounds.unwrap();
        assert_eq!(bounds.min, Vec3::splat(-1.5));
        assert_eq!(bounds.max, Vec3::splat(1.5));
    }
}
