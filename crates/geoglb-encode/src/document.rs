//! The glTF structural document and its assembly from a packed mesh.
//!
//! Only the subset of glTF 2.0 this crate emits is modeled. Deserialization
//! ignores unknown fields, so documents written by other tools can be read
//! as long as the modeled fields are present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pack::{ByteRegion, PackedMesh};

/// glTF version declared in `asset.version`.
pub const GLTF_VERSION: &str = "2.0";

/// Name of the unlit material extension.
pub const UNLIT_EXTENSION: &str = "KHR_materials_unlit";

/// Value written to `asset.generator`.
pub const GENERATOR: &str = concat!("geoglb ", env!("CARGO_PKG_VERSION"));

/// Flat red, fully opaque.
pub const BASE_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Attribute name of the position accessor.
pub const POSITION: &str = "POSITION";

/// Attribute name of the normal accessor.
pub const NORMAL: &str = "NORMAL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub asset: Asset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<u32>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub buffers: Vec<Buffer>,
    #[serde(default)]
    pub buffer_views: Vec<BufferView>,
    #[serde(default)]
    pub accessors: Vec<Accessor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub nodes: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub mesh: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub attributes: BTreeMap<String, u32>,
    pub indices: u32,
    pub material: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    #[serde(default)]
    pub extensions: MaterialExtensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    pub base_color_factor: [f32; 4],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialExtensions {
    #[serde(
        rename = "KHR_materials_unlit",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unlit: Option<Unlit>,
}

/// Marker object for the unlit extension; carries no properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Unlit {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub byte_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: u32,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub target: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub buffer_view: u32,
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub shape: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f32>>,
}

fn buffer_view(region: &ByteRegion) -> BufferView {
    BufferView {
        buffer: 0,
        byte_offset: region.offset,
        byte_length: region.length,
        target: region.target.gl_code(),
    }
}

fn accessor(buffer_view: u32, region: &ByteRegion) -> Accessor {
    Accessor {
        buffer_view,
        component_type: region.component_type.gl_code(),
        count: region.count,
        shape: region.shape.as_str().to_owned(),
        min: None,
        max: None,
    }
}

/// Build the single-mesh scene describing `packed`.
///
/// Buffer views and accessors are emitted one per region in the order
/// positions, normals, indices, so each accessor index equals its view
/// index. Only the position accessor carries bounds.
#[must_use]
pub fn assemble(packed: &PackedMesh) -> Document {
    let regions = [&packed.positions, &packed.normals, &packed.indices];

    let buffer_views = regions.iter().map(|r| buffer_view(r)).collect();
    let mut accessors: Vec<Accessor> = (0u32..)
        .zip(regions)
        .map(|(view, region)| accessor(view, region))
        .collect();
    if let Some(bounds) = packed.bounds {
        accessors[0].min = Some(bounds.min.to_array().to_vec());
        accessors[0].max = Some(bounds.max.to_array().to_vec());
    }

    Document {
        asset: Asset {
            version: GLTF_VERSION.to_owned(),
            generator: Some(GENERATOR.to_owned()),
        },
        scene: Some(0),
        scenes: vec![Scene { nodes: vec![0] }],
        nodes: vec![Node { mesh: 0 }],
        meshes: vec![Mesh {
            primitives: vec![Primitive {
                attributes: BTreeMap::from([(POSITION.to_owned(), 0), (NORMAL.to_owned(), 1)]),
                indices: 2,
                material: 0,
            }],
        }],
        materials: vec![Material {
            pbr_metallic_roughness: PbrMetallicRoughness {
                base_color_factor: BASE_COLOR,
            },
            extensions: MaterialExtensions {
                unlit: Some(Unlit {}),
            },
        }],
        buffers: vec![Buffer {
            byte_length: packed.data.len(),
        }],
        buffer_views,
        accessors,
        extensions_used: vec![UNLIT_EXTENSION.to_owned()],
    }
}
