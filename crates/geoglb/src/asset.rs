//! The end-to-end asset pipeline.

use std::path::Path;

use geoglb_encode::{Bounds, GeodeticPoint, Glb, SolidKind, assemble, generate, pack_mesh};
use glam::DVec3;

use crate::error::Result;
use crate::write::write_atomic;

/// Where the mesh vertices live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Vertices are earth-centered: the anchor is added to every position.
    Absolute,
    /// Vertices are object-space around the origin; the viewer places the
    /// model at the anchor.
    Local,
}

/// Everything needed to build one asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetRequest {
    pub solid: SolidKind,
    pub anchor: GeodeticPoint,
    pub placement: Placement,
}

/// A fully encoded asset held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// The anchor converted to earth-centered coordinates.
    pub anchor_ecef: DVec3,
    pub glb: Glb,
    pub vertex_count: usize,
    pub index_count: usize,
    /// Bounds of the position accessor.
    pub bounds: Option<Bounds>,
}

impl Asset {
    /// Encode the container bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.glb.to_vec()?)
    }

    /// Encode and write the container, replacing `path` atomically.
    pub fn write(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        write_atomic(path, &bytes)
    }
}

/// Run transform, generation, packing and assembly for `request`.
pub fn build_asset(request: &AssetRequest) -> Result<Asset> {
    request.anchor.validate()?;
    let anchor_ecef = request.anchor.to_ecef();
    tracing::info!(
        lon = request.anchor.longitude,
        lat = request.anchor.latitude,
        height = request.anchor.height,
        x = anchor_ecef.x,
        y = anchor_ecef.y,
        z = anchor_ecef.z,
        "anchor"
    );

    let center = match request.placement {
        Placement::Absolute => anchor_ecef,
        Placement::Local => DVec3::ZERO,
    };
    let mesh = generate(&request.solid, center)?;
    mesh.validate()?;
    tracing::info!(
        solid = ?request.solid,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "generated mesh"
    );

    let packed = pack_mesh(&mesh)?;
    for (kind, region) in [
        ("positions", &packed.positions),
        ("normals", &packed.normals),
        ("indices", &packed.indices),
    ] {
        tracing::debug!(
            kind,
            offset = region.offset,
            length = region.length,
            count = region.count,
            "packed region"
        );
    }

    let document = assemble(&packed);
    let bounds = packed.bounds;
    if let Some(b) = bounds {
        tracing::debug!(min = %b.min, max = %b.max, "position bounds");
    }

    Ok(Asset {
        anchor_ecef,
        vertex_count: mesh.vertex_count(),
        index_count: mesh.indices.len(),
        bounds,
        glb: Glb {
            document,
            bin: packed.data,
        },
    })
}
