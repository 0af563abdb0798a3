//! CZML scene descriptor that places models on the globe.
//!
//! The document is a JSON array: a header packet followed by one packet per
//! model, each with a cartographic position and a reference to its glTF.

use std::path::Path;

use geoglb_encode::GeodeticPoint;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::write::write_atomic;

/// CZML version declared by the header packet.
pub const CZML_VERSION: &str = "1.0";

/// One model placed at a geodetic position.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPlacement {
    pub id: String,
    pub name: String,
    pub position: GeodeticPoint,
    /// Local path or URL of the `.glb`.
    pub model_uri: String,
    pub scale: f64,
    /// Smallest on-screen size in pixels, regardless of distance.
    pub minimum_pixel_size: u32,
}

/// A CZML document listing model placements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDescriptor {
    pub placements: Vec<ModelPlacement>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Packet<'a> {
    Header {
        id: &'static str,
        version: &'static str,
    },
    Model {
        id: &'a str,
        name: &'a str,
        position: Position,
        model: Model<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Position {
    cartographic_degrees: [f64; 3],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Model<'a> {
    gltf: &'a str,
    scale: f64,
    minimum_pixel_size: u32,
}

impl SceneDescriptor {
    #[must_use]
    pub fn new(placements: Vec<ModelPlacement>) -> Self {
        Self { placements }
    }

    fn packets(&self) -> Vec<Packet<'_>> {
        let header = Packet::Header {
            id: "document",
            version: CZML_VERSION,
        };
        std::iter::once(header)
            .chain(self.placements.iter().map(|p| Packet::Model {
                id: &p.id,
                name: &p.name,
                position: Position {
                    cartographic_degrees: [
                        p.position.longitude,
                        p.position.latitude,
                        p.position.height,
                    ],
                },
                model: Model {
                    gltf: &p.model_uri,
                    scale: p.scale,
                    minimum_pixel_size: p.minimum_pixel_size,
                },
            }))
            .collect()
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.packets()).map_err(|e| Error::Serialize {
            context: "czml",
            message: e.to_string(),
        })
    }

    /// Serialize and write the document, replacing `path` atomically.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        write_atomic(path, json.as_bytes())
    }
}
