//! Build and write georeferenced glTF assets.
//!
//! This crate wraps the synchronous core in [`geoglb_encode`] with a single
//! pipeline entry point, all-or-nothing file output, and the CZML sidecar
//! that tells a globe viewer where to place the model.
//!
//! # Example
//!
//! ```no_run
//! use geoglb::{AssetRequest, Placement, build_asset};
//! use geoglb_encode::{GeodeticPoint, SolidKind};
//!
//! let request = AssetRequest {
//!     solid: SolidKind::Sphere { radius: 1.5, lat_segments: 32, lon_segments: 64 },
//!     anchor: GeodeticPoint::new(139.7535, 35.6536, 100.0)?,
//!     placement: Placement::Absolute,
//! };
//! let asset = build_asset(&request)?;
//! asset.write(std::path::Path::new("sphere.glb"))?;
//! # Ok::<(), geoglb::Error>(())
//! ```

pub mod asset;
pub mod czml;
mod error;
pub mod write;

pub use asset::{Asset, AssetRequest, Placement, build_asset};
pub use czml::{ModelPlacement, SceneDescriptor};
pub use error::{Error, Result};
pub use write::write_atomic;

// Re-export core types for convenience.
pub use geoglb_encode::{
    Bounds, EncodeError, GeodeticPoint, Glb, SolidKind, VertexSharing, geodetic_to_ecef,
};
