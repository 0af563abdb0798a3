//! Generate georeferenced meshes and encode them as binary glTF.
//!
//! This crate holds the pure, synchronous core of the asset pipeline:
//!
//! 1. [`geodetic`]: WGS84 longitude/latitude/height to earth-centered coordinates
//! 2. [`mesh`]: UV-sphere and cube generation, optionally anchored at an ECEF point
//! 3. [`pack`]: typed arrays into one aligned little-endian buffer
//! 4. [`document`]: the glTF scene, mesh, material, buffer-view and accessor graph
//! 5. [`glb`]: header and chunk framing of the final container
//!
//! Nothing here touches the file system or logs; callers own I/O.
//!
//! # Example
//!
//! ```
//! use geoglb_encode::{Glb, SolidKind, VertexSharing, assemble, generate, pack_mesh};
//! use glam::DVec3;
//!
//! let solid = SolidKind::Cube { sharing: VertexSharing::Shared, half_extent: 1.5 };
//! let mesh = generate(&solid, DVec3::ZERO)?;
//! let packed = pack_mesh(&mesh)?;
//! let glb = Glb { document: assemble(&packed), bin: packed.data };
//! let bytes = glb.to_vec()?;
//! assert_eq!(&bytes[..4], b"glTF");
//! # Ok::<(), geoglb_encode::EncodeError>(())
//! ```

pub mod document;
mod error;
pub mod geodetic;
pub mod glb;
pub mod mesh;
pub mod pack;

pub use document::{Document, assemble};
pub use error::{EncodeError, EncodeResult};
pub use geodetic::{GeodeticPoint, ecef_to_geodetic, geodetic_to_ecef};
pub use glb::Glb;
pub use mesh::{Mesh, SolidKind, VertexSharing, generate};
pub use pack::{Bounds, ByteRegion, PackedMesh, pack, pack_mesh};
