//! Command-line parameter parsing.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use geoglb::{
    AssetRequest, GeodeticPoint, ModelPlacement, Placement, Result, SolidKind, VertexSharing,
};

/// Default anchor longitude (Tokyo, Kasumigaseki).
const DEFAULT_LON: f64 = 139.753_509_375_449_3;
/// Default anchor latitude.
const DEFAULT_LAT: f64 = 35.653_611_007_406_39;
/// Default anchor height above the ellipsoid in meters.
const DEFAULT_HEIGHT: f64 = 100.0;
/// Default sphere radius in meters.
const DEFAULT_RADIUS: f64 = 1.5;
const DEFAULT_LAT_SEGMENTS: u32 = 32;
const DEFAULT_LON_SEGMENTS: u32 = 64;
/// Default cube half extent in meters.
const DEFAULT_HALF_EXTENT: f64 = 1.5;

/// Which solid to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SolidArg {
    #[default]
    Sphere,
    Cube,
}

impl SolidArg {
    fn label(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Cube => "cube",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Self::Sphere => "Red Sphere",
            Self::Cube => "Red Cube",
        }
    }
}

/// Cube vertex sharing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SharingArg {
    /// 8 shared corners with averaged normals.
    #[default]
    Shared,
    /// 24 vertices with flat per-face normals.
    PerFace,
}

impl From<SharingArg> for VertexSharing {
    fn from(value: SharingArg) -> Self {
        match value {
            SharingArg::Shared => VertexSharing::Shared,
            SharingArg::PerFace => VertexSharing::PerFace,
        }
    }
}

/// Where vertex positions are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlacementArg {
    /// Earth-centered coordinates baked into the vertices.
    Absolute,
    /// Object-space coordinates around the origin.
    Local,
}

impl From<PlacementArg> for Placement {
    fn from(value: PlacementArg) -> Self {
        match value {
            PlacementArg::Absolute => Placement::Absolute,
            PlacementArg::Local => Placement::Local,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Generate a georeferenced glTF model and its CZML placement")]
pub struct CliArgs {
    /// Solid to generate.
    #[arg(long, value_enum, default_value_t = SolidArg::default())]
    solid: SolidArg,

    /// Cube vertex sharing strategy.
    #[arg(long, value_enum, default_value_t = SharingArg::default())]
    sharing: SharingArg,

    /// Sphere radius in meters.
    #[arg(long, default_value_t = DEFAULT_RADIUS)]
    radius: f64,

    /// Sphere latitude segments.
    #[arg(long, default_value_t = DEFAULT_LAT_SEGMENTS)]
    lat_segments: u32,

    /// Sphere longitude segments.
    #[arg(long, default_value_t = DEFAULT_LON_SEGMENTS)]
    lon_segments: u32,

    /// Cube half extent in meters.
    #[arg(long, default_value_t = DEFAULT_HALF_EXTENT)]
    half_extent: f64,

    /// Anchor longitude in degrees.
    #[arg(long, default_value_t = DEFAULT_LON, allow_negative_numbers = true)]
    lon: f64,

    /// Anchor latitude in degrees.
    #[arg(long, default_value_t = DEFAULT_LAT, allow_negative_numbers = true)]
    lat: f64,

    /// Anchor height above the ellipsoid in meters.
    #[arg(long, default_value_t = DEFAULT_HEIGHT, allow_negative_numbers = true)]
    height: f64,

    /// Vertex placement (default: absolute for spheres, local for cubes).
    #[arg(long, value_enum)]
    placement: Option<PlacementArg>,

    /// Output container path (default: `<solid>.glb`).
    #[arg(long)]
    output: Option<PathBuf>,

    /// CZML sidecar path (default: output path with a `.czml` extension).
    #[arg(long)]
    czml: Option<PathBuf>,

    /// Skip writing the CZML sidecar.
    #[arg(long, conflicts_with = "czml")]
    no_czml: bool,

    /// CZML packet id (default: `<solid>1`).
    #[arg(long)]
    id: Option<String>,

    /// CZML display name.
    #[arg(long)]
    name: Option<String>,

    /// Model reference written into the CZML (default: output file name).
    #[arg(long)]
    model_uri: Option<String>,

    /// Model display scale.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Minimum on-screen model size in pixels.
    #[arg(long, default_value_t = 1)]
    min_pixel_size: u32,

    /// Height written into the CZML position (default: `--height`).
    #[arg(long, allow_negative_numbers = true)]
    czml_height: Option<f64>,
}

/// The CZML document to write alongside the container.
#[derive(Debug, Clone, PartialEq)]
pub struct Sidecar {
    pub path: PathBuf,
    pub placement: ModelPlacement,
}

/// Fully resolved launch parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchParams {
    pub request: AssetRequest,
    pub output: PathBuf,
    pub sidecar: Option<Sidecar>,
}

impl CliArgs {
    /// Resolve defaults and validate the anchor coordinates.
    pub fn resolve(self) -> Result<LaunchParams> {
        let solid = match self.solid {
            SolidArg::Sphere => SolidKind::Sphere {
                radius: self.radius,
                lat_segments: self.lat_segments,
                lon_segments: self.lon_segments,
            },
            SolidArg::Cube => SolidKind::Cube {
                sharing: self.sharing.into(),
                half_extent: self.half_extent,
            },
        };
        let placement = self.placement.map_or(
            match self.solid {
                SolidArg::Sphere => Placement::Absolute,
                SolidArg::Cube => Placement::Local,
            },
            Placement::from,
        );
        let anchor = GeodeticPoint::new(self.lon, self.lat, self.height)?;
        let output = self
            .output
            .unwrap_or_else(|| PathBuf::from(format!("{}.glb", self.solid.label())));

        let sidecar = if self.no_czml {
            None
        } else {
            let position = GeodeticPoint::new(
                self.lon,
                self.lat,
                self.czml_height.unwrap_or(self.height),
            )?;
            Some(Sidecar {
                path: self.czml.unwrap_or_else(|| output.with_extension("czml")),
                placement: ModelPlacement {
                    id: self
                        .id
                        .unwrap_or_else(|| format!("{}1", self.solid.label())),
                    name: self
                        .name
                        .unwrap_or_else(|| self.solid.display_name().to_owned()),
                    position,
                    model_uri: self.model_uri.unwrap_or_else(|| file_name(&output)),
                    scale: self.scale,
                    minimum_pixel_size: self.min_pixel_size,
                },
            })
        };

        Ok(LaunchParams {
            request: AssetRequest {
                solid,
                anchor,
                placement,
            },
            output,
            sidecar,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Parse and resolve launch parameters from the process arguments.
pub fn parse() -> Result<LaunchParams> {
    CliArgs::parse().resolve()
}
