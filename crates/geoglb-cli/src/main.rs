//! Generate a georeferenced glTF model and the CZML document that places it.
//!
//! The container is written first, then the sidecar; each write replaces
//! its destination atomically.

mod params;

use std::process::ExitCode;

use geoglb::{SceneDescriptor, build_asset};
use params::LaunchParams;

fn main() -> ExitCode {
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    match params::parse().and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(params: LaunchParams) -> geoglb::Result<()> {
    let asset = build_asset(&params.request)?;
    asset.write(&params.output)?;
    tracing::info!(
        path = %params.output.display(),
        vertices = asset.vertex_count,
        indices = asset.index_count,
        bytes = asset.glb.bin.len(),
        "wrote model"
    );

    if let Some(sidecar) = params.sidecar {
        let model_uri = sidecar.placement.model_uri.clone();
        SceneDescriptor::new(vec![sidecar.placement]).write(&sidecar.path)?;
        tracing::info!(path = %sidecar.path.display(), model_uri = %model_uri, "wrote czml");
    }

    Ok(())
}
