//! DPFrame server entry point.

use std::str::FromStr;
use std::sync::Arc;

use dpframe_common::config::{AppConfig, CanvasDefaults};
use dpframe_common::logging::init_logging;
use dpframe_framing_core::overlay::{builtin_overlays, load_overlay_dir};
use dpframe_framing_core::{Anchor, Background, CanvasSpec, DecodeLimits};
use dpframe_storage::FsFrameStore;

use dpframe_server::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    init_logging(&config.logging);

    let canvas = canvas_from_config(&config.canvas)?;
    canvas.validate()?;

    let overlays = match &config.storage.overlay_dir {
        Some(dir) => {
            let report = load_overlay_dir(dir, canvas.width, canvas.height)?;
            for (path, reason) in &report.skipped {
                tracing::warn!("Overlay {:?} unusable: {}", path, reason);
            }
            if report.overlays.is_empty() {
                anyhow::bail!("no usable overlays in {:?}", dir);
            }
            report.overlays
        }
        None => builtin_overlays(canvas.width, canvas.height),
    };
    tracing::info!(
        "Serving {} overlay(s): {}",
        overlays.len(),
        overlays
            .iter()
            .map(|o| o.name().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let store = if config.storage.persist_uploads {
        tracing::info!("Persisting frames under {:?}", config.storage.uploads_dir);
        Some(Arc::new(
            FsFrameStore::new(&config.storage.uploads_dir)
                .with_public_base(&config.storage.public_base),
        ))
    } else {
        None
    };

    let state = AppState {
        canvas,
        limits: DecodeLimits {
            max_pixels: config.limits.max_decoded_pixels,
            max_bytes: config.limits.max_decoded_bytes,
        },
        overlays: Arc::new(overlays),
        store,
    };

    let app = router(state, config.server.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Resolve the configured canvas strings into a validated spec.
fn canvas_from_config(defaults: &CanvasDefaults) -> anyhow::Result<CanvasSpec> {
    Ok(CanvasSpec {
        width: defaults.width,
        height: defaults.height,
        padding: defaults.padding,
        background: Background::from_str(&defaults.background)?,
        anchor: Anchor::from_str(&defaults.anchor)?,
    })
}
