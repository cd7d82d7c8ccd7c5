//! Frame a photo with decorative overlays.

use std::path::PathBuf;

use dpframe_framing_core::overlay::{builtin_overlays, load_overlay_dir};
use dpframe_framing_core::{frame, CanvasSpec, FrameOverlay, InputImage};
use dpframe_storage::{FrameStore, FsFrameStore};

#[allow(clippy::too_many_arguments)]
pub fn run(
    input: PathBuf,
    output: PathBuf,
    width: u32,
    height: u32,
    padding: u32,
    background: String,
    anchor: String,
    overlay_paths: Vec<PathBuf>,
    overlay_dir: Option<PathBuf>,
    no_overlay: bool,
) -> anyhow::Result<()> {
    let canvas = CanvasSpec {
        width,
        height,
        padding,
        background: background.parse()?,
        anchor: anchor.parse()?,
    };
    canvas.validate()?;

    let bytes = std::fs::read(&input)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", input.display()))?;
    let photo = InputImage::decode(&bytes)?;
    let (photo_w, photo_h) = photo.dimensions();

    let overlays: Vec<FrameOverlay> = if no_overlay {
        vec![]
    } else if let Some(dir) = overlay_dir {
        let report = load_overlay_dir(&dir, width, height)?;
        for (path, reason) in &report.skipped {
            println!("Skipping overlay {}: {reason}", path.display());
        }
        if report.overlays.is_empty() {
            return Err(anyhow::anyhow!("no usable overlays in {}", dir.display()));
        }
        report.overlays
    } else if !overlay_paths.is_empty() {
        // Explicitly named overlays fail hard rather than being skipped.
        overlay_paths
            .iter()
            .map(|path| FrameOverlay::from_path(path, width, height))
            .collect::<Result<_, _>>()?
    } else {
        builtin_overlays(width, height)
    };

    println!(
        "Framing {} ({photo_w}x{photo_h}) onto a {width}x{height} canvas",
        input.display()
    );

    let outputs = frame(&photo, &canvas, &overlays)?;
    tracing::debug!("Pipeline produced {} output(s)", outputs.len());

    let store = FsFrameStore::new(&output);
    for framed in &outputs {
        let stored = store.store(framed)?;
        println!("  {} -> {}", framed.role, stored.path.display());
    }
    println!("Done: {} frame(s)", outputs.len());

    Ok(())
}
