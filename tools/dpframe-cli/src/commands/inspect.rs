//! Show decode and placement information for a photo.

use std::path::PathBuf;

use dpframe_framing_core::placement::compute_placement;
use dpframe_framing_core::{CanvasSpec, InputImage};

pub fn run(input: PathBuf) -> anyhow::Result<()> {
    let bytes = std::fs::read(&input)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", input.display()))?;
    let photo = InputImage::decode(&bytes)?;
    let (width, height) = photo.dimensions();

    let canvas = CanvasSpec::dp();
    let placement = compute_placement(width, height, &canvas)?;

    println!("Input: {}", input.display());
    println!("  Format: {:?}", photo.format());
    println!("  Dimensions: {width}x{height}");
    println!(
        "Placement on the default {}x{} canvas:",
        canvas.width, canvas.height
    );
    println!("  Scale: {:.4}", placement.scale);
    println!("  Scaled size: {}x{}", placement.width, placement.height);
    println!("  Offset: ({}, {})", placement.x, placement.y);

    Ok(())
}
