//! Write the built-in overlay PNGs to an assets directory.
//!
//! One-time asset production: the server and CLI can synthesize these
//! frames in memory, but a directory of PNGs is what external overlay
//! sets look like, so this is also the template for custom frames.

use std::path::PathBuf;

use dpframe_framing_core::overlay::builtin_overlays;
use dpframe_framing_core::pipeline::encode_png;

pub fn run(output: PathBuf, width: u32, height: u32) -> anyhow::Result<()> {
    std::fs::create_dir_all(&output)?;

    for overlay in builtin_overlays(width, height) {
        let path = output.join(format!("{}.png", overlay.name()));
        let png = encode_png(overlay.image())?;
        std::fs::write(&path, png)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
