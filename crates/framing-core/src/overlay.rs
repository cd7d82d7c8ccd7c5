//! Decorative frame overlays.
//!
//! An overlay is a named canvas-sized RGBA image with alpha, composited
//! on top of the placed photo. Overlays come from two sources: PNG files
//! in an assets directory, or the built-in frames synthesized here (the
//! same two designs the original tool produced from vector markup).

use std::path::{Path, PathBuf};

use dpframe_common::{DpframeError, DpframeResult};
use image::{Rgba, RgbaImage};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A named decorative frame, decoded and ready to composite.
#[derive(Debug, Clone)]
pub struct FrameOverlay {
    name: String,
    image: RgbaImage,
}

impl FrameOverlay {
    /// Wrap an already-decoded RGBA image as an overlay.
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    /// Decode an overlay from raw bytes, rejecting anything that does not
    /// match the expected canvas dimensions.
    pub fn from_bytes(
        name: impl Into<String>,
        bytes: &[u8],
        width: u32,
        height: u32,
    ) -> DpframeResult<Self> {
        let name = name.into();
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| DpframeError::overlay(&name, format!("decode failed: {e}")))?;
        let image = decoded.to_rgba8();
        if image.dimensions() != (width, height) {
            return Err(DpframeError::overlay(
                &name,
                format!(
                    "expected {width}x{height}, got {}x{}",
                    image.width(),
                    image.height()
                ),
            ));
        }
        Ok(Self { name, image })
    }

    /// Load one overlay from a PNG file, named after its file stem.
    pub fn from_path(path: &Path, width: u32, height: u32) -> DpframeResult<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("overlay")
            .to_string();
        let bytes = std::fs::read(path).map_err(|_| DpframeError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        Self::from_bytes(name, &bytes, width, height)
    }

    /// Overlay name (the `role` carried onto its output).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The decoded overlay pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Result of loading an overlay assets directory.
///
/// A malformed asset never blocks its siblings: failures are scoped to
/// the file that caused them and reported here.
#[derive(Debug, Default)]
pub struct OverlayLoadReport {
    /// Successfully decoded overlays, sorted by file name.
    pub overlays: Vec<FrameOverlay>,
    /// Files that failed to decode, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Load every `.png` in `dir` as an overlay for a `width`×`height` canvas.
///
/// Files are visited in name order so overlay order (and therefore output
/// order) is deterministic across runs.
pub fn load_overlay_dir(dir: &Path, width: u32, height: u32) -> DpframeResult<OverlayLoadReport> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"))
        })
        .collect();
    paths.sort();

    let mut report = OverlayLoadReport::default();
    for path in paths {
        match FrameOverlay::from_path(&path, width, height) {
            Ok(overlay) => report.overlays.push(overlay),
            Err(e) => {
                tracing::warn!("Skipping overlay {:?}: {}", path, e);
                report.skipped.push((path, e.to_string()));
            }
        }
    }
    Ok(report)
}

/// The two built-in frames for a `width`×`height` canvas:
/// `frame1` (plain border) and `frame2` (double border with corner strokes).
pub fn builtin_overlays(width: u32, height: u32) -> Vec<FrameOverlay> {
    vec![plain_border(width, height), corner_flourish(width, height)]
}

/// `frame1`: a single black border stroked along the canvas edge.
pub fn plain_border(width: u32, height: u32) -> FrameOverlay {
    let mut image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    stroke_rect(&mut image, 0, 0, width, height, 20, BLACK);
    FrameOverlay::new("frame1", image)
}

/// `frame2`: outer border, inset inner border, and diagonal corner strokes.
pub fn corner_flourish(width: u32, height: u32) -> FrameOverlay {
    let mut image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    stroke_rect(&mut image, 20, 20, width.saturating_sub(40), height.saturating_sub(40), 10, BLACK);
    stroke_rect(&mut image, 0, 0, width, height, 20, BLACK);

    // Diagonals across each corner, an eighth of the canvas long.
    let reach = (width.min(height) / 8).max(1);
    let (w, h) = (width as i64 - 1, height as i64 - 1);
    let r = reach as i64;
    stroke_line(&mut image, 0, 0, r, r, 10, BLACK);
    stroke_line(&mut image, w, h, w - r, h - r, 10, BLACK);
    stroke_line(&mut image, w, 0, w - r, r, 10, BLACK);
    stroke_line(&mut image, 0, h, r, h - r, 10, BLACK);

    FrameOverlay::new("frame2", image)
}

/// Stroke the outline of the rectangle at `(x, y)` with size `w`×`h`.
///
/// The stroke straddles the path like an SVG stroke: half inside, half
/// outside, clipped to the image.
fn stroke_rect(image: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, stroke: u32, color: Rgba<u8>) {
    if w == 0 || h == 0 || stroke == 0 {
        return;
    }
    let half = (stroke / 2) as i64;
    let (left, top) = (x as i64, y as i64);
    let (right, bottom) = (x as i64 + w as i64, y as i64 + h as i64);

    let mut band = |x0: i64, y0: i64, x1: i64, y1: i64| {
        let x0 = x0.clamp(0, image.width() as i64);
        let x1 = x1.clamp(0, image.width() as i64);
        let y0 = y0.clamp(0, image.height() as i64);
        let y1 = y1.clamp(0, image.height() as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                image.put_pixel(px as u32, py as u32, color);
            }
        }
    };

    // Horizontal bands, then vertical bands covering the corners.
    band(left - half, top - half, right + half, top + half);
    band(left - half, bottom - half, right + half, bottom + half);
    band(left - half, top - half, left + half, bottom + half);
    band(right - half, top - half, right + half, bottom + half);
}

/// Stroke a straight line segment with round-ish square caps.
fn stroke_line(
    image: &mut RgbaImage,
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
    stroke: u32,
    color: Rgba<u8>,
) {
    let half = (stroke as f64) / 2.0;
    let min_x = (x0.min(x1) - half.ceil() as i64).max(0);
    let max_x = (x0.max(x1) + half.ceil() as i64).min(image.width() as i64 - 1);
    let min_y = (y0.min(y1) - half.ceil() as i64).max(0);
    let max_y = (y0.max(y1) + half.ceil() as i64).min(image.height() as i64 - 1);

    let (ax, ay) = (x0 as f64, y0 as f64);
    let (bx, by) = (x1 as f64, y1 as f64);
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let (pxf, pyf) = (px as f64, py as f64);
            // Distance from the pixel center to the segment.
            let t = if len_sq == 0.0 {
                0.0
            } else {
                (((pxf - ax) * dx + (pyf - ay) * dy) / len_sq).clamp(0.0, 1.0)
            };
            let (cx, cy) = (ax + t * dx, ay + t * dy);
            let dist = ((pxf - cx).powi(2) + (pyf - cy).powi(2)).sqrt();
            if dist <= half {
                image.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;
    use std::io::Cursor;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image.clone())
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn builtins_match_the_canvas() {
        let overlays = builtin_overlays(800, 800);
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0].name(), "frame1");
        assert_eq!(overlays[1].name(), "frame2");
        for overlay in &overlays {
            assert_eq!(overlay.image().dimensions(), (800, 800));
        }
    }

    #[test]
    fn plain_border_paints_edges_and_leaves_the_middle_clear() {
        let overlay = plain_border(800, 800);
        assert_eq!(*overlay.image().get_pixel(0, 0), BLACK);
        assert_eq!(*overlay.image().get_pixel(5, 400), BLACK);
        assert_eq!(*overlay.image().get_pixel(400, 400), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn corner_flourish_has_diagonals() {
        let overlay = corner_flourish(800, 800);
        // On the main diagonal, inside the corner stroke reach.
        assert_eq!(*overlay.image().get_pixel(60, 60), BLACK);
        assert_eq!(*overlay.image().get_pixel(400, 400), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        let err = FrameOverlay::from_bytes("bad", b"not a png", 800, 800).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn from_bytes_rejects_wrong_dimensions() {
        let small = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0]));
        let bytes = encode_png(&small);
        assert!(FrameOverlay::from_bytes("tiny", &bytes, 800, 800).is_err());
    }

    #[test]
    fn load_dir_scopes_failures_to_the_bad_file() {
        let dir = std::env::temp_dir().join(format!("dpframe-overlays-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let good = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 128]));
        std::fs::write(dir.join("a-good.png"), encode_png(&good)).unwrap();
        std::fs::write(dir.join("b-bad.png"), b"definitely not a png").unwrap();
        std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();

        let report = load_overlay_dir(&dir, 64, 64).unwrap();
        assert_eq!(report.overlays.len(), 1);
        assert_eq!(report.overlays[0].name(), "a-good");
        assert_eq!(report.skipped.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
