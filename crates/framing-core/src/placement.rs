//! Canvas geometry and contain-fit placement math.
//!
//! All dimensions are pixels. The placement never crops: the photo is
//! scaled uniformly so it fits entirely inside the canvas fit region,
//! then positioned according to the anchor policy.

use std::fmt;
use std::str::FromStr;

use dpframe_common::{DpframeError, DpframeResult};
use image::Rgba;
use serde::{Deserialize, Serialize};

/// Output canvas description: dimensions, padding, background, anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSpec {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Uniform padding shrinking the fit region on every side.
    pub padding: u32,
    /// Background fill applied before the photo is drawn.
    pub background: Background,
    /// Where the scaled photo sits inside the fit region.
    pub anchor: Anchor,
}

impl CanvasSpec {
    /// The canonical DP canvas: 800×800, no padding, white, centered.
    pub fn dp() -> Self {
        Self {
            width: 800,
            height: 800,
            padding: 0,
            background: Background::White,
            anchor: Anchor::Center,
        }
    }

    /// Check that the canvas is usable.
    pub fn validate(&self) -> DpframeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DpframeError::config(format!(
                "canvas dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let consumed = self.padding.saturating_mul(2);
        if consumed >= self.width || consumed >= self.height {
            return Err(DpframeError::config(format!(
                "padding {} leaves no fit region on a {}x{} canvas",
                self.padding, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Width and height of the padded fit region.
    pub fn fit_region(&self) -> (u32, u32) {
        let consumed = self.padding.saturating_mul(2);
        (
            self.width.saturating_sub(consumed),
            self.height.saturating_sub(consumed),
        )
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::dp()
    }
}

/// Background fill policy for the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    /// Opaque white (the canonical DP configuration).
    White,
    /// Fully transparent.
    Transparent,
    /// Any solid RGBA color.
    Color([u8; 4]),
}

impl Background {
    /// The fill pixel for this background.
    pub fn pixel(&self) -> Rgba<u8> {
        match self {
            Background::White => Rgba([255, 255, 255, 255]),
            Background::Transparent => Rgba([0, 0, 0, 0]),
            Background::Color(rgba) => Rgba(*rgba),
        }
    }
}

impl FromStr for Background {
    type Err = DpframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(Background::White),
            "transparent" => Ok(Background::Transparent),
            hex if hex.starts_with('#') => parse_hex_color(hex),
            other => Err(DpframeError::config(format!(
                "unknown background: {other}. Use: white, transparent, #rrggbb, #rrggbbaa"
            ))),
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::White => write!(f, "white"),
            Background::Transparent => write!(f, "transparent"),
            Background::Color([r, g, b, a]) => write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}"),
        }
    }
}

fn parse_hex_color(hex: &str) -> DpframeResult<Background> {
    let digits = &hex[1..];
    let bad = || DpframeError::config(format!("invalid hex color: {hex}"));
    let byte = |i: usize| u8::from_str_radix(&digits[2 * i..2 * i + 2], 16).map_err(|_| bad());
    match digits.len() {
        6 => Ok(Background::Color([byte(0)?, byte(1)?, byte(2)?, 255])),
        8 => Ok(Background::Color([byte(0)?, byte(1)?, byte(2)?, byte(3)?])),
        _ => Err(bad()),
    }
}

/// Vertical anchor policy for the scaled photo.
///
/// X placement is always centered within the fit region; the observed
/// variants only ever moved the photo vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// Centered in the fit region (canonical).
    Center,
    /// Pinned to the top edge of the fit region.
    Top,
    /// Pinned to the bottom edge of the fit region.
    Bottom,
}

impl FromStr for Anchor {
    type Err = DpframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Ok(Anchor::Center),
            "top" => Ok(Anchor::Top),
            "bottom" => Ok(Anchor::Bottom),
            other => Err(DpframeError::config(format!(
                "unknown anchor: {other}. Use: center, top, bottom"
            ))),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Center => write!(f, "center"),
            Anchor::Top => write!(f, "top"),
            Anchor::Bottom => write!(f, "bottom"),
        }
    }
}

/// Derived placement of a photo on a canvas: uniform scale plus offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Uniform scale factor applied to the photo.
    pub scale: f64,
    /// Scaled photo width.
    pub width: u32,
    /// Scaled photo height.
    pub height: u32,
    /// Left edge of the photo on the canvas.
    pub x: u32,
    /// Top edge of the photo on the canvas.
    pub y: u32,
}

/// Compute the contain-fit placement of an `input_width` × `input_height`
/// photo on `canvas`.
///
/// The scale is `min(fit_w / w, fit_h / h)`, so the binding dimension
/// exactly fills the fit region and the other never exceeds it. Aspect
/// ratio is preserved; the photo is never cropped.
pub fn compute_placement(
    input_width: u32,
    input_height: u32,
    canvas: &CanvasSpec,
) -> DpframeResult<Placement> {
    canvas.validate()?;
    if input_width == 0 || input_height == 0 {
        return Err(DpframeError::decode(format!(
            "input image has degenerate dimensions {input_width}x{input_height}"
        )));
    }

    let (fit_w, fit_h) = canvas.fit_region();
    let scale = (fit_w as f64 / input_width as f64).min(fit_h as f64 / input_height as f64);

    // The binding axis lands exactly on its bound; the other rounds and
    // is clamped so rounding can never push it past the region.
    let width = ((input_width as f64 * scale).round() as u32).clamp(1, fit_w);
    let height = ((input_height as f64 * scale).round() as u32).clamp(1, fit_h);

    let x = canvas.padding + (fit_w - width) / 2;
    let y = match canvas.anchor {
        Anchor::Center => canvas.padding + (fit_h - height) / 2,
        Anchor::Top => canvas.padding,
        Anchor::Bottom => canvas.padding + (fit_h - height),
    };

    Ok(Placement {
        scale,
        width,
        height,
        x,
        y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wide_photo_centers_vertically() {
        // 1600×800 on the default 800×800 canvas: scale 0.5 → 800×400 at y=200.
        let p = compute_placement(1600, 800, &CanvasSpec::dp()).unwrap();
        assert_eq!(p.scale, 0.5);
        assert_eq!((p.width, p.height), (800, 400));
        assert_eq!((p.x, p.y), (0, 200));
    }

    #[test]
    fn exact_fit_is_identity() {
        let p = compute_placement(800, 800, &CanvasSpec::dp()).unwrap();
        assert_eq!(p.scale, 1.0);
        assert_eq!((p.width, p.height), (800, 800));
        assert_eq!((p.x, p.y), (0, 0));
    }

    #[test]
    fn small_photo_is_scaled_up_to_fit() {
        let p = compute_placement(100, 100, &CanvasSpec::dp()).unwrap();
        assert_eq!(p.scale, 8.0);
        assert_eq!((p.width, p.height), (800, 800));
    }

    #[test]
    fn padding_shrinks_the_fit_region() {
        let canvas = CanvasSpec {
            padding: 50,
            ..CanvasSpec::dp()
        };
        // Fit region is 700×700; a 1400×700 photo scales to 700×350.
        let p = compute_placement(1400, 700, &canvas).unwrap();
        assert_eq!((p.width, p.height), (700, 350));
        assert_eq!(p.x, 50);
        assert_eq!(p.y, 50 + (700 - 350) / 2);
    }

    #[test]
    fn top_and_bottom_anchors() {
        let top = CanvasSpec {
            anchor: Anchor::Top,
            ..CanvasSpec::dp()
        };
        let bottom = CanvasSpec {
            anchor: Anchor::Bottom,
            ..CanvasSpec::dp()
        };
        let pt = compute_placement(1600, 800, &top).unwrap();
        let pb = compute_placement(1600, 800, &bottom).unwrap();
        assert_eq!(pt.y, 0);
        assert_eq!(pb.y, 800 - 400);
    }

    #[test]
    fn degenerate_input_is_rejected() {
        assert!(compute_placement(0, 100, &CanvasSpec::dp()).is_err());
        assert!(compute_placement(100, 0, &CanvasSpec::dp()).is_err());
    }

    #[test]
    fn invalid_canvas_is_rejected() {
        let zero = CanvasSpec {
            width: 0,
            ..CanvasSpec::dp()
        };
        assert!(compute_placement(10, 10, &zero).is_err());

        let swallowed = CanvasSpec {
            padding: 400,
            ..CanvasSpec::dp()
        };
        assert!(compute_placement(10, 10, &swallowed).is_err());
    }

    #[test]
    fn background_and_anchor_parse() {
        assert_eq!("white".parse::<Background>().unwrap(), Background::White);
        assert_eq!(
            "Transparent".parse::<Background>().unwrap(),
            Background::Transparent
        );
        assert_eq!(
            "#ff8000".parse::<Background>().unwrap(),
            Background::Color([255, 128, 0, 255])
        );
        assert_eq!(
            "#ff800080".parse::<Background>().unwrap(),
            Background::Color([255, 128, 0, 128])
        );
        assert!("#zz0000".parse::<Background>().is_err());
        assert!("plaid".parse::<Background>().is_err());

        assert_eq!("top".parse::<Anchor>().unwrap(), Anchor::Top);
        assert!("left".parse::<Anchor>().is_err());
    }

    proptest! {
        #[test]
        fn contain_fit_never_exceeds_the_region(
            w in 1u32..8000,
            h in 1u32..8000,
            padding in 0u32..100,
        ) {
            let canvas = CanvasSpec { padding, ..CanvasSpec::dp() };
            let (fit_w, fit_h) = canvas.fit_region();
            let p = compute_placement(w, h, &canvas).unwrap();

            prop_assert!(p.width <= fit_w);
            prop_assert!(p.height <= fit_h);
            // Contain fit is tight: the binding axis fills its bound.
            prop_assert!(p.width == fit_w || p.height == fit_h);
            // The photo stays inside the canvas.
            prop_assert!(p.x + p.width <= canvas.width);
            prop_assert!(p.y + p.height <= canvas.height);
        }

        #[test]
        fn aspect_ratio_is_preserved_within_rounding(
            w in 1u32..8000,
            h in 1u32..8000,
        ) {
            let p = compute_placement(w, h, &CanvasSpec::dp()).unwrap();
            // Rounding moves each scaled edge by at most half a pixel.
            let expected_w = w as f64 * p.scale;
            let expected_h = h as f64 * p.scale;
            prop_assert!((p.width as f64 - expected_w).abs() <= 0.5 + 1e-9);
            prop_assert!((p.height as f64 - expected_h).abs() <= 0.5 + 1e-9);
        }
    }
}
