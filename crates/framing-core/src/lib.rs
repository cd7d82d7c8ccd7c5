//! DPFrame Framing Core
//!
//! Deterministic pipeline that places one photo on a fixed-size canvas
//! and composites decorative frame overlays on top:
//! - **Placement:** contain-fit scale and anchor math
//! - **Overlays:** named RGBA frames, loaded from disk or built in
//! - **Pipeline:** decode → scale → place → composite → PNG encode
//!
//! This crate is pure computation — no network, no filesystem writes.
//! All inputs are data; all outputs are data.

pub mod overlay;
pub mod placement;
pub mod pipeline;

pub use overlay::{FrameOverlay, OverlayLoadReport};
pub use placement::{Anchor, Background, CanvasSpec, Placement};
pub use pipeline::{frame, DecodeLimits, InputImage, OutputImage};
