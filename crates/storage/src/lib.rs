//! Frame persistence and transport encoding.
//!
//! The pipeline itself never touches disk; everything durable goes
//! through the [`FrameStore`] trait so the core stays a pure function
//! and adapters decide where bytes land.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use dpframe_common::{DpframeError, DpframeResult};
use dpframe_framing_core::OutputImage;

/// Where a stored frame ended up.
#[derive(Debug, Clone)]
pub struct StoredFrame {
    /// Generated file name, `{role}-{timestamp}.png`.
    pub file_name: String,
    /// Absolute path of the written file.
    pub path: PathBuf,
    /// Public URL for the file, when the store has a URL prefix.
    pub url: Option<String>,
}

/// Storage capability for framed outputs.
pub trait FrameStore: Send + Sync {
    /// Persist one framed output, returning where it was written.
    fn store(&self, output: &OutputImage) -> DpframeResult<StoredFrame>;
}

/// Filesystem-backed [`FrameStore`].
///
/// Ensures the target directory exists on every write (`mkdir -p`
/// semantics) and names files `{role}-{timestamp}.png` with millisecond
/// timestamps.
#[derive(Debug, Clone)]
pub struct FsFrameStore {
    root: PathBuf,
    public_base: Option<String>,
}

impl FsFrameStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base: None,
        }
    }

    /// Serve stored files under `base` (e.g. `/uploads`), so stored
    /// frames carry a relative URL.
    pub fn with_public_base(mut self, base: impl Into<String>) -> Self {
        self.public_base = Some(base.into());
        self
    }

    /// Directory this store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FrameStore for FsFrameStore {
    fn store(&self, output: &OutputImage) -> DpframeResult<StoredFrame> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            DpframeError::storage(format!("cannot create {:?}: {e}", self.root))
        })?;

        let file_name = format!("{}-{}.png", output.role, Utc::now().timestamp_millis());
        let path = self.root.join(&file_name);
        std::fs::write(&path, &output.png)
            .map_err(|e| DpframeError::storage(format!("cannot write {path:?}: {e}")))?;

        tracing::debug!("Stored frame {:?} ({} bytes)", path, output.png.len());

        let url = self
            .public_base
            .as_ref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), file_name));

        Ok(StoredFrame {
            file_name,
            path,
            url,
        })
    }
}

/// Encode a PNG as an inline `data:` URL for transport in a JSON body.
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
