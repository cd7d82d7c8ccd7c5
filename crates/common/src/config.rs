//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Canvas defaults used when a request does not override them.
    pub canvas: CanvasDefaults,

    /// HTTP server settings.
    pub server: ServerConfig,

    /// Storage settings for the persisting variant.
    pub storage: StorageConfig,

    /// Decode hardening limits.
    pub limits: LimitsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default framing canvas parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasDefaults {
    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height in pixels.
    pub height: u32,

    /// Uniform padding inside the canvas, in pixels.
    pub padding: u32,

    /// Background fill: "white", "transparent", or "#rrggbb"/"#rrggbbaa".
    pub background: String,

    /// Anchor policy: "center", "top", or "bottom".
    pub anchor: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "127.0.0.1:3000".
    pub bind: String,

    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// When true the server writes frames to `uploads_dir` and returns
    /// relative URLs; otherwise it returns inline base64 data URLs.
    pub persist_uploads: bool,

    /// Directory where persisted frames are written.
    pub uploads_dir: PathBuf,

    /// URL prefix under which `uploads_dir` is publicly served.
    pub public_base: String,

    /// Optional directory of overlay PNGs. When unset the built-in
    /// frames are used.
    pub overlay_dir: Option<PathBuf>,
}

/// Decode hardening limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum decoded pixel count accepted for an input image.
    pub max_decoded_pixels: u64,

    /// Maximum estimated decoded RGBA byte size accepted.
    pub max_decoded_bytes: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "dpframe=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasDefaults::default(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            limits: LimitsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CanvasDefaults {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            padding: 0,
            background: "white".to_string(),
            anchor: "center".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persist_uploads: false,
            uploads_dir: default_uploads_dir(),
            public_base: "/uploads".to_string(),
            overlay_dir: None,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            // 64 megapixels decoded, i.e. 256 MiB of RGBA.
            max_decoded_pixels: 64_000_000,
            max_decoded_bytes: 256 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("dpframe").join("config.json")
}

/// Default uploads directory.
fn default_uploads_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("dpframe").join("uploads")
}
