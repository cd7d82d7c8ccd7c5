//! DPFrame CLI — Command-line interface for framing and asset generation.
//!
//! Usage:
//!   dpframe frame <INPUT> [OPTIONS]     Frame a photo with overlays
//!   dpframe generate-frames [OPTIONS]   Write the built-in overlay PNGs
//!   dpframe inspect <INPUT>             Show decode and placement info

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "dpframe",
    about = "Decorative profile-picture framing on a fixed canvas",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Frame a photo with decorative overlays
    Frame {
        /// Input photo path
        input: PathBuf,

        /// Output directory for framed PNGs
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Canvas width in pixels
        #[arg(long, default_value = "800")]
        width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value = "800")]
        height: u32,

        /// Uniform padding inside the canvas
        #[arg(long, default_value = "0")]
        padding: u32,

        /// Background fill: white, transparent, or #rrggbb[aa]
        #[arg(long, default_value = "white")]
        background: String,

        /// Anchor policy: center, top, or bottom
        #[arg(long, default_value = "center")]
        anchor: String,

        /// Overlay PNG file (repeatable); defaults to the built-in frames
        #[arg(long = "overlay")]
        overlays: Vec<PathBuf>,

        /// Load every overlay PNG from a directory
        #[arg(long)]
        overlay_dir: Option<PathBuf>,

        /// Frame the photo alone, without any overlay
        #[arg(long)]
        no_overlay: bool,
    },

    /// Write the built-in overlay PNGs to an assets directory
    GenerateFrames {
        /// Output directory
        #[arg(short, long, default_value = "assets")]
        output: PathBuf,

        /// Overlay width in pixels
        #[arg(long, default_value = "800")]
        width: u32,

        /// Overlay height in pixels
        #[arg(long, default_value = "800")]
        height: u32,
    },

    /// Show decode and default-canvas placement info for a photo
    Inspect {
        /// Input photo path
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dpframe_common::logging::init_cli_logging(cli.verbose);

    match cli.command {
        Commands::Frame {
            input,
            output,
            width,
            height,
            padding,
            background,
            anchor,
            overlays,
            overlay_dir,
            no_overlay,
        } => commands::frame::run(
            input,
            output,
            width,
            height,
            padding,
            background,
            anchor,
            overlays,
            overlay_dir,
            no_overlay,
        ),
        Commands::GenerateFrames {
            output,
            width,
            height,
        } => commands::generate::run(output, width, height),
        Commands::Inspect { input } => commands::inspect::run(input),
    }
}
