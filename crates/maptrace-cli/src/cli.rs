use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// maptrace - Raster map overlay calibration and route authoring
#[derive(Parser, Debug)]
#[command(name = "maptrace")]
#[command(about = "Raster map overlay calibration and route authoring", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a maptrace.toml config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the reference frame from matched pixel/geographic pairs
    Calibrate(CalibrateArgs),

    /// Reorder a route's waypoints to shorten the tour
    Optimize(OptimizeArgs),

    /// Project an image pixel to geographic coordinates
    Project(ProjectArgs),

    /// Locate a geographic point on the image
    Locate(LocateArgs),

    /// Show the effective configuration and where each value came from
    Inspect(InspectArgs),
}

/// Reference frame plus image dimensions shared by commands that transform
/// coordinates
#[derive(Parser, Debug)]
pub struct FrameArgs {
    /// Natural image width in pixels
    #[arg(long)]
    pub width: u32,

    /// Natural image height in pixels
    #[arg(long)]
    pub height: u32,

    /// Frame center latitude in degrees
    #[arg(long)]
    pub center_lat: f64,

    /// Frame center longitude in degrees
    #[arg(long)]
    pub center_lng: f64,

    /// Frame scale (multiplier on Web-Mercator meters-per-pixel)
    #[arg(long, default_value = "1.0")]
    pub scale: f64,

    /// Renderer zoom level (defaults to the configured zoom)
    #[arg(long)]
    pub zoom: Option<u8>,
}

#[derive(Parser, Debug)]
pub struct CalibrateArgs {
    /// Path to a matched-pairs JSON file
    #[arg(long, conflicts_with_all = ["pixel_points", "control_points"])]
    pub pairs: Option<PathBuf>,

    /// Path to a pixel-points JSON file ({id, x, y}), joined against
    /// --control-points on id
    #[arg(long, requires = "control_points")]
    pub pixel_points: Option<PathBuf>,

    /// Path to a control-points JSON file resolving --pixel-points ids
    #[arg(long, requires = "pixel_points")]
    pub control_points: Option<PathBuf>,

    /// Natural image width in pixels
    #[arg(long)]
    pub width: u32,

    /// Natural image height in pixels
    #[arg(long)]
    pub height: u32,

    /// Renderer zoom level (defaults to the configured zoom)
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Current frame scale, used as fallback for degenerate pairs
    #[arg(long, default_value = "1.0")]
    pub scale: f64,

    /// Local-search iteration count override
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Initial neighborhood step in degrees override
    #[arg(long)]
    pub step: Option<f64>,

    /// Per-iteration step shrink factor override
    #[arg(long)]
    pub step_decay: Option<f64>,

    /// Smallest accepted fitted scale override
    #[arg(long)]
    pub scale_floor: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct OptimizeArgs {
    /// Path to a route JSON document (legacy key variants accepted)
    #[arg(long)]
    pub route: PathBuf,

    /// Path to a control-points JSON file resolving the route endpoints
    #[arg(long)]
    pub control_points: PathBuf,

    #[command(flatten)]
    pub frame: FrameArgs,

    /// Write the reordered route here (defaults to stdout report only)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Overwrite the input route document
    #[arg(long, conflicts_with = "output")]
    pub in_place: bool,
}

#[derive(Parser, Debug)]
pub struct ProjectArgs {
    /// Pixel x coordinate
    #[arg(long)]
    pub x: f64,

    /// Pixel y coordinate
    #[arg(long)]
    pub y: f64,

    #[command(flatten)]
    pub frame: FrameArgs,
}

#[derive(Parser, Debug)]
pub struct LocateArgs {
    /// Latitude in degrees
    #[arg(long)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long)]
    pub lng: f64,

    #[command(flatten)]
    pub frame: FrameArgs,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {}
