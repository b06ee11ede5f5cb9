//! Command implementations

mod calibrate;
mod inspect;
mod locate;
mod optimize;
mod project;

use crate::cli::{Cli, Commands, FrameArgs};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;
use maptrace_core::config::LayeredConfig;
use maptrace_core::{GeoPoint, ImageDimensions, ReferenceFrame};

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Calibrate(args) => calibrate::execute(args, &output, config),
        Commands::Optimize(args) => optimize::execute(args, &output, config),
        Commands::Project(args) => project::execute(args, &output, &config),
        Commands::Locate(args) => locate::execute(args, &output, &config),
        Commands::Inspect(args) => inspect::execute(args, &output, &config),
    }
}

/// Build the frame and dimensions shared by the transform commands
pub(crate) fn frame_from_args(
    args: &FrameArgs,
    config: &LayeredConfig,
) -> (ImageDimensions, ReferenceFrame) {
    let dims = ImageDimensions::new(args.width, args.height);
    let zoom = args.zoom.unwrap_or(config.zoom.value);
    let frame = ReferenceFrame::with_scale(
        GeoPoint::new(args.center_lat, args.center_lng),
        args.scale,
        zoom,
    );
    (dims, frame)
}
