use crate::cli::ProjectArgs;
use crate::commands::frame_from_args;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use maptrace_core::config::LayeredConfig;
use maptrace_core::PixelPoint;
use maptrace_geo::pixel_to_geo;

pub fn execute(args: ProjectArgs, output: &OutputWriter, config: &LayeredConfig) -> Result<()> {
    let (dims, frame) = frame_from_args(&args.frame, config);

    let geo = pixel_to_geo(PixelPoint::new(args.x, args.y), dims, &frame)
        .context("projection failed")?;

    if output.is_json() {
        return output.result(geo);
    }

    output.kv("Latitude", format!("{:.6}", geo.lat));
    output.kv("Longitude", format!("{:.6}", geo.lng));
    Ok(())
}
