use crate::cli::LocateArgs;
use crate::commands::frame_from_args;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use maptrace_core::GeoPoint;
use maptrace_core::config::LayeredConfig;
use maptrace_geo::{frame_bounds, geo_to_pixel};

pub fn execute(args: LocateArgs, output: &OutputWriter, config: &LayeredConfig) -> Result<()> {
    let (dims, frame) = frame_from_args(&args.frame, config);

    // Bounds derived from the same frame, so the interpolating inverse is
    // exact here.
    let bounds = frame_bounds(dims, &frame).context("could not derive image bounds")?;
    let pixel = geo_to_pixel(GeoPoint::new(args.lat, args.lng), bounds, dims)
        .context("locate failed")?;

    if output.is_json() {
        return output.result(pixel);
    }

    output.kv("x", format!("{:.2}", pixel.x));
    output.kv("y", format!("{:.2}", pixel.y));
    if pixel.x < 0.0 || pixel.y < 0.0 || pixel.x > dims.width as f64 || pixel.y > dims.height as f64
    {
        output.warning("point falls outside the image");
    }
    Ok(())
}
