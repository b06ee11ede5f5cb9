use crate::cli::CalibrateArgs;
use crate::output::OutputWriter;
use anyhow::{bail, Context, Result};
use maptrace_core::config::{CliConfigOverrides, LayeredConfig};
use maptrace_core::{match_pairs, ImageDimensions, ReferenceFrame};
use maptrace_formats::{read_control_points, read_matched_pairs, read_pixel_points};
use maptrace_geo::{calibrate, haversine_distance, pixel_to_geo, CalibrationConfig};
use tabled::Tabled;

#[derive(Tabled)]
struct ResidualRow {
    #[tabled(rename = "Pair")]
    pair: usize,
    #[tabled(rename = "Pixel")]
    pixel: String,
    #[tabled(rename = "Known")]
    known: String,
    #[tabled(rename = "Predicted")]
    predicted: String,
    #[tabled(rename = "Error (m)")]
    error_m: String,
}

pub fn execute(args: CalibrateArgs, output: &OutputWriter, mut config: LayeredConfig) -> Result<()> {
    config.update_from_cli(CliConfigOverrides {
        iterations: args.iterations,
        initial_step_deg: args.step,
        step_decay: args.step_decay,
        scale_floor: args.scale_floor,
        zoom: args.zoom,
    });

    let pairs = match (&args.pairs, &args.pixel_points, &args.control_points) {
        (Some(path), _, _) => read_matched_pairs(path)
            .with_context(|| format!("failed to read matched pairs from {}", path.display()))?,
        (None, Some(px_path), Some(cp_path)) => {
            let pixel_points = read_pixel_points(px_path)
                .with_context(|| format!("failed to read pixel points from {}", px_path.display()))?;
            let control_points = read_control_points(cp_path).with_context(|| {
                format!("failed to read control points from {}", cp_path.display())
            })?;
            match_pairs(&pixel_points, &control_points)
        }
        _ => bail!("pass --pairs, or both --pixel-points and --control-points"),
    };
    if pairs.is_empty() {
        bail!("no usable matched pairs in the input");
    }

    let dims = ImageDimensions::new(args.width, args.height);
    let zoom = config.zoom.value;
    // Only the scale of the current frame matters to the fit; it seeds the
    // fallback when the first two pairs have coincident pixels.
    let current = ReferenceFrame::with_scale(pairs[0].geo, args.scale, zoom);

    let calibration_config = CalibrationConfig::from(&config);
    let fit = calibrate(&pairs, dims, zoom, &current, &calibration_config)
        .context("calibration failed")?;

    if output.is_json() {
        return output.result(&fit);
    }

    output.section("Fitted Reference Frame");
    output.kv("Center latitude", format!("{:.6}", fit.frame.center.lat));
    output.kv("Center longitude", format!("{:.6}", fit.frame.center.lng));
    output.kv("Scale", format!("{:.6}", fit.frame.scale));
    output.kv("Zoom", fit.frame.zoom);
    output.kv("Pairs used", fit.pairs_used);
    output.kv("RMS error", format!("{:.2} m", fit.rms_error_m()));

    output.section("Residuals");
    let rows: Vec<ResidualRow> = pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            let predicted = pixel_to_geo(pair.pixel, dims, &fit.frame)
                .map(|geo| (format!("{:.6}, {:.6}", geo.lat, geo.lng), haversine_distance(geo, pair.geo)));
            let (predicted, error_m) = match predicted {
                Ok((text, error)) => (text, format!("{:.2}", error)),
                Err(_) => ("-".to_string(), "-".to_string()),
            };
            ResidualRow {
                pair: i + 1,
                pixel: format!("{:.1}, {:.1}", pair.pixel.x, pair.pixel.y),
                known: format!("{:.6}, {:.6}", pair.geo.lat, pair.geo.lng),
                predicted,
                error_m,
            }
        })
        .collect();
    output.table(rows);

    output.success("calibration complete");
    Ok(())
}
