use crate::cli::OptimizeArgs;
use crate::commands::frame_from_args;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use maptrace_core::config::LayeredConfig;
use maptrace_core::{find_control_point, GeoPoint, Route};
use maptrace_formats::{read_control_points, read_route, write_route};
use maptrace_geo::{optimize_route, pixel_to_geo, total_distance};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Visit")]
    visit: u32,
    #[tabled(rename = "Pixel")]
    pixel: String,
}

#[derive(Serialize)]
struct OptimizeReport {
    route: Route,
    before_m: f64,
    after_m: f64,
}

pub fn execute(args: OptimizeArgs, output: &OutputWriter, config: LayeredConfig) -> Result<()> {
    let route = read_route(&args.route)
        .with_context(|| format!("failed to read route from {}", args.route.display()))?;
    let control_points = read_control_points(&args.control_points).with_context(|| {
        format!("failed to read control points from {}", args.control_points.display())
    })?;

    let start = find_control_point(&control_points, &route.start_id)?.geo;
    let end = find_control_point(&control_points, &route.end_id)?.geo;

    let (dims, frame) = frame_from_args(&args.frame, &config);

    let before_m = tour_length(&route, dims, &frame, start, end)?;
    let optimized_waypoints = optimize_route(&route, dims, &frame, start, end)?;

    let optimized = Route {
        start_id: route.start_id.clone(),
        end_id: route.end_id.clone(),
        waypoints: optimized_waypoints,
    };
    let after_m = tour_length(&optimized, dims, &frame, start, end)?;

    if let Some(ref path) = args.output {
        write_route(path, &optimized)?;
    } else if args.in_place {
        write_route(&args.route, &optimized)?;
    }

    if output.is_json() {
        return output.result(OptimizeReport { route: optimized, before_m, after_m });
    }

    output.section("Optimized Order");
    let rows: Vec<OrderRow> = optimized
        .waypoints
        .iter()
        .map(|w| OrderRow {
            visit: w.index,
            pixel: format!("{:.1}, {:.1}", w.pixel.x, w.pixel.y),
        })
        .collect();
    output.table(rows);

    output.kv("Tour before", format!("{:.1} m", before_m));
    output.kv("Tour after", format!("{:.1} m", after_m));
    if after_m >= before_m {
        output.warning("input order was already as short as the greedy order");
    }

    match (&args.output, args.in_place) {
        (Some(path), _) => output.success(format!("wrote {}", path.display())),
        (None, true) => output.success(format!("updated {}", args.route.display())),
        (None, false) => output.success("route not written (pass --output or --in-place)"),
    }
    Ok(())
}

/// Tour length through the route's current waypoint order, in meters
fn tour_length(
    route: &Route,
    dims: maptrace_core::ImageDimensions,
    frame: &maptrace_core::ReferenceFrame,
    start: GeoPoint,
    end: GeoPoint,
) -> Result<f64> {
    let projected = route
        .ordered_waypoints()
        .iter()
        .map(|w| pixel_to_geo(w.pixel, dims, frame))
        .collect::<maptrace_core::Result<Vec<GeoPoint>>>()?;
    Ok(total_distance(start, end, &projected))
}
