//! Plain-text rendering of a computed route.

use onecdc_core::display::{format_distance, format_duration};
use onecdc_core::{RouteResult, RouteSource};
use std::fmt::Write;

fn source_label(source: RouteSource) -> &'static str {
    match source {
        RouteSource::Service => "routing service",
        RouteSource::Partial => "partly straight-line",
        RouteSource::StraightLine => "straight-line estimate",
    }
}

/// Render `result` the way the route view lays it out: totals first, then
/// one line per stop.
pub fn render(result: &RouteResult) -> String {
    let mut out = String::new();
    let from = result.origin_address.as_deref().unwrap_or("current location");
    let _ = writeln!(
        out,
        "{} route from {} ({} stop{})",
        result.mode,
        from,
        result.waypoints.len(),
        if result.waypoints.len() == 1 { "" } else { "s" }
    );
    let _ = writeln!(
        out,
        "Total: {}, {} [{}]",
        format_distance(result.total_distance_meters),
        format_duration(result.total_duration_seconds),
        source_label(result.source)
    );

    for (index, (waypoint, leg)) in result.waypoints.iter().zip(&result.legs).enumerate() {
        let _ = write!(out, "{:>3}. {}", index + 1, waypoint.name);
        if let Some(address) = &waypoint.address {
            let _ = write!(out, ", {}", address);
        }
        let _ = writeln!(
            out,
            " ({}, {})",
            format_distance(leg.distance_meters),
            format_duration(leg.duration_seconds)
        );
    }

    if result.dropped_waypoints > 0 {
        let _ = writeln!(
            out,
            "{} shop(s) skipped: no usable id, name or location",
            result.dropped_waypoints
        );
    }
    out
}
