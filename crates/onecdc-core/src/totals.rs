//! Route totals over the legs actually displayed.

use crate::models::{LegSource, RouteLeg, RouteSource};
use serde::{Deserialize, Serialize};

// No single leg of a shopping trip takes longer than a week.
const MAX_LEG_DURATION_SECONDS: f64 = 7.0 * 24.0 * 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteTotals {
    pub distance_meters: f64,
    /// `None` when no leg came from the routing service.
    pub duration_seconds: Option<u64>,
    pub source: RouteSource,
}

/// Parse a service duration such as `"125s"` into whole seconds.
///
/// Missing, negative, non-numeric or implausibly long values count as zero.
pub fn parse_duration_seconds(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('s').unwrap_or(trimmed).trim();
    match number.parse::<f64>() {
        Ok(secs) if secs.is_finite() && (0.0..=MAX_LEG_DURATION_SECONDS).contains(&secs) => {
            secs.floor() as u64
        }
        _ => 0,
    }
}

/// Sum distance and duration across `legs`.
///
/// Distance always sums. Duration sums the legs whose duration is known as long
/// as at least one leg came from the service; an all straight-line route has
/// an unknown duration rather than zero.
pub fn aggregate(legs: &[RouteLeg]) -> RouteTotals {
    let distance_meters: f64 = legs
        .iter()
        .map(|leg| leg.distance_meters)
        .filter(|d| d.is_finite() && *d > 0.0)
        .sum();

    let service_legs = legs
        .iter()
        .filter(|leg| leg.source == LegSource::Service)
        .count();

    let source = if service_legs == legs.len() {
        RouteSource::Service
    } else if service_legs == 0 {
        RouteSource::StraightLine
    } else {
        RouteSource::Partial
    };

    let duration_seconds: Option<u64> = match source {
        RouteSource::StraightLine => None,
        _ => Some(
            legs.iter()
                .filter_map(|leg| leg.duration_seconds)
                .fold(0u64, u64::saturating_add),
        ),
    };

    RouteTotals {
        distance_meters,
        duration_seconds,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatLng;

    fn leg(to: &str, distance: f64, duration: Option<u64>, source: LegSource) -> RouteLeg {
        RouteLeg {
            from_id: None,
            to_id: to.to_string(),
            distance_meters: distance,
            duration_seconds: duration,
            path: vec![LatLng::new(1.30, 103.80), LatLng::new(1.31, 103.81)],
            source,
        }
    }

    #[test]
    fn parses_service_durations() {
        assert_eq!(parse_duration_seconds(Some("125s")), 125);
        assert_eq!(parse_duration_seconds(Some(" 900s ")), 900);
        assert_eq!(parse_duration_seconds(Some("1.9s")), 1);
        assert_eq!(parse_duration_seconds(Some("42")), 42);
    }

    #[test]
    fn malformed_durations_are_zero() {
        assert_eq!(parse_duration_seconds(None), 0);
        assert_eq!(parse_duration_seconds(Some("abc")), 0);
        assert_eq!(parse_duration_seconds(Some("")), 0);
        assert_eq!(parse_duration_seconds(Some("-5s")), 0);
        assert_eq!(parse_duration_seconds(Some("1e20s")), 0);
        assert_eq!(parse_duration_seconds(Some("infs")), 0);
    }

    #[test]
    fn huge_leg_durations_do_not_overflow() {
        let totals = aggregate(&[
            leg("a", 1000.0, Some(u64::MAX), LegSource::Service),
            leg("b", 1000.0, Some(u64::MAX), LegSource::Service),
        ]);
        assert_eq!(totals.duration_seconds, Some(u64::MAX));

        let parsed = parse_duration_seconds(Some("1e20s"));
        let totals = aggregate(&[
            leg("a", 1000.0, Some(parsed), LegSource::Service),
            leg("b", 1000.0, Some(parsed), LegSource::Service),
        ]);
        assert_eq!(totals.duration_seconds, Some(0));
    }

    #[test]
    fn service_legs_sum_both_metrics() {
        let totals = aggregate(&[
            leg("a", 1500.0, Some(900), LegSource::Service),
            leg("b", 500.0, Some(300), LegSource::Service),
        ]);
        assert_eq!(totals.distance_meters, 2000.0);
        assert_eq!(totals.duration_seconds, Some(1200));
        assert_eq!(totals.source, RouteSource::Service);
    }

    #[test]
    fn straight_line_route_has_unknown_duration() {
        let totals = aggregate(&[leg("a", 1572.0, None, LegSource::StraightLine)]);
        assert_eq!(totals.distance_meters, 1572.0);
        assert_eq!(totals.duration_seconds, None);
        assert_eq!(totals.source, RouteSource::StraightLine);
    }

    #[test]
    fn partial_route_reports_known_duration() {
        let totals = aggregate(&[
            leg("a", 1000.0, Some(600), LegSource::Service),
            leg("b", 800.0, None, LegSource::StraightLine),
        ]);
        assert_eq!(totals.distance_meters, 1800.0);
        assert_eq!(totals.duration_seconds, Some(600));
        assert_eq!(totals.source, RouteSource::Partial);
    }

    #[test]
    fn aggregation_is_repeatable() {
        let legs = vec![
            leg("a", 1234.5, Some(61), LegSource::Service),
            leg("b", 10.0, None, LegSource::StraightLine),
        ];
        assert_eq!(aggregate(&legs), aggregate(&legs));
    }
}
