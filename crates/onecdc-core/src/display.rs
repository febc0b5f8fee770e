//! Human-readable route figures.

pub const DURATION_UNAVAILABLE: &str = "duration unavailable";

/// `"850 m"` below one kilometre, `"1.5 km"` above.
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() || meters <= 0.0 {
        return "0 m".to_string();
    }
    if meters < 1000.0 {
        format!("{} m", meters.round() as u64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// `"15 min"`, `"1 h 5 min"`, or [`DURATION_UNAVAILABLE`].
pub fn format_duration(seconds: Option<u64>) -> String {
    let Some(seconds) = seconds else {
        return DURATION_UNAVAILABLE.to_string();
    };
    let minutes = seconds.saturating_add(30) / 60;
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{} h", hours)
    } else {
        format!("{} h {} min", hours, rest)
    }
}
