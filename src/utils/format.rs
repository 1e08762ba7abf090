use crate::fields::MetricUnit;

const MS_PER_SECOND: u64 = 1000;
const SECONDS_PER_MINUTE: u64 = 60;
const MINUTES_PER_HOUR: u64 = 60;

/// Milliseconds to the coarsest readable unit: `850ms`, `12.5s`, `7m`, `2h 5m`.
pub fn format_duration(duration_ms: u64) -> String {
    if duration_ms < MS_PER_SECOND {
        return format!("{}ms", duration_ms);
    }

    let seconds = duration_ms as f64 / MS_PER_SECOND as f64;
    if seconds < SECONDS_PER_MINUTE as f64 {
        return format!("{:.1}s", seconds);
    }

    let minutes = duration_ms / (MS_PER_SECOND * SECONDS_PER_MINUTE);
    let hours = minutes / MINUTES_PER_HOUR;
    if hours > 0 {
        return format!("{}h {}m", hours, minutes % MINUTES_PER_HOUR);
    }

    format!("{}m", minutes)
}

/// Primary metric value plus an optional rate suffix.
pub fn format_metric(unit: MetricUnit, value: f64, rate: Option<f64>) -> String {
    let mut text = match unit {
        MetricUnit::Cost => format!("${:.2}", value),
        MetricUnit::Tokens => format!("{} tok", value as u64),
        MetricUnit::Lines => format!("{} lines", value as u64),
    };

    if let Some(rate) = rate.filter(|r| r.is_finite()) {
        match unit {
            MetricUnit::Cost => text.push_str(&format!(" (${:.2}/h)", rate)),
            MetricUnit::Tokens => text.push_str(&format!(" ({} tpm)", rate as u64)),
            MetricUnit::Lines => {}
        }
    }

    text
}
