//! Duration and zone formatting
//!
//! Pure, stateless value-to-text conversions used by the renderer. The
//! compact duration rule picks the shortest exact representation: seconds
//! below one minute, `M:SS` when seconds don't divide evenly, whole minutes
//! below an hour, and `H:MM` from an hour up (90 minutes is `1:30`, never
//! `90m`). Fractional seconds never reach these functions; the loader
//! rejects them at parse time.

use rust_decimal::Decimal;

use crate::models::{DurationUnit, DurationValue, HrUnit, Target};

/// Whole minutes by floor division, used for browse summaries ("60m")
pub fn duration_minutes(seconds: u32) -> String {
    format!("{}m", seconds / 60)
}

/// Total-duration form for transcript headers: `H:MM` from an hour up,
/// whole minutes below
pub fn clock(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours == 0 {
        format!("{}m", minutes)
    } else {
        format!("{}:{:02}", hours, minutes)
    }
}

/// Most compact exact representation of a step duration
pub fn compact(seconds: u32) -> String {
    if seconds < 60 {
        return format!("{}s", seconds);
    }
    if seconds % 60 != 0 {
        return format!("{}:{:02}", seconds / 60, seconds % 60);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}:{:02}", minutes / 60, minutes % 60)
    }
}

/// Literal distance for distance-based steps
pub fn distance(meters: u32) -> String {
    format!("{} meter", meters)
}

/// Render a leaf extent, time-based or distance-based
pub fn duration_value(duration: &DurationValue) -> String {
    match duration.unit {
        DurationUnit::Seconds => compact(duration.value),
        DurationUnit::Meters => distance(duration.value),
    }
}

/// Render an intensity target
///
/// Single bound renders as a point value, low/high as a hyphenated range; a
/// range whose bounds are equal collapses to a point. A missing target is an
/// explicit marker, never an empty string.
pub fn target(target: &Target) -> String {
    match target {
        Target::HeartRate { low, high, unit } => {
            let suffix = match unit {
                HrUnit::PercentLthr => "% LTHR",
                HrUnit::Bpm => " bpm",
            };
            format!("{}{}", range(low, high.as_ref()), suffix)
        }
        Target::Power { low, high } => format!("{}% FTP", range(low, high.as_ref())),
        Target::Pace { low, high, unit } => {
            if unit == "%pace" {
                format!("{}% pace", range(low, high.as_ref()))
            } else {
                format!("{} {}", range(low, high.as_ref()), unit)
            }
        }
        Target::Distance { meters } => distance(*meters),
        Target::Unspecified => "(no target)".to_string(),
    }
}

fn range(low: &Decimal, high: Option<&Decimal>) -> String {
    match high {
        Some(high) if high != low => format!("{}-{}", low.normalize(), high.normalize()),
        _ => low.normalize().to_string(),
    }
}

/// Cut a description down to a fixed character budget for browse results
pub fn excerpt(description: &str, budget: usize) -> String {
    let text = description.trim();
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let cut: String = text.chars().take(budget).collect();
    format!("{}...", cut.trim_end())
}

/// Strip formatting-hostile artifacts from stored description text
///
/// The collection's descriptions carry backtick-fenced `- - - -` dividers
/// between the step listing and the narrative part.
pub fn clean_description(description: &str) -> String {
    description
        .trim()
        .replace("`- - - -", "----")
        .replace("- - - -", "----")
        .replace('`', "")
}
