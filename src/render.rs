//! Rendering: browse summary lines and full transcripts
//!
//! Both modes walk the same inputs but at different depths. Summary mode
//! touches top-level metadata only; transcript mode renders the whole
//! interval tree depth-first in pre-order, showing each repeat group once
//! with its multiplier instead of unrolling it.

use std::fmt::Write;

use crate::catalog::SearchHit;
use crate::error::Result;
use crate::format;
use crate::loader;
use crate::models::{Category, Metric, Step, WorkoutDocument};
use crate::storage::WorkoutStore;

/// Fallback instruction text for steps without one
///
/// The collection marks generic intervals with the literal text "Active".
const DEFAULT_INSTRUCTION: &str = "Maintain effort";

/// One browse-result line: filename, duration, metric label, excerpt
pub fn summary_line(hit: &SearchHit) -> String {
    format!(
        "{} | {} {} | {}",
        hit.record.filename,
        format::duration_minutes(hit.summary.duration_seconds),
        hit.record.metric,
        hit.summary.excerpt
    )
}

/// Load a workout and render its full transcript
///
/// The operation boundary for transcript mode: failures carry the same
/// taxonomy as the loader and the tree builder, nothing new is added here.
pub fn transcript_for(
    store: &dyn WorkoutStore,
    category: Category,
    metric: Metric,
    filename: &str,
) -> Result<String> {
    let document = loader::load(store, category, metric, filename)?;
    Ok(transcript(&document))
}

/// Render a parsed workout document as readable text
pub fn transcript(document: &WorkoutDocument) -> String {
    let mut out = String::new();

    writeln!(out, "Workout Name: {}", document.name).ok();
    writeln!(out, "Workout Type: {}", document.sport.workout_type()).ok();
    writeln!(
        out,
        "Total Duration: {}",
        format::clock(document.total_duration)
    )
    .ok();
    out.push('\n');

    out.push_str("Description:\n");
    let description = document
        .description
        .as_deref()
        .unwrap_or("No description available");
    out.push_str(&format::clean_description(description));
    out.push('\n');

    if !document.steps.is_empty() {
        out.push('\n');
        out.push_str("Steps:\n");
        render_steps(&document.steps, 0, &mut out);
    }

    out
}

/// Pre-order walk preserving source sibling order
fn render_steps(steps: &[Step], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);

    for step in steps {
        match step {
            Step::Leaf(leaf) => {
                let text = match leaf.text.as_deref() {
                    None | Some("Active") => DEFAULT_INSTRUCTION,
                    Some(text) => text,
                };
                writeln!(
                    out,
                    "{}- \"{}\" {} {}",
                    indent,
                    text,
                    format::duration_value(&leaf.duration),
                    format::target(&leaf.target)
                )
                .ok();
            }
            Step::Repeat(group) => {
                writeln!(out, "{}Repeat {}x", indent, group.count).ok();
                render_steps(&group.steps, depth + 1, out);
            }
        }
    }
}
