//! Workout document loading
//!
//! Resolves a requested filename against the store and parses the backing
//! JSON into a `WorkoutDocument`. Lookup is extension-tolerant: the
//! collection's files end in `_.json`, so a name supplied without its
//! storage extension is retried with `.json` and `_.json` appended before
//! failing. Parse failures surface as `CorruptWorkoutData` so callers can
//! tell "missing" from "present but unreadable".

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{LoadError, Result};
use crate::models::{Category, Metric, WorkoutDocument, WorkoutSummary};
use crate::steps;
use crate::storage::WorkoutStore;

/// Character budget for browse-result description excerpts
const EXCERPT_BUDGET: usize = 200;

/// Top-level document fields, everything else ignored
#[derive(Debug, Deserialize)]
struct RawDocument {
    name: Option<String>,
    #[serde(default)]
    duration: u32,
    description: Option<String>,
    #[serde(default)]
    steps: Vec<Value>,
}

/// Shallow view for summaries: like `RawDocument` but without the steps,
/// so browse queries never touch the interval tree
#[derive(Debug, Deserialize)]
struct ShallowDocument {
    name: Option<String>,
    #[serde(default)]
    duration: u32,
    description: Option<String>,
}

/// Load one workout document, fully parsed including its interval tree
pub fn load(
    store: &dyn WorkoutStore,
    category: Category,
    metric: Metric,
    filename: &str,
) -> Result<WorkoutDocument> {
    let (resolved, content) = resolve(store, category, metric, filename)?;

    let raw: RawDocument =
        serde_json::from_str(&content).map_err(|err| LoadError::CorruptWorkoutData {
            filename: resolved.clone(),
            reason: err.to_string(),
        })?;

    Ok(WorkoutDocument {
        name: raw.name.unwrap_or_else(|| display_name(&resolved)),
        sport: category,
        total_duration: raw.duration,
        description: raw.description,
        steps: steps::build(&raw.steps)?,
    })
}

/// Fetch one workout's stored JSON, pretty-printed, without interpreting it
pub fn raw_content(
    store: &dyn WorkoutStore,
    category: Category,
    metric: Metric,
    filename: &str,
) -> Result<String> {
    let (resolved, content) = resolve(store, category, metric, filename)?;

    let value: Value =
        serde_json::from_str(&content).map_err(|err| LoadError::CorruptWorkoutData {
            filename: resolved.clone(),
            reason: err.to_string(),
        })?;

    // Pretty-printing a just-parsed value cannot fail in practice
    serde_json::to_string_pretty(&value).map_err(|err| {
        LoadError::CorruptWorkoutData {
            filename: resolved,
            reason: err.to_string(),
        }
        .into()
    })
}

/// Resolve a filename with extension-tolerant retries
///
/// Returns the resolved filename along with the raw content.
pub fn resolve(
    store: &dyn WorkoutStore,
    category: Category,
    metric: Metric,
    filename: &str,
) -> Result<(String, String)> {
    let requested = filename.trim();
    if requested.is_empty() {
        return Err(LoadError::MissingFilename.into());
    }

    if !store.scope_exists(category, metric) {
        return Err(crate::error::CatalogError::MissingDirectory { category, metric }.into());
    }

    let candidates = [
        requested.to_string(),
        format!("{}.json", requested),
        format!("{}_.json", requested),
    ];

    for candidate in &candidates {
        if let Some(content) = store.fetch(category, metric, candidate)? {
            debug!(requested, resolved = %candidate, "workout resolved");
            return Ok((candidate.clone(), content));
        }
    }

    Err(LoadError::WorkoutNotFound {
        filename: requested.to_string(),
        category,
        metric,
    }
    .into())
}

/// Shallow summary from raw content, tolerant of unreadable files
///
/// A browse query covering dozens of files should not fail outright because
/// one of them is corrupt; that file's summary carries the error note
/// instead.
pub fn shallow_summary(filename: &str, content: &str) -> WorkoutSummary {
    match serde_json::from_str::<ShallowDocument>(content) {
        Ok(doc) => WorkoutSummary {
            name: doc.name.unwrap_or_else(|| display_name(filename)),
            duration_seconds: doc.duration,
            excerpt: crate::format::excerpt(
                doc.description.as_deref().unwrap_or("No description available"),
                EXCERPT_BUDGET,
            ),
        },
        Err(err) => unreadable_summary(filename, &err.to_string()),
    }
}

/// Summary placeholder for a file that could not be read or parsed
pub fn unreadable_summary(filename: &str, reason: &str) -> WorkoutSummary {
    WorkoutSummary {
        name: display_name(filename),
        duration_seconds: 0,
        excerpt: format!("(unreadable: {})", reason),
    }
}

/// Human-facing name derived from a stored filename
///
/// `CAe11_Aerobic_Intervals_.json` -> `CAe11 Aerobic Intervals`
pub fn display_name(filename: &str) -> String {
    filename
        .trim_end_matches(".json")
        .trim_end_matches('_')
        .replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanRsError;
    use crate::storage::FsStore;
    use std::fs;

    fn swim_store() -> (tempfile::TempDir, FsStore) {
        let dir = tempfile::tempdir().unwrap();
        let scope = dir.path().join("Swim_Meters");
        fs::create_dir_all(&scope).unwrap();
        fs::write(
            scope.join("SRe1_Recovery_.json"),
            r#"{
                "name": "Recovery Swim",
                "duration": 1200,
                "description": "Easy recovery swim.",
                "steps": [
                    {"text": "Swim", "distance": 400, "pace": {"value": 90, "units": "%pace"}}
                ]
            }"#,
        )
        .unwrap();
        let store = FsStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_load_exact_filename() {
        let (_dir, store) = swim_store();
        let doc = load(&store, Category::Swim, Metric::Meters, "SRe1_Recovery_.json").unwrap();
        assert_eq!(doc.name, "Recovery Swim");
        assert_eq!(doc.total_duration, 1200);
        assert_eq!(doc.steps.len(), 1);
    }

    #[test]
    fn test_load_without_storage_extension() {
        let (_dir, store) = swim_store();
        // "SRe1_Recovery" resolves to "SRe1_Recovery_.json"
        let doc = load(&store, Category::Swim, Metric::Meters, "SRe1_Recovery").unwrap();
        assert_eq!(doc.name, "Recovery Swim");
    }

    #[test]
    fn test_missing_filename() {
        let (_dir, store) = swim_store();
        let err = load(&store, Category::Swim, Metric::Meters, "   ").unwrap_err();
        assert!(matches!(
            err,
            PlanRsError::Load(LoadError::MissingFilename)
        ));
    }

    #[test]
    fn test_workout_not_found_echoes_scope() {
        let (_dir, store) = swim_store();
        let err = load(&store, Category::Swim, Metric::Meters, "Nope").unwrap_err();
        match err {
            PlanRsError::Load(LoadError::WorkoutNotFound {
                filename,
                category,
                metric,
            }) => {
                assert_eq!(filename, "Nope");
                assert_eq!(category, Category::Swim);
                assert_eq!(metric, Metric::Meters);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_document_is_distinguished_from_missing() {
        let dir = tempfile::tempdir().unwrap();
        let scope = dir.path().join("Bike_HR");
        fs::create_dir_all(&scope).unwrap();
        fs::write(scope.join("CF1_Foundation_.json"), "{not json").unwrap();
        let store = FsStore::new(dir.path());

        let err = load(&store, Category::Bike, Metric::HR, "CF1_Foundation_.json").unwrap_err();
        assert!(matches!(
            err,
            PlanRsError::Load(LoadError::CorruptWorkoutData { .. })
        ));
    }

    #[test]
    fn test_raw_content_round_trips() {
        let (_dir, store) = swim_store();
        let raw = raw_content(&store, Category::Swim, Metric::Meters, "SRe1_Recovery").unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["duration"], 1200);
    }

    #[test]
    fn test_shallow_summary_fields() {
        let summary = shallow_summary(
            "CAe11_Aerobic_Intervals_.json",
            r#"{"duration": 3600, "description": "Aerobic intervals."}"#,
        );
        assert_eq!(summary.name, "CAe11 Aerobic Intervals");
        assert_eq!(summary.duration_seconds, 3600);
        assert_eq!(summary.excerpt, "Aerobic intervals.");
    }

    #[test]
    fn test_shallow_summary_degrades_on_corrupt_content() {
        let summary = shallow_summary("CF1_Foundation_.json", "{broken");
        assert_eq!(summary.duration_seconds, 0);
        assert!(summary.excerpt.starts_with("(unreadable:"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            display_name("CAe11_Aerobic_Intervals_.json"),
            "CAe11 Aerobic Intervals"
        );
        assert_eq!(display_name("plain.json"), "plain");
    }
}
