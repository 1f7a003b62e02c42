//! Storage collaborator boundary
//!
//! The core only needs two capabilities from its backing collection:
//! enumerate document names under a (category, metric) scope, and fetch one
//! document's raw content by exact name. `FsStore` implements that contract
//! over a directory tree; everything above this module is agnostic to how
//! the collection is persisted.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{Category, Metric};

/// Read-only document collection, keyed by (category, metric) scope
///
/// Implementations are never mutated through this trait, so they can be
/// shared freely across concurrent requests.
pub trait WorkoutStore: Send + Sync {
    /// Whether the scope has any backing collection at all
    fn scope_exists(&self, category: Category, metric: Metric) -> bool;

    /// Enumerate document filenames within a scope
    ///
    /// Enumeration order is not guaranteed; callers impose their own
    /// deterministic ordering.
    fn list(&self, category: Category, metric: Metric) -> Result<Vec<String>>;

    /// Fetch one document's raw content by exact filename
    ///
    /// `None` means no such document; errors are reserved for IO faults.
    fn fetch(&self, category: Category, metric: Metric, filename: &str)
        -> Result<Option<String>>;
}

/// Filesystem-backed workout collection
///
/// Documents live under `<root>/<Category>_<Metric>/`, one JSON file per
/// workout (e.g. `<root>/Bike_Power/CAe11_Aerobic_Intervals_.json`).
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scope_dir(&self, category: Category, metric: Metric) -> PathBuf {
        self.root.join(format!("{}_{}", category, metric))
    }
}

impl WorkoutStore for FsStore {
    fn scope_exists(&self, category: Category, metric: Metric) -> bool {
        self.scope_dir(category, metric).is_dir()
    }

    fn list(&self, category: Category, metric: Metric) -> Result<Vec<String>> {
        let mut filenames = Vec::new();

        for entry in fs::read_dir(self.scope_dir(category, metric))? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Ok(name) = entry.file_name().into_string() {
                    filenames.push(name);
                }
            }
        }

        Ok(filenames)
    }

    fn fetch(
        &self,
        category: Category,
        metric: Metric,
        filename: &str,
    ) -> Result<Option<String>> {
        let path = self.scope_dir(category, metric).join(filename);

        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_files(files: &[(&str, &str)]) -> (tempfile::TempDir, FsStore) {
        let dir = tempfile::tempdir().unwrap();
        let scope = dir.path().join("Bike_HR");
        fs::create_dir_all(&scope).unwrap();
        for (name, content) in files {
            fs::write(scope.join(name), content).unwrap();
        }
        let store = FsStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_scope_detection() {
        let (_dir, store) = store_with_files(&[]);
        assert!(store.scope_exists(Category::Bike, Metric::HR));
        assert!(!store.scope_exists(Category::Swim, Metric::Meters));
    }

    #[test]
    fn test_list_and_fetch() {
        let (_dir, store) = store_with_files(&[
            ("CF1_Foundation_.json", "{\"duration\": 1800}"),
            ("CT2_Tempo_.json", "{\"duration\": 2400}"),
        ]);

        let mut names = store.list(Category::Bike, Metric::HR).unwrap();
        names.sort();
        assert_eq!(names, vec!["CF1_Foundation_.json", "CT2_Tempo_.json"]);

        let content = store
            .fetch(Category::Bike, Metric::HR, "CF1_Foundation_.json")
            .unwrap();
        assert_eq!(content.as_deref(), Some("{\"duration\": 1800}"));
    }

    #[test]
    fn test_fetch_missing_is_none_not_error() {
        let (_dir, store) = store_with_files(&[]);
        let content = store
            .fetch(Category::Bike, Metric::HR, "nope.json")
            .unwrap();
        assert!(content.is_none());
    }
}
