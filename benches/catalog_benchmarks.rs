use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

use planrs::catalog::{self, SearchQuery, Vocabulary};
use planrs::models::{Category, Metric};
use planrs::storage::FsStore;
use planrs::{render, steps};

/// Benchmarks for catalog search and transcript rendering
///
/// Search cost is dominated by directory enumeration plus one shallow
/// parse per result; rendering is dominated by the interval tree build.

fn seed_library(count: usize) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("Bike_Power");
    fs::create_dir_all(&dir).unwrap();

    for i in 0..count {
        let doc = json!({
            "name": format!("Intervals {}", i),
            "duration": 3600,
            "description": "Aerobic intervals with steady recovery between efforts.",
            "steps": [
                {"text": "Warmup", "duration": 600, "power": {"start": 50, "end": 65, "units": "%ftp"}},
                {"reps": 4, "steps": [
                    {"text": "Work", "duration": 300, "power": {"start": 85, "end": 95, "units": "%ftp"}},
                    {"text": "Recover", "duration": 300, "power": {"value": 55, "units": "%ftp"}}
                ]},
                {"text": "Cooldown", "duration": 600, "power": {"value": 50, "units": "%ftp"}}
            ]
        });
        fs::write(
            dir.join(format!("CAe{:04}_Aerobic_Intervals_.json", i)),
            serde_json::to_string(&doc).unwrap(),
        )
        .unwrap();
    }

    temp
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Catalog Search");
    let vocab = Vocabulary::builtin();

    for &size in &[10, 100, 500] {
        let library = seed_library(size);
        let store = FsStore::new(library.path());

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("search", size), &size, |b, _| {
            b.iter(|| {
                let mut query = SearchQuery::new("Bike");
                query.metric = Some("Power");
                query.limit = size;
                black_box(catalog::search(&store, &vocab, &query).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_transcript(c: &mut Criterion) {
    let mut group = c.benchmark_group("Transcript Rendering");

    let library = seed_library(1);
    let store = FsStore::new(library.path());

    group.bench_function("render_transcript", |b| {
        b.iter(|| {
            black_box(
                render::transcript_for(
                    &store,
                    Category::Bike,
                    Metric::Power,
                    "CAe0000_Aerobic_Intervals",
                )
                .unwrap(),
            );
        });
    });

    let document = planrs::loader::load(
        &store,
        Category::Bike,
        Metric::Power,
        "CAe0000_Aerobic_Intervals",
    )
    .unwrap();

    group.bench_function("expanded_seconds", |b| {
        b.iter(|| black_box(steps::expanded_seconds(&document.steps)));
    });

    group.finish();
}

criterion_group!(benches, bench_search, bench_transcript);
criterion_main!(benches);
