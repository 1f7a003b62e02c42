//! Catalog index: browse and filter the workout collection
//!
//! Resolves a (category, sub-category, metric) query into workout records
//! with shallow summaries. The sub-category vocabulary is declarative data,
//! one ordered token table per sport, mapping each token to the filename
//! prefixes it selects; the same token may select different prefixes per
//! sport. A single validation pass over the mapping checks the invariant
//! that every advertised token has at least one real match.

use tracing::debug;

use crate::error::{CatalogError, PlanRsError, Result};
use crate::loader;
use crate::models::{Category, Metric, WorkoutRecord, WorkoutSummary};
use crate::storage::WorkoutStore;

/// Default cap on returned records
pub const DEFAULT_LIMIT: usize = 50;

/// Copyright notices stored alongside the workouts, never workout data
const EXCLUDED_PREFIX: &str = "Copyright_";

/// Sub-category tokens for bike workouts, token -> filename prefixes
const BIKE_TOKENS: &[(&str, &[&str])] = &[
    ("aerobic", &["CAe", "CAP"]),
    ("anaerobic", &["CAI", "CAn"]),
    ("accelerations", &["CA1", "CA2", "CA3", "CA4", "CA5", "CA6", "CA7", "CA8", "CA9"]),
    ("cruise", &["CCI"]),
    ("critical_power", &["CCP"]),
    ("depletion", &["CD"]),
    ("descending", &["CDI"]),
    ("foundation", &["CF"]),
    ("fast_finish", &["CFA", "CFF"]),
    ("force", &["CFo"]),
    ("mixed", &["CIM", "CMI"]),
    ("sprint", &["CIR"]),
    ("progression", &["CPI"]),
    ("power_repetitions", &["CPR"]),
    ("recovery", &["CRe"]),
    ("speed_play", &["CSP"]),
    ("speed_repetitions", &["CSR"]),
    ("steady_state", &["CSS"]),
    ("tempo", &["CT"]),
    ("threshold", &["CTR"]),
    ("time_trial", &["CTT"]),
    ("variable_intensity", &["CVI"]),
    ("vo2max", &["CVO2M"]),
    ("endurance", &["EC"]),
    ("easy", &["EZC"]),
    ("lactate", &["LIC"]),
    ("over_under", &["OUC"]),
];

/// Sub-category tokens for run workouts
const RUN_TOKENS: &[(&str, &[&str])] = &[
    ("aerobic", &["RAe"]),
    ("anaerobic", &["RAI", "RAn"]),
    ("accelerations", &["RA"]),
    ("cruise", &["RCI"]),
    ("critical_velocity", &["RCV"]),
    ("depletion", &["RD"]),
    ("descending", &["RDI"]),
    ("foundation", &["RF"]),
    ("fast_finish", &["RFF"]),
    ("fartlek", &["RFR"]),
    ("half_marathon", &["RHM"]),
    ("heart_rate", &["RHR"]),
    ("long", &["RL"]),
    ("long_speedplay", &["RLS"]),
    ("mixed", &["RMI"]),
    ("marathon_pace", &["RMP"]),
    ("progression", &["RP"]),
    ("progression_fartlek", &["RPF"]),
    ("progression_intervals", &["RPI"]),
    ("recovery", &["RRe"]),
    ("short_intervals", &["RSI"]),
    ("speed_play", &["RSP"]),
    ("steady_state", &["RSS"]),
    ("tempo", &["RT"]),
    ("time_trial", &["RTT"]),
    ("variable_intensity", &["RVI"]),
    ("vo2max", &["RVO2M"]),
    ("cross_training", &["RXT"]),
    ("5k", &["R5K"]),
    ("10k", &["R10K"]),
    ("easy", &["ER"]),
    ("easy_fast_finish", &["ERFF"]),
    ("long_finish", &["LFR"]),
    ("long_intervals", &["LIR"]),
    ("outdoor", &["OUR"]),
    ("warmup", &["WR"]),
];

/// Sub-category tokens for swim workouts
const SWIM_TOKENS: &[(&str, &[&str])] = &[
    ("aerobic", &["SAe"]),
    ("broken_swims", &["SBB"]),
    ("cruise", &["SCI"]),
    ("critical_pace", &["SCP"]),
    ("endurance", &["SE"]),
    ("easy_endurance", &["SEE"]),
    ("endurance_recovery", &["SER"]),
    ("foundation", &["SF"]),
    ("short_intervals", &["SIS"]),
    ("lactate", &["SLI"]),
    ("mixed", &["SMI"]),
    ("recovery", &["SRe"]),
    ("short_sprint", &["SSI"]),
    ("speed_play", &["SSP"]),
    ("tempo", &["ST"]),
    ("threshold_intervals", &["STI"]),
    ("time_trial", &["STT"]),
];

/// One token and the filename prefixes it selects
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    pub token: String,
    pub prefixes: Vec<String>,
}

/// Per-category sub-category vocabulary, built once at startup
#[derive(Debug, Clone)]
pub struct Vocabulary {
    bike: Vec<TokenMatcher>,
    run: Vec<TokenMatcher>,
    swim: Vec<TokenMatcher>,
}

impl Vocabulary {
    /// Build the vocabulary from the built-in declarative tables
    pub fn builtin() -> Self {
        fn matchers(table: &[(&str, &[&str])]) -> Vec<TokenMatcher> {
            table
                .iter()
                .map(|(token, prefixes)| TokenMatcher {
                    token: (*token).to_string(),
                    prefixes: prefixes.iter().map(|p| (*p).to_string()).collect(),
                })
                .collect()
        }

        Vocabulary {
            bike: matchers(BIKE_TOKENS),
            run: matchers(RUN_TOKENS),
            swim: matchers(SWIM_TOKENS),
        }
    }

    fn table(&self, category: Category) -> &[TokenMatcher] {
        match category {
            Category::Bike => &self.bike,
            Category::Run => &self.run,
            Category::Swim => &self.swim,
        }
    }

    /// Sorted token list for a category, as advertised in error messages
    pub fn tokens(&self, category: Category) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .table(category)
            .iter()
            .map(|m| m.token.clone())
            .collect();
        tokens.sort();
        tokens
    }

    /// Filename prefixes selected by a sub-category input
    ///
    /// A token matches when it equals, contains, or is contained in the
    /// lowercased input; all matching tokens contribute their prefixes.
    pub fn matching_prefixes(&self, category: Category, input: &str) -> Vec<&str> {
        let needle = input.trim().to_lowercase();
        let mut prefixes = Vec::new();

        for matcher in self.table(category) {
            if matcher.token.contains(&needle) || needle.contains(&matcher.token) {
                prefixes.extend(matcher.prefixes.iter().map(String::as_str));
            }
        }

        prefixes
    }

    /// Check that every advertised token selects at least one document in
    /// some metric scope of its category
    pub fn validate(&self, store: &dyn WorkoutStore) -> Result<()> {
        let mut unmatched = Vec::new();

        for category in Category::ALL {
            let mut filenames = Vec::new();
            for metric in Metric::ALL {
                if store.scope_exists(category, metric) {
                    filenames.extend(store.list(category, metric)?);
                }
            }

            for matcher in self.table(category) {
                let has_match = filenames.iter().any(|name| {
                    matcher
                        .prefixes
                        .iter()
                        .any(|prefix| name.starts_with(prefix.as_str()))
                });
                if !has_match {
                    unmatched.push(format!("{}/{}", category, matcher.token));
                }
            }
        }

        if unmatched.is_empty() {
            Ok(())
        } else {
            Err(PlanRsError::Configuration(format!(
                "sub-category tokens with no matching workouts: {}",
                unmatched.join(", ")
            )))
        }
    }
}

/// Parameters of one catalog query
#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
    /// Required sport category
    pub category: &'a str,

    /// Optional sub-category filter, matched against the vocabulary
    pub sub_category: Option<&'a str>,

    /// Target metric, defaults to HR when absent
    pub metric: Option<&'a str>,

    /// Maximum number of records returned
    pub limit: usize,
}

impl<'a> SearchQuery<'a> {
    pub fn new(category: &'a str) -> Self {
        SearchQuery {
            category,
            sub_category: None,
            metric: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One browse result: the record identity plus its shallow summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub record: WorkoutRecord,
    pub summary: WorkoutSummary,
}

/// Browse/filter the collection
///
/// Records come back in lexicographic filename order, so identical queries
/// are reproducible. Summaries are read from top-level metadata only; the
/// interval tree is never built here.
pub fn search(
    store: &dyn WorkoutStore,
    vocab: &Vocabulary,
    query: &SearchQuery<'_>,
) -> Result<Vec<SearchHit>> {
    let metric_input = query.metric.unwrap_or("HR");
    let metric = Metric::parse(metric_input).ok_or_else(|| CatalogError::InvalidMetric {
        value: metric_input.to_string(),
    })?;

    let category =
        Category::parse(query.category).ok_or_else(|| CatalogError::InvalidCategory {
            value: query.category.to_string(),
        })?;

    if !store.scope_exists(category, metric) {
        return Err(CatalogError::MissingDirectory { category, metric }.into());
    }

    let mut filenames: Vec<String> = store
        .list(category, metric)?
        .into_iter()
        .filter(|name| name.ends_with(".json") && !name.starts_with(EXCLUDED_PREFIX))
        .collect();

    if let Some(sub_category) = query.sub_category {
        let prefixes = vocab.matching_prefixes(category, sub_category);
        if prefixes.is_empty() {
            return Err(CatalogError::UnknownSubCategory {
                value: sub_category.to_string(),
                category,
                valid: vocab.tokens(category),
            }
            .into());
        }
        filenames.retain(|name| prefixes.iter().any(|prefix| name.starts_with(prefix)));
    }

    filenames.sort();
    filenames.truncate(query.limit);

    debug!(
        category = %category,
        metric = %metric,
        results = filenames.len(),
        "catalog search"
    );

    let mut hits = Vec::with_capacity(filenames.len());
    for filename in filenames {
        let summary = match store.fetch(category, metric, &filename)? {
            Some(content) => loader::shallow_summary(&filename, &content),
            // Raced out from under the enumeration; degrade like a corrupt file
            None => loader::unreadable_summary(&filename, "file disappeared during query"),
        };

        hits.push(SearchHit {
            record: WorkoutRecord {
                category,
                metric,
                subcategory: WorkoutRecord::subcategory_code(&filename),
                filename,
            },
            summary,
        });
    }

    Ok(hits)
}
