use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sport categories in the workout collection (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Bike,
    Run,
    Swim,
}

impl Category {
    /// All valid categories, in the order they are advertised to callers
    pub const ALL: [Category; 3] = [Category::Bike, Category::Run, Category::Swim];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bike => "Bike",
            Category::Run => "Run",
            Category::Swim => "Swim",
        }
    }

    /// Workout type label used in rendered transcripts
    pub fn workout_type(&self) -> &'static str {
        match self {
            Category::Bike => "Ride",
            Category::Run => "Run",
            Category::Swim => "Swim",
        }
    }

    /// Case-insensitive lookup, `None` for anything outside the closed set
    pub fn parse(input: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(input.trim()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target metrics a workout collection can be keyed by (closed set)
///
/// Not every (Category, Metric) pair has backing data; validity is determined
/// by presence in the store, not by a static compatibility table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    HR,
    Power,
    Pace,
    Meters,
}

impl Metric {
    /// All valid metrics, in the order they are advertised to callers
    pub const ALL: [Metric; 4] = [Metric::HR, Metric::Power, Metric::Pace, Metric::Meters];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::HR => "HR",
            Metric::Power => "Power",
            Metric::Pace => "Pace",
            Metric::Meters => "Meters",
        }
    }

    /// Case-insensitive lookup, `None` for anything outside the closed set
    pub fn parse(input: &str) -> Option<Metric> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(input.trim()))
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one workout within the collection
///
/// The filename is the stable external identifier; it is unique within a
/// (category, metric) scope. Records are derived fresh on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Sport category the workout belongs to
    pub category: Category,

    /// Target metric the workout is keyed by
    pub metric: Metric,

    /// Stable identifier within the (category, metric) scope
    pub filename: String,

    /// Sub-category code inferred from the filename prefix (e.g. "cae")
    pub subcategory: Option<String>,
}

impl WorkoutRecord {
    /// Infer the sub-category code from a filename's leading alpha prefix
    ///
    /// `CAe11_Aerobic_Intervals_.json` -> `cae`, `ER10_Endurance_Run_.json` -> `er`
    pub fn subcategory_code(filename: &str) -> Option<String> {
        let prefix: String = filename
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();

        if prefix.is_empty() {
            None
        } else {
            Some(prefix.to_lowercase())
        }
    }
}

/// Shallow per-record summary shown in browse results
///
/// Read from top-level metadata only; never requires building the step tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    /// Display name, derived from the document or the filename
    pub name: String,

    /// Declared total duration in seconds, rendered as whole minutes
    pub duration_seconds: u32,

    /// Description excerpt within a fixed character budget
    pub excerpt: String,
}

/// Fully parsed content of one workout document
///
/// Owned by a single request; never cached across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDocument {
    /// Workout name
    pub name: String,

    /// Sport the workout belongs to
    pub sport: Category,

    /// Declared total duration in seconds
    pub total_duration: u32,

    /// Free-form description text
    pub description: Option<String>,

    /// Ordered interval tree
    pub steps: Vec<Step>,
}

/// A node in the interval tree: either a single interval or a repeat group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    Leaf(LeafStep),
    Repeat(RepeatGroup),
}

/// A single interval with a duration and an intensity target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafStep {
    /// Instruction text for the interval
    pub text: Option<String>,

    /// How long (or how far) the interval lasts
    pub duration: DurationValue,

    /// Intensity target for the interval
    pub target: Target,
}

/// "Perform this child sequence N times" without duplicating the children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatGroup {
    /// Number of repetitions, always >= 1
    pub count: u32,

    /// Ordered child sequence, order preserved exactly from the source
    pub steps: Vec<Step>,
}

/// Extent of a leaf step, either time-based or distance-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationValue {
    pub value: u32,
    pub unit: DurationUnit,
}

impl DurationValue {
    pub fn seconds(value: u32) -> Self {
        DurationValue {
            value,
            unit: DurationUnit::Seconds,
        }
    }

    pub fn meters(value: u32) -> Self {
        DurationValue {
            value,
            unit: DurationUnit::Meters,
        }
    }
}

/// Unit of a leaf step's extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationUnit {
    Seconds,
    Meters,
}

/// Intensity target attached to a leaf step
///
/// A target with only a single bound is a point value; a low/high pair is a
/// range. Missing target data is explicit, never silently omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// Heart rate, percent of LTHR or absolute bpm
    HeartRate {
        low: Decimal,
        high: Option<Decimal>,
        unit: HrUnit,
    },

    /// Power, percent of FTP
    Power { low: Decimal, high: Option<Decimal> },

    /// Pace, unit string inherited from the source value (no conversion)
    Pace {
        low: Decimal,
        high: Option<Decimal>,
        unit: String,
    },

    /// Literal distance, no percentage semantics
    Distance { meters: u32 },

    /// No intensity given for this step
    Unspecified,
}

/// Flavor of a heart rate target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HrUnit {
    /// Percent of Lactate Threshold Heart Rate
    PercentLthr,
    /// Absolute beats per minute
    Bpm,
}
