//! Interval tree construction
//!
//! Builds the typed step tree out of the raw JSON step sequence of a workout
//! document. Two node shapes are recognized: a leaf (carries a duration or a
//! distance) and a repeat group (carries `reps`, usually with nested
//! `steps`). Anything else is a malformed step, reported with its dotted
//! position in the sequence (`2.3` = third child of the second top-level
//! node). Sibling order is preserved exactly; warm-up before main set before
//! cool-down is semantically meaningful.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{Result, StepError};
use crate::models::{DurationValue, HrUnit, LeafStep, RepeatGroup, Step, Target};

/// Build the ordered step tree from raw structured steps
pub fn build(raw: &[Value]) -> Result<Vec<Step>> {
    build_sequence(raw, None)
}

/// Sum of leaf durations in seconds, expanding every repeat group
///
/// Distance-based leaves contribute no time. For time-based workouts this
/// equals the document's declared total duration.
pub fn expanded_seconds(steps: &[Step]) -> u64 {
    steps
        .iter()
        .map(|step| match step {
            Step::Leaf(leaf) => match leaf.duration.unit {
                crate::models::DurationUnit::Seconds => u64::from(leaf.duration.value),
                crate::models::DurationUnit::Meters => 0,
            },
            Step::Repeat(group) => u64::from(group.count) * expanded_seconds(&group.steps),
        })
        .sum()
}

fn build_sequence(raw: &[Value], parent: Option<&str>) -> Result<Vec<Step>> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            let position = match parent {
                Some(parent) => format!("{}.{}", parent, index + 1),
                None => (index + 1).to_string(),
            };
            build_node(value, &position)
        })
        .collect()
}

fn build_node(value: &Value, position: &str) -> Result<Step> {
    let node = value.as_object().ok_or_else(|| StepError::MalformedStep {
        position: position.to_string(),
        reason: "step is not an object".to_string(),
    })?;

    if let Some(reps) = node.get("reps") {
        let count = integer(reps).ok_or_else(|| StepError::MalformedStep {
            position: position.to_string(),
            reason: "repeat count is not an integer".to_string(),
        })?;

        if count < 1 {
            return Err(StepError::InvalidRepeatCount {
                position: position.to_string(),
                count,
            }
            .into());
        }

        let steps = match node.get("steps") {
            Some(Value::Array(children)) => build_sequence(children, Some(position))?,
            Some(_) => {
                return Err(StepError::MalformedStep {
                    position: position.to_string(),
                    reason: "repeat group steps are not an array".to_string(),
                }
                .into())
            }
            // A reps node that is itself a leaf repeats that single interval
            None => vec![Step::Leaf(build_leaf(node, position)?)],
        };

        let count = u32::try_from(count).map_err(|_| StepError::InvalidRepeatCount {
            position: position.to_string(),
            count,
        })?;

        return Ok(Step::Repeat(RepeatGroup { count, steps }));
    }

    Ok(Step::Leaf(build_leaf(node, position)?))
}

fn build_leaf(node: &serde_json::Map<String, Value>, position: &str) -> Result<LeafStep> {
    let malformed = |reason: &str| StepError::MalformedStep {
        position: position.to_string(),
        reason: reason.to_string(),
    };

    let duration = match (node.get("duration"), node.get("distance")) {
        (Some(value), _) => DurationValue::seconds(extent(value).ok_or_else(|| {
            malformed("duration is not a non-negative whole number of seconds")
        })?),
        (None, Some(value)) => DurationValue::meters(
            extent(value).ok_or_else(|| malformed("distance is not a non-negative integer"))?,
        ),
        (None, None) => return Err(malformed("step has neither duration nor distance").into()),
    };

    let target = build_target(node, position)?;

    let text = node
        .get("text")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(LeafStep {
        text,
        duration,
        target,
    })
}

fn build_target(node: &serde_json::Map<String, Value>, position: &str) -> Result<Target> {
    if let Some(power) = node.get("power") {
        let (low, high, _) = bounds(power, position, "power")?;
        return Ok(Target::Power { low, high });
    }

    if let Some(hr) = node.get("hr") {
        let (low, high, units) = bounds(hr, position, "hr")?;
        let unit = match units.as_deref() {
            Some("bpm") => HrUnit::Bpm,
            _ => HrUnit::PercentLthr,
        };
        return Ok(Target::HeartRate { low, high, unit });
    }

    if let Some(pace) = node.get("pace") {
        let (low, high, units) = bounds(pace, position, "pace")?;
        return Ok(Target::Pace {
            low,
            high,
            unit: units.unwrap_or_else(|| "%pace".to_string()),
        });
    }

    // A distance alongside a time duration is a literal distance target
    if node.contains_key("duration") {
        if let Some(meters) = node.get("distance").and_then(extent) {
            return Ok(Target::Distance { meters });
        }
    }

    Ok(Target::Unspecified)
}

/// Parse a target object of the `{value}` or `{start, end}` form
fn bounds(
    value: &Value,
    position: &str,
    field: &str,
) -> Result<(Decimal, Option<Decimal>, Option<String>)> {
    let malformed = |reason: String| StepError::MalformedStep {
        position: position.to_string(),
        reason,
    };

    let object = value
        .as_object()
        .ok_or_else(|| malformed(format!("{} target is not an object", field)))?;

    let units = object
        .get("units")
        .and_then(Value::as_str)
        .map(str::to_string);

    if let Some(point) = object.get("value") {
        let low =
            number(point).ok_or_else(|| malformed(format!("{} value is not numeric", field)))?;
        return Ok((low, None, units));
    }

    let low = object
        .get("start")
        .and_then(number)
        .ok_or_else(|| malformed(format!("{} target has no value or start bound", field)))?;
    let high = object.get("end").and_then(number);

    Ok((low, high, units))
}

/// Accept a JSON number or a numeric string as a decimal value
fn number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accept a non-negative whole extent as a JSON number or numeric string
///
/// Fractional values are rejected rather than rounded; the formatter's three
/// duration forms have no exact representation for them.
fn extent(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accept an integer as a JSON number or numeric string
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanRsError;
    use crate::models::DurationUnit;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn build_one(value: Value) -> Result<Vec<Step>> {
        build(&[value])
    }

    #[test]
    fn test_leaf_with_power_range() {
        let steps = build_one(json!({
            "text": "Work",
            "duration": 300,
            "power": {"start": 85, "end": 95, "units": "%ftp"}
        }))
        .unwrap();

        match &steps[0] {
            Step::Leaf(leaf) => {
                assert_eq!(leaf.text.as_deref(), Some("Work"));
                assert_eq!(leaf.duration, DurationValue::seconds(300));
                assert_eq!(
                    leaf.target,
                    Target::Power {
                        low: dec!(85),
                        high: Some(dec!(95)),
                    }
                );
            }
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_group_preserves_child_order() {
        let steps = build_one(json!({
            "reps": 4,
            "steps": [
                {"text": "Hard", "duration": 60, "hr": {"value": 95, "units": "%lthr"}},
                {"text": "Easy", "duration": 120, "hr": {"value": 75, "units": "%lthr"}},
            ]
        }))
        .unwrap();

        match &steps[0] {
            Step::Repeat(group) => {
                assert_eq!(group.count, 4);
                let texts: Vec<_> = group
                    .steps
                    .iter()
                    .map(|s| match s {
                        Step::Leaf(leaf) => leaf.text.clone().unwrap(),
                        Step::Repeat(_) => panic!("unexpected nesting"),
                    })
                    .collect();
                assert_eq!(texts, vec!["Hard", "Easy"]);
            }
            other => panic!("expected repeat group, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_count_zero_rejected() {
        let err = build_one(json!({"reps": 0, "steps": [{"duration": 60}]})).unwrap_err();
        match err {
            PlanRsError::Step(StepError::InvalidRepeatCount { position, count }) => {
                assert_eq!(position, "1");
                assert_eq!(count, 0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_repeat_count_beyond_u32_rejected() {
        // 2^32 must not wrap to a zero-count group
        let err =
            build_one(json!({"reps": 4_294_967_296i64, "steps": [{"duration": 60}]})).unwrap_err();
        match err {
            PlanRsError::Step(StepError::InvalidRepeatCount { position, count }) => {
                assert_eq!(position, "1");
                assert_eq!(count, 4_294_967_296);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_repeat_count_negative_rejected() {
        let err = build_one(json!({"reps": -3, "steps": [{"duration": 60}]})).unwrap_err();
        assert!(matches!(
            err,
            PlanRsError::Step(StepError::InvalidRepeatCount { count: -3, .. })
        ));
    }

    #[test]
    fn test_malformed_step_reports_nested_position() {
        let err = build(&[
            json!({"duration": 600}),
            json!({"reps": 2, "steps": [
                {"duration": 60},
                {"text": "no extent at all"},
            ]}),
        ])
        .unwrap_err();

        match err {
            PlanRsError::Step(StepError::MalformedStep { position, .. }) => {
                assert_eq!(position, "2.2");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_zero_duration_leaf_is_legal() {
        let steps = build_one(json!({"text": "Lap split", "duration": 0})).unwrap();
        match &steps[0] {
            Step::Leaf(leaf) => assert_eq!(leaf.duration, DurationValue::seconds(0)),
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_fractional_duration_rejected() {
        let err = build_one(json!({"duration": 90.5})).unwrap_err();
        assert!(matches!(
            err,
            PlanRsError::Step(StepError::MalformedStep { .. })
        ));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = build_one(json!({"duration": -60})).unwrap_err();
        assert!(matches!(
            err,
            PlanRsError::Step(StepError::MalformedStep { .. })
        ));
    }

    #[test]
    fn test_distance_leaf_for_swim_steps() {
        let steps = build_one(json!({
            "text": "Pull",
            "distance": 100,
            "pace": {"start": 95, "end": 100, "units": "%pace"}
        }))
        .unwrap();

        match &steps[0] {
            Step::Leaf(leaf) => {
                assert_eq!(leaf.duration.unit, DurationUnit::Meters);
                assert_eq!(leaf.duration.value, 100);
            }
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_distance_alongside_duration_becomes_target() {
        let steps = build_one(json!({"duration": 600, "distance": 3000})).unwrap();
        match &steps[0] {
            Step::Leaf(leaf) => {
                assert_eq!(leaf.duration, DurationValue::seconds(600));
                assert_eq!(leaf.target, Target::Distance { meters: 3000 });
            }
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_target_is_unspecified() {
        let steps = build_one(json!({"duration": 300})).unwrap();
        match &steps[0] {
            Step::Leaf(leaf) => assert_eq!(leaf.target, Target::Unspecified),
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_string_valued_fields_accepted() {
        let steps = build_one(json!({
            "reps": "3",
            "steps": [{"duration": "900", "power": {"value": "80", "units": "%ftp"}}]
        }))
        .unwrap();

        match &steps[0] {
            Step::Repeat(group) => assert_eq!(group.count, 3),
            other => panic!("expected repeat group, got {:?}", other),
        }
    }

    #[test]
    fn test_reps_leaf_without_nested_steps() {
        let steps = build_one(json!({
            "reps": 6,
            "text": "Stride",
            "duration": 20,
            "hr": {"value": 100, "units": "%lthr"}
        }))
        .unwrap();

        match &steps[0] {
            Step::Repeat(group) => {
                assert_eq!(group.count, 6);
                assert_eq!(group.steps.len(), 1);
            }
            other => panic!("expected repeat group, got {:?}", other),
        }
    }

    #[test]
    fn test_expanded_seconds_with_nesting() {
        let steps = build(&[
            json!({"duration": 600}),
            json!({"reps": 4, "steps": [
                {"duration": 300},
                {"reps": 2, "steps": [{"duration": 30}]},
            ]}),
            json!({"duration": 600}),
        ])
        .unwrap();

        // 600 + 4 * (300 + 2 * 30) + 600
        assert_eq!(expanded_seconds(&steps), 2640);
    }

    fn arb_tree(depth: u32) -> BoxedStrategy<(Value, u64)> {
        let leaf = (0u32..3600).prop_map(|secs| (json!({ "duration": secs }), u64::from(secs)));
        if depth == 0 {
            return leaf.boxed();
        }
        let repeat = (1u32..5, proptest::collection::vec(arb_tree(depth - 1), 1..4)).prop_map(
            |(reps, children)| {
                let total: u64 =
                    u64::from(reps) * children.iter().map(|(_, secs)| secs).sum::<u64>();
                let steps: Vec<Value> = children.into_iter().map(|(value, _)| value).collect();
                (json!({"reps": reps, "steps": steps}), total)
            },
        );
        prop_oneof![leaf, repeat].boxed()
    }

    proptest! {
        /// Expanded duration of any valid tree equals the sum computed while
        /// generating it
        #[test]
        fn prop_expanded_seconds_matches_source(
            nodes in proptest::collection::vec(arb_tree(3), 1..5)
        ) {
            let expected: u64 = nodes.iter().map(|(_, secs)| secs).sum();
            let raw: Vec<Value> = nodes.into_iter().map(|(value, _)| value).collect();
            let steps = build(&raw).unwrap();
            prop_assert_eq!(expanded_seconds(&steps), expected);
        }
    }
}
