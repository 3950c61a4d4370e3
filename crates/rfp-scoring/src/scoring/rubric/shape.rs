use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{
    CategoryKind, CategoryRubric, Rubric, RubricSource, SubCriterion, SupplementaryCategory,
};
use crate::scoring::input::RawInput;

/// Weight assumed for a criteria-list entry that carries none.
const DEFAULT_CRITERION_WEIGHT: u32 = 25;
/// Largest weight accepted for a single category or criterion.
const MAX_CATEGORY_POINTS: u32 = 1_000_000;

const WRAPPER_KEY: &str = "scorecard_template";
const CRITERIA_KEY: &str = "criteria";
const SUB_CRITERIA_KEYS: [&str; 3] = ["criteria", "sub_criteria", "subcriteria"];

/// The rubric layouts we know how to read.
#[derive(Debug)]
pub(super) enum RubricShape {
    /// `{"scorecard_template": ...}`; the inner value may itself be JSON text.
    Wrapped(Value),
    /// `{"criteria": [{"name": ..., "weight": ...}, ...]}`
    CriteriaList(Vec<Value>),
    /// `{"technical_capability": {"points": 35}, ...}`
    CategoryMap(Map<String, Value>),
    Unrecognized(&'static str),
}

pub(super) fn classify(value: Value) -> RubricShape {
    let mut object = match value {
        Value::Object(object) => object,
        Value::Array(_) => return RubricShape::Unrecognized("rubric is a bare array"),
        _ => return RubricShape::Unrecognized("rubric is a scalar value"),
    };

    if let Some(inner) = object.remove(WRAPPER_KEY) {
        return RubricShape::Wrapped(inner);
    }

    if matches!(object.get(CRITERIA_KEY), Some(Value::Array(_))) {
        if let Some(Value::Array(entries)) = object.remove(CRITERIA_KEY) {
            return RubricShape::CriteriaList(entries);
        }
    }

    if CategoryKind::ALL
        .iter()
        .any(|kind| object.contains_key(kind.key()))
    {
        return RubricShape::CategoryMap(object);
    }

    RubricShape::Unrecognized("rubric names none of the scoring categories")
}

pub(super) fn resolve(shape: RubricShape) -> Rubric {
    match shape {
        RubricShape::Wrapped(inner) => {
            debug!("unwrapping scorecard_template");
            match RawInput::from(inner).into_value() {
                Ok(value) => resolve(classify(value)),
                Err(err) => {
                    warn!(error = %err, "wrapped scorecard_template is unusable");
                    Rubric::fallback(format!("scorecard_template could not be parsed: {err}"))
                }
            }
        }
        RubricShape::CriteriaList(entries) => from_criteria_list(entries),
        RubricShape::CategoryMap(object) => from_category_map(&object),
        RubricShape::Unrecognized(reason) => {
            warn!(reason, "rubric shape not recognized; using default rubric");
            Rubric::fallback(reason)
        }
    }
}

fn from_category_map(object: &Map<String, Value>) -> Rubric {
    let categories = CategoryKind::ALL.map(|kind| {
        let default = kind.default_points();
        match object.get(kind.key()) {
            Some(Value::Object(entry)) => {
                let points = parse_points(entry.get("points"), default);
                with_sub_criteria(CategoryRubric::new(kind, points), entry)
            }
            Some(bare @ (Value::Number(_) | Value::String(_))) => {
                CategoryRubric::new(kind, parse_points(Some(bare), default))
            }
            _ => CategoryRubric::standard(kind),
        }
    });

    Rubric::from_categories(categories, Vec::new(), RubricSource::CategoryMap)
}

fn from_criteria_list(entries: Vec<Value>) -> Rubric {
    let mut categories = CategoryKind::ALL.map(CategoryRubric::standard);
    let mut supplementary: Vec<SupplementaryCategory> = Vec::new();

    for entry in entries {
        let Value::Object(entry) = entry else {
            debug!("skipping criteria entry that is not an object");
            continue;
        };

        let Some(key) = entry
            .get("name")
            .and_then(Value::as_str)
            .map(normalize_criterion_name)
            .filter(|key| !key.is_empty())
        else {
            debug!("skipping criteria entry without a name");
            continue;
        };

        let points = parse_points(entry.get("weight"), DEFAULT_CRITERION_WEIGHT);

        match CategoryKind::classify_name(&key) {
            Some(kind) => {
                debug!(criterion = %key, category = kind.key(), points, "criterion classified");
                categories[kind.index()] =
                    with_sub_criteria(CategoryRubric::new(kind, points), &entry);
            }
            None => {
                debug!(criterion = %key, points, "criterion kept as supplementary");
                let sub_criteria = explicit_sub_criteria(&entry).unwrap_or_default();
                supplementary.retain(|existing| existing.key != key);
                supplementary.push(SupplementaryCategory {
                    key,
                    points,
                    sub_criteria,
                });
            }
        }
    }

    Rubric::from_categories(categories, supplementary, RubricSource::CriteriaList)
}

fn normalize_criterion_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

fn with_sub_criteria(category: CategoryRubric, entry: &Map<String, Value>) -> CategoryRubric {
    match explicit_sub_criteria(entry) {
        Some(sub_criteria) => category.with_explicit_split(sub_criteria),
        None => category,
    }
}

/// Read caller-supplied sub-criteria; `None` unless every allocation is a usable number.
fn explicit_sub_criteria(entry: &Map<String, Value>) -> Option<Vec<SubCriterion>> {
    let object = SUB_CRITERIA_KEYS
        .iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_object))?;

    if object.is_empty() {
        return None;
    }

    object
        .iter()
        .map(|(name, value)| {
            let raw = match value {
                Value::Object(inner) => inner.get("points").or_else(|| inner.get("weight")),
                other => Some(other),
            };
            let points = numeric(raw?)?;
            (0.0..=f64::from(MAX_CATEGORY_POINTS))
                .contains(&points)
                .then(|| SubCriterion {
                    name: name.clone(),
                    points: points.round() as u32,
                })
        })
        .collect()
}

/// Parse a whole number of points in `1..=MAX_CATEGORY_POINTS`, falling back to `default`.
fn parse_points(value: Option<&Value>, default: u32) -> u32 {
    let Some(points) = value.and_then(numeric) else {
        return default;
    };

    let rounded = points.round();
    if rounded >= 1.0 && rounded <= f64::from(MAX_CATEGORY_POINTS) {
        rounded as u32
    } else {
        default
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_detects_each_shape() {
        assert!(matches!(
            classify(json!({ "scorecard_template": {} })),
            RubricShape::Wrapped(_)
        ));
        assert!(matches!(
            classify(json!({ "criteria": [{ "name": "Cost", "weight": 20 }] })),
            RubricShape::CriteriaList(_)
        ));
        assert!(matches!(
            classify(json!({ "vendor_experience": { "points": 20 } })),
            RubricShape::CategoryMap(_)
        ));
        assert!(matches!(
            classify(json!({ "title": "RFP 42" })),
            RubricShape::Unrecognized(_)
        ));
        assert!(matches!(classify(json!([1, 2])), RubricShape::Unrecognized(_)));
        assert!(matches!(classify(json!(12)), RubricShape::Unrecognized(_)));
    }

    #[test]
    fn criteria_that_is_not_a_list_falls_through_to_category_map() {
        let shape = classify(json!({
            "criteria": { "anything": 1 },
            "technical_capability": { "points": 50 }
        }));
        assert!(matches!(shape, RubricShape::CategoryMap(_)));
    }

    #[test]
    fn parse_points_accepts_numeric_strings_and_rejects_non_positive() {
        assert_eq!(parse_points(Some(&json!(40)), 35), 40);
        assert_eq!(parse_points(Some(&json!("30")), 35), 30);
        assert_eq!(parse_points(Some(&json!("15%")), 35), 15);
        assert_eq!(parse_points(Some(&json!(22.6)), 35), 23);
        assert_eq!(parse_points(Some(&json!(0)), 35), 35);
        assert_eq!(parse_points(Some(&json!(-5)), 35), 35);
        assert_eq!(parse_points(Some(&json!("many")), 35), 35);
        assert_eq!(parse_points(Some(&json!(true)), 35), 35);
        assert_eq!(parse_points(None, 35), 35);
        assert_eq!(parse_points(Some(&json!(1_000_000)), 35), 1_000_000);
        assert_eq!(parse_points(Some(&json!(1_000_001)), 35), 35);
        assert_eq!(parse_points(Some(&json!(4_000_000_000u64)), 35), 35);
    }

    #[test]
    fn explicit_sub_criteria_accepts_numbers_and_point_objects() {
        let entry = json!({
            "criteria": {
                "licensing": 12,
                "support": { "points": 8 }
            }
        });
        let sub_criteria =
            explicit_sub_criteria(entry.as_object().expect("object")).expect("parses");
        assert_eq!(sub_criteria.len(), 2);
        assert_eq!(sub_criteria.iter().map(|sub| sub.points).sum::<u32>(), 20);

        let broken = json!({ "criteria": { "licensing": "lots" } });
        assert!(explicit_sub_criteria(broken.as_object().expect("object")).is_none());
    }

    #[test]
    fn criterion_names_are_normalized() {
        assert_eq!(
            normalize_criterion_name("  Technical Capability "),
            "technical_capability"
        );
    }
}
