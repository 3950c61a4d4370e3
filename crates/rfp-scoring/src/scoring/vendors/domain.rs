use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::scoring::rubric::CategoryKind;

/// Name given to vendors whose payload carries no usable name.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Extracted feature value. `Absent` stands in for nulls so scorers never see them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<FeatureValue>),
    Map(BTreeMap<String, FeatureValue>),
    Absent,
}

impl FeatureValue {
    /// Whether this value counts as evidence that the feature is present.
    pub fn is_present(&self) -> bool {
        match self {
            FeatureValue::Flag(flag) => *flag,
            FeatureValue::Number(_) => true,
            FeatureValue::Text(text) => !text.trim().is_empty(),
            FeatureValue::List(items) => !items.is_empty(),
            FeatureValue::Map(entries) => !entries.is_empty(),
            FeatureValue::Absent => false,
        }
    }
}

impl From<&Value> for FeatureValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FeatureValue::Absent,
            Value::Bool(flag) => FeatureValue::Flag(*flag),
            Value::Number(number) => number
                .as_f64()
                .map(FeatureValue::Number)
                .unwrap_or(FeatureValue::Absent),
            Value::String(text) => FeatureValue::Text(text.clone()),
            Value::Array(items) => FeatureValue::List(items.iter().map(Self::from).collect()),
            Value::Object(entries) => FeatureValue::Map(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(flag: bool) -> Self {
        FeatureValue::Flag(flag)
    }
}

impl From<f64> for FeatureValue {
    fn from(number: f64) -> Self {
        FeatureValue::Number(number)
    }
}

impl From<String> for FeatureValue {
    fn from(text: String) -> Self {
        FeatureValue::Text(text)
    }
}

impl From<&str> for FeatureValue {
    fn from(text: &str) -> Self {
        FeatureValue::Text(text.to_string())
    }
}

/// Feature key → value mapping for one category of a vendor's proposal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureBucket(BTreeMap<String, FeatureValue>);

impl FeatureBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FeatureValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.0.get(key)
    }

    /// True when `key` exists and carries evidence; missing keys and nulls are absent.
    pub fn has_signal(&self, key: &str) -> bool {
        self.get(key).map(FeatureValue::is_present).unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        Self(
            object
                .iter()
                .map(|(key, value)| (key.clone(), FeatureValue::from(value)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<FeatureValue>> FromIterator<(K, V)> for FeatureBucket {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Upstream extractor's own account of how the feature buckets were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_extracted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_processed: Option<u64>,
}

impl ExtractionSummary {
    fn from_value(value: Option<&Value>) -> Self {
        let Some(object) = value.and_then(Value::as_object) else {
            return Self::default();
        };

        Self {
            features_extracted: object.get("features_extracted").and_then(Value::as_bool),
            extraction_complete: object.get("extraction_complete").and_then(Value::as_bool),
            document_length: object.get("document_length").and_then(lenient_u64),
            files_processed: object.get("files_processed").and_then(lenient_u64),
        }
    }

    pub fn extracted(features_extracted: bool) -> Self {
        Self {
            features_extracted: Some(features_extracted),
            ..Self::default()
        }
    }
}

fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Structural defect found while reading a vendor entry.
///
/// Records with issues are still loaded; the aggregator turns them into an isolated
/// scoring failure for that vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum RecordIssue {
    #[error("vendor entry is {found}, expected an object")]
    NotAnObject { found: &'static str },
    #[error("{bucket} is {found}, expected an object of features")]
    MalformedBucket {
        bucket: &'static str,
        found: &'static str,
    },
}

/// One proposal's extracted facts, normalized for scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRecord {
    pub vendor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_folder: Option<String>,
    pub extraction_summary: ExtractionSummary,
    pub technical_data: FeatureBucket,
    pub financial_data: FeatureBucket,
    pub vendor_data: FeatureBucket,
    pub implementation_data: FeatureBucket,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<RecordIssue>,
}

impl VendorRecord {
    pub fn new(vendor_name: &str) -> Self {
        Self {
            vendor_name: normalize_vendor_name(vendor_name),
            vendor_folder: None,
            extraction_summary: ExtractionSummary::default(),
            technical_data: FeatureBucket::new(),
            financial_data: FeatureBucket::new(),
            vendor_data: FeatureBucket::new(),
            implementation_data: FeatureBucket::new(),
            issues: Vec::new(),
        }
    }

    pub fn with_bucket(mut self, kind: CategoryKind, bucket: FeatureBucket) -> Self {
        *self.bucket_mut(kind) = bucket;
        self
    }

    pub fn with_extraction(mut self, summary: ExtractionSummary) -> Self {
        self.extraction_summary = summary;
        self
    }

    /// Read a vendor entry leniently. Never fails; defects are kept in `issues`.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(object) = value else {
            let mut record = Self::new(UNKNOWN_VENDOR);
            record.issues.push(RecordIssue::NotAnObject {
                found: json_kind(value),
            });
            return record;
        };

        let mut record = Self::new(
            object
                .get("vendor_name")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        );
        record.vendor_folder = object
            .get("vendor_folder")
            .and_then(Value::as_str)
            .map(str::to_string);
        record.extraction_summary = ExtractionSummary::from_value(object.get("extraction_summary"));

        for kind in CategoryKind::ALL {
            match object.get(kind.bucket_key()) {
                None | Some(Value::Null) => {}
                Some(Value::Object(features)) => {
                    *record.bucket_mut(kind) = FeatureBucket::from_object(features);
                }
                Some(other) => record.issues.push(RecordIssue::MalformedBucket {
                    bucket: kind.bucket_key(),
                    found: json_kind(other),
                }),
            }
        }

        record
    }

    pub fn bucket(&self, kind: CategoryKind) -> &FeatureBucket {
        match kind {
            CategoryKind::TechnicalCapability => &self.technical_data,
            CategoryKind::CostEffectiveness => &self.financial_data,
            CategoryKind::VendorExperience => &self.vendor_data,
            CategoryKind::ImplementationApproach => &self.implementation_data,
        }
    }

    fn bucket_mut(&mut self, kind: CategoryKind) -> &mut FeatureBucket {
        match kind {
            CategoryKind::TechnicalCapability => &mut self.technical_data,
            CategoryKind::CostEffectiveness => &mut self.financial_data,
            CategoryKind::VendorExperience => &mut self.vendor_data,
            CategoryKind::ImplementationApproach => &mut self.implementation_data,
        }
    }

    /// Whether the feature buckets can be taken at face value.
    ///
    /// An explicit `features_extracted` flag wins; otherwise any non-empty bucket counts.
    pub fn is_trusted(&self) -> bool {
        self.extraction_summary.features_extracted.unwrap_or_else(|| {
            CategoryKind::ALL
                .iter()
                .any(|kind| !self.bucket(*kind).is_empty())
        })
    }
}

fn normalize_vendor_name(raw: &str) -> String {
    let collapsed = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if collapsed.is_empty() {
        UNKNOWN_VENDOR.to_string()
    } else {
        collapsed
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feature_presence_treats_false_and_empty_as_absent() {
        let bucket = FeatureBucket::from_object(
            json!({
                "encryption_support": true,
                "uptime_sla": "99.9%",
                "horizontal_scaling": false,
                "scalable_design": null,
                "technology_stack": "",
                "certifications": [],
                "response_time_ms": 120
            })
            .as_object()
            .expect("object"),
        );

        assert!(bucket.has_signal("encryption_support"));
        assert!(bucket.has_signal("uptime_sla"));
        assert!(bucket.has_signal("response_time_ms"));
        assert!(!bucket.has_signal("horizontal_scaling"));
        assert!(!bucket.has_signal("scalable_design"));
        assert!(!bucket.has_signal("technology_stack"));
        assert!(!bucket.has_signal("certifications"));
        assert!(!bucket.has_signal("architecture_provided"));
    }

    #[test]
    fn vendor_names_are_collapsed_or_defaulted() {
        let record = VendorRecord::from_value(&json!({ "vendor_name": "  Secure   Net " }));
        assert_eq!(record.vendor_name, "Secure Net");

        let record = VendorRecord::from_value(&json!({ "vendor_name": "   " }));
        assert_eq!(record.vendor_name, UNKNOWN_VENDOR);

        let record = VendorRecord::from_value(&json!({ "vendor_name": 7 }));
        assert_eq!(record.vendor_name, UNKNOWN_VENDOR);
    }

    #[test]
    fn malformed_buckets_become_issues() {
        let record = VendorRecord::from_value(&json!({
            "vendor_name": "Cyberguard",
            "technical_data": "see attached",
            "financial_data": null,
            "vendor_data": { "years_in_business": "15" }
        }));

        assert_eq!(
            record.issues,
            vec![RecordIssue::MalformedBucket {
                bucket: "technical_data",
                found: "a string",
            }]
        );
        assert!(record.financial_data.is_empty());
        assert_eq!(record.vendor_data.len(), 1);
    }

    #[test]
    fn non_object_entries_are_kept_with_an_issue() {
        let record = VendorRecord::from_value(&json!("Cyberguard"));
        assert_eq!(record.vendor_name, UNKNOWN_VENDOR);
        assert_eq!(
            record.issues,
            vec![RecordIssue::NotAnObject { found: "a string" }]
        );
    }

    #[test]
    fn trust_prefers_the_explicit_extraction_flag() {
        let populated = VendorRecord::from_value(&json!({
            "vendor_name": "A",
            "technical_data": { "uptime_sla": "99.9%" }
        }));
        assert!(populated.is_trusted());

        let empty = VendorRecord::from_value(&json!({ "vendor_name": "B" }));
        assert!(!empty.is_trusted());

        let flagged = VendorRecord::from_value(&json!({
            "vendor_name": "C",
            "technical_data": { "uptime_sla": "99.9%" },
            "extraction_summary": { "features_extracted": false, "document_length": "42" }
        }));
        assert!(!flagged.is_trusted());
        assert_eq!(flagged.extraction_summary.document_length, Some(42));
    }
}
