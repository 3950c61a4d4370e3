mod domain;
mod reference;

pub use domain::{
    ExtractionSummary, FeatureBucket, FeatureValue, RecordIssue, VendorRecord, UNKNOWN_VENDOR,
};
pub use reference::ReferenceDataset;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::input::RawInput;
use super::Status;
use domain::json_kind;

/// Result of reading a vendor payload, before any fallback is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedVendors {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub vendors: Vec<VendorRecord>,
}

impl LoadedVendors {
    fn success(vendors: Vec<VendorRecord>) -> Self {
        Self {
            status: Status::Success,
            message: None,
            vendors,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            vendors: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Where the vendors scored in a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Payload,
    Reference,
}

/// Vendors a run will score, after fallback resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorBatch {
    pub vendors: Vec<VendorRecord>,
    pub source: DataSource,
    /// Why the payload could not be used, when it could not.
    pub load_error: Option<String>,
}

/// Reads vendor payloads and owns the reference dataset used when they are unusable.
#[derive(Debug, Clone)]
pub struct VendorLoader {
    reference: ReferenceDataset,
    fallback_enabled: bool,
}

impl Default for VendorLoader {
    fn default() -> Self {
        Self::new(ReferenceDataset::standard())
    }
}

impl VendorLoader {
    pub fn new(reference: ReferenceDataset) -> Self {
        Self {
            reference,
            fallback_enabled: true,
        }
    }

    /// A loader that never substitutes reference data; failed loads score nothing.
    pub fn without_fallback() -> Self {
        Self {
            reference: ReferenceDataset::empty(),
            fallback_enabled: false,
        }
    }

    /// Swap the reference dataset, keeping the fallback setting.
    pub fn with_reference(mut self, reference: ReferenceDataset) -> Self {
        self.reference = reference;
        self
    }

    pub fn reference(&self) -> &ReferenceDataset {
        &self.reference
    }

    pub fn fallback_enabled(&self) -> bool {
        self.fallback_enabled && !self.reference.is_empty()
    }

    pub fn load(&self, payload: impl Into<RawInput>) -> LoadedVendors {
        let payload = payload.into();
        if payload.is_blank() {
            warn!("empty vendor payload received");
            return LoadedVendors::error("No vendor data provided");
        }

        let value = match payload.into_value() {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "vendor payload could not be parsed");
                return LoadedVendors::error(format!("Invalid vendor payload: {err}"));
            }
        };

        let entries = match extract_entries(value) {
            Ok(entries) => entries,
            Err(message) => {
                warn!(%message, "vendor payload rejected");
                return LoadedVendors::error(message);
            }
        };

        let vendors: Vec<VendorRecord> = entries.iter().map(VendorRecord::from_value).collect();
        for vendor in &vendors {
            if !vendor.is_trusted() {
                warn!(vendor = %vendor.vendor_name, "vendor features were not extracted cleanly");
            }
            if !vendor.issues.is_empty() {
                warn!(vendor = %vendor.vendor_name, issues = vendor.issues.len(), "vendor record is malformed");
            }
        }
        debug!(vendors = vendors.len(), "vendor payload loaded");

        LoadedVendors::success(vendors)
    }

    /// Load the payload and substitute the reference dataset if it is unusable.
    pub fn resolve(&self, payload: impl Into<RawInput>) -> VendorBatch {
        let loaded = self.load(payload);
        if loaded.is_success() {
            return VendorBatch {
                vendors: loaded.vendors,
                source: DataSource::Payload,
                load_error: None,
            };
        }

        let reason = loaded
            .message
            .unwrap_or_else(|| "vendor payload unusable".to_string());

        if self.fallback_enabled() {
            warn!(
                dataset = self.reference.name(),
                %reason,
                "substituting reference vendor dataset"
            );
            VendorBatch {
                vendors: self.reference.vendors().to_vec(),
                source: DataSource::Reference,
                load_error: Some(reason),
            }
        } else {
            VendorBatch {
                vendors: Vec::new(),
                source: DataSource::Payload,
                load_error: Some(reason),
            }
        }
    }
}

fn extract_entries(value: Value) -> Result<Vec<Value>, String> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut object) => {
            if object.get("status").and_then(Value::as_str) == Some("error") {
                let upstream = object
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("no message");
                return Err(format!("Vendor extraction reported an error: {upstream}"));
            }

            match object.remove("vendors") {
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    return Err(format!(
                        "`vendors` is {}, expected a list",
                        json_kind(&other)
                    ))
                }
                None => return Err("vendor payload has no `vendors` list".to_string()),
            }
        }
        other => {
            return Err(format!(
                "vendor payload is {}, expected an object or a list",
                json_kind(&other)
            ))
        }
    };

    if entries.is_empty() {
        return Err("vendor payload contains no vendor records".to_string());
    }
    Ok(entries)
}
