//! Plant context derived from a serial-number search.
//!
//! The search answers `{"obj": {"<key>": [<entry>, ...], ...}}`; the first
//! entry of the first non-empty list identifies the plant. The derived
//! [`PlantRequest`] is a plain value handed to the next call, never stored.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::api::endpoints::SEARCH_INVERTER;
use crate::error::OssError;

/// What the equipment endpoints need to address one plant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantRequest {
    pub username: String,
    pub plant_id: String,
    pub server_id: u64,
}

impl PlantRequest {
    pub fn new(username: impl Into<String>, plant_id: impl Into<String>, server_id: u64) -> Self {
        Self {
            username: username.into(),
            plant_id: plant_id.into(),
            server_id,
        }
    }
}

/// One row of a serial-number search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantEntry {
    pub request: PlantRequest,
    pub plant_name: String,
}

// The vendor is loose about scalar types: ids show up as numbers or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(Number),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }

    fn into_u64(self) -> Option<u64> {
        match self {
            Scalar::Number(n) => n.as_u64(),
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    server_id: Scalar,
    plant_id: Scalar,
    account_name: String,
    #[serde(default)]
    plant_name: Option<String>,
}

impl PlantEntry {
    pub fn from_value(entry: &Value) -> Result<Self, OssError> {
        let raw = RawEntry::deserialize(entry)
            .map_err(|err| OssError::decode(SEARCH_INVERTER.name, err))?;
        let server_id = raw.server_id.into_u64().ok_or_else(|| {
            OssError::decode(SEARCH_INVERTER.name, "serverId is not a non-negative integer")
        })?;
        Ok(Self {
            request: PlantRequest::new(raw.account_name, raw.plant_id.into_text(), server_id),
            plant_name: raw.plant_name.unwrap_or_default(),
        })
    }

    /// Derive the plant from a whole search response.
    pub fn from_search_response(body: &Value) -> Result<Self, OssError> {
        let entry = first_search_entry(body).ok_or_else(|| {
            OssError::NotFound("no device entries in serial number search".to_string())
        })?;
        Self::from_value(entry)
    }
}

/// First entry of the first non-empty list under `obj`, in response order.
pub fn first_search_entry(body: &Value) -> Option<&Value> {
    body.get("obj")?
        .as_object()?
        .values()
        .filter_map(Value::as_array)
        .find(|entries| !entries.is_empty())
        .and_then(|entries| entries.first())
}

/// Serialized form of a composite plant lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantInfo {
    pub plant_id: String,
    pub account_name: String,
    pub plant_name: String,
    pub server_id: u64,
    pub equipment: Vec<Value>,
}

impl PlantInfo {
    pub fn new(entry: PlantEntry, equipment: Vec<Value>) -> Self {
        Self {
            plant_id: entry.request.plant_id,
            account_name: entry.request.username,
            plant_name: entry.plant_name,
            server_id: entry.request.server_id,
            equipment,
        }
    }
}
