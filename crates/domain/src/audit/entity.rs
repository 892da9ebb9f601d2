use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::entity::current_timestamp_ns;
use crate::common::page::Sortable;

/// Principal recorded when no end-user identity is available.
pub const SYSTEM_PRINCIPAL: &str = "SYSTEM";

/// Keys always present in [`AuditEvent::data`].
pub const DATA_ENTITY_ID: &str = "entity_id";
pub const DATA_REQUEST_PAYLOAD: &str = "request_payload";
pub const DATA_STATUS: &str = "status";

/// Observed outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    NotFound,
    ValidationError,
    GeneralError,
}

impl AuditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::NotFound => "NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::GeneralError => "GENERAL_ERROR",
        }
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-normalization audit fact produced by an operation wrapper or a
/// business collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditCommand {
    pub action: String,
    pub entity_id: Option<u64>,
    pub request_payload: Option<String>,
    pub status: AuditStatus,
    pub timestamp_ns: u64,
}

impl AuditCommand {
    pub fn new(action: impl Into<String>, status: AuditStatus) -> Self {
        Self {
            action: action.into(),
            entity_id: None,
            request_payload: None,
            status,
            timestamp_ns: current_timestamp_ns(),
        }
    }

    #[must_use]
    pub fn with_entity_id(mut self, entity_id: Option<u64>) -> Self {
        self.entity_id = entity_id;
        self
    }

    #[must_use]
    pub fn with_request_payload(mut self, payload: Option<String>) -> Self {
        self.request_payload = payload;
        self
    }

    #[must_use]
    pub fn at(mut self, timestamp_ns: u64) -> Self {
        self.timestamp_ns = timestamp_ns;
        self
    }
}

/// Immutable audit trail record.
///
/// `id` is `None` until a durable store assigns one on insert; ids grow
/// monotonically in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    #[serde(default)]
    pub id: Option<u64>,
    /// Wall-clock instant in nanoseconds since UNIX epoch.
    pub timestamp_ns: u64,
    pub principal: String,
    /// Action tag, e.g. `CREATE_CUSTOMER`.
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl AuditEvent {
    /// Normalize a command into an event attributed to [`SYSTEM_PRINCIPAL`].
    pub fn from_command(command: AuditCommand) -> Self {
        let mut data = Map::new();
        data.insert(
            DATA_ENTITY_ID.to_string(),
            command.entity_id.map_or(Value::Null, Value::from),
        );
        data.insert(
            DATA_REQUEST_PAYLOAD.to_string(),
            command.request_payload.map_or(Value::Null, Value::String),
        );
        data.insert(
            DATA_STATUS.to_string(),
            Value::String(command.status.as_str().to_string()),
        );
        Self {
            id: None,
            timestamp_ns: command.timestamp_ns,
            principal: SYSTEM_PRINCIPAL.to_string(),
            event_type: command.action,
            data,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn entity_id(&self) -> Option<u64> {
        self.data.get(DATA_ENTITY_ID).and_then(Value::as_u64)
    }

    pub fn request_payload(&self) -> Option<&str> {
        self.data.get(DATA_REQUEST_PAYLOAD).and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.data.get(DATA_STATUS).and_then(Value::as_str)
    }
}

impl Sortable for AuditEvent {
    const SORTABLE_FIELDS: &'static [&'static str] = &["id", "timestamp", "principal", "type"];
    const DEFAULT_SORT_FIELD: &'static str = "id";

    fn compare_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "id" => self.id.cmp(&other.id),
            "timestamp" => self.timestamp_ns.cmp(&other.timestamp_ns),
            "principal" => self.principal.cmp(&other.principal),
            "type" => self.event_type.cmp(&other.event_type),
            _ => Ordering::Equal,
        }
    }
}
