use serde::Serialize;

use crate::common::entity::EntityId;

/// The leading argument of an audited operation.
///
/// Supplies the identifier recorded as `entity_id` and the serialized form
/// recorded as `request_payload`.
pub trait AuditSubject {
    /// Identifier of the targeted entity, when the argument carries one.
    fn subject_id(&self) -> Option<u64> {
        None
    }

    fn request_payload(&self) -> Result<Option<String>, serde_json::Error>;
}

/// Result of an audited operation. Creations expose the id they assigned.
pub trait AuditedResult {
    fn created_id(&self) -> Option<u64> {
        None
    }
}

/// Serialize a value as a JSON request payload.
pub fn json_payload<T: Serialize + ?Sized>(value: &T) -> Result<Option<String>, serde_json::Error> {
    serde_json::to_string(value).map(Some)
}

impl AuditSubject for () {
    fn request_payload(&self) -> Result<Option<String>, serde_json::Error> {
        Ok(None)
    }
}

impl AuditSubject for EntityId {
    fn subject_id(&self) -> Option<u64> {
        Some(self.0)
    }

    fn request_payload(&self) -> Result<Option<String>, serde_json::Error> {
        json_payload(self)
    }
}

/// Identifier-first argument lists: the identifier is the subject.
impl<T> AuditSubject for (EntityId, T) {
    fn subject_id(&self) -> Option<u64> {
        Some(self.0.0)
    }

    fn request_payload(&self) -> Result<Option<String>, serde_json::Error> {
        json_payload(&self.0)
    }
}

impl AuditedResult for () {}

impl AuditedResult for EntityId {
    fn created_id(&self) -> Option<u64> {
        Some(self.0)
    }
}
