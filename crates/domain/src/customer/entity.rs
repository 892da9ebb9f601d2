use std::cmp::Ordering;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::subject::{AuditSubject, AuditedResult, json_payload};
use crate::common::entity::EntityId;
use crate::common::error::DomainError;
use crate::common::page::Sortable;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ADDRESS_LEN: usize = 200;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    /// Calendar date, `YYYY-MM-DD`.
    pub date_of_birth: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl Customer {
    pub fn from_command(id: EntityId, command: CustomerCommand) -> Self {
        Self {
            id,
            name: command.name,
            age: command.age,
            date_of_birth: command.date_of_birth,
            address: command.address,
            gender: command.gender,
        }
    }
}

impl Sortable for Customer {
    const SORTABLE_FIELDS: &'static [&'static str] =
        &["id", "name", "age", "date_of_birth", "address", "gender"];
    const DEFAULT_SORT_FIELD: &'static str = "id";

    fn compare_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "id" => self.id.cmp(&other.id),
            "name" => self.name.cmp(&other.name),
            "age" => self.age.cmp(&other.age),
            // ISO dates order lexically.
            "date_of_birth" => self.date_of_birth.cmp(&other.date_of_birth),
            "address" => self.address.cmp(&other.address),
            "gender" => self.gender.cmp(&other.gender),
            _ => Ordering::Equal,
        }
    }
}

impl AuditedResult for Customer {
    fn created_id(&self) -> Option<u64> {
        Some(self.id.0)
    }
}

/// Create/update request for a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCommand {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    pub date_of_birth: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl CustomerCommand {
    /// Check every field rule, reporting all violations at once.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push("name: must not be blank".to_string());
        } else if self.name.chars().count() > MAX_NAME_LEN {
            violations.push(format!("name: must be at most {MAX_NAME_LEN} characters"));
        }

        if self.age == Some(0) {
            violations.push("age: must be positive".to_string());
        }

        match NaiveDate::parse_from_str(&self.date_of_birth, DATE_FORMAT) {
            Ok(date) if date >= Utc::now().date_naive() => {
                violations.push("date_of_birth: must be in the past".to_string());
            }
            Ok(_) => {}
            Err(_) => {
                violations.push("date_of_birth: must be a date formatted YYYY-MM-DD".to_string());
            }
        }

        if let Some(ref address) = self.address
            && address.chars().count() > MAX_ADDRESS_LEN
        {
            violations.push(format!(
                "address: must be at most {MAX_ADDRESS_LEN} characters"
            ));
        }

        if let Some(ref gender) = self.gender
            && gender != "M"
            && gender != "F"
        {
            violations.push("gender: must be M or F".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(violations.join("; ")))
        }
    }
}

impl AuditSubject for CustomerCommand {
    fn request_payload(&self) -> Result<Option<String>, serde_json::Error> {
        json_payload(self)
    }
}
