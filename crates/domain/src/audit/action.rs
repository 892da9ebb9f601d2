use std::collections::HashMap;

/// Action tag recorded for operations missing from the table.
pub const UNKNOWN_OPERATION: &str = "UNKNOWN_OPERATION";

pub const CREATE_CUSTOMER: &str = "CREATE_CUSTOMER";
pub const UPDATE_CUSTOMER: &str = "UPDATE_CUSTOMER";
pub const DELETE_CUSTOMER: &str = "DELETE_CUSTOMER";

/// Fixed mapping from audited operation names to action tags.
///
/// Lookups never fail: unmapped names resolve to [`UNKNOWN_OPERATION`].
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    entries: HashMap<String, String>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table covering the customer mutations.
    pub fn customers() -> Self {
        Self::new()
            .with("create_customer", CREATE_CUSTOMER)
            .with("update_customer", UPDATE_CUSTOMER)
            .with("delete_customer", DELETE_CUSTOMER)
    }

    #[must_use]
    pub fn with(mut self, operation: &str, action: &str) -> Self {
        self.entries
            .insert(operation.to_string(), action.to_string());
        self
    }

    pub fn resolve(&self, operation: &str) -> &str {
        self.entries
            .get(operation)
            .map_or(UNKNOWN_OPERATION, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
