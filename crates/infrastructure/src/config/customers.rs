//! Customer store configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CUSTOMER_PAGE_SIZE, DEFAULT_CUSTOMER_STORAGE_PATH};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomersConfig {
    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_storage_path() -> String {
    DEFAULT_CUSTOMER_STORAGE_PATH.to_string()
}
fn default_page_size() -> usize {
    DEFAULT_CUSTOMER_PAGE_SIZE
}

impl Default for CustomersConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            page_size: default_page_size(),
        }
    }
}
