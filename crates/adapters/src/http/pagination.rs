use domain::common::page::PageResult;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ── Query parameters DTO ────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageParams {
    /// Zero-based page index (default 0).
    pub page: Option<usize>,
    /// Page size. Clamped to the configured maximum.
    pub size: Option<usize>,
    /// JSON array of `{"field","direction"}` objects, e.g.
    /// `[{"field":"timestamp","direction":"DESC"}]`.
    pub sort: Option<String>,
}

impl PageParams {
    /// The raw sort spec, or `default` when the client sent none.
    pub fn sort_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.sort.as_deref().unwrap_or(default)
    }
}

// ── Response DTO ────────────────────────────────────────────────────

/// One page of results. `number` is the zero-based page index.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub size: usize,
    pub number: usize,
}

impl<T> PageResponse<T> {
    pub fn from_result<S>(result: PageResult<S>, f: impl FnMut(S) -> T) -> Self {
        let total_pages = result.total_pages();
        let result = result.map(f);
        Self {
            content: result.items,
            total_elements: result.total_elements,
            total_pages,
            size: result.page_size,
            number: result.page_index,
        }
    }
}
