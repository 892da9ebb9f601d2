use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only `desc` (any ASCII case) sorts descending. Missing or
    /// unrecognized directions fall back to ascending.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

/// A collection whose elements can be ordered by named attributes.
pub trait Sortable {
    /// Attribute names accepted in a sort specification.
    const SORTABLE_FIELDS: &'static [&'static str];

    /// Stable attribute used when no sort is requested.
    const DEFAULT_SORT_FIELD: &'static str;

    /// Compare two elements on a single attribute, ascending.
    fn compare_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Ordered multi-key sort specification. The first entry is the primary key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(Vec<SortOrder>);

impl SortSpec {
    pub fn new(orders: Vec<SortOrder>) -> Self {
        Self(orders)
    }

    pub fn unsorted() -> Self {
        Self(Vec::new())
    }

    pub fn is_unsorted(&self) -> bool {
        self.0.is_empty()
    }

    pub fn orders(&self) -> &[SortOrder] {
        &self.0
    }

    /// Compare two elements under this spec. An empty spec orders by the
    /// collection's default field, ascending.
    pub fn compare<T: Sortable>(&self, a: &T, b: &T) -> Ordering {
        if self.0.is_empty() {
            return a.compare_field(b, T::DEFAULT_SORT_FIELD);
        }
        for order in &self.0 {
            let ord = order
                .direction
                .apply(a.compare_field(b, &order.field));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Offset-and-size bounded read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    index: usize,
    size: usize,
    sort: SortSpec,
}

impl PageRequest {
    pub fn new(index: usize, size: usize, sort: SortSpec) -> Result<Self, DomainError> {
        if size == 0 {
            return Err(DomainError::MalformedQuery(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self { index, size, sort })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn offset(&self) -> usize {
        self.index.saturating_mul(self.size)
    }

    /// Sort the full matching set and cut out the requested page.
    pub fn apply<T: Sortable>(&self, mut items: Vec<T>) -> PageResult<T> {
        let total = items.len() as u64;
        items.sort_by(|a, b| self.sort.compare(a, b));
        let page: Vec<T> = items
            .into_iter()
            .skip(self.offset())
            .take(self.size)
            .collect();
        PageResult::new(page, total, self)
    }
}

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// Size of the full matching set, independent of the page.
    pub total_elements: u64,
    pub page_index: usize,
    pub page_size: usize,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total_elements,
            page_index: request.index(),
            page_size: request.size(),
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.page_size as u64)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u64,
        name: &'static str,
    }

    impl Sortable for Row {
        const SORTABLE_FIELDS: &'static [&'static str] = &["id", "name"];
        const DEFAULT_SORT_FIELD: &'static str = "id";

        fn compare_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "id" => self.id.cmp(&other.id),
                "name" => self.name.cmp(other.name),
                _ => Ordering::Equal,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 3, name: "b" },
            Row { id: 1, name: "a" },
            Row { id: 2, name: "b" },
        ]
    }

    #[test]
    fn direction_from_wire() {
        assert_eq!(SortDirection::from_wire(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::from_wire(Some("DESC")), SortDirection::Desc);
        assert_eq!(SortDirection::from_wire(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::from_wire(Some("sideways")), SortDirection::Asc);
        assert_eq!(SortDirection::from_wire(None), SortDirection::Asc);
    }

    #[test]
    fn zero_size_rejected() {
        let err = PageRequest::new(0, 0, SortSpec::unsorted()).unwrap_err();
        assert!(matches!(err, DomainError::MalformedQuery(_)));
    }

    #[test]
    fn unsorted_uses_default_field() {
        let req = PageRequest::new(0, 10, SortSpec::unsorted()).unwrap();
        let page = req.apply(rows());
        let ids: Vec<u64> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn multi_key_first_entry_is_primary() {
        let spec = SortSpec::new(vec![SortOrder::desc("name"), SortOrder::asc("id")]);
        let req = PageRequest::new(0, 10, spec).unwrap();
        let page = req.apply(rows());
        let ids: Vec<u64> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn slicing_and_totals() {
        let req = PageRequest::new(1, 2, SortSpec::unsorted()).unwrap();
        let page = req.apply(rows());
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, 3);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.page_size, 2);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let req = PageRequest::new(5, 2, SortSpec::unsorted()).unwrap();
        let page = req.apply(rows());
        assert!(page.items.is_empty());
        assert_eq!(page.total_elements, 3);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let req = PageRequest::new(0, 10, SortSpec::unsorted()).unwrap();
        let page = req.apply(Vec::<Row>::new());
        assert_eq!(page.total_pages(), 0);
    }

    #[test]
    fn map_preserves_paging() {
        let req = PageRequest::new(0, 2, SortSpec::unsorted()).unwrap();
        let page = req.apply(rows()).map(|r| r.name);
        assert_eq!(page.items, vec!["a", "b"]);
        assert_eq!(page.total_elements, 3);
    }
}
