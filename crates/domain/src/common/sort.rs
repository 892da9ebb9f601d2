//! Decoding of client-supplied sort and pagination parameters.
//!
//! The wire format is a JSON array of `{"field": ..., "direction": ...}`
//! objects, e.g. `[{"field":"timestamp","direction":"desc"}]`.

use serde_json::Value;

use super::error::DomainError;
use super::page::{PageRequest, SortDirection, SortOrder, SortSpec, Sortable};

/// Decode a serialized sort specification for collection `T`.
///
/// Absent or blank input yields an unsorted spec. Anything that is not an
/// array of objects carrying a string `field` is rejected, as is a field
/// `T` does not know how to sort by.
pub fn decode_sort_spec<T: Sortable>(raw: Option<&str>) -> Result<SortSpec, DomainError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(SortSpec::unsorted());
    };

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| DomainError::MalformedQuery(format!("sort is not valid JSON: {e}")))?;

    let Value::Array(entries) = value else {
        return Err(DomainError::MalformedQuery(
            "sort must be a JSON array of {field, direction} objects".to_string(),
        ));
    };

    let mut orders = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let Value::Object(obj) = entry else {
            return Err(DomainError::MalformedQuery(format!(
                "sort entry {i} is not an object"
            )));
        };
        let field = obj.get("field").and_then(Value::as_str).ok_or_else(|| {
            DomainError::MalformedQuery(format!("sort entry {i} has no string 'field'"))
        })?;
        if !T::SORTABLE_FIELDS.contains(&field) {
            return Err(DomainError::MalformedQuery(format!(
                "unknown sort field '{field}' (expected one of: {})",
                T::SORTABLE_FIELDS.join(", ")
            )));
        }
        let direction = SortDirection::from_wire(obj.get("direction").and_then(Value::as_str));
        orders.push(SortOrder {
            field: field.to_string(),
            direction,
        });
    }

    Ok(SortSpec::new(orders))
}

/// Decode sort, page index and page size into a validated [`PageRequest`].
pub fn decode_page_request<T: Sortable>(
    raw_sort: Option<&str>,
    page_index: usize,
    page_size: usize,
) -> Result<PageRequest, DomainError> {
    let sort = decode_sort_spec::<T>(raw_sort)?;
    PageRequest::new(page_index, page_size, sort)
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    struct Probe;

    impl Sortable for Probe {
        const SORTABLE_FIELDS: &'static [&'static str] = &["id", "name", "timestamp"];
        const DEFAULT_SORT_FIELD: &'static str = "id";

        fn compare_field(&self, _other: &Self, _field: &str) -> Ordering {
            Ordering::Equal
        }
    }

    fn decode(raw: &str) -> Result<SortSpec, DomainError> {
        decode_sort_spec::<Probe>(Some(raw))
    }

    #[test]
    fn upper_case_desc_is_descending() {
        let spec = decode(r#"[{"field":"timestamp","direction":"DESC"}]"#).unwrap();
        assert_eq!(spec.orders(), &[SortOrder::desc("timestamp")]);
    }

    #[test]
    fn lower_case_desc_is_descending() {
        let spec = decode(r#"[{"field":"timestamp","direction":"desc"}]"#).unwrap();
        assert_eq!(spec.orders()[0].direction, SortDirection::Desc);
    }

    #[test]
    fn asc_and_missing_direction_are_ascending() {
        let spec = decode(r#"[{"field":"name","direction":"asc"}]"#).unwrap();
        assert_eq!(spec.orders(), &[SortOrder::asc("name")]);

        let spec = decode(r#"[{"field":"name"}]"#).unwrap();
        assert_eq!(spec.orders(), &[SortOrder::asc("name")]);
    }

    #[test]
    fn garbage_direction_is_ascending() {
        let spec = decode(r#"[{"field":"name","direction":"ASC"}]"#).unwrap();
        assert_eq!(spec.orders()[0].direction, SortDirection::Asc);
        let spec = decode(r#"[{"field":"name","direction":"backwards"}]"#).unwrap();
        assert_eq!(spec.orders()[0].direction, SortDirection::Asc);
        let spec = decode(r#"[{"field":"name","direction":7}]"#).unwrap();
        assert_eq!(spec.orders()[0].direction, SortDirection::Asc);
    }

    #[test]
    fn entry_order_is_preserved() {
        let spec = decode(
            r#"[{"field":"name","direction":"desc"},{"field":"id"},{"field":"timestamp"}]"#,
        )
        .unwrap();
        let fields: Vec<&str> = spec.orders().iter().map(|o| o.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "id", "timestamp"]);
    }

    #[test]
    fn absent_blank_and_empty_array_are_unsorted() {
        assert!(decode_sort_spec::<Probe>(None).unwrap().is_unsorted());
        assert!(decode("").unwrap().is_unsorted());
        assert!(decode("   ").unwrap().is_unsorted());
        assert!(decode("[]").unwrap().is_unsorted());
    }

    #[test]
    fn non_array_is_malformed() {
        for raw in [
            r#"{"field":"name"}"#,
            r#""name""#,
            "42",
            "not json",
            "[{",
        ] {
            let err = decode(raw).unwrap_err();
            assert!(
                matches!(err, DomainError::MalformedQuery(_)),
                "expected MalformedQuery for {raw}"
            );
        }
    }

    #[test]
    fn non_object_entry_is_malformed() {
        assert!(matches!(
            decode(r#"["name"]"#),
            Err(DomainError::MalformedQuery(_))
        ));
        assert!(matches!(
            decode(r#"[{"field":"name"}, 3]"#),
            Err(DomainError::MalformedQuery(_))
        ));
    }

    #[test]
    fn missing_or_non_string_field_is_malformed() {
        assert!(matches!(
            decode(r#"[{"direction":"desc"}]"#),
            Err(DomainError::MalformedQuery(_))
        ));
        assert!(matches!(
            decode(r#"[{"field":1}]"#),
            Err(DomainError::MalformedQuery(_))
        ));
    }

    #[test]
    fn unknown_field_is_rejected_at_decode_time() {
        let err = decode(r#"[{"field":"password"}]"#).unwrap_err();
        match err {
            DomainError::MalformedQuery(msg) => assert!(msg.contains("password")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn page_request_carries_index_size_and_sort() {
        let req = decode_page_request::<Probe>(
            Some(r#"[{"field":"timestamp","direction":"DESC"}]"#),
            2,
            25,
        )
        .unwrap();
        assert_eq!(req.index(), 2);
        assert_eq!(req.size(), 25);
        assert_eq!(req.sort().orders(), &[SortOrder::desc("timestamp")]);
    }

    #[test]
    fn page_request_rejects_zero_size() {
        assert!(matches!(
            decode_page_request::<Probe>(None, 0, 0),
            Err(DomainError::MalformedQuery(_))
        ));
    }
}
