use std::path::Path;
use std::sync::Mutex;

use domain::audit::entity::AuditEvent;
use domain::audit::error::AuditError;
use domain::audit::query::AuditFilter;
use domain::common::page::{PageRequest, PageResult, SortDirection, SortSpec};
use ports::secondary::audit_repository::{AuditEventRepository, OrderedAuditStore};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};

/// redb table: key = store-assigned event id, value = JSON row
/// `{id, principal, type, timestamp_ns, data}`.
const AUDIT_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("audit_events");

/// Maximum number of events returned by a filtered lookup.
pub const FIND_LIMIT: usize = 100;

/// Append-only durable audit store backed by redb.
///
/// Ids are assigned under a write lock and committed in order, so they grow
/// monotonically and survive restarts. Reads run in redb read transactions:
/// they see a snapshot of committed data and never wait on the writer.
pub struct RedbAuditStore {
    db: Database,
    /// Last committed id. Held for the whole write so ids commit in order.
    last_id: Mutex<u64>,
}

impl RedbAuditStore {
    /// Open (or create) a redb database at `path`.
    pub fn open(path: &Path) -> Result<Self, AuditError> {
        let db = Database::create(path)
            .map_err(|e| AuditError::StorageFailure(format!("redb open failed: {e}")))?;

        let txn = db
            .begin_write()
            .map_err(|e| AuditError::StorageFailure(format!("redb txn begin: {e}")))?;
        let last_id = {
            let table = txn
                .open_table(AUDIT_TABLE)
                .map_err(|e| AuditError::StorageFailure(format!("redb table create: {e}")))?;
            table
                .last()
                .map_err(|e| AuditError::StorageFailure(format!("redb last key: {e}")))?
                .map_or(0, |(k, _v)| k.value())
        };
        txn.commit()
            .map_err(|e| AuditError::StorageFailure(format!("redb commit: {e}")))?;

        tracing::info!(path = %path.display(), last_id, "audit store opened");

        Ok(Self {
            db,
            last_id: Mutex::new(last_id),
        })
    }

    /// Every stored event plus the row count, from one read snapshot.
    fn snapshot(&self) -> Result<(Vec<AuditEvent>, u64), AuditError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| AuditError::StorageFailure(format!("redb read txn: {e}")))?;
        let table = txn
            .open_table(AUDIT_TABLE)
            .map_err(|e| AuditError::StorageFailure(format!("redb read table: {e}")))?;
        let total = table
            .len()
            .map_err(|e| AuditError::StorageFailure(format!("redb count: {e}")))?;
        let events = table
            .iter()
            .map_err(|e| AuditError::StorageFailure(format!("redb iter: {e}")))?
            .map(|entry| {
                let (k, v) =
                    entry.map_err(|e| AuditError::StorageFailure(format!("redb row read: {e}")))?;
                decode_row(k.value(), v.value())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((events, total))
    }

    /// Page straight off the key order when sorting by id alone.
    fn read_id_page(
        &self,
        request: &PageRequest,
        direction: SortDirection,
    ) -> Result<PageResult<AuditEvent>, AuditError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| AuditError::StorageFailure(format!("redb read txn: {e}")))?;
        let table = txn
            .open_table(AUDIT_TABLE)
            .map_err(|e| AuditError::StorageFailure(format!("redb read table: {e}")))?;
        let total = table
            .len()
            .map_err(|e| AuditError::StorageFailure(format!("redb count: {e}")))?;
        let iter = table
            .iter()
            .map_err(|e| AuditError::StorageFailure(format!("redb iter: {e}")))?;

        let items = match direction {
            SortDirection::Asc => iter
                .skip(request.offset())
                .take(request.size())
                .map(|entry| {
                    let (k, v) = entry
                        .map_err(|e| AuditError::StorageFailure(format!("redb row read: {e}")))?;
                    decode_row(k.value(), v.value())
                })
                .collect::<Result<Vec<_>, _>>()?,
            SortDirection::Desc => iter
                .rev()
                .skip(request.offset())
                .take(request.size())
                .map(|entry| {
                    let (k, v) = entry
                        .map_err(|e| AuditError::StorageFailure(format!("redb row read: {e}")))?;
                    decode_row(k.value(), v.value())
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(PageResult::new(items, total, request))
    }
}

/// Decode one stored row. An undecodable row fails the whole read.
fn decode_row(id: u64, bytes: &[u8]) -> Result<AuditEvent, AuditError> {
    serde_json::from_slice::<AuditEvent>(bytes)
        .map_err(|e| AuditError::StorageFailure(format!("corrupt audit row {id}: {e}")))
}

/// Returns the direction when `sort` orders by id only (or not at all).
fn id_only_direction(sort: &SortSpec) -> Option<SortDirection> {
    match sort.orders() {
        [] => Some(SortDirection::Asc),
        [order] if order.field == "id" => Some(order.direction),
        _ => None,
    }
}

impl AuditEventRepository for RedbAuditStore {
    fn add(&self, event: AuditEvent) -> Result<AuditEvent, AuditError> {
        let mut last_id = self
            .last_id
            .lock()
            .map_err(|e| AuditError::StorageFailure(format!("lock poisoned: {e}")))?;

        let id = *last_id + 1;
        let stored = event.with_id(id);
        let value = serde_json::to_vec(&stored)?;

        let txn = self
            .db
            .begin_write()
            .map_err(|e| AuditError::StorageFailure(format!("redb write txn: {e}")))?;
        {
            let mut table = txn
                .open_table(AUDIT_TABLE)
                .map_err(|e| AuditError::StorageFailure(format!("redb write table: {e}")))?;
            table
                .insert(id, value.as_slice())
                .map_err(|e| AuditError::StorageFailure(format!("redb insert: {e}")))?;
        }
        txn.commit()
            .map_err(|e| AuditError::StorageFailure(format!("redb write commit: {e}")))?;

        *last_id = id;
        Ok(stored)
    }

    /// Matching events newest first, at most [`FIND_LIMIT`].
    fn find(&self, filter: &AuditFilter) -> Result<Vec<AuditEvent>, AuditError> {
        let (events, _) = self.snapshot()?;
        let mut events: Vec<AuditEvent> = events
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        events.sort_by(|a, b| {
            b.timestamp_ns
                .cmp(&a.timestamp_ns)
                .then_with(|| b.id.cmp(&a.id))
        });
        events.truncate(FIND_LIMIT);
        Ok(events)
    }
}

impl OrderedAuditStore for RedbAuditStore {
    fn find_ordered(&self, request: &PageRequest) -> Result<PageResult<AuditEvent>, AuditError> {
        if let Some(direction) = id_only_direction(request.sort()) {
            return self.read_id_page(request, direction);
        }
        let (events, total) = self.snapshot()?;
        let mut page = request.apply(events);
        page.total_elements = total;
        Ok(page)
    }

    fn count(&self) -> Result<u64, AuditError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| AuditError::StorageFailure(format!("redb count txn: {e}")))?;
        let table = txn
            .open_table(AUDIT_TABLE)
            .map_err(|e| AuditError::StorageFailure(format!("redb count table: {e}")))?;
        table
            .len()
            .map_err(|e| AuditError::StorageFailure(format!("redb count: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use domain::audit::entity::{AuditCommand, AuditStatus};
    use domain::common::page::SortOrder;
    use tempfile::NamedTempFile;

    fn make_store() -> (RedbAuditStore, NamedTempFile) {
        let tmp = NamedTempFile::new().unwrap();
        let store = RedbAuditStore::open(tmp.path()).unwrap();
        (store, tmp)
    }

    fn make_event(action: &str, ts: u64) -> AuditEvent {
        AuditEvent::from_command(
            AuditCommand::new(action, AuditStatus::Success)
                .with_entity_id(Some(ts))
                .at(ts),
        )
    }

    fn page(index: usize, size: usize, orders: Vec<SortOrder>) -> PageRequest {
        PageRequest::new(index, size, SortSpec::new(orders)).unwrap()
    }

    #[test]
    fn add_assigns_monotonic_ids() {
        let (store, _tmp) = make_store();
        let a = store.add(make_event("CREATE_CUSTOMER", 10)).unwrap();
        let b = store.add(make_event("UPDATE_CUSTOMER", 5)).unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn ids_resume_after_reopen() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let store = RedbAuditStore::open(tmp.path()).unwrap();
            store.add(make_event("A", 1)).unwrap();
            store.add(make_event("B", 2)).unwrap();
        }
        let store = RedbAuditStore::open(tmp.path()).unwrap();
        let c = store.add(make_event("C", 3)).unwrap();
        assert_eq!(c.id, Some(3));
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn stored_row_round_trips() {
        let (store, _tmp) = make_store();
        let stored = store.add(make_event("DELETE_CUSTOMER", 42)).unwrap();
        let found = store.find(&AuditFilter::default()).unwrap();
        assert_eq!(found, vec![stored]);
        assert_eq!(found[0].principal, "SYSTEM");
        assert_eq!(found[0].entity_id(), Some(42));
    }

    #[test]
    fn find_newest_first() {
        let (store, _tmp) = make_store();
        for ts in [100, 300, 200] {
            store.add(make_event("X", ts)).unwrap();
        }
        let found = store.find(&AuditFilter::default()).unwrap();
        let ts: Vec<u64> = found.iter().map(|e| e.timestamp_ns).collect();
        assert_eq!(ts, vec![300, 200, 100]);
    }

    #[test]
    fn find_applies_every_filter() {
        let (store, _tmp) = make_store();
        store.add(make_event("CREATE_CUSTOMER", 100)).unwrap();
        store.add(make_event("DELETE_CUSTOMER", 200)).unwrap();
        store.add(make_event("CREATE_CUSTOMER", 300)).unwrap();

        let found = store
            .find(
                &AuditFilter::default()
                    .principal("SYSTEM")
                    .after(150)
                    .event_type("CREATE_CUSTOMER"),
            )
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].timestamp_ns, 300);

        let none = store
            .find(&AuditFilter::default().principal("alice"))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn find_is_capped() {
        let (store, _tmp) = make_store();
        for ts in 0..(FIND_LIMIT as u64 + 20) {
            store.add(make_event("X", ts)).unwrap();
        }
        let found = store.find(&AuditFilter::default()).unwrap();
        assert_eq!(found.len(), FIND_LIMIT);
        assert_eq!(found[0].timestamp_ns, FIND_LIMIT as u64 + 19);
    }

    #[test]
    fn find_ordered_eleven_events_two_pages() {
        let (store, _tmp) = make_store();
        for i in 0..11u64 {
            store.add(make_event("X", 1_000 + (i * 7) % 11)).unwrap();
        }

        let first = store
            .find_ordered(&page(0, 10, vec![SortOrder::desc("timestamp")]))
            .unwrap();
        assert_eq!(first.total_elements, 11);
        assert_eq!(first.total_pages(), 2);
        assert_eq!(first.items.len(), 10);
        assert!(
            first
                .items
                .windows(2)
                .all(|w| w[0].timestamp_ns >= w[1].timestamp_ns)
        );

        let second = store
            .find_ordered(&page(1, 10, vec![SortOrder::desc("timestamp")]))
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].timestamp_ns, 1_000);
    }

    #[test]
    fn find_ordered_by_id_uses_key_order() {
        let (store, _tmp) = make_store();
        for ts in 1..=5 {
            store.add(make_event("X", ts)).unwrap();
        }

        let asc = store.find_ordered(&page(1, 2, vec![])).unwrap();
        let ids: Vec<Option<u64>> = asc.items.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(3), Some(4)]);
        assert_eq!(asc.total_elements, 5);

        let desc = store
            .find_ordered(&page(0, 2, vec![SortOrder::desc("id")]))
            .unwrap();
        let ids: Vec<Option<u64>> = desc.items.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(5), Some(4)]);
    }

    #[test]
    fn find_ordered_multi_key() {
        let (store, _tmp) = make_store();
        store.add(make_event("B", 1)).unwrap();
        store.add(make_event("A", 2)).unwrap();
        store.add(make_event("B", 3)).unwrap();

        let result = store
            .find_ordered(&page(
                0,
                10,
                vec![SortOrder::asc("type"), SortOrder::desc("timestamp")],
            ))
            .unwrap();
        let ts: Vec<u64> = result.items.iter().map(|e| e.timestamp_ns).collect();
        assert_eq!(ts, vec![2, 3, 1]);
    }

    #[test]
    fn empty_store_pages_cleanly() {
        let (store, _tmp) = make_store();
        let result = store
            .find_ordered(&page(0, 10, vec![SortOrder::desc("timestamp")]))
            .unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.total_elements, 0);
        assert_eq!(result.total_pages(), 0);
    }

    fn corrupt_row(store: &RedbAuditStore, id: u64) {
        let txn = store.db.begin_write().unwrap();
        {
            let mut table = txn.open_table(AUDIT_TABLE).unwrap();
            table.insert(id, b"not json".as_slice()).unwrap();
        }
        txn.commit().unwrap();
    }

    #[test]
    fn corrupt_row_fails_every_read() {
        let (store, _tmp) = make_store();
        for ts in 1..=3 {
            store.add(make_event("X", ts)).unwrap();
        }
        corrupt_row(&store, 2);

        let sorted = store.find_ordered(&page(0, 10, vec![SortOrder::desc("timestamp")]));
        assert!(matches!(sorted, Err(AuditError::StorageFailure(ref m)) if m.contains("row 2")));

        let by_id = store.find_ordered(&page(0, 2, vec![]));
        assert!(matches!(by_id, Err(AuditError::StorageFailure(_))));

        let found = store.find(&AuditFilter::default());
        assert!(matches!(found, Err(AuditError::StorageFailure(_))));

        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn id_page_past_corrupt_row_still_reads() {
        let (store, _tmp) = make_store();
        for ts in 1..=4 {
            store.add(make_event("X", ts)).unwrap();
        }
        corrupt_row(&store, 1);

        let second = store.find_ordered(&page(1, 2, vec![])).unwrap();
        let ids: Vec<Option<u64>> = second.items.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(3), Some(4)]);
    }

    #[test]
    fn concurrent_writers_get_unique_ids() {
        let tmp = NamedTempFile::new().unwrap();
        let store = Arc::new(RedbAuditStore::open(tmp.path()).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        store.add(make_event("X", t * 100 + i)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let all = store.find_ordered(&page(0, 100, vec![])).unwrap();
        let ids: Vec<u64> = all.items.iter().filter_map(|e| e.id).collect();
        assert_eq!(ids, (1..=40).collect::<Vec<u64>>());
    }
}
