use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use domain::audit::entity::AuditEvent;
use domain::audit::error::AuditError;
use domain::audit::query::AuditFilter;
use ports::secondary::audit_repository::AuditEventRepository;

pub const DEFAULT_RING_CAPACITY: usize = 1000;

struct Slot {
    seq: u64,
    event: AuditEvent,
}

/// Fixed-capacity in-memory cache of the most recent audit events.
///
/// Writers claim a sequence number from an atomic cursor and write slot
/// `seq % capacity` under that slot's own lock, so concurrent writers only
/// contend when they land on the same slot. A slot never accepts an event
/// older than the one it holds: a slow writer cannot evict a newer event.
/// The store never holds more than `capacity` events.
pub struct RingAuditStore {
    slots: Box<[Mutex<Option<Slot>>]>,
    next_seq: AtomicU64,
}

impl RingAuditStore {
    /// Create a ring holding up to `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: (0..capacity).map(|_| Mutex::new(None)).collect(),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of events currently held.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| lock(slot).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of events ever added, including evicted ones.
    pub fn total_added(&self) -> u64 {
        self.next_seq.load(Ordering::Relaxed)
    }

    /// Write `event` into the slot for `seq` unless that slot already holds
    /// a newer event. Returns whether the event was stored.
    fn store_at(&self, seq: u64, event: AuditEvent) -> bool {
        let mut slot = lock(self.slot_for(seq));
        if matches!(*slot, Some(ref held) if held.seq > seq) {
            return false;
        }
        *slot = Some(Slot { seq, event });
        true
    }

    #[allow(clippy::cast_possible_truncation)]
    fn slot_for(&self, seq: u64) -> &Mutex<Option<Slot>> {
        &self.slots[(seq % self.slots.len() as u64) as usize]
    }
}

impl Default for RingAuditStore {
    fn default() -> Self {
        Self::new(DEFAULT_RING_CAPACITY)
    }
}

/// Slots hold plain data, so a poisoned lock is still safe to read.
fn lock(slot: &Mutex<Option<Slot>>) -> MutexGuard<'_, Option<Slot>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AuditEventRepository for RingAuditStore {
    fn add(&self, event: AuditEvent) -> Result<AuditEvent, AuditError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.store_at(seq, event.clone());
        Ok(event)
    }

    /// Matching events, oldest first.
    fn find(&self, filter: &AuditFilter) -> Result<Vec<AuditEvent>, AuditError> {
        let mut found: Vec<(u64, AuditEvent)> = self
            .slots
            .iter()
            .filter_map(|slot| {
                lock(slot)
                    .as_ref()
                    .filter(|held| filter.matches(&held.event))
                    .map(|held| (held.seq, held.event.clone()))
            })
            .collect();
        found.sort_unstable_by_key(|(seq, _)| *seq);
        Ok(found.into_iter().map(|(_, event)| event).collect())
    }
}
