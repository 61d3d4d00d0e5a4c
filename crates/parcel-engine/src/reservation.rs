//! The process-wide reservation ledger.

use parcel_core::{AreaId, PlotId};
use parcel_grid::PlotRect;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Short-lived mutual exclusion between "free cell discovered" and
/// "ownership durably committed".
///
/// One ledger serves every area in the process; entries are keyed by
/// `(AreaId, PlotId)` so the same coordinates in different areas never
/// collide. The ledger is not authoritative — the area store decides
/// final ownership — and entries expire lazily: a lookup that finds an
/// expired entry treats it as absent and overwrites it.
#[derive(Debug)]
pub struct ReservationLedger {
    ttl: Duration,
    entries: Mutex<HashMap<(AreaId, PlotId), Instant>>,
}

impl ReservationLedger {
    /// An empty ledger whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The configured entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Reserve one cell. Succeeds iff no live reservation exists for it;
    /// on success the entry is inserted and `true` returned.
    pub fn reserve(&self, area: AreaId, id: PlotId) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        Self::insert_if_free(&mut entries, (area, id), now, self.ttl)
    }

    /// Reserve every cell of `rect` as one atomic unit.
    ///
    /// Either all cells end up reserved and `true` is returned, or none
    /// do: the single lock acquisition makes the scan-then-insert safe,
    /// and a collision on any cell leaves earlier inserts removed.
    pub fn reserve_rect(&self, area: AreaId, rect: &PlotRect) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        let mut taken = Vec::new();
        for id in rect.cells() {
            if Self::insert_if_free(&mut entries, (area, id), now, self.ttl) {
                taken.push(id);
            } else {
                for id in taken {
                    entries.remove(&(area, id));
                }
                return false;
            }
        }
        true
    }

    /// Drop one reservation, reclaiming memory before the TTL would.
    pub fn release(&self, area: AreaId, id: PlotId) {
        self.entries.lock().unwrap().remove(&(area, id));
    }

    /// Drop every reservation inside `rect`.
    pub fn release_rect(&self, area: AreaId, rect: &PlotRect) {
        let mut entries = self.entries.lock().unwrap();
        for id in rect.cells() {
            entries.remove(&(area, id));
        }
    }

    /// Whether a live reservation exists for the cell.
    pub fn is_reserved(&self, area: AreaId, id: PlotId) -> bool {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .get(&(area, id))
            .is_some_and(|expiry| *expiry > now)
    }

    /// Number of live entries. Expired entries are dropped on the way.
    pub fn live_count(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, expiry| *expiry > now);
        entries.len()
    }

    fn insert_if_free(
        entries: &mut HashMap<(AreaId, PlotId), Instant>,
        key: (AreaId, PlotId),
        now: Instant,
        ttl: Duration,
    ) -> bool {
        match entries.get(&key) {
            Some(expiry) if *expiry > now => false,
            _ => {
                entries.insert(key, now + ttl);
                true
            }
        }
    }
}
