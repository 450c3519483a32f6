//! Tick-ordered snapshot history with a jitter buffer.

use std::collections::BTreeMap;
use std::io::Write;
use std::ops::Bound;

use log::trace;

use super::{InterpolationBundle, Snapshot};
use crate::JITTER_TICKS;

/// Per-entity history of received snapshots.
///
/// Rendering runs `jitter_ticks` behind the simulation tick so that a target
/// snapshot has usually arrived by the time it is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotStore {
    snapshots: BTreeMap<u64, Snapshot>,
    jitter_ticks: u64,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(JITTER_TICKS)
    }
}

impl SnapshotStore {
    /// Creates an empty store rendering `jitter_ticks` behind.
    #[must_use]
    pub const fn new(jitter_ticks: u64) -> Self {
        Self {
            snapshots: BTreeMap::new(),
            jitter_ticks,
        }
    }

    /// Render delay in ticks.
    #[must_use]
    pub const fn jitter_ticks(&self) -> u64 {
        self.jitter_ticks
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no snapshot is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Stores `snapshot`, replacing any earlier one for the same tick.
    pub fn insert(&mut self, snapshot: Snapshot) {
        if self.snapshots.insert(snapshot.tick, snapshot).is_some() {
            trace!("replaced duplicate snapshot");
        }
    }

    /// Newest stored snapshot.
    #[must_use]
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.values().next_back()
    }

    /// Stored snapshots in tick order.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.values()
    }

    /// Bundle for simulating `current_tick`.
    ///
    /// The bundle's tick is `current_tick` minus the jitter delay. `s1` is
    /// the latest snapshot at or before it; `s2` is the first one after it,
    /// extended forward over snapshots that continue the same motion.
    /// Returns `None` until a snapshot at or before the delayed tick exists.
    #[must_use]
    pub fn bundle(&self, current_tick: u64) -> Option<InterpolationBundle> {
        let render_tick = current_tick.saturating_sub(self.jitter_ticks);
        let s1 = self.snapshots.range(..=render_tick).next_back()?.1.clone();
        let mut later = self
            .snapshots
            .range((Bound::Excluded(render_tick), Bound::Unbounded))
            .map(|(_, snapshot)| snapshot);
        let s2 = later.next().map(|first| {
            let mut target = first;
            for next in later {
                if !target.can_merge(next) {
                    break;
                }
                target = next;
            }
            target.clone()
        });
        Some(InterpolationBundle {
            s1,
            s2,
            last: self.latest().cloned(),
            current_tick: render_tick,
        })
    }

    /// Discards history no longer needed to render `min_tick`.
    ///
    /// The snapshot immediately before `min_tick` is kept as the next `s1`;
    /// everything older goes. Stores with fewer than two snapshots are left
    /// alone.
    pub fn zap(&mut self, min_tick: u64) {
        if self.snapshots.len() < 2 {
            return;
        }
        let Some(&keep) = self.snapshots.range(..min_tick).next_back().map(|(tick, _)| tick) else {
            return;
        };
        let retained = self.snapshots.split_off(&keep);
        let dropped = self.snapshots.len();
        self.snapshots = retained;
        if dropped > 0 {
            trace!("zapped {dropped} snapshot(s) before tick {keep}");
        }
    }

    /// Writes the stored snapshots as a JSON array.
    ///
    /// # Errors
    /// Returns any serialisation or I/O error from `serde_json`.
    pub fn dump_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        let list: Vec<&Snapshot> = self.snapshots.values().collect();
        serde_json::to_writer_pretty(writer, &list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::MovementState;
    use glam::Vec2;
    use rstest::{fixture, rstest};

    #[fixture]
    fn walking() -> SnapshotStore {
        let mut store = SnapshotStore::new(6);
        store.insert(Snapshot::at(100, Vec2::ZERO, MovementState::Idle));
        let step = Vec2::new(2.0, 0.0);
        for (i, tick) in [110_u64, 120, 130].into_iter().enumerate() {
            let x = 20.0 * (i + 1) as f32;
            let snapshot = Snapshot::at(tick, Vec2::new(x, 0.0), MovementState::Moving);
            store.insert(snapshot.moving_at(step));
        }
        store.insert(Snapshot::at(140, Vec2::new(70.0, 0.0), MovementState::Idle));
        store
    }

    #[rstest]
    fn bundle_applies_jitter_delay(walking: SnapshotStore) {
        let bundle = walking.bundle(106).unwrap();
        assert_eq!(bundle.current_tick, 100);
        assert_eq!(bundle.s1.tick, 100);
    }

    #[rstest]
    fn target_merges_continuing_motion(walking: SnapshotStore) {
        let bundle = walking.bundle(111).unwrap();
        assert_eq!(bundle.s1.tick, 100);
        assert_eq!(bundle.s2.unwrap().tick, 130);
        assert_eq!(bundle.last.unwrap().tick, 140);
    }

    #[rstest]
    fn nothing_before_render_tick(walking: SnapshotStore) {
        assert!(walking.bundle(99).is_none());
    }

    #[rstest]
    fn zap_keeps_predecessor(mut walking: SnapshotStore) {
        walking.zap(125);
        let ticks: Vec<u64> = walking.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![120, 130, 140]);
    }

    #[rstest]
    fn zap_ignores_single_snapshot() {
        let mut store = SnapshotStore::default();
        store.insert(Snapshot::at(5, Vec2::ZERO, MovementState::Idle));
        store.zap(100);
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    fn dumps_json_array(walking: SnapshotStore) {
        let mut out = Vec::new();
        walking.dump_json(&mut out).unwrap();
        let parsed: Vec<Snapshot> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[0].movement, MovementState::Idle);
    }
}
