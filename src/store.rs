use crate::dlog;
use crate::storage::SnapshotStorage;
use crate::types::{Workout, WorkoutId};
use anyhow::{Context, Result};
use serde_json::Value as JsonValue;

/// Workouts in the order they were logged or restored.
#[derive(Debug, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// No duplicate check; ids come from an `IdGenerator`.
    pub fn append(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    pub fn find_by_id(&self, id: WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Serialize every workout, in order, and hand the text to `storage`.
    pub fn persist(&self, storage: &mut dyn SnapshotStorage) -> Result<()> {
        let text = serde_json::to_string(&self.workouts).context("serializing workouts")?;
        storage.write_snapshot(&text)?;
        dlog!("persisted workouts={}", self.workouts.len());
        Ok(())
    }

    /// Read the snapshot back.
    ///
    /// An absent, unreadable or unparsable snapshot yields an empty list.
    /// Records that fail to decode are skipped so the rest still load.
    pub fn restore(storage: &dyn SnapshotStorage) -> Vec<Workout> {
        let text = match storage.read_snapshot() {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::info!("no saved workouts; starting fresh");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(err = %format!("{e:#}"), "could not read saved workouts; starting fresh");
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Vec<JsonValue>>(&text) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(err = %e, "saved workouts are not a JSON array; starting fresh");
                return Vec::new();
            }
        };

        let total = records.len();
        let mut out = Vec::with_capacity(total);
        for (idx, record) in records.into_iter().enumerate() {
            match Workout::from_snapshot(record) {
                Ok(w) => out.push(w),
                Err(e) => tracing::warn!(index = idx, err = %e, "skipping saved workout"),
            }
        }

        tracing::info!(restored = out.len(), skipped = total - out.len(), "restored workouts");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::Coords;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn run(id: u64) -> Workout {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 7, 30, 0).unwrap();
        Workout::running(WorkoutId(id), Coords::new(48.1, -1.6), 5.0, 27.5, 176.0, Some(ts))
    }

    fn ride(id: u64) -> Workout {
        let ts = Utc.with_ymd_and_hms(2024, 6, 2, 17, 0, 0).unwrap();
        Workout::cycling(WorkoutId(id), Coords::new(48.2, -1.7), 42.0, 90.0, 310.0, Some(ts))
    }

    #[test]
    fn append_then_find_by_id() {
        let mut store = WorkoutStore::new();
        store.append(run(1));
        store.append(ride(2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_id(WorkoutId(2)), Some(&ride(2)));
        assert_eq!(store.find_by_id(WorkoutId(1)), Some(&run(1)));
        assert!(store.find_by_id(WorkoutId(3)).is_none());
    }

    #[test]
    fn persist_then_restore_keeps_order() {
        let mut store = WorkoutStore::new();
        store.append(ride(10));
        store.append(run(11));
        store.append(run(12));

        let mut storage = MemoryStorage::default();
        store.persist(&mut storage).unwrap();

        let restored = WorkoutStore::restore(&storage);
        assert_eq!(restored, store.all());
    }

    #[test]
    fn restore_from_absent_snapshot_is_empty() {
        assert!(WorkoutStore::restore(&MemoryStorage::default()).is_empty());
    }

    #[test]
    fn restore_from_garbage_is_empty() {
        let storage = MemoryStorage::with_snapshot("{not json");
        assert!(WorkoutStore::restore(&storage).is_empty());

        let storage = MemoryStorage::with_snapshot(r#"{"kind":"running"}"#);
        assert!(WorkoutStore::restore(&storage).is_empty());
    }

    #[test]
    fn restore_skips_undecodable_records() {
        let good = run(1).to_snapshot().unwrap();
        let text = json!([good, { "kind": "rowing", "id": 2 }, ride(3).to_snapshot().unwrap()]);
        let storage = MemoryStorage::with_snapshot(text.to_string());

        let restored = WorkoutStore::restore(&storage);
        let ids: Vec<_> = restored.iter().map(Workout::id).collect();
        assert_eq!(ids, vec![WorkoutId(1), WorkoutId(3)]);
    }
}
