use std::collections::BTreeMap;

use super::store_interface::{FrameRecordStore, HierarchyError, Result};
use crate::file_format::frame_record::{Direction, FrameRecord, Relation};

/// Frame records held in memory, keyed by frame name.  This is what tests use
/// and what callers should load once up front when the same records will be
/// consulted repeatedly (building and then checking, for example).
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, FrameRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            records: BTreeMap::new(),
        }
    }

    /// Snapshot every frame another store lists.
    pub fn load_from(store: &dyn FrameRecordStore) -> Result<Self> {
        let mut loaded = MemoryStore::new();
        for frame in store.list_frames()? {
            let record = store.lookup_record(&frame)?;
            loaded.records.insert(frame, record);
        }
        Ok(loaded)
    }

    /// Add or replace a record, keyed by its own name.
    pub fn insert_record(&mut self, record: FrameRecord) {
        self.records.insert(record.name.clone(), record);
    }

    /// Convenience for tests: add a frame whose only relation field is the
    /// given one.  Calling this again for the same frame adds the field to the
    /// existing record.
    pub fn with_relation(
        mut self,
        frame: &str,
        relation: Relation,
        direction: Direction,
        related: &[&str],
    ) -> Self {
        let record = self
            .records
            .remove(frame)
            .unwrap_or_else(|| FrameRecord::new(frame))
            .with_relation(relation, direction, related);
        self.insert_record(record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FrameRecordStore for MemoryStore {
    fn lookup_record(&self, frame: &str) -> Result<FrameRecord> {
        self.records
            .get(frame)
            .cloned()
            .ok_or_else(|| HierarchyError::data_problem(format!("no record for frame {}", frame)))
    }

    fn list_frames(&self) -> Result<Vec<String>> {
        Ok(self.records.keys().cloned().collect())
    }
}
