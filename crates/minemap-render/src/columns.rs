use minemap_common::content::ContentId;
use std::collections::HashMap;

/// Topmost visible node of one world column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRecord {
    pub height: i32,
    pub content: ContentId,
    /// Water nodes passed above (and including) this node.
    pub water_depth: u32,
    pub day_night_differs: bool,
}

/// Column records of the whole map, keyed by world (x, z).
#[derive(Debug, Default)]
pub struct WorldColumns {
    columns: HashMap<(i32, i32), ColumnRecord>,
}

impl WorldColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the records of one sector. Sectors never overlap, so every key is
    /// written at most once per run.
    pub fn merge(&mut self, records: Vec<((i32, i32), ColumnRecord)>) {
        self.columns.reserve(records.len());
        for (key, record) in records {
            let previous = self.columns.insert(key, record);
            debug_assert!(previous.is_none(), "column {:?} written twice", key);
        }
    }

    pub fn get(&self, x: i32, z: i32) -> Option<&ColumnRecord> {
        self.columns.get(&(x, z))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Keys in (x, z) order, so drawing is independent of merge order.
    pub fn sorted_keys(&self) -> Vec<(i32, i32)> {
        let mut keys: Vec<_> = self.columns.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}
