//! Persistent per-target policy state
//!
//! One [`TargetRecord`] per village, created on first contact and rewritten
//! after every dispatch or reclassification. Targets are independent, so
//! the store only has to be atomic per key.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::core::types::{Timestamp, VillageId};
use crate::reports::profile::LootProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub village_id: VillageId,
    #[serde(default)]
    pub last_attack_at: Option<Timestamp>,
    /// Backed by a reconnaissance probe or report evidence
    #[serde(default)]
    pub scouted: bool,
    #[serde(default)]
    pub safe: bool,
    #[serde(default)]
    pub profile: LootProfile,
}

impl TargetRecord {
    pub fn new(village_id: VillageId) -> Self {
        Self {
            village_id,
            last_attack_at: None,
            scouted: false,
            safe: false,
            profile: LootProfile::Normal,
        }
    }

    pub fn high_profile(&self) -> bool {
        self.profile == LootProfile::High
    }

    pub fn low_profile(&self) -> bool {
        self.profile == LootProfile::Low
    }

    /// Seconds since the last dispatch; `None` if never dispatched
    pub fn age(&self, now: Timestamp) -> Option<u64> {
        self.last_attack_at.map(|t| now.saturating_sub(t))
    }
}

/// Keyed record store; read before deciding, write after dispatching
pub trait TargetStore {
    fn get(&self, village: VillageId) -> Option<TargetRecord>;

    /// Last writer wins
    fn put(&mut self, record: TargetRecord);

    /// Read-modify-write of one key, creating the record if missing
    fn modify<F>(&mut self, village: VillageId, f: F) -> TargetRecord
    where
        F: FnOnce(&mut TargetRecord),
        Self: Sized,
    {
        let mut record = self.get(village).unwrap_or_else(|| TargetRecord::new(village));
        f(&mut record);
        self.put(record.clone());
        record
    }
}

/// In-memory store with JSON snapshots
#[derive(Debug, Clone, Default)]
pub struct MemoryTargetStore {
    records: AHashMap<VillageId, TargetRecord>,
}

impl MemoryTargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetRecord> {
        self.records.values()
    }

    /// Load a snapshot written by [`MemoryTargetStore::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let records: Vec<TargetRecord> = serde_json::from_str(&content)?;
        Ok(records.into_iter().collect())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut records: Vec<&TargetRecord> = self.records.values().collect();
        records.sort_by_key(|r| r.village_id);
        fs::write(path, serde_json::to_string_pretty(&records)?)?;
        Ok(())
    }
}

impl FromIterator<TargetRecord> for MemoryTargetStore {
    fn from_iter<I: IntoIterator<Item = TargetRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|r| (r.village_id, r)).collect(),
        }
    }
}

impl TargetStore for MemoryTargetStore {
    fn get(&self, village: VillageId) -> Option<TargetRecord> {
        self.records.get(&village).cloned()
    }

    fn put(&mut self, record: TargetRecord) {
        self.records.insert(record.village_id, record);
    }
}
