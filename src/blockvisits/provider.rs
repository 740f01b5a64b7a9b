//! Identifier provider.
//!
//! Hands out unused real block visit ids per (proposal, target) key, falling
//! back to a deterministic synthetic id when the pool for a key is exhausted
//! or absent.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use super::index::BlockVisitPools;
use crate::models::{BlockVisitId, FileRecord, GroupKey, Night};

/// Stateful source of block visit ids for one night.
///
/// Constructed from the usable pools minus every identifier already claimed
/// by a file record. An identifier handed out once is never handed out again.
#[derive(Debug)]
pub struct BlockVisitIdProvider {
    night: Night,
    available: BlockVisitPools,
}

impl BlockVisitIdProvider {
    /// Build the provider, discounting identifiers already on records.
    pub fn new(night: Night, usable: BlockVisitPools, records: &[FileRecord]) -> Self {
        let claimed: HashSet<i64> = records
            .iter()
            .filter_map(|r| r.block_visit_id.as_ref().and_then(BlockVisitId::as_real))
            .collect();

        let mut available = usable;
        for ids in available.values_mut() {
            ids.retain(|id| !claimed.contains(id));
        }
        available.retain(|_, ids| !ids.is_empty());

        BlockVisitIdProvider { night, available }
    }

    /// The next identifier for a group key.
    ///
    /// Pops the smallest remaining real id (pools are sorted ascending, per
    /// the issued-in-order assumption), or mints a synthetic id.
    pub fn next_id(&mut self, key: &GroupKey) -> BlockVisitId {
        if let Some(ids) = self.available.get_mut(key) {
            if !ids.is_empty() {
                let id = ids.remove(0);
                return BlockVisitId::Real(id);
            }
        }
        BlockVisitId::Synthetic(synthetic_id(self.night, key))
    }
}

/// Deterministic 32-hex-character digest for a (night, proposal, target).
///
/// The same inputs always produce the same id, which keeps re-runs of a night
/// idempotent.
pub fn synthetic_id(night: Night, key: &GroupKey) -> String {
    let mut hasher = Sha256::new();
    hasher.update(night.to_string().as_bytes());
    hasher.update(key.proposal_code.as_deref().unwrap_or("").as_bytes());
    hasher.update(key.target_name.as_bytes());
    hex::encode(hasher.finalize())[..32].to_string()
}
