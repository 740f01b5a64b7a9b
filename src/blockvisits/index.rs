//! The night's authoritative block-visit id index.
//!
//! Builds, from the SDB block-visit rows of a night, the per-(proposal,
//! target) pools of identifier values, filtered by status. The "usable" pools
//! (Accepted/Rejected) feed the gap-filling resolver and provider; the
//! "ignorable" pools (Deleted/In queue) only mark values as belonging to the
//! night so the sanitizer does not discard them.

use std::collections::BTreeMap;

use crate::models::{BlockVisitRow, GroupKey, ObservationStatus};

/// Ordered identifier pools per group key.
///
/// Identifiers are sorted ascending within each pool. This leans on the
/// assumption that block visit ids were issued in increasing order during the
/// night; the assumption is known to be imperfect but underlies the
/// tie-breaking downstream.
pub type BlockVisitPools = BTreeMap<GroupKey, Vec<i64>>;

/// Block visits whose stored status is wrong in the SDB and must be treated
/// as Rejected. Literal values, one per known misclassified record.
const FORCE_REJECTED_BLOCK_VISITS: [i64; 7] = [7374, 7375, 7376, 7512, 8414, 9012, 9013];

fn effective_status(row: &BlockVisitRow) -> ObservationStatus {
    if FORCE_REJECTED_BLOCK_VISITS.contains(&row.block_visit_id) {
        ObservationStatus::Rejected
    } else {
        row.status
    }
}

/// Build the identifier pools for the given status set.
pub fn block_visit_pools(
    rows: &[BlockVisitRow],
    statuses: &[ObservationStatus],
) -> BlockVisitPools {
    let mut pools = BlockVisitPools::new();
    for row in rows {
        if !statuses.contains(&effective_status(row)) {
            continue;
        }
        let key = GroupKey::new(Some(row.proposal_code.trim()), row.target_name.trim());
        pools.entry(key).or_default().push(row.block_visit_id);
    }
    for ids in pools.values_mut() {
        ids.sort_unstable();
        ids.dedup();
    }
    pools
}

/// All identifier values across a set of pools.
pub fn all_ids(pools: &BlockVisitPools) -> impl Iterator<Item = i64> + '_ {
    pools.values().flatten().copied()
}
