//! Observation (block-visit) status as tracked in the SDB.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a block visit in the SDB's BlockVisitStatus table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationStatus {
    Accepted,
    Rejected,
    Deleted,
    InQueue,
}

impl ObservationStatus {
    /// Statuses whose identifiers may be assigned to files ("usable" pool).
    pub const USABLE: [ObservationStatus; 2] =
        [ObservationStatus::Accepted, ObservationStatus::Rejected];

    /// Statuses whose identifiers are known but must not be assigned
    /// ("ignorable" pool). They still count as belonging to the night.
    pub const IGNORABLE: [ObservationStatus; 2] =
        [ObservationStatus::Deleted, ObservationStatus::InQueue];
}

impl FromStr for ObservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accepted" => Ok(ObservationStatus::Accepted),
            "rejected" => Ok(ObservationStatus::Rejected),
            "deleted" => Ok(ObservationStatus::Deleted),
            "in queue" => Ok(ObservationStatus::InQueue),
            other => Err(format!("Unknown block visit status: {}", other)),
        }
    }
}

impl fmt::Display for ObservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObservationStatus::Accepted => "Accepted",
            ObservationStatus::Rejected => "Rejected",
            ObservationStatus::Deleted => "Deleted",
            ObservationStatus::InQueue => "In queue",
        };
        write!(f, "{}", name)
    }
}
