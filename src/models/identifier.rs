//! Block-visit identifier types.
//!
//! A block visit is one discrete observing execution of a proposal's block on
//! a given night. Real identifiers come from the SDB; synthetic ones are
//! deterministic hash digests minted when no real identifier can be found or
//! inferred.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved block-visit identifier.
///
/// The tag makes the provenance explicit: `Real` values exist in the SDB,
/// `Synthetic` values were minted by this pipeline and must never be written
/// back to the SDB.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockVisitId {
    /// An identifier from the authoritative BlockVisit table.
    Real(i64),
    /// A deterministic hash-derived stand-in (32 hex characters).
    Synthetic(String),
}

impl BlockVisitId {
    /// The real identifier value, if this is one.
    pub fn as_real(&self) -> Option<i64> {
        match self {
            BlockVisitId::Real(id) => Some(*id),
            BlockVisitId::Synthetic(_) => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, BlockVisitId::Synthetic(_))
    }
}

impl fmt::Display for BlockVisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockVisitId::Real(id) => write!(f, "{}", id),
            BlockVisitId::Synthetic(digest) => write!(f, "{}", digest),
        }
    }
}

impl From<i64> for BlockVisitId {
    fn from(id: i64) -> Self {
        BlockVisitId::Real(id)
    }
}

/// Confidence classification of a block-visit identifier assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockVisitIdStatus {
    /// The identifier came from an authoritative source and survived
    /// sanitization, or was independently corroborated.
    Confirmed,
    /// The identifier was taken unused from the night's pool without
    /// corroborating neighbors.
    Guessed,
    /// The identifier was inherited from a neighboring file of the same
    /// proposal and target (or across calibration frames).
    Inferred,
    /// No real identifier was available; a synthetic one was minted.
    Synthesized,
}

impl BlockVisitIdStatus {
    /// Whether this status may be upgraded to [`Confirmed`].
    ///
    /// Only `Guessed` and `Inferred` assignments can be corroborated after the
    /// fact; a `Synthesized` assignment has no real identifier to confirm.
    ///
    /// [`Confirmed`]: BlockVisitIdStatus::Confirmed
    pub fn can_upgrade_to_confirmed(self) -> bool {
        matches!(
            self,
            BlockVisitIdStatus::Guessed | BlockVisitIdStatus::Inferred
        )
    }
}

impl fmt::Display for BlockVisitIdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockVisitIdStatus::Confirmed => "confirmed",
            BlockVisitIdStatus::Guessed => "guessed",
            BlockVisitIdStatus::Inferred => "inferred",
            BlockVisitIdStatus::Synthesized => "synthesized",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_id_accessors() {
        let id = BlockVisitId::Real(12345);
        assert_eq!(id.as_real(), Some(12345));
        assert!(!id.is_synthetic());
        assert_eq!(id.to_string(), "12345");
    }

    #[test]
    fn test_synthetic_id_accessors() {
        let id = BlockVisitId::Synthetic("abc123".to_string());
        assert_eq!(id.as_real(), None);
        assert!(id.is_synthetic());
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn test_from_i64() {
        let id: BlockVisitId = 42.into();
        assert_eq!(id, BlockVisitId::Real(42));
    }

    #[test]
    fn test_upgrade_eligibility() {
        assert!(BlockVisitIdStatus::Guessed.can_upgrade_to_confirmed());
        assert!(BlockVisitIdStatus::Inferred.can_upgrade_to_confirmed());
        assert!(!BlockVisitIdStatus::Confirmed.can_upgrade_to_confirmed());
        assert!(!BlockVisitIdStatus::Synthesized.can_upgrade_to_confirmed());
    }
}
