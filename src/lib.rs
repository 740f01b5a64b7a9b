//! # SSDA Rust Backend
//!
//! Metadata pipeline core for the SALT science data archive.
//!
//! This crate ingests per-night observation metadata from the SALT telescope
//! (RSS, HRS, Salticam and BCAM instruments), resolves which files belong to
//! which block visit, and synchronizes the result into the data archive,
//! cross-referencing the proposal/scheduling database (SDB).
//!
//! ## Features
//!
//! - **Block-visit resolution**: deterministic, auditable assignment of a
//!   block-visit identifier to every observation file of a night, with a
//!   confidence classification (confirmed / inferred / guessed / synthesized)
//!   for every assignment
//! - **Archive population**: per-night insertion of observation groups,
//!   idempotent across re-runs
//! - **Re-synchronization**: periodic refresh of observation statuses that
//!   drifted in the SDB after archiving
//! - **Deletion**: removal of a night's archived records
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: public data transfer types (assignments, summaries)
//! - [`models`]: domain types (identifiers, statuses, file records, nights)
//! - [`db`]: repository traits, errors, configuration and the in-memory backend
//! - [`fits`]: the FITS header access boundary
//! - [`blockvisits`]: the block-visit identity resolution pipeline
//!
//! The resolution pipeline itself is pure and synchronous; the only I/O is the
//! pair of batch queries run once per night before the in-memory algorithm
//! starts. Pools and providers are constructed fresh per night, so nights may
//! be processed in parallel by the caller without shared state.

pub mod api;

pub mod blockvisits;
pub mod db;
pub mod fits;
pub mod models;
