//! Database module for the SDB and archive databases.
//!
//! This module provides abstractions for database operations via the
//! Repository pattern, allowing different storage backends to be swapped
//! easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Caller (nightly cron job, CLI, sync task)               │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                             │
//! │  - Batch queries, proposal-existence cache               │
//! │  - Resolution pipeline orchestration                     │
//! │  - Population / sync / deletion                          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository.rs)                       │
//! │  SdbRepository · ArchiveRepository                       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! SQL backends are deliberately absent: the pipeline consumes fully
//! materialized per-night data, so production deployments implement the two
//! traits over their database driver of choice.

pub mod config;
pub mod error;
pub mod local;
pub mod repository;
pub mod services;

pub use config::{ConnectionSettings, DatabaseConfig};
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use local::LocalRepository;
pub use repository::{ArchiveRepository, SdbRepository};
pub use services::{delete_night, populate_night, resolve_night, sync_night};
