//! Gate↔Pool synchronization core.
//!
//! One sync pass reads the Gate's changelog since the last checkpoint,
//! fetches the changed records per partner type, partitions them into
//! create/update cohorts by BPN presence, resolves parent BPNs for sites and
//! addresses, upserts the batches into the Pool, and writes per-record
//! outcomes back into the Gate's sharing-state ledger.  Partner types are
//! processed in dependency order: legal entities, then sites, then addresses.
//!
//! The pass is sequential and at-least-once: any transport error aborts the
//! whole invocation, the checkpoint is only advanced after a completed pass,
//! and sharing-state writes are idempotent upserts.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod gate_query;
pub mod pagination;
pub mod partition;
pub mod report;
pub mod resolve;
pub mod sharing;
pub mod sync;

pub use checkpoint::{CheckpointStore, InMemoryCheckpointStore, SyncCheckpoint};
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use report::{SkipReason, SkippedItem, SyncReport, TypeStats};
pub use sync::SyncService;
