//! Per-pass outcome reporting.
//!
//! Drops are first-class results rather than log lines: every record a step
//! excludes is returned as a [`SkippedItem`] so callers and tests can assert
//! on what was dropped and why.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a record was excluded from a sync step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The referenced parent was not returned by the Gate.
    ParentNotFound,
    /// The parent exists but has not been assigned a BPN yet.
    ParentBpnMissing,
    /// The child declares neither a legal-entity nor a site parent.
    NoParentReference,
    /// A Pool create response entity came back without an index echo.
    MissingIndex,
    /// An update-error's BPN could not be mapped back to an external id.
    CorrelationMiss,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParentNotFound => write!(f, "parent not found"),
            Self::ParentBpnMissing => write!(f, "parent BPN missing"),
            Self::NoParentReference => write!(f, "no parent reference"),
            Self::MissingIndex => write!(f, "missing index in pool response"),
            Self::CorrelationMiss => write!(f, "bpn correlation miss"),
        }
    }
}

/// A record excluded from a sync step, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    /// External id of the record where known; the orphan BPN for
    /// correlation misses.
    pub id: String,

    /// Why it was excluded.
    pub reason: SkipReason,
}

impl SkippedItem {
    pub fn new(id: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            id: id.into(),
            reason,
        }
    }
}

/// Counters for one partner type within a pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeStats {
    /// Records fetched from the Gate for this type.
    pub fetched: u32,

    /// Records accepted by the Pool's create endpoint.
    pub created: u32,

    /// Records accepted by the Pool's update endpoint.
    pub updated: u32,

    /// Per-record errors from the create endpoint.
    pub create_errors: u32,

    /// Per-record errors from the update endpoint.
    pub update_errors: u32,

    /// Records excluded before or after the Pool calls.
    pub skipped: Vec<SkippedItem>,
}

/// Outcome of one full sync pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// When the pass started; becomes the next checkpoint.
    pub started_at: DateTime<Utc>,

    /// When the pass finished.
    pub finished_at: Option<DateTime<Utc>>,

    pub legal_entities: TypeStats,
    pub sites: TypeStats,
    pub addresses: TypeStats,
}

impl SyncReport {
    /// Create an empty report stamped with the pass start time.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            legal_entities: TypeStats::default(),
            sites: TypeStats::default(),
            addresses: TypeStats::default(),
        }
    }

    /// Total records excluded across all types.
    pub fn total_skipped(&self) -> usize {
        self.legal_entities.skipped.len() + self.sites.skipped.len() + self.addresses.skipped.len()
    }
}
