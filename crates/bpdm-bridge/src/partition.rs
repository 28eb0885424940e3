//! Create/update cohort partitioning.

use crate::gate_query::{GateAddressInfo, GateLegalEntityInfo, GateSiteInfo};

/// A record that may already have a BPN assigned by the Pool.
pub trait BpnAssignable {
    /// The assigned BPN, if any.
    fn bpn(&self) -> Option<&str>;
}

impl BpnAssignable for GateLegalEntityInfo {
    fn bpn(&self) -> Option<&str> {
        self.bpn.as_deref()
    }
}

impl BpnAssignable for GateSiteInfo {
    fn bpn(&self) -> Option<&str> {
        self.bpn.as_deref()
    }
}

impl BpnAssignable for GateAddressInfo {
    fn bpn(&self) -> Option<&str> {
        self.bpn.as_deref()
    }
}

/// The two cohorts of one partner-type batch.
#[derive(Debug)]
pub struct Cohorts<T> {
    /// Records without a BPN; the Pool has never seen them.
    pub to_create: Vec<T>,

    /// Records with a BPN; already golden, to be updated in place.
    pub to_update: Vec<T>,
}

/// Split records by BPN presence.  Pure: the union of the cohorts is exactly
/// the input and the two are disjoint.
pub fn partition_by_bpn<T: BpnAssignable>(records: Vec<T>) -> Cohorts<T> {
    let (to_update, to_create) = records.into_iter().partition(|r| r.bpn().is_some());
    Cohorts {
        to_create,
        to_update,
    }
}
