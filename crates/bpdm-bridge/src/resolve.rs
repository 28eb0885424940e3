//! Parent BPN resolution for sites and addresses.
//!
//! A child cannot be created in the Pool without its parent's BPN.  Children
//! whose parent lookup misses are excluded from the batch and deferred to a
//! future sync cycle, when the parent may have acquired a BPN; the exclusions
//! come back as [`SkippedItem`]s rather than hard failures.

use std::collections::HashMap;

use crate::gate_query::{GateAddressInfo, GateSiteInfo};
use crate::report::{SkipReason, SkippedItem};

/// A parent lookup: external id to assigned BPN.  A key mapped to `None`
/// means the parent exists in the Gate but has no BPN yet; an absent key
/// means the Gate did not return the parent at all.
pub type ParentLookup = HashMap<String, Option<String>>;

/// A child paired with its resolved parent BPN.
#[derive(Debug)]
pub struct ResolvedChild<T> {
    pub record: T,
    pub parent_bpn: String,
}

/// Resolution outcome: resolved + skipped always account for every input
/// child exactly once.
#[derive(Debug)]
pub struct Resolution<T> {
    pub resolved: Vec<ResolvedChild<T>>,
    pub skipped: Vec<SkippedItem>,
}

/// Resolve the legal-entity parent BPN for each site.
pub fn resolve_site_parents(sites: Vec<GateSiteInfo>, parents: &ParentLookup) -> Resolution<GateSiteInfo> {
    let mut resolved = Vec::new();
    let mut skipped = Vec::new();
    for site in sites {
        match lookup(parents, &site.legal_entity_external_id) {
            Ok(parent_bpn) => resolved.push(ResolvedChild {
                record: site,
                parent_bpn,
            }),
            Err(reason) => skipped.push(SkippedItem::new(site.external_id, reason)),
        }
    }
    Resolution { resolved, skipped }
}

/// Resolve the parent BPN for each address from whichever parent kind it
/// declares.  Legal-entity and site parent pools are resolved independently.
/// The two references are mutually exclusive in practice; an address that
/// declares both is resolved via its legal-entity parent first, falling back
/// to the site parent when that lookup misses.
pub fn resolve_address_parents(
    addresses: Vec<GateAddressInfo>,
    legal_entity_parents: &ParentLookup,
    site_parents: &ParentLookup,
) -> Resolution<GateAddressInfo> {
    let mut resolved = Vec::new();
    let mut skipped = Vec::new();
    for address in addresses {
        let outcome = match (&address.legal_entity_external_id, &address.site_external_id) {
            (Some(le_id), Some(site_id)) => lookup(legal_entity_parents, le_id)
                .or_else(|_| lookup(site_parents, site_id)),
            (Some(le_id), None) => lookup(legal_entity_parents, le_id),
            (None, Some(site_id)) => lookup(site_parents, site_id),
            (None, None) => Err(SkipReason::NoParentReference),
        };
        match outcome {
            Ok(parent_bpn) => resolved.push(ResolvedChild {
                record: address,
                parent_bpn,
            }),
            Err(reason) => skipped.push(SkippedItem::new(address.external_id, reason)),
        }
    }
    Resolution { resolved, skipped }
}

fn lookup(parents: &ParentLookup, parent_external_id: &str) -> Result<String, SkipReason> {
    match parents.get(parent_external_id) {
        Some(Some(bpn)) => Ok(bpn.clone()),
        Some(None) => Err(SkipReason::ParentBpnMissing),
        None => Err(SkipReason::ParentNotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpdm_common::{AddressDto, SiteDto};

    fn site(external_id: &str, parent: &str) -> GateSiteInfo {
        GateSiteInfo {
            site: SiteDto {
                name: format!("Site {external_id}"),
            },
            external_id: external_id.to_string(),
            legal_entity_external_id: parent.to_string(),
            bpn: None,
        }
    }

    fn address(external_id: &str, le_parent: Option<&str>, site_parent: Option<&str>) -> GateAddressInfo {
        GateAddressInfo {
            address: AddressDto {
                city: "Berlin".to_string(),
                country: "DE".to_string(),
                street: None,
                postal_code: None,
            },
            external_id: external_id.to_string(),
            legal_entity_external_id: le_parent.map(str::to_string),
            site_external_id: site_parent.map(str::to_string),
            bpn: None,
        }
    }

    #[test]
    fn test_site_resolution_conserves_input() {
        let parents: ParentLookup = [
            ("le-1".to_string(), Some("BPNL000000000001".to_string())),
            ("le-2".to_string(), None),
        ]
        .into();

        let resolution = resolve_site_parents(
            vec![site("s1", "le-1"), site("s2", "le-2"), site("s3", "le-3")],
            &parents,
        );

        assert_eq!(resolution.resolved.len() + resolution.skipped.len(), 3);
        assert_eq!(resolution.resolved[0].parent_bpn, "BPNL000000000001");
        assert_eq!(
            resolution.skipped,
            vec![
                SkippedItem::new("s2", SkipReason::ParentBpnMissing),
                SkippedItem::new("s3", SkipReason::ParentNotFound),
            ]
        );
    }

    #[test]
    fn test_address_routed_to_declared_parent_kind() {
        let le_parents: ParentLookup =
            [("le-1".to_string(), Some("BPNL000000000001".to_string()))].into();
        let site_parents: ParentLookup =
            [("s1".to_string(), Some("BPNS000000000001".to_string()))].into();

        let resolution = resolve_address_parents(
            vec![
                address("a1", Some("le-1"), None),
                address("a2", None, Some("s1")),
                address("a3", None, None),
            ],
            &le_parents,
            &site_parents,
        );

        assert_eq!(resolution.resolved.len(), 2);
        assert_eq!(resolution.resolved[0].parent_bpn, "BPNL000000000001");
        assert_eq!(resolution.resolved[1].parent_bpn, "BPNS000000000001");
        assert_eq!(
            resolution.skipped,
            vec![SkippedItem::new("a3", SkipReason::NoParentReference)]
        );
    }

    #[test]
    fn test_address_with_both_refs_falls_back_to_site_parent() {
        let le_parents: ParentLookup = [("le-1".to_string(), None)].into();
        let site_parents: ParentLookup =
            [("s1".to_string(), Some("BPNS000000000001".to_string()))].into();

        let resolution = resolve_address_parents(
            vec![
                address("a1", Some("le-1"), Some("s1")),
                address("a2", Some("le-1"), Some("s-unknown")),
            ],
            &le_parents,
            &site_parents,
        );

        // a1: the legal-entity parent has no BPN, the site parent does.
        assert_eq!(resolution.resolved.len(), 1);
        assert_eq!(resolution.resolved[0].record.external_id, "a1");
        assert_eq!(resolution.resolved[0].parent_bpn, "BPNS000000000001");
        // a2: both lookups miss; the fallback's reason is reported.
        assert_eq!(
            resolution.skipped,
            vec![SkippedItem::new("a2", SkipReason::ParentNotFound)]
        );
    }

    #[test]
    fn test_all_dropped_when_parents_unshared() {
        let parents: ParentLookup = [("le-1".to_string(), None)].into();
        let resolution =
            resolve_site_parents(vec![site("s1", "le-1"), site("s2", "le-1")], &parents);

        assert!(resolution.resolved.is_empty());
        assert_eq!(resolution.skipped.len(), 2);
        assert!(resolution
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::ParentBpnMissing));
    }
}
