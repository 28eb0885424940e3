//! Read-side queries against the Gate.
//!
//! Gate input records do not carry BPNs; the BPN for an already-shared record
//! lives in the sharing-state ledger.  The info types returned here join the
//! two, so downstream steps can partition on BPN presence directly.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tracing::info;

use bpdm_common::{AddressDto, LegalEntityDto, PartnerType, SiteDto};
use bpdm_gate_api::GateClient;

use crate::error::BridgeResult;
use crate::pagination::{fetch_all_cursor_pages, fetch_all_pages};

/// Legal-entity record joined with its assigned BPN, if any.
#[derive(Debug, Clone)]
pub struct GateLegalEntityInfo {
    pub legal_entity: LegalEntityDto,
    pub external_id: String,
    pub bpn: Option<String>,
}

/// Site record joined with its assigned BPN, if any.
#[derive(Debug, Clone)]
pub struct GateSiteInfo {
    pub site: SiteDto,
    pub external_id: String,
    pub legal_entity_external_id: String,
    pub bpn: Option<String>,
}

/// Address record joined with its assigned BPN, if any.
#[derive(Debug, Clone)]
pub struct GateAddressInfo {
    pub address: AddressDto,
    pub external_id: String,
    pub legal_entity_external_id: Option<String>,
    pub site_external_id: Option<String>,
    pub bpn: Option<String>,
}

/// Paginating query layer over the [`GateClient`].
#[derive(Debug, Clone)]
pub struct GateQueryService {
    gate: GateClient,
    page_size: u32,
}

impl GateQueryService {
    /// Create a query service with the given page size for all paginated calls.
    pub fn new(gate: GateClient, page_size: u32) -> Self {
        Self { gate, page_size }
    }

    /// Distinct external ids changed since `modified_after`, grouped by
    /// partner type.  `None` means full resync.
    pub async fn changed_external_ids(
        &self,
        modified_after: Option<DateTime<Utc>>,
    ) -> BridgeResult<HashMap<PartnerType, BTreeSet<String>>> {
        let entries = fetch_all_pages(|page| {
            self.gate
                .get_changelog_entries(modified_after, page, self.page_size)
        })
        .await?;

        let mut by_type: HashMap<PartnerType, BTreeSet<String>> = HashMap::new();
        for entry in entries {
            by_type
                .entry(entry.business_partner_type)
                .or_default()
                .insert(entry.external_id);
        }

        info!(
            legal_entities = by_type.get(&PartnerType::LegalEntity).map_or(0, BTreeSet::len),
            sites = by_type.get(&PartnerType::Site).map_or(0, BTreeSet::len),
            addresses = by_type.get(&PartnerType::Address).map_or(0, BTreeSet::len),
            "Changed entries in Gate since last sync"
        );
        Ok(by_type)
    }

    /// Fetch legal-entity records by external id, joined with their BPNs.
    pub async fn legal_entity_infos(
        &self,
        external_ids: &BTreeSet<String>,
    ) -> BridgeResult<Vec<GateLegalEntityInfo>> {
        if external_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = external_ids.iter().cloned().collect();

        let drain = fetch_all_cursor_pages(|start_after| {
            let ids = ids.clone();
            async move {
                self.gate
                    .get_legal_entities_by_external_ids(&ids, start_after.as_deref(), self.page_size)
                    .await
            }
        })
        .await?;
        info!(
            valid = drain.content.len(),
            invalid = drain.invalid_entries,
            "Gate returned legal entities"
        );

        let bpn_by_external_id = self
            .bpn_by_external_id(PartnerType::LegalEntity, &ids)
            .await?;

        Ok(drain
            .content
            .into_iter()
            .map(|entry| GateLegalEntityInfo {
                bpn: bpn_by_external_id.get(&entry.external_id).cloned(),
                legal_entity: entry.legal_entity,
                external_id: entry.external_id,
            })
            .collect())
    }

    /// Fetch site records by external id, joined with their BPNs.
    pub async fn site_infos(
        &self,
        external_ids: &BTreeSet<String>,
    ) -> BridgeResult<Vec<GateSiteInfo>> {
        if external_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = external_ids.iter().cloned().collect();

        let drain = fetch_all_cursor_pages(|start_after| {
            let ids = ids.clone();
            async move {
                self.gate
                    .get_sites_by_external_ids(&ids, start_after.as_deref(), self.page_size)
                    .await
            }
        })
        .await?;
        info!(
            valid = drain.content.len(),
            invalid = drain.invalid_entries,
            "Gate returned sites"
        );

        let bpn_by_external_id = self.bpn_by_external_id(PartnerType::Site, &ids).await?;

        Ok(drain
            .content
            .into_iter()
            .map(|entry| GateSiteInfo {
                bpn: bpn_by_external_id.get(&entry.external_id).cloned(),
                site: entry.site,
                external_id: entry.external_id,
                legal_entity_external_id: entry.legal_entity_external_id,
            })
            .collect())
    }

    /// Fetch address records by external id, joined with their BPNs.
    pub async fn address_infos(
        &self,
        external_ids: &BTreeSet<String>,
    ) -> BridgeResult<Vec<GateAddressInfo>> {
        if external_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = external_ids.iter().cloned().collect();

        let drain = fetch_all_cursor_pages(|start_after| {
            let ids = ids.clone();
            async move {
                self.gate
                    .get_addresses_by_external_ids(&ids, start_after.as_deref(), self.page_size)
                    .await
            }
        })
        .await?;
        info!(
            valid = drain.content.len(),
            invalid = drain.invalid_entries,
            "Gate returned addresses"
        );

        let bpn_by_external_id = self.bpn_by_external_id(PartnerType::Address, &ids).await?;

        Ok(drain
            .content
            .into_iter()
            .map(|entry| GateAddressInfo {
                bpn: bpn_by_external_id.get(&entry.external_id).cloned(),
                address: entry.address,
                external_id: entry.external_id,
                legal_entity_external_id: entry.legal_entity_external_id,
                site_external_id: entry.site_external_id,
            })
            .collect())
    }

    /// Look up assigned BPNs for the given external ids from the
    /// sharing-state ledger.  Ids without a BPN contribute no entry.
    pub async fn bpn_by_external_id(
        &self,
        lsa_type: PartnerType,
        external_ids: &[String],
    ) -> BridgeResult<HashMap<String, String>> {
        if external_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let states = fetch_all_pages(|page| {
            self.gate
                .get_sharing_states(lsa_type, external_ids, page, self.page_size)
        })
        .await?;

        Ok(states
            .into_iter()
            .filter_map(|state| state.bpn.map(|bpn| (state.external_id, bpn)))
            .collect())
    }
}
