//! The sync pass orchestrator.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use bpdm_common::PartnerType;
use bpdm_gate_api::GateClient;
use bpdm_pool_api::model::{
    AddressPartnerCreateRequest, AddressPartnerUpdateRequest, LegalEntityPartnerCreateRequest,
    LegalEntityPartnerUpdateRequest, SitePartnerCreateRequest, SitePartnerUpdateRequest,
};
use bpdm_pool_api::PoolClient;

use crate::checkpoint::{CheckpointStore, SyncCheckpoint};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::gate_query::GateQueryService;
use crate::partition::partition_by_bpn;
use crate::report::{SyncReport, TypeStats};
use crate::resolve::{resolve_address_parents, resolve_site_parents, ParentLookup};
use crate::sharing::{ErrorCorrelation, SharingStateWriter};

/// Runs complete Gate→Pool sync passes.
///
/// At most one pass runs at a time per service instance; a second concurrent
/// [`sync`](Self::sync) call fails fast with
/// [`BridgeError::SyncAlreadyRunning`].
pub struct SyncService {
    gate_query: GateQueryService,
    pool: PoolClient,
    writer: SharingStateWriter,
    checkpoint: Arc<dyn CheckpointStore>,
    in_flight: Mutex<()>,
}

impl SyncService {
    /// Build a service from prepared clients.
    pub fn new(
        gate: GateClient,
        pool: PoolClient,
        page_size: u32,
        checkpoint: Arc<dyn CheckpointStore>,
    ) -> BridgeResult<Self> {
        if page_size == 0 {
            return Err(BridgeError::InvalidConfig(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            writer: SharingStateWriter::new(gate.clone()),
            gate_query: GateQueryService::new(gate, page_size),
            pool,
            checkpoint,
            in_flight: Mutex::new(()),
        })
    }

    /// Build a service from configuration, constructing the HTTP clients.
    pub fn from_config(
        config: &BridgeConfig,
        checkpoint: Arc<dyn CheckpointStore>,
    ) -> BridgeResult<Self> {
        let gate = GateClient::new(&config.gate_base_url, config.request_timeout())?;
        let pool = PoolClient::new(&config.pool_base_url, config.request_timeout())?;
        Self::new(gate, pool, config.page_size, checkpoint)
    }

    /// Run one sync pass and return its report.
    ///
    /// Reads the changelog from the checkpointed position, then processes
    /// legal entities, sites, and addresses in that order.  The checkpoint
    /// advances to this pass's start time only after all three types have
    /// been processed, so an aborted pass replays its window next time.
    pub async fn sync(&self) -> BridgeResult<SyncReport> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| BridgeError::SyncAlreadyRunning)?;

        let started_at = Utc::now();
        let checkpoint = self.checkpoint.load().await?;
        info!(
            from = ?checkpoint.last_sync,
            "Starting sync pass"
        );

        let mut changed = self
            .gate_query
            .changed_external_ids(checkpoint.last_sync)
            .await?;
        let legal_entity_ids = changed.remove(&PartnerType::LegalEntity).unwrap_or_default();
        let site_ids = changed.remove(&PartnerType::Site).unwrap_or_default();
        let address_ids = changed.remove(&PartnerType::Address).unwrap_or_default();

        let mut report = SyncReport::new(started_at);
        report.legal_entities = self.process_legal_entities(&legal_entity_ids).await?;
        report.sites = self.process_sites(&site_ids).await?;
        report.addresses = self.process_addresses(&address_ids).await?;

        self.checkpoint
            .save(&SyncCheckpoint::at(started_at))
            .await?;
        report.finished_at = Some(Utc::now());
        info!(
            created = report.legal_entities.created + report.sites.created + report.addresses.created,
            updated = report.legal_entities.updated + report.sites.updated + report.addresses.updated,
            skipped = report.total_skipped(),
            "Sync pass finished"
        );
        Ok(report)
    }

    // ── Legal entities ────────────────────────────────────────────────

    async fn process_legal_entities(
        &self,
        external_ids: &BTreeSet<String>,
    ) -> BridgeResult<TypeStats> {
        let mut stats = TypeStats::default();
        let infos = self.gate_query.legal_entity_infos(external_ids).await?;
        stats.fetched = infos.len() as u32;
        let cohorts = partition_by_bpn(infos);

        if !cohorts.to_create.is_empty() {
            let requests: Vec<LegalEntityPartnerCreateRequest> = cohorts
                .to_create
                .into_iter()
                .map(|info| LegalEntityPartnerCreateRequest {
                    legal_entity: info.legal_entity,
                    index: info.external_id,
                })
                .collect();
            let response = self.pool.create_legal_entities(&requests).await?;
            info!(
                accepted = response.entity_count,
                refused = response.error_count,
                "Pool processed legal entity creations"
            );
            stats.created = response.entity_count;
            stats.create_errors = response.error_count;
            for entity in &response.entities {
                if let Some(skip) = self
                    .writer
                    .report_success(
                        PartnerType::LegalEntity,
                        entity.index.as_deref(),
                        &entity.bpnl,
                    )
                    .await?
                {
                    stats.skipped.push(skip);
                }
            }
            let no_lookup = HashMap::new();
            for error in &response.errors {
                if let Some(skip) = self
                    .writer
                    .report_error(
                        PartnerType::LegalEntity,
                        ErrorCorrelation::ByExternalId(error.entity_key.clone()),
                        error,
                        &no_lookup,
                    )
                    .await?
                {
                    stats.skipped.push(skip);
                }
            }
        }

        if !cohorts.to_update.is_empty() {
            let mut external_id_by_bpn = HashMap::new();
            let mut requests = Vec::with_capacity(cohorts.to_update.len());
            for info in cohorts.to_update {
                if let Some(bpn) = info.bpn {
                    external_id_by_bpn.insert(bpn.clone(), info.external_id);
                    requests.push(LegalEntityPartnerUpdateRequest {
                        legal_entity: info.legal_entity,
                        bpnl: bpn,
                    });
                }
            }
            let response = self.pool.update_legal_entities(&requests).await?;
            info!(
                accepted = response.entity_count,
                refused = response.error_count,
                "Pool processed legal entity updates"
            );
            stats.updated = response.entity_count;
            stats.update_errors = response.error_count;
            for error in &response.errors {
                if let Some(skip) = self
                    .writer
                    .report_error(
                        PartnerType::LegalEntity,
                        ErrorCorrelation::ByBpn(error.entity_key.clone()),
                        error,
                        &external_id_by_bpn,
                    )
                    .await?
                {
                    stats.skipped.push(skip);
                }
            }
        }

        Ok(stats)
    }

    // ── Sites ─────────────────────────────────────────────────────────

    async fn process_sites(&self, external_ids: &BTreeSet<String>) -> BridgeResult<TypeStats> {
        let mut stats = TypeStats::default();
        let infos = self.gate_query.site_infos(external_ids).await?;
        stats.fetched = infos.len() as u32;
        let cohorts = partition_by_bpn(infos);

        if !cohorts.to_create.is_empty() {
            let parent_ids: BTreeSet<String> = cohorts
                .to_create
                .iter()
                .map(|site| site.legal_entity_external_id.clone())
                .collect();
            let parents = self.legal_entity_parent_lookup(&parent_ids).await?;

            let total = cohorts.to_create.len();
            let resolution = resolve_site_parents(cohorts.to_create, &parents);
            if !resolution.skipped.is_empty() {
                warn!(
                    resolved = resolution.resolved.len(),
                    total,
                    "Not all sites can be synchronized, some parent legal entities have no BPNL yet"
                );
                for skip in &resolution.skipped {
                    debug!(id = %skip.id, reason = %skip.reason, "Site excluded from Pool batch");
                }
                stats.skipped.extend(resolution.skipped);
            }

            if !resolution.resolved.is_empty() {
                let requests: Vec<SitePartnerCreateRequest> = resolution
                    .resolved
                    .into_iter()
                    .map(|child| SitePartnerCreateRequest {
                        site: child.record.site,
                        index: child.record.external_id,
                        bpn_parent: child.parent_bpn,
                    })
                    .collect();
                let response = self.pool.create_sites(&requests).await?;
                info!(
                    accepted = response.entity_count,
                    refused = response.error_count,
                    "Pool processed site creations"
                );
                stats.created = response.entity_count;
                stats.create_errors = response.error_count;
                for entity in &response.entities {
                    if let Some(skip) = self
                        .writer
                        .report_success(PartnerType::Site, entity.index.as_deref(), &entity.bpns)
                        .await?
                    {
                        stats.skipped.push(skip);
                    }
                }
                let no_lookup = HashMap::new();
                for error in &response.errors {
                    if let Some(skip) = self
                        .writer
                        .report_error(
                            PartnerType::Site,
                            ErrorCorrelation::ByExternalId(error.entity_key.clone()),
                            error,
                            &no_lookup,
                        )
                        .await?
                    {
                        stats.skipped.push(skip);
                    }
                }
            }
        }

        if !cohorts.to_update.is_empty() {
            let mut external_id_by_bpn = HashMap::new();
            let mut requests = Vec::with_capacity(cohorts.to_update.len());
            for info in cohorts.to_update {
                if let Some(bpn) = info.bpn {
                    external_id_by_bpn.insert(bpn.clone(), info.external_id);
                    requests.push(SitePartnerUpdateRequest {
                        site: info.site,
                        bpns: bpn,
                    });
                }
            }
            let response = self.pool.update_sites(&requests).await?;
            info!(
                accepted = response.entity_count,
                refused = response.error_count,
                "Pool processed site updates"
            );
            stats.updated = response.entity_count;
            stats.update_errors = response.error_count;
            for error in &response.errors {
                if let Some(skip) = self
                    .writer
                    .report_error(
                        PartnerType::Site,
                        ErrorCorrelation::ByBpn(error.entity_key.clone()),
                        error,
                        &external_id_by_bpn,
                    )
                    .await?
                {
                    stats.skipped.push(skip);
                }
            }
        }

        Ok(stats)
    }

    // ── Addresses ─────────────────────────────────────────────────────

    async fn process_addresses(&self, external_ids: &BTreeSet<String>) -> BridgeResult<TypeStats> {
        let mut stats = TypeStats::default();
        let infos = self.gate_query.address_infos(external_ids).await?;
        stats.fetched = infos.len() as u32;
        let cohorts = partition_by_bpn(infos);

        if !cohorts.to_create.is_empty() {
            let le_parent_ids: BTreeSet<String> = cohorts
                .to_create
                .iter()
                .filter_map(|a| a.legal_entity_external_id.clone())
                .collect();
            let site_parent_ids: BTreeSet<String> = cohorts
                .to_create
                .iter()
                .filter_map(|a| a.site_external_id.clone())
                .collect();
            let le_parents = self.legal_entity_parent_lookup(&le_parent_ids).await?;
            let site_parents = self.site_parent_lookup(&site_parent_ids).await?;

            let total = cohorts.to_create.len();
            let resolution = resolve_address_parents(cohorts.to_create, &le_parents, &site_parents);
            if !resolution.skipped.is_empty() {
                warn!(
                    resolved = resolution.resolved.len(),
                    total,
                    "Not all addresses can be synchronized, some parents have no BPN yet"
                );
                for skip in &resolution.skipped {
                    debug!(id = %skip.id, reason = %skip.reason, "Address excluded from Pool batch");
                }
                stats.skipped.extend(resolution.skipped);
            }

            if !resolution.resolved.is_empty() {
                let requests: Vec<AddressPartnerCreateRequest> = resolution
                    .resolved
                    .into_iter()
                    .map(|child| AddressPartnerCreateRequest {
                        address: child.record.address,
                        index: child.record.external_id,
                        bpn_parent: child.parent_bpn,
                    })
                    .collect();
                let response = self.pool.create_addresses(&requests).await?;
                info!(
                    accepted = response.entity_count,
                    refused = response.error_count,
                    "Pool processed address creations"
                );
                stats.created = response.entity_count;
                stats.create_errors = response.error_count;
                for entity in &response.entities {
                    if let Some(skip) = self
                        .writer
                        .report_success(PartnerType::Address, entity.index.as_deref(), &entity.bpna)
                        .await?
                    {
                        stats.skipped.push(skip);
                    }
                }
                let no_lookup = HashMap::new();
                for error in &response.errors {
                    if let Some(skip) = self
                        .writer
                        .report_error(
                            PartnerType::Address,
                            ErrorCorrelation::ByExternalId(error.entity_key.clone()),
                            error,
                            &no_lookup,
                        )
                        .await?
                    {
                        stats.skipped.push(skip);
                    }
                }
            }
        }

        if !cohorts.to_update.is_empty() {
            let mut external_id_by_bpn = HashMap::new();
            let mut requests = Vec::with_capacity(cohorts.to_update.len());
            for info in cohorts.to_update {
                if let Some(bpn) = info.bpn {
                    external_id_by_bpn.insert(bpn.clone(), info.external_id);
                    requests.push(AddressPartnerUpdateRequest {
                        address: info.address,
                        bpna: bpn,
                    });
                }
            }
            let response = self.pool.update_addresses(&requests).await?;
            info!(
                accepted = response.entity_count,
                refused = response.error_count,
                "Pool processed address updates"
            );
            stats.updated = response.entity_count;
            stats.update_errors = response.error_count;
            for error in &response.errors {
                if let Some(skip) = self
                    .writer
                    .report_error(
                        PartnerType::Address,
                        ErrorCorrelation::ByBpn(error.entity_key.clone()),
                        error,
                        &external_id_by_bpn,
                    )
                    .await?
                {
                    stats.skipped.push(skip);
                }
            }
        }

        Ok(stats)
    }

    // ── Parent lookups ────────────────────────────────────────────────

    /// Fetch the referenced legal entities and map external id to BPN.
    /// Parents the Gate does not return are absent from the lookup.
    async fn legal_entity_parent_lookup(
        &self,
        parent_ids: &BTreeSet<String>,
    ) -> BridgeResult<ParentLookup> {
        let parents = self.gate_query.legal_entity_infos(parent_ids).await?;
        Ok(parents
            .into_iter()
            .map(|info| (info.external_id, info.bpn))
            .collect())
    }

    /// Fetch the referenced sites and map external id to BPN.
    async fn site_parent_lookup(
        &self,
        parent_ids: &BTreeSet<String>,
    ) -> BridgeResult<ParentLookup> {
        let parents = self.gate_query.site_infos(parent_ids).await?;
        Ok(parents
            .into_iter()
            .map(|info| (info.external_id, info.bpn))
            .collect())
    }
}
