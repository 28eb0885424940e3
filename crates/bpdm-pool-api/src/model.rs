//! Wire DTOs for the Pool's batch create/update endpoints.

use bpdm_common::{AddressDto, LegalEntityDto, SiteDto};
use serde::{Deserialize, Serialize};

/// Per-record error returned inside a batch response.
///
/// `entity_key` is the request's `index` (= the caller's external id) for
/// create responses and the record's BPN for update responses.  Callers must
/// branch their correlation logic on which call produced the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    /// Pool-side error classification (e.g. "LegalEntityDuplicateIdentifier").
    pub error_code: String,

    /// Human-readable error detail.
    pub message: String,

    /// External id (create) or BPN (update) of the offending record.
    pub entity_key: String,
}

/// Batch response envelope shared by all create/update endpoints.
///
/// Invariant: `entity_count + error_count` equals the size of the request
/// batch; every input record is accounted for exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerBatchResponse<T> {
    /// Successfully created or updated records.
    pub entities: Vec<T>,

    /// Per-record failures.
    pub errors: Vec<ErrorInfo>,

    /// Number of accepted records.
    pub entity_count: u32,

    /// Number of refused records.
    pub error_count: u32,
}

// ── Legal entities ────────────────────────────────────────────────────

/// Create request; `index` echoes the caller's external id back in the
/// response so results can be correlated (the Pool itself has no notion of
/// external ids).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntityPartnerCreateRequest {
    pub legal_entity: LegalEntityDto,
    pub index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntityPartnerCreateResponse {
    pub legal_entity: LegalEntityDto,
    /// Newly assigned BPN (BPNL).
    pub bpnl: String,
    /// Echo of the request's `index`.
    #[serde(default)]
    pub index: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntityPartnerUpdateRequest {
    pub legal_entity: LegalEntityDto,
    /// BPN of the record to update.
    pub bpnl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntityPartnerUpdateResponse {
    pub legal_entity: LegalEntityDto,
    pub bpnl: String,
}

// ── Sites ─────────────────────────────────────────────────────────────

/// Create request; `bpn_parent` is the BPN of the owning legal entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePartnerCreateRequest {
    pub site: SiteDto,
    pub index: String,
    pub bpn_parent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePartnerCreateResponse {
    pub site: SiteDto,
    /// Newly assigned BPN (BPNS).
    pub bpns: String,
    /// Echo of the request's `index`.
    #[serde(default)]
    pub index: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePartnerUpdateRequest {
    pub site: SiteDto,
    pub bpns: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePartnerUpdateResponse {
    pub site: SiteDto,
    pub bpns: String,
}

// ── Addresses ─────────────────────────────────────────────────────────

/// Create request; `bpn_parent` is the BPN of the owning legal entity or site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPartnerCreateRequest {
    pub address: AddressDto,
    pub index: String,
    pub bpn_parent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPartnerCreateResponse {
    pub address: AddressDto,
    /// Newly assigned BPN (BPNA).
    pub bpna: String,
    /// Echo of the request's `index`.
    #[serde(default)]
    pub index: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPartnerUpdateRequest {
    pub address: AddressDto,
    pub bpna: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPartnerUpdateResponse {
    pub address: AddressDto,
    pub bpna: String,
}
