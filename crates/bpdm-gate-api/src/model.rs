//! Wire DTOs for the Gate API.

use bpdm_common::{AddressDto, LegalEntityDto, PartnerType, SiteDto};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Offset-paginated response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    /// Total number of elements across all pages.
    pub total_elements: u64,

    /// Total number of pages for the requested page size.
    pub total_pages: u32,

    /// Zero-based index of this page.
    pub page: u32,

    /// Number of elements in this page.
    pub content_size: u32,

    /// Page content.
    pub content: Vec<T>,
}

#[cfg(test)]
impl<T> PageDto<T> {
    /// Build a single-page envelope from a full content list.
    pub(crate) fn single(content: Vec<T>) -> Self {
        Self {
            total_elements: content.len() as u64,
            total_pages: u32::from(!content.is_empty()),
            page: 0,
            content_size: content.len() as u32,
            content,
        }
    }
}

/// Cursor-paginated response envelope for entity-by-external-id lookups.
///
/// `invalid_entries` counts requested external ids the Gate could not resolve
/// in this page window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStartAfterDto<T> {
    /// Total number of valid elements for the query.
    pub total_elements: u64,

    /// Cursor for the next page; `None` when this is the last page.
    #[serde(default)]
    pub next_start_after: Option<String>,

    /// Page content.
    pub content: Vec<T>,

    /// Number of requested ids that could not be resolved.
    #[serde(default)]
    pub invalid_entries: u32,
}

/// One changelog entry: a business-partner record changed in the Gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogEntryDto {
    /// Provider-assigned id of the changed record.
    pub external_id: String,

    /// Which partner type the record belongs to.
    pub business_partner_type: PartnerType,

    /// When the change happened.
    pub timestamp: DateTime<Utc>,
}

/// Synchronization status of a single external record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharingStateType {
    Pending,
    Success,
    Error,
}

/// Error codes the Gate accepts in a sharing-state upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessPartnerSharingError {
    /// Generic processing failure reported by the sync bridge.
    SharingProcessError,
    /// The sharing process did not finish in time.
    SharingTimeout,
    /// The record's BPN does not exist in the Pool.
    BpnNotInPool,
}

/// Per-external-id sharing state, keyed by `(externalId, lsaType)`.
///
/// Upsert semantics: at most one row per key; a PUT replaces the existing row
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingStateDto {
    /// Partner type scope of the external id.
    pub lsa_type: PartnerType,

    /// Provider-assigned record id.
    pub external_id: String,

    /// Current synchronization status.
    pub sharing_state_type: SharingStateType,

    /// Error classification, set when the state is `Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing_error_code: Option<BusinessPartnerSharingError>,

    /// Human-readable error detail, set when the state is `Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing_error_message: Option<String>,

    /// BPN assigned by the Pool, set when the state is `Success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpn: Option<String>,

    /// When the current sharing attempt was started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing_process_started: Option<DateTime<Utc>>,
}

/// Legal-entity record as returned by the Gate's input endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntityGateInputDto {
    /// Provider-assigned record id.
    pub external_id: String,

    /// Payload.
    pub legal_entity: LegalEntityDto,
}

/// Site record as returned by the Gate's input endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteGateInputDto {
    /// Provider-assigned record id.
    pub external_id: String,

    /// External id of the parent legal entity.
    pub legal_entity_external_id: String,

    /// Payload.
    pub site: SiteDto,
}

/// Address record as returned by the Gate's input endpoint.
///
/// Exactly one of `legal_entity_external_id` / `site_external_id` is expected
/// in practice, but the Gate does not enforce exclusivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressGateInputDto {
    /// Provider-assigned record id.
    pub external_id: String,

    /// External id of the parent legal entity, if the address hangs off one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_entity_external_id: Option<String>,

    /// External id of the parent site, if the address hangs off one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_external_id: Option<String>,

    /// Payload.
    pub address: AddressDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharing_state_success_wire_format() {
        let state = SharingStateDto {
            lsa_type: PartnerType::LegalEntity,
            external_id: "le-1".to_string(),
            sharing_state_type: SharingStateType::Success,
            sharing_error_code: None,
            sharing_error_message: None,
            bpn: Some("BPNL000000000001".to_string()),
            sharing_process_started: Some(Utc::now()),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["lsaType"], "LegalEntity");
        assert_eq!(json["sharingStateType"], "Success");
        assert_eq!(json["bpn"], "BPNL000000000001");
        assert!(json.get("sharingErrorCode").is_none());
    }

    #[test]
    fn test_sharing_state_error_wire_format() {
        let state = SharingStateDto {
            lsa_type: PartnerType::Address,
            external_id: "addr-1".to_string(),
            sharing_state_type: SharingStateType::Error,
            sharing_error_code: Some(BusinessPartnerSharingError::SharingProcessError),
            sharing_error_message: Some("duplicate identifier (AddressDuplicateIdentifier)".to_string()),
            bpn: None,
            sharing_process_started: None,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["sharingErrorCode"], "SharingProcessError");
        assert!(json.get("bpn").is_none());
        assert!(json.get("sharingProcessStarted").is_none());
    }

    #[test]
    fn test_page_dto_single() {
        let page = PageDto::single(vec![1, 2, 3]);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.content_size, 3);

        let empty: PageDto<i32> = PageDto::single(vec![]);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_cursor_page_defaults() {
        let json = r#"{"totalElements":0,"content":[]}"#;
        let page: PageStartAfterDto<ChangelogEntryDto> = serde_json::from_str(json).unwrap();
        assert!(page.next_start_after.is_none());
        assert_eq!(page.invalid_entries, 0);
    }
}
