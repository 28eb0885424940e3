//! Write-back of per-record sync outcomes into the Gate's sharing-state
//! ledger.
//!
//! Writes are upserts keyed by `(externalId, lsaType)`: replaying the same
//! outcome twice yields the same final row, which is what makes the sync
//! loop's at-least-once delivery safe.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use bpdm_common::PartnerType;
use bpdm_gate_api::model::{
    BusinessPartnerSharingError, SharingStateDto, SharingStateType,
};
use bpdm_gate_api::GateClient;
use bpdm_pool_api::model::ErrorInfo;

use crate::error::BridgeResult;
use crate::report::{SkipReason, SkippedItem};

/// How a Pool error refers back to the offending record.
///
/// Create responses key errors by the request's `index` (the external id);
/// update responses key them by BPN, which must be mapped back through the
/// batch that was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCorrelation {
    ByExternalId(String),
    ByBpn(String),
}

impl ErrorCorrelation {
    /// Resolve to an external id, using `external_id_by_bpn` for the BPN case.
    pub fn resolve(&self, external_id_by_bpn: &HashMap<String, String>) -> Option<String> {
        match self {
            Self::ByExternalId(id) => Some(id.clone()),
            Self::ByBpn(bpn) => external_id_by_bpn.get(bpn).cloned(),
        }
    }
}

/// Build the sharing state recording a successful share.
pub fn success_state(
    lsa_type: PartnerType,
    external_id: &str,
    bpn: &str,
    now: DateTime<Utc>,
) -> SharingStateDto {
    SharingStateDto {
        lsa_type,
        external_id: external_id.to_string(),
        sharing_state_type: SharingStateType::Success,
        sharing_error_code: None,
        sharing_error_message: None,
        bpn: Some(bpn.to_string()),
        sharing_process_started: Some(now),
    }
}

/// Build the sharing state recording a Pool-reported error.
///
/// The Pool's fine-grained error taxonomy is flattened to the fixed
/// `SharingProcessError` code; the original code survives only textually in
/// the message.
pub fn error_state(
    lsa_type: PartnerType,
    external_id: &str,
    error: &ErrorInfo,
    process_started: Option<DateTime<Utc>>,
) -> SharingStateDto {
    SharingStateDto {
        lsa_type,
        external_id: external_id.to_string(),
        sharing_state_type: SharingStateType::Error,
        sharing_error_code: Some(BusinessPartnerSharingError::SharingProcessError),
        sharing_error_message: Some(format!("{} ({})", error.message, error.error_code)),
        bpn: None,
        sharing_process_started: process_started,
    }
}

/// Writes per-record outcomes into the Gate.
#[derive(Debug, Clone)]
pub struct SharingStateWriter {
    gate: GateClient,
}

impl SharingStateWriter {
    pub fn new(gate: GateClient) -> Self {
        Self { gate }
    }

    /// Record a successful share: `Success`, the assigned BPN, and a fresh
    /// process-start stamp.
    ///
    /// `index` is the Pool's echo of the external id; a missing echo makes
    /// the outcome unattributable and the write is skipped with a warning.
    pub async fn report_success(
        &self,
        lsa_type: PartnerType,
        index: Option<&str>,
        bpn: &str,
    ) -> BridgeResult<Option<SkippedItem>> {
        let Some(external_id) = index else {
            warn!(%bpn, %lsa_type, "Pool response entity has no index, can't update the Gate sharing state");
            return Ok(Some(SkippedItem::new(bpn, SkipReason::MissingIndex)));
        };
        let state = success_state(lsa_type, external_id, bpn, Utc::now());
        self.gate.upsert_sharing_state(&state).await?;
        Ok(None)
    }

    /// Record a Pool-reported error.
    ///
    /// Create-originated errors ([`ErrorCorrelation::ByExternalId`]) stamp
    /// `sharingProcessStarted = now`: this was the first attempt for the
    /// record.  Update-originated errors ([`ErrorCorrelation::ByBpn`]) leave
    /// it unset: the record was already sharing successfully before, so no
    /// new process start is recorded.
    ///
    /// A BPN that cannot be mapped back to an external id makes the error
    /// unattributable; the write is skipped with a warning.
    pub async fn report_error(
        &self,
        lsa_type: PartnerType,
        correlation: ErrorCorrelation,
        error: &ErrorInfo,
        external_id_by_bpn: &HashMap<String, String>,
    ) -> BridgeResult<Option<SkippedItem>> {
        let Some(external_id) = correlation.resolve(external_id_by_bpn) else {
            warn!(
                entity_key = %error.entity_key,
                error_code = %error.error_code,
                %lsa_type,
                "Couldn't determine externalId for pool error, can't update the Gate sharing state"
            );
            return Ok(Some(SkippedItem::new(
                error.entity_key.clone(),
                SkipReason::CorrelationMiss,
            )));
        };

        let process_started = match correlation {
            ErrorCorrelation::ByExternalId(_) => Some(Utc::now()),
            ErrorCorrelation::ByBpn(_) => None,
        };
        let state = error_state(lsa_type, &external_id, error, process_started);
        self.gate.upsert_sharing_state(&state).await?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pool_error(entity_key: &str) -> ErrorInfo {
        ErrorInfo {
            error_code: "AddressDuplicateIdentifier".to_string(),
            message: "duplicate identifier".to_string(),
            entity_key: entity_key.to_string(),
        }
    }

    #[test]
    fn test_success_state_fields() {
        let now = Utc::now();
        let state = success_state(PartnerType::LegalEntity, "le-1", "BPNL000000000001", now);
        assert_eq!(state.sharing_state_type, SharingStateType::Success);
        assert_eq!(state.bpn.as_deref(), Some("BPNL000000000001"));
        assert_eq!(state.sharing_process_started, Some(now));
        assert!(state.sharing_error_code.is_none());
    }

    #[test]
    fn test_error_state_flattens_pool_code_into_message() {
        let state = error_state(PartnerType::Address, "addr-1", &pool_error("addr-1"), None);
        assert_eq!(state.sharing_state_type, SharingStateType::Error);
        assert_eq!(
            state.sharing_error_code,
            Some(BusinessPartnerSharingError::SharingProcessError)
        );
        assert_eq!(
            state.sharing_error_message.as_deref(),
            Some("duplicate identifier (AddressDuplicateIdentifier)")
        );
        assert!(state.bpn.is_none());
        assert!(state.sharing_process_started.is_none());
    }

    #[test]
    fn test_state_building_is_deterministic() {
        let now = Utc::now();
        let first = success_state(PartnerType::Site, "s-1", "BPNS000000000001", now);
        let second = success_state(PartnerType::Site, "s-1", "BPNS000000000001", now);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_replayed_success_upserts_the_same_row() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/sharing-states"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let gate = GateClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let writer = SharingStateWriter::new(gate);
        for _ in 0..2 {
            let skip = writer
                .report_success(PartnerType::Site, Some("site-1"), "BPNS000000000001")
                .await
                .unwrap();
            assert!(skip.is_none());
        }

        // Both writes target the same (externalId, lsaType) key with the same
        // outcome, so the Gate ends up with one row holding the latest values.
        let bodies: Vec<serde_json::Value> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect();
        assert_eq!(bodies.len(), 2);
        for key in ["externalId", "lsaType", "sharingStateType", "bpn"] {
            assert_eq!(bodies[0][key], bodies[1][key], "replay diverged on {key}");
        }
    }

    #[test]
    fn test_correlation_by_external_id_needs_no_lookup() {
        let correlation = ErrorCorrelation::ByExternalId("le-1".to_string());
        assert_eq!(
            correlation.resolve(&HashMap::new()),
            Some("le-1".to_string())
        );
    }

    #[test]
    fn test_correlation_by_bpn_resolves_through_lookup() {
        let lookup: HashMap<String, String> =
            [("BPNL000000000001".to_string(), "le-1".to_string())].into();

        let hit = ErrorCorrelation::ByBpn("BPNL000000000001".to_string());
        assert_eq!(hit.resolve(&lookup), Some("le-1".to_string()));

        let miss = ErrorCorrelation::ByBpn("BPNL000000000099".to_string());
        assert_eq!(miss.resolve(&lookup), None);
    }
}
