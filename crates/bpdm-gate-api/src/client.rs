//! HTTP client for the Gate API (reqwest-based).

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use bpdm_common::PartnerType;

use crate::error::{GateClientError, GateClientResult};
use crate::model::{
    AddressGateInputDto, ChangelogEntryDto, LegalEntityGateInputDto, PageDto, PageStartAfterDto,
    SharingStateDto, SiteGateInputDto,
};

/// Client for the Gate's changelog, entity-input, and sharing-state endpoints.
#[derive(Debug, Clone)]
pub struct GateClient {
    /// Base URL of the Gate (e.g. "https://gate.example.com/api").
    base_url: String,
    /// Underlying HTTP client.
    http_client: Client,
}

impl GateClient {
    /// Create a new Gate client with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GateClientResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent("bpdm-bridge/0.1")
            .build()
            .map_err(|e| {
                GateClientError::InvalidConfig(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self::with_http_client(base_url, http_client))
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(base_url: impl Into<String>, http_client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Changelog ─────────────────────────────────────────────────────

    /// Fetch one page of changelog entries, optionally filtered to changes
    /// after `from_time` (GET /changelog).
    pub async fn get_changelog_entries(
        &self,
        from_time: Option<DateTime<Utc>>,
        page: u32,
        size: u32,
    ) -> GateClientResult<PageDto<ChangelogEntryDto>> {
        let url = format!("{}/changelog", self.base_url);
        let mut params: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("size", size.to_string()),
        ];
        if let Some(from) = from_time {
            params.push(("fromTime", from.to_rfc3339_opts(SecondsFormat::Micros, true)));
        }
        self.get(&url, &params).await
    }

    // ── Entity input records ──────────────────────────────────────────

    /// Fetch one page of legal-entity input records by external id
    /// (GET /legal-entities).
    pub async fn get_legal_entities_by_external_ids(
        &self,
        external_ids: &[String],
        start_after: Option<&str>,
        size: u32,
    ) -> GateClientResult<PageStartAfterDto<LegalEntityGateInputDto>> {
        let url = format!("{}/legal-entities", self.base_url);
        self.get(&url, &cursor_params(external_ids, start_after, size))
            .await
    }

    /// Fetch one page of site input records by external id (GET /sites).
    pub async fn get_sites_by_external_ids(
        &self,
        external_ids: &[String],
        start_after: Option<&str>,
        size: u32,
    ) -> GateClientResult<PageStartAfterDto<SiteGateInputDto>> {
        let url = format!("{}/sites", self.base_url);
        self.get(&url, &cursor_params(external_ids, start_after, size))
            .await
    }

    /// Fetch one page of address input records by external id
    /// (GET /addresses).
    pub async fn get_addresses_by_external_ids(
        &self,
        external_ids: &[String],
        start_after: Option<&str>,
        size: u32,
    ) -> GateClientResult<PageStartAfterDto<AddressGateInputDto>> {
        let url = format!("{}/addresses", self.base_url);
        self.get(&url, &cursor_params(external_ids, start_after, size))
            .await
    }

    // ── Sharing states ────────────────────────────────────────────────

    /// Fetch one page of sharing states for the given type and external ids
    /// (GET /sharing-states).
    pub async fn get_sharing_states(
        &self,
        lsa_type: PartnerType,
        external_ids: &[String],
        page: u32,
        size: u32,
    ) -> GateClientResult<PageDto<SharingStateDto>> {
        let url = format!("{}/sharing-states", self.base_url);
        let mut params: Vec<(&str, String)> = vec![
            ("lsaType", lsa_type.to_string()),
            ("page", page.to_string()),
            ("size", size.to_string()),
        ];
        for id in external_ids {
            params.push(("externalIds", id.clone()));
        }
        self.get(&url, &params).await
    }

    /// Upsert a sharing state by `(externalId, lsaType)` (PUT /sharing-states).
    pub async fn upsert_sharing_state(&self, state: &SharingStateDto) -> GateClientResult<()> {
        let url = format!("{}/sharing-states", self.base_url);
        debug!(
            external_id = %state.external_id,
            lsa_type = %state.lsa_type,
            "Gate PUT {url}"
        );
        let response = self.http_client.put(&url).json(state).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let detail = response.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(GateClientError::Api {
                status: status.as_u16(),
                detail,
            })
        }
    }

    // ── Internal ──────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> GateClientResult<T> {
        debug!("Gate GET {url}");
        let response = self.http_client.get(url).query(params).send().await?;
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| GateClientError::Parse(format!("invalid response body: {e}")))
        } else {
            let detail = response.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(GateClientError::Api {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

/// Query parameters for the cursor-paginated entity endpoints.
fn cursor_params(
    external_ids: &[String],
    start_after: Option<&str>,
    size: u32,
) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = vec![("size", size.to_string())];
    if let Some(cursor) = start_after {
        params.push(("startAfter", cursor.to_string()));
    }
    for id in external_ids {
        params.push(("externalIds", id.clone()));
    }
    params
}
