//! HTTP client for the Pool's batch endpoints (reqwest-based).

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::{PoolClientError, PoolClientResult};
use crate::model::{
    AddressPartnerCreateRequest, AddressPartnerCreateResponse, AddressPartnerUpdateRequest,
    AddressPartnerUpdateResponse, LegalEntityPartnerCreateRequest,
    LegalEntityPartnerCreateResponse, LegalEntityPartnerUpdateRequest,
    LegalEntityPartnerUpdateResponse, PartnerBatchResponse, SitePartnerCreateRequest,
    SitePartnerCreateResponse, SitePartnerUpdateRequest, SitePartnerUpdateResponse,
};

/// Client for the Pool's per-type batch create/update endpoints.
#[derive(Debug, Clone)]
pub struct PoolClient {
    /// Base URL of the Pool (e.g. "https://pool.example.com/api").
    base_url: String,
    /// Underlying HTTP client.
    http_client: Client,
}

impl PoolClient {
    /// Create a new Pool client with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> PoolClientResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent("bpdm-bridge/0.1")
            .build()
            .map_err(|e| {
                PoolClientError::InvalidConfig(format!("failed to build HTTP client: {e}"))
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

    // ── Legal entities ────────────────────────────────────────────────

    /// Create legal entities in batch (POST /legal-entities).
    pub async fn create_legal_entities(
        &self,
        requests: &[LegalEntityPartnerCreateRequest],
    ) -> PoolClientResult<PartnerBatchResponse<LegalEntityPartnerCreateResponse>> {
        let url = format!("{}/legal-entities", self.base_url);
        self.post(&url, requests).await
    }

    /// Update legal entities in batch (PUT /legal-entities).
    pub async fn update_legal_entities(
        &self,
        requests: &[LegalEntityPartnerUpdateRequest],
    ) -> PoolClientResult<PartnerBatchResponse<LegalEntityPartnerUpdateResponse>> {
        let url = format!("{}/legal-entities", self.base_url);
        self.put(&url, requests).await
    }

    // ── Sites ─────────────────────────────────────────────────────────

    /// Create sites in batch (POST /sites).
    pub async fn create_sites(
        &self,
        requests: &[SitePartnerCreateRequest],
    ) -> PoolClientResult<PartnerBatchResponse<SitePartnerCreateResponse>> {
        let url = format!("{}/sites", self.base_url);
        self.post(&url, requests).await
    }

    /// Update sites in batch (PUT /sites).
    pub async fn update_sites(
        &self,
        requests: &[SitePartnerUpdateRequest],
    ) -> PoolClientResult<PartnerBatchResponse<SitePartnerUpdateResponse>> {
        let url = format!("{}/sites", self.base_url);
        self.put(&url, requests).await
    }

    // ── Addresses ─────────────────────────────────────────────────────

    /// Create addresses in batch (POST /addresses).
    pub async fn create_addresses(
        &self,
        requests: &[AddressPartnerCreateRequest],
    ) -> PoolClientResult<PartnerBatchResponse<AddressPartnerCreateResponse>> {
        let url = format!("{}/addresses", self.base_url);
        self.post(&url, requests).await
    }

    /// Update addresses in batch (PUT /addresses).
    pub async fn update_addresses(
        &self,
        requests: &[AddressPartnerUpdateRequest],
    ) -> PoolClientResult<PartnerBatchResponse<AddressPartnerUpdateResponse>> {
        let url = format!("{}/addresses", self.base_url);
        self.put(&url, requests).await
    }

    // ── Internal ──────────────────────────────────────────────────────

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> PoolClientResult<T> {
        debug!("Pool POST {url}");
        let response = self.http_client.post(url).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> PoolClientResult<T> {
        debug!("Pool PUT {url}");
        let response = self.http_client.put(url).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> PoolClientResult<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| PoolClientError::Parse(format!("invalid response body: {e}")))
        } else {
            let detail = response.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(PoolClientError::Api {
                status: status.as_u16(),
                detail,
            })
        }
    }
}
