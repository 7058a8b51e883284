//! High-level client for the NewsBreak Business API
//!
//! Thin operation methods over one shared dispatch path: each builds a
//! request spec, sends it through the rate-limited retry loop, and
//! deserializes the classified success payload into a typed model. A
//! payload that does not match its expected shape surfaces as
//! [`Error::Schema`] with the raw body attached.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::dispatch::Dispatcher;
use crate::http::rate_limit::{RateLimiter, DEFAULT_CALLS_PER_SECOND};
use crate::http::retry::RetryPolicy;
use crate::http::transport::{HttpTransport, RequestSpec};
use crate::report::ReportQuery;
use crate::types::{
    Ad, AdAccountGroups, AdSet, Campaign, Event, EventList, Organization, Page, ReportData,
};

/// Production API root
pub const BASE_URL: &str = "https://business.newsbreak.com/business-api/v1";

/// Default per-request transport timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`NewsBreakClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Already-valid bearer credential sent as the `Access-Token` header
    pub access_token: String,
    /// API root; overridable for testing
    pub base_url: String,
    /// Upstream rate cap
    pub calls_per_second: u32,
    /// Per-request transport timeout
    pub timeout_secs: u64,
    /// Retry behavior for transport failures
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Configuration with production defaults for the given credential
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: BASE_URL.to_string(),
            calls_per_second: DEFAULT_CALLS_PER_SECOND,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the rate cap
    pub fn with_calls_per_second(mut self, calls_per_second: u32) -> Self {
        self.calls_per_second = calls_per_second;
        self
    }

    /// Override the transport timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Parameters for [`NewsBreakClient::get_campaigns`]
#[derive(Debug, Clone)]
pub struct CampaignListQuery {
    pub ad_account_id: String,
    /// 1-indexed
    pub page_no: u32,
    /// 5, 10, 20, 50, 100, 200 or 500
    pub page_size: u32,
    pub search: Option<String>,
    /// WARNING, INACTIVE, ACTIVE or DELETED
    pub online_status: Option<String>,
}

impl CampaignListQuery {
    pub fn new(ad_account_id: impl Into<String>) -> Self {
        Self {
            ad_account_id: ad_account_id.into(),
            page_no: 1,
            page_size: 50,
            search: None,
            online_status: None,
        }
    }
}

/// Parameters for [`NewsBreakClient::get_ad_sets`]
#[derive(Debug, Clone)]
pub struct AdSetListQuery {
    pub campaign_id: String,
    pub page_no: u32,
    pub page_size: u32,
}

impl AdSetListQuery {
    pub fn new(campaign_id: impl Into<String>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            page_no: 1,
            page_size: 50,
        }
    }
}

/// Parameters for [`NewsBreakClient::get_ads`]
#[derive(Debug, Clone)]
pub struct AdListQuery {
    pub ad_account_id: String,
    pub page_no: u32,
    pub page_size: u32,
    pub search: Option<String>,
    /// WARNING, INACTIVE, ACTIVE, DELETED, PENDING or REJECTED
    pub online_status: Option<String>,
    pub campaign_ids: Vec<String>,
    pub ad_set_ids: Vec<String>,
}

impl AdListQuery {
    pub fn new(ad_account_id: impl Into<String>) -> Self {
        Self {
            ad_account_id: ad_account_id.into(),
            page_no: 1,
            page_size: 50,
            search: None,
            online_status: None,
            campaign_ids: Vec::new(),
            ad_set_ids: Vec::new(),
        }
    }
}

/// Client for the NewsBreak Business API
pub struct NewsBreakClient {
    dispatcher: Dispatcher,
}

impl NewsBreakClient {
    /// Build a client, validating all configuration up front
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.access_token.trim().is_empty() {
            return Err(Error::configuration(
                "access token required; supply the NewsBreak Business API credential",
            ));
        }

        let limiter = Arc::new(RateLimiter::new(config.calls_per_second)?);
        let transport = Arc::new(HttpTransport::new(
            &config.base_url,
            &config.access_token,
            config.timeout_secs,
        )?);
        let dispatcher = Dispatcher::new(limiter, transport, config.retry)?;

        Ok(Self { dispatcher })
    }

    /// List ad accounts grouped by organization
    pub async fn get_ad_accounts(&self, org_ids: &[String]) -> Result<Vec<Organization>> {
        let spec = RequestSpec::get("/ad-account/getGroupsByOrgIds")
            .with_query_list("orgIds", org_ids.to_vec());
        let groups: AdAccountGroups = self.call(spec).await?;
        Ok(groups.list)
    }

    /// Paginated campaign listing for an ad account
    pub async fn get_campaigns(&self, query: &CampaignListQuery) -> Result<Page<Campaign>> {
        let mut spec = RequestSpec::get("/campaign/getList")
            .with_query("adAccountId", query.ad_account_id.as_str())
            .with_query("pageNo", query.page_no.to_string())
            .with_query("pageSize", query.page_size.to_string());
        if let Some(search) = &query.search {
            spec = spec.with_query("search", search.as_str());
        }
        if let Some(status) = &query.online_status {
            spec = spec.with_query("onlineStatus", status.as_str());
        }
        self.call(spec).await
    }

    /// Tracking events for an ad account, optionally filtered by OS
    /// (IOS, ANDROID, or the empty string for web)
    pub async fn get_events(&self, ad_account_id: &str, os: Option<&str>) -> Result<Vec<Event>> {
        let mut spec = RequestSpec::get(format!("/event/getList/{}", ad_account_id));
        if let Some(os) = os {
            spec = spec.with_query("os", os);
        }
        let events: EventList = self.call(spec).await?;
        Ok(events.list)
    }

    /// Run a synchronous performance report
    pub async fn run_report(&self, query: &ReportQuery) -> Result<ReportData> {
        let request = query.to_request()?;
        let spec = RequestSpec::post(
            "/reports/getIntegratedReport",
            serde_json::to_value(&request)?,
        );
        self.call(spec).await
    }

    /// Paginated ad-set listing for a campaign
    pub async fn get_ad_sets(&self, query: &AdSetListQuery) -> Result<Page<AdSet>> {
        let spec = RequestSpec::get("/ad-set/getList")
            .with_query("campaignId", query.campaign_id.as_str())
            .with_query("pageNo", query.page_no.to_string())
            .with_query("pageSize", query.page_size.to_string());
        self.call(spec).await
    }

    /// Paginated ad listing with creative detail
    pub async fn get_ads(&self, query: &AdListQuery) -> Result<Page<Ad>> {
        let mut spec = RequestSpec::get("/ad/getList")
            .with_query("adAccountId", query.ad_account_id.as_str())
            .with_query("pageNo", query.page_no.to_string())
            .with_query("pageSize", query.page_size.to_string());
        if let Some(search) = &query.search {
            spec = spec.with_query("search", search.as_str());
        }
        if let Some(status) = &query.online_status {
            spec = spec.with_query("onlineStatus", status.as_str());
        }
        if !query.campaign_ids.is_empty() {
            spec = spec.with_query_list("campaignIds", query.campaign_ids.clone());
        }
        if !query.ad_set_ids.is_empty() {
            spec = spec.with_query_list("adSetIds", query.ad_set_ids.clone());
        }
        self.call(spec).await
    }

    /// Dispatch one request and deserialize its `data` payload
    async fn call<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        let payload = self.dispatcher.send(&spec).await.into_result()?;
        extract_data(payload)
    }
}

/// Pull `data` out of a success envelope into the expected typed model,
/// keeping the whole payload on mismatch
fn extract_data<T: DeserializeOwned>(payload: Value) -> Result<T> {
    let data = payload.get("data").cloned().unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(|e| Error::Schema {
        message: format!("unexpected response shape: {}", e),
        raw: payload,
    })
}
