//! Typed models for NewsBreak Business API responses
//!
//! Field names follow the upstream's camelCase wire format via serde
//! renames. Most fields beyond identifiers are optional: the upstream
//! omits them freely depending on account type and endpoint version.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of a paginated listing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    pub page_no: u32,
    pub page_size: u32,
    pub total: u64,
    pub has_next: bool,
}

/// A billable container for campaigns, grouped under an organization
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdAccount {
    pub id: String,
    pub name: String,
    pub create_time: i64,
}

/// Top-level tenant grouping one or more ad accounts
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ad_accounts: Vec<AdAccount>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub org_id: String,
    pub ad_account_id: String,
    pub objective: Option<String>,
    pub budget: Option<f64>,
    pub status: Option<String>,
    /// WARNING, INACTIVE, ACTIVE or DELETED
    pub online_status: Option<String>,
    pub create_time: Option<i64>,
    pub update_time: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSet {
    pub id: String,
    pub name: String,
    pub campaign_id: String,
    pub status: Option<String>,
    pub budget: Option<f64>,
    pub create_time: Option<i64>,
    pub update_time: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: String,
    pub name: String,
    pub ad_set_id: String,
    pub status: Option<String>,
    pub creative_type: Option<String>,
    pub create_time: Option<i64>,
    pub update_time: Option<i64>,
}

/// Conversion-tracking event (pixel or postback)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub org_id: String,
    /// PIXEL or POSTBACK
    #[serde(rename = "type")]
    pub kind: String,
    pub event_type: Option<String>,
    pub url: Option<String>,
    pub os: Option<String>,
    pub app_event: Option<bool>,
    pub mobile_partner: Option<String>,
    pub click_tracking_url: Option<String>,
    pub impression_tracking_url: Option<String>,
    pub event_params: Option<Value>,
    pub version: Option<i64>,
    pub create_time: Option<i64>,
    pub update_time: Option<i64>,
}

/// Unpaginated event listing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventList {
    #[serde(default)]
    pub list: Vec<Event>,
}

/// Ad account groups keyed by organization
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdAccountGroups {
    #[serde(default)]
    pub list: Vec<Organization>,
}

/// One report row. Dimension and metric fields are present only when
/// requested; anything the upstream adds beyond the known set lands in
/// `extra`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    // dimensions
    pub date: Option<String>,
    pub hour: Option<String>,
    pub ad_account_id: Option<String>,
    pub ad_account: Option<String>,
    pub org_id: Option<String>,
    pub organization: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign: Option<String>,
    pub ad_set_id: Option<String>,
    pub ad_set: Option<String>,
    pub ad_id: Option<String>,
    pub ad: Option<String>,

    // metrics
    pub cost: Option<f64>,
    pub impression: Option<i64>,
    pub click: Option<i64>,
    pub conversion: Option<i64>,
    pub value: Option<f64>,
    pub cpm: Option<f64>,
    pub cpc: Option<f64>,
    pub cpa: Option<f64>,
    pub ctr: Option<f64>,
    pub cvr: Option<f64>,
    pub vpa: Option<f64>,
    pub roas: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Synchronous report payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportData {
    #[serde(default)]
    pub rows: Vec<ReportRow>,
    pub total: Option<u64>,
}
