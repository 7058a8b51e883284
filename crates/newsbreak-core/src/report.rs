//! Report parameter normalization and request body construction
//!
//! The reporting endpoint accepts a rigid vocabulary of uppercase dimension
//! and metric tokens. Callers get to use the human-friendly aliases the
//! rest of the tooling uses (`campaign_id`, `spend`, `impressions`), which
//! are mapped here onto the canonical tokens. Unknown tokens are uppercased
//! and passed through so vocabulary the upstream adds later keeps working
//! without a release.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};

/// Dimensions applied when the caller supplies none
pub const DEFAULT_DIMENSIONS: [&str; 2] = ["DATE", "CAMPAIGN"];

/// Metrics applied when the caller supplies none
pub const DEFAULT_METRICS: [&str; 5] = ["COST", "IMPRESSION", "CLICK", "CTR", "CPC"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical token for a dimension alias. Several aliases intentionally
/// map to the same token.
fn canonical_dimension(alias: &str) -> Option<&'static str> {
    Some(match alias {
        "date" => "DATE",
        "hour" => "HOUR",
        "org" | "organization" => "ORG",
        "ad_account" | "ad_account_id" => "AD_ACCOUNT",
        "campaign" | "campaign_id" => "CAMPAIGN",
        "ad_set" | "ad_set_id" => "AD_SET",
        "ad" | "ad_id" => "AD",
        _ => return None,
    })
}

/// Canonical token for a metric alias
fn canonical_metric(alias: &str) -> Option<&'static str> {
    Some(match alias {
        "cost" | "spend" => "COST",
        "impression" | "impressions" => "IMPRESSION",
        "click" | "clicks" => "CLICK",
        "conversion" | "conversions" => "CONVERSION",
        "value" => "VALUE",
        "cpm" => "CPM",
        "cpc" => "CPC",
        "cpa" => "CPA",
        "ctr" => "CTR",
        "cvr" => "CVR",
        "vpa" => "VPA",
        _ => return None,
    })
}

fn normalize(
    tokens: &[String],
    table: fn(&str) -> Option<&'static str>,
    defaults: &[&str],
) -> Vec<String> {
    if tokens.is_empty() {
        return defaults.iter().map(|d| d.to_string()).collect();
    }

    tokens
        .iter()
        .map(|token| {
            let lower = token.to_lowercase();
            match table(&lower) {
                Some(canonical) => canonical.to_string(),
                None => token.to_uppercase(),
            }
        })
        .collect()
}

/// Map caller-supplied dimension tokens onto the API vocabulary
pub fn normalize_dimensions(dimensions: &[String]) -> Vec<String> {
    normalize(dimensions, canonical_dimension, &DEFAULT_DIMENSIONS)
}

/// Map caller-supplied metric tokens onto the API vocabulary
pub fn normalize_metrics(metrics: &[String]) -> Vec<String> {
    normalize(metrics, canonical_metric, &DEFAULT_METRICS)
}

/// Caller-facing report parameters, aliases allowed
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub ad_account_id: String,
    /// Start date, `YYYY-MM-DD`
    pub date_from: String,
    /// End date, `YYYY-MM-DD`
    pub date_to: String,
    /// Grouping axes; empty means [`DEFAULT_DIMENSIONS`]
    pub dimensions: Vec<String>,
    /// Measured quantities; empty means [`DEFAULT_METRICS`]
    pub metrics: Vec<String>,
}

/// Wire shape of the synchronous report request body
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub name: String,
    pub date_range: String,
    pub start_date: String,
    pub end_date: String,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub filter: String,
    pub filter_ids: Vec<i64>,
    pub data_source: String,
}

impl ReportQuery {
    /// Build the request body, normalizing parameters and validating the
    /// pieces the upstream rejects with opaque errors.
    pub fn to_request(&self) -> Result<ReportRequest> {
        let start = parse_date(&self.date_from, "date_from")?;
        let end = parse_date(&self.date_to, "date_to")?;
        if start > end {
            return Err(Error::configuration(format!(
                "date_from {} is after date_to {}",
                self.date_from, self.date_to
            )));
        }

        let account_id: i64 = self.ad_account_id.parse().map_err(|_| {
            Error::configuration(format!(
                "ad_account_id must be numeric, got {:?}",
                self.ad_account_id
            ))
        })?;

        Ok(ReportRequest {
            name: format!("report_{}_{}", self.date_from, self.date_to),
            date_range: "FIXED".to_string(),
            start_date: self.date_from.clone(),
            end_date: self.date_to.clone(),
            dimensions: normalize_dimensions(&self.dimensions),
            metrics: normalize_metrics(&self.metrics),
            filter: "AD_ACCOUNT".to_string(),
            filter_ids: vec![account_id],
            data_source: "HOURLY".to_string(),
        })
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        Error::configuration(format!("{} must be YYYY-MM-DD, got {:?}", field, value))
    })
}
