//! NewsBreak Core - client library for the NewsBreak Business API
//!
//! This crate provides rate-limited, retrying access to the NewsBreak
//! Business advertising API on behalf of higher-level tooling (reporting
//! tools, summary helpers). It deliberately excludes the outer surfaces -
//! CLI parsing, environment loading, tool-protocol registration - which
//! call into this crate and receive typed results or classified errors.
//!
//! # Main Components
//!
//! - **Error Handling**: one taxonomy callers can match on - configuration,
//!   API rejection, transport exhaustion, schema drift
//! - **Request Dispatch**: rate limiter + exponential-backoff retry loop +
//!   response classification ([`http`])
//! - **Report Normalization**: caller-friendly dimension/metric aliases
//!   mapped onto the API's canonical tokens ([`report`])
//! - **Typed Models**: serde models for every endpoint payload ([`types`])
//!
//! # Example
//!
//! ```no_run
//! use newsbreak_core::{ClientConfig, NewsBreakClient, ReportQuery, Result};
//!
//! async fn example() -> Result<()> {
//!     let client = NewsBreakClient::new(ClientConfig::new("access-token"))?;
//!     let report = client
//!         .run_report(&ReportQuery {
//!             ad_account_id: "1042".to_string(),
//!             date_from: "2024-01-01".to_string(),
//!             date_to: "2024-01-31".to_string(),
//!             dimensions: vec!["campaign_id".to_string()],
//!             metrics: vec!["spend".to_string(), "clicks".to_string()],
//!         })
//!         .await?;
//!     println!("{} rows", report.rows.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod report;
pub mod types;

// Re-export main types for convenience
pub use client::{
    AdListQuery, AdSetListQuery, CampaignListQuery, ClientConfig, NewsBreakClient, BASE_URL,
};
pub use error::{Error, Result};
pub use http::{Dispatcher, Outcome, RateLimiter, RequestSpec, RetryPolicy, Transport};
pub use report::{normalize_dimensions, normalize_metrics, ReportQuery, ReportRequest};
pub use types::{
    Ad, AdAccount, AdSet, Campaign, Event, Organization, Page, ReportData, ReportRow,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
