//! Request-dispatch core
//!
//! This module is where the hard part lives:
//! - rate-limited call timing ([`rate_limit`])
//! - retry with exponential backoff for transport failures ([`retry`], [`dispatch`])
//! - classification of the upstream's inconsistently shaped responses ([`classify`])
//! - the transport seam the dispatcher runs attempts through ([`transport`])

pub mod classify;
pub mod dispatch;
pub mod rate_limit;
pub mod retry;
pub mod transport;

pub use classify::{classify, Outcome};
pub use dispatch::Dispatcher;
pub use rate_limit::RateLimiter;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, QueryValue, RawResponse, RequestSpec, Transport, TransportFailure};

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
