//! Request dispatch: rate limiting, retry with backoff, classification
//!
//! One `send` walks the full attempt loop: acquire a rate-limit slot, run
//! the transport, and either classify the obtained response or back off and
//! retry. Only transport-level failures are retried - an HTTP response of
//! any status means the upstream processed the request, and repeating it
//! would repeat the same rejection while burning rate-limit budget.

use std::sync::Arc;

use backoff::backoff::Backoff;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::Result;
use crate::http::classify::{classify, Outcome};
use crate::http::rate_limit::RateLimiter;
use crate::http::retry::RetryPolicy;
use crate::http::transport::{RequestSpec, Transport};

/// Dispatches requests through the shared rate limiter and retry loop.
///
/// Holds no per-call state; concurrent `send`s only share the limiter clock.
pub struct Dispatcher {
    limiter: Arc<RateLimiter>,
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl Dispatcher {
    /// Create a dispatcher. An empty attempt budget is rejected here,
    /// before any rate-limit slot could be acquired.
    pub fn new(
        limiter: Arc<RateLimiter>,
        transport: Arc<dyn Transport>,
        policy: RetryPolicy,
    ) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            limiter,
            transport,
            policy,
        })
    }

    /// Send one request and return its classified outcome.
    ///
    /// Every attempt, retries included, pays the rate-limit cost first.
    pub async fn send(&self, spec: &RequestSpec) -> Outcome {
        let mut backoff = self.policy.create_backoff();
        let mut last_failure = String::new();

        for attempt in 0..self.policy.max_attempts {
            self.limiter.acquire().await;

            log::debug!(
                "{} {} (attempt {}/{})",
                spec.method,
                spec.path,
                attempt + 1,
                self.policy.max_attempts
            );

            match self.transport.execute(spec).await {
                Ok(response) => {
                    // Any HTTP response ends the loop; semantic rejections
                    // are never retried
                    return classify(response.status, &response.body);
                }
                Err(failure) => {
                    last_failure = failure.to_string();
                    if attempt + 1 == self.policy.max_attempts {
                        break;
                    }
                    let delay = backoff
                        .next_backoff()
                        .unwrap_or(Duration::from_secs(self.policy.max_delay_secs));
                    log::warn!(
                        "{} {} transport failure (attempt {}/{}), retrying in {:?}: {}",
                        spec.method,
                        spec.path,
                        attempt + 1,
                        self.policy.max_attempts,
                        delay,
                        last_failure
                    );
                    sleep(delay).await;
                }
            }
        }

        log::error!(
            "{} {} failed after {} attempts: {}",
            spec.method,
            spec.path,
            self.policy.max_attempts,
            last_failure
        );
        Outcome::Transport {
            attempts: self.policy.max_attempts,
            message: last_failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::http::transport::{RawResponse, TransportFailure};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Transport that plays back a scripted sequence of attempt results
    struct ScriptedTransport {
        script: Mutex<Vec<std::result::Result<RawResponse, TransportFailure>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<std::result::Result<RawResponse, TransportFailure>>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(
            &self,
            _spec: &RequestSpec,
        ) -> std::result::Result<RawResponse, TransportFailure> {
            *self.calls.lock().unwrap() += 1;
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Err(TransportFailure::new("connection refused"))
            } else {
                script.remove(0)
            }
        }
    }

    fn ok_response(body: &str) -> std::result::Result<RawResponse, TransportFailure> {
        Ok(RawResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn dispatcher(transport: Arc<ScriptedTransport>) -> Dispatcher {
        Dispatcher::new(
            Arc::new(RateLimiter::new(10).unwrap()),
            transport,
            RetryPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_attempt_budget_rejected_at_construction() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let result = Dispatcher::new(
            Arc::new(RateLimiter::new(10).unwrap()),
            transport,
            RetryPolicy::new(0),
        );
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok_response(
            r#"{"code":0,"data":{"x":1}}"#,
        )]));
        let dispatcher = dispatcher(Arc::clone(&transport));

        let outcome = dispatcher.send(&RequestSpec::get("/campaign/getList")).await;
        assert!(matches!(outcome, Outcome::Success { .. }));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failures_are_retried_with_backoff() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(TransportFailure::new("timeout")),
            Err(TransportFailure::new("timeout")),
            ok_response(r#"{"code":0,"data":{"x":1}}"#),
        ]));
        let dispatcher = dispatcher(Arc::clone(&transport));

        let start = Instant::now();
        let outcome = dispatcher.send(&RequestSpec::get("/campaign/getList")).await;

        assert!(matches!(outcome, Outcome::Success { .. }));
        assert_eq!(transport.calls(), 3);

        // backoff sleeps of 1s then 2s dominate the elapsed paused time
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3));
        assert!(elapsed < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_yields_transport_outcome() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let dispatcher = dispatcher(Arc::clone(&transport));

        let outcome = dispatcher.send(&RequestSpec::get("/campaign/getList")).await;
        match outcome {
            Outcome::Transport { attempts, message } => {
                assert_eq!(attempts, 3);
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected Transport outcome, got {:?}", other),
        }
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_error_response_is_never_retried() {
        // a 500 is an obtained response: classified and returned immediately
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(RawResponse {
            status: 500,
            body: r#"{"message":"internal"}"#.to_string(),
        })]));
        let dispatcher = dispatcher(Arc::clone(&transport));

        let outcome = dispatcher.send(&RequestSpec::get("/campaign/getList")).await;
        match outcome {
            Outcome::Api { code, message, .. } => {
                assert_eq!(code, 500);
                assert_eq!(message, "internal");
            }
            other => panic!("expected Api outcome, got {:?}", other),
        }
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_level_error_is_never_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok_response(
            r#"{"code":5,"errMsg":"quota exceeded"}"#,
        )]));
        let dispatcher = dispatcher(Arc::clone(&transport));

        let outcome = dispatcher.send(&RequestSpec::get("/campaign/getList")).await;
        assert!(matches!(outcome, Outcome::Api { code: 5, .. }));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_attempt_pays_the_rate_limit() {
        // 1 call/sec limiter: 3 attempts must be spaced a second apart on
        // top of the backoff sleeps
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let dispatcher = Dispatcher::new(
            Arc::new(RateLimiter::new(1).unwrap()),
            Arc::clone(&transport) as Arc<dyn Transport>,
            RetryPolicy::default(),
        )
        .unwrap();

        let start = Instant::now();
        dispatcher.send(&RequestSpec::get("/campaign/getList")).await;

        // attempt 1 at t=0, backoff 1s, attempt 2 at t=1 (interval already
        // paid by the backoff), backoff 2s, attempt 3 at t=3
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert_eq!(transport.calls(), 3);
    }
}
