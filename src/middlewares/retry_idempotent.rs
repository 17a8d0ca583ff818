use crate::common::IDEMPOTENCY_KEY_HEADER;
use async_trait::async_trait;
use reqwest::{Method, Request, Response};
use reqwest_middleware::{Middleware, Next};
use reqwest_retry::RetryTransientMiddleware;
use retry_policies::{RetryDecision, RetryPolicy};
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};
use task_local_extensions::Extensions;

/// Retries transient database failures for requests that can be replayed safely.
///
/// Reads are always replayed. Writes (`POST`, `PATCH`) are replayed only when they carry a
/// non-empty `Idempotency-Key`, which `Table::update` sets because it writes absolute values.
/// Inserts never carry it, so a timed out insert cannot create a second row. Conditional
/// updates never carry it either: a replayed compare-and-set would find its own write, report
/// a conflict and make the caller move the balance a second time.
pub struct RetryIdempotentMiddleware {
    inner: RetryTransientMiddleware<DynRetryPolicy>,
}

impl RetryIdempotentMiddleware {
    pub fn new(retry_policy: DynRetryPolicy) -> Self {
        Self {
            inner: RetryTransientMiddleware::new_with_policy(retry_policy),
        }
    }
}

#[async_trait]
impl Middleware for RetryIdempotentMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        if may_be_replayed(&req) {
            self.inner.handle(req, extensions, next).await
        } else {
            next.run(req, extensions).await
        }
    }
}

fn may_be_replayed(req: &Request) -> bool {
    match *req.method() {
        Method::GET | Method::HEAD => true,
        Method::POST | Method::PATCH => req
            .headers()
            .get(IDEMPOTENCY_KEY_HEADER)
            .map_or(false, |v| !v.is_empty()),
        _ => false,
    }
}

/// Wrapper type around a retry policy because `dyn RetryPolicy` does not implement `RetryPolicy`.
#[derive(Clone)]
pub struct DynRetryPolicy(pub Arc<dyn RetryPolicy + Send + Sync + 'static>);

impl RetryPolicy for DynRetryPolicy {
    fn should_retry(&self, n_past_retries: u32) -> RetryDecision {
        self.0.should_retry(n_past_retries)
    }
}

impl Debug for DynRetryPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynRetryPolicy").finish_non_exhaustive()
    }
}
