//! The lookup engine.
//!
//! Orders cache, registry, format retry and stale fallback for one barcode:
//!
//! 1. Reject empty or non-numeric input.
//! 2. Annotate with checksum validity (never gates the lookup).
//! 3. Build the key plan: a 12-digit code is tried zero-padded first, with
//!    the original as the single alternate.
//! 4. Per key: a fresh cache record answers; a stale one is kept as the
//!    fallback and a refresh is attempted.
//! 5. Registry: a classified answer is cached and returned, an unusable one
//!    falls back to the stale record or fails the lookup.
//!
//! A positive answer ends the plan. A negative answer from the cache or the
//! registry moves on to the alternate key when there is one.

mod observer;
mod plan;
mod response;

use std::sync::Arc;
use std::time::{Duration, Instant};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub use observer::{LookupEvent, LookupObserver, StorageOp, TracingObserver};
pub use plan::LookupPlan;
pub use response::{BarcodeResponse, FailureResponse};

use crate::cache::{BarcodeRecord, CacheStore};
use crate::checksum::is_valid_checksum;
use crate::upstream::{SchemeRegistry, UpstreamResult};
use crate::{LookupError, LookupFailure};

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ResponseSource {
    /// A fresh cache record.
    #[serde(rename = "cache")]
    Cache,
    /// A live registry response.
    #[serde(rename = "api")]
    Upstream,
    /// A stale cache record served because the refresh failed.
    #[serde(rename = "stale_cache_fallback")]
    StaleFallback,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Cache => "cache",
            ResponseSource::Upstream => "api",
            ResponseSource::StaleFallback => "stale_cache_fallback",
        }
    }
}

/// Answer to one lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupOutcome {
    /// The barcode as supplied.
    pub barcode_no: String,
    /// The key whose answer was returned.
    pub resolved_key: String,
    pub source: ResponseSource,
    pub is_part_of_scheme: bool,
    pub checksum_valid: bool,
    pub elapsed: Duration,
}

impl LookupOutcome {
    pub fn query_time_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Resolution of a single key.
#[derive(Debug, Clone)]
struct Answer {
    key: String,
    source: ResponseSource,
    is_part_of_scheme: bool,
}

impl Answer {
    fn new(key: &str, source: ResponseSource, is_part_of_scheme: bool) -> Self {
        Self { key: key.to_string(), source, is_part_of_scheme }
    }

    /// Only a definite negative (cache or registry) justifies the alternate key.
    fn warrants_alternate(&self) -> bool {
        !self.is_part_of_scheme && self.source != ResponseSource::StaleFallback
    }
}

/// Cache-first barcode lookup with registry refresh and stale fallback.
#[derive(Clone)]
pub struct LookupEngine {
    store: Arc<dyn CacheStore>,
    registry: Arc<dyn SchemeRegistry>,
    observer: Arc<dyn LookupObserver>,
}

impl LookupEngine {
    /// Create an engine reporting through [`TracingObserver`].
    pub fn new(store: Arc<dyn CacheStore>, registry: Arc<dyn SchemeRegistry>) -> Self {
        Self { store, registry, observer: Arc::new(TracingObserver) }
    }

    /// Replace the event observer.
    pub fn with_observer(mut self, observer: Arc<dyn LookupObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The cache this engine reads and writes.
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Answer whether `barcode_no` is part of the scheme.
    ///
    /// Registry calls and cache writes race `cancel`; a cancelled lookup
    /// fails with [`LookupError::Cancelled`]. Cache writes that committed
    /// before cancellation stand.
    pub async fn lookup(&self, barcode_no: &str, cancel: &CancellationToken) -> Result<LookupOutcome, LookupFailure> {
        let start = Instant::now();
        let checksum_valid = is_valid_checksum(barcode_no);
        let failure = |error| LookupFailure {
            error,
            barcode_no: barcode_no.to_string(),
            checksum_valid,
            elapsed: start.elapsed(),
        };

        if let Err(error) = plan::validate(barcode_no) {
            let failure = failure(error);
            self.observer.on_event(&LookupEvent::Rejected(&failure));
            return Err(failure);
        }

        let plan = LookupPlan::for_barcode(barcode_no);
        match self.run_plan(&plan, cancel).await {
            Ok(answer) => {
                let outcome = LookupOutcome {
                    barcode_no: barcode_no.to_string(),
                    resolved_key: answer.key,
                    source: answer.source,
                    is_part_of_scheme: answer.is_part_of_scheme,
                    checksum_valid,
                    elapsed: start.elapsed(),
                };
                self.observer.on_event(&LookupEvent::Resolved(&outcome));
                Ok(outcome)
            }
            Err(error) => {
                let failure = failure(error);
                self.observer.on_event(&LookupEvent::Failed(&failure));
                Err(failure)
            }
        }
    }

    async fn run_plan(&self, plan: &LookupPlan, cancel: &CancellationToken) -> Result<Answer, LookupError> {
        let primary = self.resolve(&plan.primary, cancel).await?;

        let Some(alternate) = plan.alternate.as_deref() else {
            return Ok(primary);
        };
        if !primary.warrants_alternate() {
            return Ok(primary);
        }

        self.observer.on_event(&LookupEvent::FormatRetry { primary: &plan.primary, alternate });

        match self.resolve(alternate, cancel).await {
            Ok(answer) => Ok(answer),
            Err(LookupError::Cancelled) => Err(LookupError::Cancelled),
            Err(cause) => {
                self.observer.on_event(&LookupEvent::AlternateFailed { key: alternate, cause: &cause });
                Ok(primary)
            }
        }
    }

    /// Resolve one key: fresh cache, then registry, then stale fallback.
    async fn resolve(&self, key: &str, cancel: &CancellationToken) -> Result<Answer, LookupError> {
        let cached = match self.store.get(key).await {
            Ok(record) => record,
            Err(error) => {
                self.observer.on_event(&LookupEvent::StorageDegraded { key, op: StorageOp::Read, error: &error });
                None
            }
        };

        let fallback = match cached {
            Some(record) if record.is_fresh() => {
                return Ok(Answer::new(key, ResponseSource::Cache, record.is_part_of_scheme));
            }
            stale => stale,
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LookupError::Cancelled),
            result = self.registry.query(key) => result,
        };

        match result {
            UpstreamResult::Matched => {
                self.record(key, true, cancel).await?;
                Ok(Answer::new(key, ResponseSource::Upstream, true))
            }
            UpstreamResult::NotMatched => {
                self.record(key, false, cancel).await?;
                Ok(Answer::new(key, ResponseSource::Upstream, false))
            }
            UpstreamResult::Indeterminate => self.fall_back(key, fallback, LookupError::UpstreamUnparseable),
            UpstreamResult::Unavailable { reason, status } => {
                self.fall_back(key, fallback, LookupError::UpstreamUnavailable { detail: reason, status })
            }
        }
    }

    /// Persist a registry answer. A failed write is reported, not fatal.
    async fn record(&self, key: &str, is_part_of_scheme: bool, cancel: &CancellationToken) -> Result<(), LookupError> {
        let written = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LookupError::Cancelled),
            written = self.store.put(key, is_part_of_scheme) => written,
        };

        if let Err(error) = written {
            self.observer.on_event(&LookupEvent::StorageDegraded { key, op: StorageOp::Write, error: &error });
        }
        Ok(())
    }

    fn fall_back(&self, key: &str, fallback: Option<BarcodeRecord>, cause: LookupError) -> Result<Answer, LookupError> {
        match fallback {
            Some(record) => {
                self.observer.on_event(&LookupEvent::StaleFallback { key, cause: &cause });
                Ok(Answer::new(key, ResponseSource::StaleFallback, record.is_part_of_scheme))
            }
            None => Err(cause),
        }
    }
}
