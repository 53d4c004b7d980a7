use std::collections::HashSet;

use async_trait::async_trait;
use log::{debug, trace};

use crate::error::{Result, SinkError};
use crate::line;
use crate::record::IndexedRecord;
use crate::transport::{HttpTransport, Transport, TransportResponse};

/// Queue length that triggers a flush when no explicit value is configured
pub const DEFAULT_QUEUE_LEN: usize = 100;

const WRITE_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Trait for sinks that accept load-test records
///
/// The dispatch loop fans each record out over a set of collectors through
/// this seam; a collector's failure is logged there, not propagated.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Accept one mapping, buffering or flushing as required
    async fn push(&mut self, mapping: IndexedRecord) -> Result<()>;

    /// Get the collector name, used in dispatch logging
    fn name(&self) -> &str;
}

/// Batching collector writing line protocol to an InfluxDB-style backend
///
/// Records accumulate in a single FIFO shared across all indices; when the
/// queue reaches `queue_len` the whole queue is serialized into one write
/// body and posted to the index of the record that tipped the threshold.
/// A flush triggered by one index can therefore carry records addressed to
/// another. Known quirk, kept deliberately; per-index queues are the likely
/// successor (see DESIGN.md).
pub struct InfluxCollector<T: Transport = HttpTransport> {
    endpoint: String,
    token: String,
    transport: T,

    /// FIFO of not-yet-flushed mappings
    queue: Vec<IndexedRecord>,

    /// Queue length that triggers a flush
    queue_len: usize,

    /// Indices that already had their CREATE DATABASE issued. Presence is
    /// an idempotency marker, not an existence check against the backend.
    indices: HashSet<String>,
}

impl InfluxCollector<HttpTransport> {
    /// Create a collector backed by a real HTTP client
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_transport(endpoint, token, HttpTransport::new())
    }
}

impl<T: Transport> InfluxCollector<T> {
    /// Create a collector over an explicit transport
    pub fn with_transport(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        transport: T,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        let token = token.into();

        if endpoint.is_empty() {
            return Err(SinkError::Config(
                "influx endpoint must not be empty".to_string(),
            ));
        }

        if token.is_empty() {
            return Err(SinkError::Config(
                "influx auth token must not be empty".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            token,
            transport,
            queue: Vec::new(),
            queue_len: DEFAULT_QUEUE_LEN,
            indices: HashSet::new(),
        })
    }

    /// Set the flush threshold, clamped to at least one
    pub fn with_queue_len(mut self, queue_len: usize) -> Self {
        self.queue_len = queue_len.max(1);
        self
    }

    /// Current queue depth
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Ensure an index exists on the backend before the first write to it.
    ///
    /// Issues `CREATE DATABASE <index>` at most once per index; the marker
    /// is only set on a 2xx response, so a failed attempt is retried on the
    /// next push that targets the index.
    pub async fn create_index(&mut self, index: &str) -> Result<()> {
        if self.indices.contains(index) {
            trace!("index '{index}' already provisioned, skipping");
            return Ok(());
        }

        let url = format!("{}/query", self.endpoint);
        let command = format!("CREATE DATABASE {index}");

        let resp = self
            .transport
            .post_form(&url, &[("q", &command), ("u", &self.token)])
            .await
            .map_err(|err| SinkError::Provisioning(err.to_string()))?;

        if resp.is_success() {
            debug!("provisioned index '{index}'");
            self.indices.insert(index.to_string());
            return Ok(());
        }

        match resp.request {
            Some(echo) => Err(SinkError::Provisioning(format!(
                "{} {} returned {}: {}",
                echo.method, echo.url, resp.status, resp.body
            ))),
            None => Err(SinkError::MalformedResponse(format!(
                "index creation returned {} with no request metadata: {}",
                resp.status, resp.body
            ))),
        }
    }

    fn classify_write(resp: TransportResponse) -> Result<()> {
        if resp.is_success() {
            return Ok(());
        }

        match resp.request {
            Some(echo) => Err(SinkError::Backend(format!(
                "{} {} returned {}: {}",
                echo.method, echo.url, resp.status, resp.body
            ))),
            None => Err(SinkError::MalformedResponse(format!(
                "write returned {} with no request metadata: {}",
                resp.status, resp.body
            ))),
        }
    }

    /// Serialize the whole queue and write it to the given index.
    ///
    /// The queue is cleared only on success; on any failure the records
    /// stay queued so the next push retries them. Re-pushing a record after
    /// a partial backend write can duplicate points; dedup is left to the
    /// backend query side.
    async fn flush(&mut self, index: &str) -> Result<()> {
        self.create_index(index).await?;

        let body = line::encode_batch(&self.queue);
        let url = format!("{}/write?db={}&u={}", self.endpoint, index, self.token);

        let resp = self
            .transport
            .post(&url, WRITE_CONTENT_TYPE, body.into_bytes())
            .await?;

        Self::classify_write(resp)?;

        debug!("flushed {} record(s) to index '{index}'", self.queue.len());
        self.queue.clear();

        Ok(())
    }
}

#[async_trait]
impl<T: Transport> Collector for InfluxCollector<T> {
    async fn push(&mut self, mapping: IndexedRecord) -> Result<()> {
        if !mapping.record.is_complete() {
            return Err(SinkError::Validation(format!(
                "incomplete record for index '{}'",
                mapping.index
            )));
        }

        let index = mapping.index.clone();
        self.queue.push(mapping);

        if self.queue.len() < self.queue_len {
            trace!("queued record ({}/{})", self.queue.len(), self.queue_len);
            return Ok(());
        }

        self.flush(&index).await
    }

    fn name(&self) -> &str {
        "influxdb"
    }
}
