use log::{error, info};
use tokio::sync::mpsc;

use crate::collector::Collector;
use crate::error::{Result, SinkError};
use crate::record::{IndexedRecord, Record};

/// Fans records out from a channel over a set of collectors
///
/// Collectors are called sequentially, one per record in turn, so an error
/// is attributable to exactly one collector. A failing collector is logged
/// and the loop carries on; nothing halts the other collectors. Pushes are
/// synchronous, so a slow backend stalls the loop and, once the channel
/// buffer fills, the producer. That backpressure is intentional.
pub struct Dispatcher {
    collectors: Vec<Box<dyn Collector>>,
    index: String,
}

impl Dispatcher {
    /// Create a dispatcher writing to the named index
    pub fn new(index: impl Into<String>) -> Result<Self> {
        let index = index.into();

        if index.is_empty() {
            return Err(SinkError::Config("index name must not be empty".to_string()));
        }

        Ok(Self {
            collectors: Vec::new(),
            index,
        })
    }

    /// Register a collector to receive every record
    pub fn add_collector(&mut self, collector: Box<dyn Collector>) {
        self.collectors.push(collector);
    }

    /// Consume records until the channel closes.
    ///
    /// Closing the sending half is the shutdown signal; records still
    /// buffered inside collectors at that point are dropped, per the
    /// no-persistence design.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Record>) {
        info!(
            "dispatching records to {} collector(s) under index '{}'",
            self.collectors.len(),
            self.index
        );

        while let Some(record) = rx.recv().await {
            for collector in self.collectors.iter_mut() {
                let mapping = IndexedRecord::new(record.clone(), self.index.clone());

                if let Err(err) = collector.push(mapping).await {
                    error!("collector '{}': {}", collector.name(), err);
                }
            }
        }

        info!("record channel closed, dispatcher stopping");
    }
}
