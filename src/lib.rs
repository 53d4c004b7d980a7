//! A core library for shipping load-test results to time-series backends

pub mod collector;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod line;
pub mod listener;
pub mod record;
pub mod transport;
pub mod util;

/// Re-export of commonly used types for convenience
pub mod prelude {
    pub use crate::collector::{Collector, InfluxCollector};
    pub use crate::dispatch::Dispatcher;
    pub use crate::error::{Result, SinkError};
    pub use crate::record::{IndexedRecord, Record};
    pub use crate::transport::{HttpTransport, Transport, TransportResponse};
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
