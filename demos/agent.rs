//! End-to-end wiring: TCP result listener -> dispatcher -> InfluxDB collector.
//!
//! Run with an optional config file path:
//!
//! ```sh
//! cargo run --example agent -- sink.toml
//! ```
//!
//! Without one, the agent listens on 127.0.0.1:8082 and writes to a local
//! InfluxDB. Feed it newline-delimited JSON records, e.g.:
//!
//! ```sh
//! echo '{"url":"example.com","method":"GET","status":200,"size":512,"duration":1000000,"timestamp":"2026-08-28T12:00:00Z"}' | nc 127.0.0.1 8082
//! ```

use loadsink::config::{self, InfluxConfig, LogLevel, SinkConfig};
use loadsink::listener;
use loadsink::prelude::*;
use loadsink::util;
use tokio::sync::mpsc;

fn local_defaults() -> SinkConfig {
    SinkConfig {
        influx: InfluxConfig {
            endpoint: "http://localhost:8086".to_string(),
            token: "magnum".to_string(),
            index: "loadtest".to_string(),
            queue_len: 100,
        },
        listen_addr: "127.0.0.1:8082".to_string(),
        channel_capacity: 64,
        log_level: LogLevel::Info,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_config(path)?,
        None => local_defaults(),
    };

    util::logging::init(&cfg.log_level);

    let collector = InfluxCollector::new(&cfg.influx.endpoint, &cfg.influx.token)?
        .with_queue_len(cfg.influx.queue_len);

    let mut dispatcher = Dispatcher::new(&cfg.influx.index)?;
    dispatcher.add_collector(Box::new(collector));

    let (tx, rx) = mpsc::channel(cfg.channel_capacity);

    let sock = listener::bind(&cfg.listen_addr).await?;
    log::info!("listening for load-test results on {}", cfg.listen_addr);

    tokio::spawn(async move {
        if let Err(err) = listener::serve(sock, tx).await {
            log::error!("listener stopped: {err}");
        }
    });

    dispatcher.run(rx).await;

    Ok(())
}
