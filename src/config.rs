use config::{self, File};
use log::{debug, error};
use serde::Deserialize;
use std::path::Path;

use crate::collector::DEFAULT_QUEUE_LEN;
use crate::error::{Result, SinkError};

/// InfluxDB backend configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InfluxConfig {
    /// Base address of the backend
    pub endpoint: String,
    /// Authentication token passed on writes
    pub token: String,
    /// Index (database) records are written to
    #[serde(default = "default_index")]
    pub index: String,
    /// Queue length that triggers a flush
    #[serde(default = "default_queue_len")]
    pub queue_len: usize,
}

fn default_index() -> String {
    "loadtest".to_string()
}

fn default_queue_len() -> usize {
    DEFAULT_QUEUE_LEN
}

/// Sink configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SinkConfig {
    /// Backend configuration
    pub influx: InfluxConfig,
    /// Address the result listener binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Capacity of the record channel between listener and dispatcher
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Logging level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8082".to_string()
}

fn default_channel_capacity() -> usize {
    64
}

/// Logging level
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

/// Load sink configuration from a file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SinkConfig> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());

    // Check if the file exists
    if !path.exists() {
        error!("Configuration file {} does not exist", path.display());
        return Err(SinkError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    // Get the file extension
    let extension = match path.extension() {
        Some(ext) => ext.to_string_lossy().to_lowercase(),
        None => {
            error!("Configuration file has no extension");
            return Err(SinkError::Config(format!(
                "Configuration file has no extension: {}",
                path.display()
            )));
        }
    };

    // Check if the extension is supported and create the appropriate FileFormat
    let format = match extension.as_str() {
        "toml" => config::FileFormat::Toml,
        "json" => config::FileFormat::Json,
        "yaml" | "yml" => config::FileFormat::Yaml,
        format => {
            error!("Unsupported configuration format: {}", format);
            return Err(SinkError::Config(format!(
                "Unsupported config format: {}",
                format
            )));
        }
    };

    // Build configuration
    let config = config::Config::builder()
        .add_source(File::with_name(&path.to_string_lossy()).format(format))
        .build()
        .map_err(|e| SinkError::Config(e.to_string()))?;

    // Deserialize configuration
    config
        .try_deserialize()
        .map_err(|e| SinkError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_from_toml_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            listen_addr = "0.0.0.0:9000"
            log_level = "debug"

            [influx]
            endpoint = "http://localhost:8086"
            token = "magnum"
            index = "a-db"
            queue_len = 25
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.influx.endpoint, "http://localhost:8086");
        assert_eq!(config.influx.token, "magnum");
        assert_eq!(config.influx.index, "a-db");
        assert_eq!(config.influx.queue_len, 25);
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_defaults_applied() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [influx]
            endpoint = "http://localhost:8086"
            token = "magnum"
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.influx.index, "loadtest");
        assert_eq!(config.influx.queue_len, DEFAULT_QUEUE_LEN);
        assert_eq!(config.channel_capacity, 64);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nonexistent/sink.toml").unwrap_err();
        assert!(matches!(err, SinkError::Config(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".ini").tempfile().unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, SinkError::Config(_)));
    }
}
