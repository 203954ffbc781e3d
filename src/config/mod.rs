// Configuration module entry point
// Loads layered configuration and holds shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, ReadMode, StoreConfig, StoreMode};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Environment variables use the `ENTRYLOG_` prefix and `__` between sections,
    /// e.g. `ENTRYLOG_STORE__MODE=static`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("ENTRYLOG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "entrylog/0.1")?
            .set_default("http.entry_path", "/")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("http.noindex", true)?
            .set_default("store.mode", "dated")?
            .set_default("store.dir", "./data")?
            .set_default("store.file", "./data/data.json")?
            .set_default("store.default_limit", 10)?
            .set_default("store.read_mode", "recent")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/entrylog").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.http.entry_path, "/");
        assert!(cfg.http.noindex);
        assert!(cfg.http.health.enabled);
        assert_eq!(cfg.store.mode, StoreMode::Dated);
        assert_eq!(cfg.store.read_mode, ReadMode::Recent);
        assert_eq!(cfg.store.default_limit, 10);
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entrylog.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9090

[store]
mode = "static"
file = "/tmp/entries.json"
read_mode = "raw"
"#,
        )
        .unwrap();

        let base = dir.path().join("entrylog");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.store.mode, StoreMode::Static);
        assert_eq!(cfg.store.file, "/tmp/entries.json");
        assert_eq!(cfg.store.read_mode, ReadMode::Raw);
        // untouched keys keep their defaults
        assert_eq!(cfg.store.dir, "./data");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("does-not-exist/entrylog").unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }
}
