use std::{net::SocketAddr, time::Duration};

const DEFAULT_DB_PATH: &str = "./db/tradebook.db";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Seed the demo ledger on startup when it is empty.
    pub seed_data: bool,
    /// Repair corrupted records found by the startup integrity check.
    pub auto_repair: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("TB_LISTEN_ADDR")
            .ok()
            .and_then(|addr| addr.parse().ok())
            .unwrap_or_else(default_listen_addr);
        let db_path = std::env::var("TB_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.into());
        let cors_allow = std::env::var("TB_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("TB_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
        Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            seed_data: env_flag("TB_SEED_DATA", false),
            auto_repair: env_flag("TB_AUTO_REPAIR", true),
        }
    }

    /// Defaults for an explicit database path, without reading the environment.
    pub fn for_db_path(db_path: impl Into<String>) -> Self {
        Self {
            listen_addr: default_listen_addr(),
            db_path: db_path.into(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            seed_data: false,
            auto_repair: true,
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|value| parse_flag(&value))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
