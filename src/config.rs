use crate::errors::SystemError;
use std::{env::var, str::FromStr, time::Duration};

const DEFAULT_ORIGIN_ADDRESS: &str = "Lakeland, FL";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// 沒帶 originAddress 時的出發地
    pub default_origin_address: String,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// 從環境變數讀設定, 呼叫前請先 `dotenvy::dotenv()`
    pub fn from_env() -> Result<Self, SystemError> {
        let database_url = var("DATABASE_URL")
            .map_err(|_| SystemError::EnvVarMissing("DATABASE_URL".to_string()))?;

        Ok(Self {
            host: var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("APP_PORT", 3000)?,
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            default_origin_address: var("DEFAULT_ORIGIN_ADDRESS")
                .ok()
                .filter(|address| !address.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ORIGIN_ADDRESS.to_string()),
            cors_allowed_origins: split_origins(
                &var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            ),
            request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 10)?),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: String::new(),
            database_max_connections: 5,
            default_origin_address: DEFAULT_ORIGIN_ADDRESS.to_string(),
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            request_timeout: Duration::from_secs(10),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, SystemError> {
    match var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SystemError::InvalidConfig(format!("{key}={raw}"))),
        Err(_) => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}
