use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;

use gala_domain::{DbConfig, RuntimeConfig, StorageBackend};

use crate::config::validate_http_url;

const DEFAULT_CONFIG_PATH: &str = "./gala.toml";
const DEV_SIGNING_SECRET: &str = "gala-dev-secret";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub storage: String,
    pub postgrest_url: Option<String>,
    pub postgrest_api_key: Option<String>,
    pub clickhouse_url: Option<String>,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub functions_base_url: Option<String>,
    pub functions_api_key: Option<String>,
    pub pricing_path: String,
    pub ticket_signing_secret: String,
    pub starting_balloons: u64,
    pub log_dir: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    /// File the config was read from; `None` when defaults were used.
    #[serde(skip)]
    pub source: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            storage: "memory".to_string(),
            postgrest_url: None,
            postgrest_api_key: None,
            clickhouse_url: None,
            clickhouse_database: "gala".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            functions_base_url: None,
            functions_api_key: None,
            pricing_path: "./pricing.yaml".to_string(),
            ticket_signing_secret: DEV_SIGNING_SECRET.to_string(),
            starting_balloons: 50,
            log_dir: None,
            max_body_bytes: 2 * 1024 * 1024,
            request_timeout_seconds: 30,
            source: None,
        }
    }
}

impl AppConfig {
    /// Loads `path`, else `GALA_CONFIG`, else `./gala.toml`. A missing file
    /// means defaults plus environment overrides. Runs before logging is set
    /// up, so problems worth a warning are reported by `startup_warnings`.
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let path = path
            .map(ToString::to_string)
            .or_else(|| env::var("GALA_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let file_path = Path::new(&path);
        let mut config: AppConfig = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            let mut parsed: AppConfig =
                toml::from_str(&content).map_err(|err| anyhow!("invalid config {}: {}", path, err))?;
            parsed.source = Some(path.clone());
            parsed
        } else {
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(file_path.parent());
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn startup_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.source.is_none() {
            warnings.push("config file not found, using defaults".to_string());
        }
        if self.ticket_signing_secret == DEV_SIGNING_SECRET {
            warnings.push(
                "ticket_signing_secret is the development default; set GALA_TICKET_SIGNING_SECRET".to_string(),
            );
        }
        if self.api_token.is_none() {
            warnings.push("api_token is not set; the API accepts unauthenticated requests".to_string());
        }
        warnings
    }

    pub fn normalize(&mut self) {
        for value in [
            &mut self.api_token,
            &mut self.postgrest_url,
            &mut self.postgrest_api_key,
            &mut self.clickhouse_url,
            &mut self.clickhouse_user,
            &mut self.clickhouse_password,
            &mut self.functions_base_url,
            &mut self.functions_api_key,
            &mut self.log_dir,
        ] {
            *value = value
                .take()
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty());
        }
        self.storage = self.storage.trim().to_lowercase();
        self.ticket_signing_secret = self.ticket_signing_secret.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.pricing_path = resolve_path(base, &self.pricing_path);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn storage_backend(&self) -> Result<StorageBackend> {
        StorageBackend::parse(&self.storage)
            .ok_or_else(|| anyhow!("unknown storage backend '{}'", self.storage))
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.ticket_signing_secret.is_empty() {
            return Err(anyhow!("ticket_signing_secret must not be empty"));
        }
        if self.pricing_path.trim().is_empty() {
            return Err(anyhow!("pricing_path must not be empty"));
        }
        if self.storage_backend()? == StorageBackend::Postgrest {
            let url = self
                .postgrest_url
                .as_deref()
                .ok_or_else(|| anyhow!("postgrest_url is required for storage '{}'", self.storage))?;
            validate_http_url("postgrest_url", url)?;
            if self.postgrest_api_key.is_none() {
                return Err(anyhow!("postgrest_api_key is required for storage '{}'", self.storage));
            }
        }
        if let Some(url) = &self.clickhouse_url {
            validate_http_url("clickhouse_url", url)?;
        }
        if let Some(url) = &self.functions_base_url {
            validate_http_url("functions_base_url", url)?;
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            functions_base_url: self.functions_base_url.clone(),
            functions_api_key: self.functions_api_key.clone(),
            pricing_path: self.pricing_path.clone(),
            ticket_signing_secret: self.ticket_signing_secret.clone(),
            starting_balloons: self.starting_balloons,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> Result<DbConfig> {
        Ok(DbConfig {
            storage: self.storage_backend()?,
            postgrest_url: self.postgrest_url.clone(),
            postgrest_api_key: self.postgrest_api_key.clone(),
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("GALA_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("GALA_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("GALA_STORAGE") {
            self.storage = value;
        }
        if let Ok(value) = env::var("GALA_POSTGREST_URL") {
            self.postgrest_url = Some(value);
        }
        if let Ok(value) = env::var("GALA_POSTGREST_API_KEY") {
            self.postgrest_api_key = Some(value);
        }
        if let Ok(value) = env::var("GALA_CLICKHOUSE_URL") {
            self.clickhouse_url = Some(value);
        }
        if let Ok(value) = env::var("GALA_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("GALA_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("GALA_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("GALA_FUNCTIONS_BASE_URL") {
            self.functions_base_url = Some(value);
        }
        if let Ok(value) = env::var("GALA_FUNCTIONS_API_KEY") {
            self.functions_api_key = Some(value);
        }
        if let Ok(value) = env::var("GALA_PRICING_PATH") {
            self.pricing_path = value;
        }
        if let Ok(value) = env::var("GALA_TICKET_SIGNING_SECRET") {
            self.ticket_signing_secret = value;
        }
        if let Ok(value) = env::var("GALA_STARTING_BALLOONS") {
            self.starting_balloons = value.parse().unwrap_or(self.starting_balloons);
        }
        if let Ok(value) = env::var("GALA_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Ok(value) = env::var("GALA_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("GALA_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.storage_backend().expect("backend"), StorageBackend::Memory);
        assert_eq!(config.startup_warnings().len(), 3);
    }

    #[test]
    fn toml_fields_override_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
bind_addr = "0.0.0.0:8080"
storage = "supabase"
postgrest_url = "https://abc.supabase.co"
postgrest_api_key = "anon"
starting_balloons = 5
"#,
        )
        .expect("parse");
        config.validate().expect("validate");
        let db = config.to_db_config().expect("db config");
        assert_eq!(db.storage, StorageBackend::Postgrest);
        assert_eq!(config.to_runtime_config().starting_balloons, 5);
        assert_eq!(config.clickhouse_database, "gala");
    }

    #[test]
    fn blank_optionals_normalize_to_none() {
        let mut config = AppConfig {
            api_token: Some("  ".to_string()),
            functions_base_url: Some(" https://fn.test ".to_string()),
            storage: " Memory ".to_string(),
            ..AppConfig::default()
        };
        config.normalize();
        assert_eq!(config.api_token, None);
        assert_eq!(config.functions_base_url.as_deref(), Some("https://fn.test"));
        assert_eq!(config.storage, "memory");
    }

    #[test]
    fn postgrest_storage_requires_url_and_key() {
        let mut config = AppConfig {
            storage: "postgrest".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
        config.postgrest_url = Some("https://abc.supabase.co".to_string());
        assert!(config.validate().is_err());
        config.postgrest_api_key = Some("anon".to_string());
        assert!(config.validate().is_ok());

        config.storage = "sqlite".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let mut config = AppConfig {
            log_dir: Some("logs".to_string()),
            ..AppConfig::default()
        };
        config.resolve_paths(Some(Path::new("/etc/gala")));
        assert_eq!(config.pricing_path, "/etc/gala/./pricing.yaml");
        assert_eq!(config.log_dir.as_deref(), Some("/etc/gala/logs"));
    }
}
