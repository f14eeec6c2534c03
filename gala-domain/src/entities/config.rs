// Runtime configuration handed to the application layer

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgrest,
}

impl StorageBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "memory" => Some(StorageBackend::Memory),
            "postgrest" | "supabase" => Some(StorageBackend::Postgrest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub functions_base_url: Option<String>,
    pub functions_api_key: Option<String>,
    pub pricing_path: String,
    pub ticket_signing_secret: String,
    pub starting_balloons: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub storage: StorageBackend,
    pub postgrest_url: Option<String>,
    pub postgrest_api_key: Option<String>,
    pub clickhouse_url: Option<String>,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
