use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Absent key disables the BigBuy pipeline at call time; it is not a
    /// startup error so the rest of the service can run without it.
    pub bigbuy_api_key: Option<String>,
    pub bigbuy_request_timeout_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Products per chunk during a stock sync run.
    pub sync_chunk_size: usize,
    /// Fixed pause between chunks; the pipeline's only upstream pacing.
    pub sync_chunk_delay_ms: u64,
    /// Row ceiling per update statement when committing a run's batch.
    pub sync_batch_max: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "bigbuy_api_key",
                &self.bigbuy_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "bigbuy_request_timeout_secs",
                &self.bigbuy_request_timeout_secs,
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("sync_chunk_size", &self.sync_chunk_size)
            .field("sync_chunk_delay_ms", &self.sync_chunk_delay_ms)
            .field("sync_batch_max", &self.sync_batch_max)
            .finish()
    }
}
