use serde::{Deserialize, Serialize};

/// Plain environment variable that may carry the upstream base URL on its own.
pub const UPSTREAM_URL_ENV: &str = "UPSTREAM_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub directory: DirectoryConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Any resource URL of the upstream service, e.g. `http://upstream/api/nodes`.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub connection_string: Option<String>,
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub email: String,
    pub unique_identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub max_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            directory: DirectoryConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("config").required(false));

        // Add environment variables with prefix "FLOWBFF_", nested keys split on "__"
        config = config.add_source(
            config::Environment::with_prefix("FLOWBFF")
                .separator("__")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        if app_config.upstream.base_url.is_none() {
            app_config.upstream.base_url = std::env::var(UPSTREAM_URL_ENV)
                .ok()
                .filter(|url| !url.trim().is_empty());
        }

        Ok(app_config)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Worker count for fan-out reads; never zero.
    pub fn fan_out_workers(&self) -> usize {
        self.dashboard.max_concurrency.max(1)
    }
}
