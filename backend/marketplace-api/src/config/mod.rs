use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

/// How the admin area answers a caller the gate turned away.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// `true` answers 404 so admin pages stay invisible; `false` answers 403.
    #[serde(default = "default_deny_with_not_found")]
    pub deny_with_not_found: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            deny_with_not_found: default_deny_with_not_found(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_deny_with_not_found() -> bool {
    true
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(config::Environment::default().separator("__"))
    }

    fn from_source<S>(source: S) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", 8080)?
            .set_default("database.url", "postgres://localhost/marketplace")?
            .set_default("database.max_connections", 10)?
            .set_default("jwt.secret", "development-secret-change-in-production")?
            .set_default("access.deny_with_not_found", default_deny_with_not_found())?
            .add_source(source)
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
