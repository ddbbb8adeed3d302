use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

/// Signing secret used when none is configured. Fine for local runs only.
pub const DEV_JWT_SECRET: &str = "your-secret-key";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub uploads: UploadConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: String, // "memory", "sqlite"
    pub sqlite_path: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_upload_backend")]
    pub backend: String, // "local", "memory"
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_bytes: usize,
    /// Base for returned image URLs; the request's Host header when unset
    pub public_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            sqlite_path: None,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            backend: default_upload_backend(),
            dir: default_upload_dir(),
            max_bytes: default_max_upload_bytes(),
            public_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage: StorageConfig::default(),
            auth: AuthConfig::default(),
            uploads: UploadConfig::default(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    5000
}
fn default_storage_backend() -> String {
    "memory".into()
}
fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.into()
}
fn default_token_ttl_secs() -> u64 {
    portfolio_auth::DEFAULT_TOKEN_TTL_SECS
}
fn default_upload_backend() -> String {
    "local".into()
}
fn default_upload_dir() -> String {
    "uploads".into()
}
fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
} // 5 MiB

impl Config {
    /// `portfolio-server.toml`, then `PORTFOLIO_*` env vars (`__` nests sections)
    pub fn load() -> anyhow::Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("portfolio-server.toml"))
                .merge(Env::prefixed("PORTFOLIO_").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config: Config = figment.extract()?;
        Ok(config)
    }
}
