use crate::config::{Config, DEV_JWT_SECRET};
use portfolio_auth::TokenKeys;
use portfolio_store::{
    AccountStore, DocumentStore, Experience, InMemoryAccountStore, InMemoryDocumentStore,
    InMemoryUploadStorage, LocalUploadStorage, PersonalInfo, Project, Repository, Skill,
    UploadStorage,
};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub personal_info: Repository<PersonalInfo>,
    pub projects: Repository<Project>,
    pub experience: Repository<Experience>,
    pub skills: Repository<Skill>,
    pub uploads: Arc<dyn UploadStorage>,
    pub tokens: TokenKeys,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let (documents, accounts) = open_stores(config)?;

        let uploads: Arc<dyn UploadStorage> = match config.uploads.backend.as_str() {
            "local" => {
                let storage = LocalUploadStorage::new(&config.uploads.dir).await?;
                tracing::info!("Storing uploads in {}", storage.root().display());
                Arc::new(storage)
            }
            "memory" => {
                tracing::warn!("Using in-memory upload storage - uploads are lost on restart");
                Arc::new(InMemoryUploadStorage::new())
            }
            other => {
                anyhow::bail!(
                    "Unknown upload backend '{}'. Valid options: 'local', 'memory'",
                    other
                );
            }
        };

        if config.auth.jwt_secret == DEV_JWT_SECRET {
            tracing::warn!("Using the built-in JWT secret - set PORTFOLIO_AUTH__JWT_SECRET");
        }
        if config.auth.jwt_secret.is_empty() {
            anyhow::bail!("auth.jwt_secret must not be empty");
        }
        let tokens = TokenKeys::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl_secs);

        Ok(Self {
            accounts,
            personal_info: Repository::new(Arc::clone(&documents)),
            projects: Repository::new(Arc::clone(&documents)),
            experience: Repository::new(Arc::clone(&documents)),
            skills: Repository::new(documents),
            uploads,
            tokens,
            config: Arc::new(config.clone()),
        })
    }
}

type Stores = (Arc<dyn DocumentStore>, Arc<dyn AccountStore>);

fn open_stores(config: &Config) -> anyhow::Result<Stores> {
    match config.storage.backend.as_str() {
        "memory" => {
            tracing::warn!("Using in-memory storage - data is lost on restart");
            Ok((
                Arc::new(InMemoryDocumentStore::new()),
                Arc::new(InMemoryAccountStore::new()),
            ))
        }
        "sqlite" => open_sqlite(config),
        other => {
            anyhow::bail!(
                "Unknown storage backend '{}'. Valid options: 'memory', 'sqlite'",
                other
            );
        }
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(config: &Config) -> anyhow::Result<Stores> {
    use portfolio_store::{SqliteAccountStore, SqliteDocumentStore};

    let path = config
        .storage
        .sqlite_path
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("sqlite storage requires sqlite_path"))?;
    tracing::info!("Opening SQLite database at {}", path);

    Ok((
        Arc::new(SqliteDocumentStore::open(path)?),
        Arc::new(SqliteAccountStore::open(path)?),
    ))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_config: &Config) -> anyhow::Result<Stores> {
    anyhow::bail!("SQLite storage requested but not compiled in. Build with `--features sqlite`.")
}
