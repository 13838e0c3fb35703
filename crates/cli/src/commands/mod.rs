//! CLI subcommands.

pub mod migrate;
pub mod seed;

use mongomart_storefront::config::{ConfigError, get_database_url};
use mongomart_storefront::db::RepositoryError;
use secrecy::SecretString;
use thiserror::Error;

/// Errors a subcommand can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Validation(usize),
}

/// Load `.env` and resolve the catalog database URL.
fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();
    Ok(get_database_url("MONGOMART_DATABASE_URL")?)
}
