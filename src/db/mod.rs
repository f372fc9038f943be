//! Record store for `Colaborador` rows.
//!
//! Handlers only see the [`ColaboradorStore`] trait. `PgColaboradorStore`
//! backs production; `InMemoryColaboradorStore` backs tests and local runs
//! without a database.

pub mod filter;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use log::info;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::colaborador::{Colaborador, ColaboradorFields};
pub use filter::{SearchField, SearchFilter};
pub use memory::InMemoryColaboradorStore;
pub use postgres::PgColaboradorStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("colaborador not found")]
    NotFound,

    #[error("cpf '{cpf}' is already registered")]
    UniqueViolation { cpf: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait ColaboradorStore: Send + Sync {
    /// Inserts a record with a fresh id and the current timestamp.
    async fn create(&self, fields: ColaboradorFields) -> Result<Colaborador, StoreError>;

    async fn get(&self, id: i64) -> Result<Colaborador, StoreError>;

    /// Overwrites every mutable field. `id` and `data_cadastro` are kept.
    async fn update(&self, id: i64, fields: ColaboradorFields) -> Result<Colaborador, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Matching records, newest `data_cadastro` first (ties: highest id first).
    async fn list(&self, filter: &SearchFilter) -> Result<Vec<Colaborador>, StoreError>;
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    info!("Connecting to database (max_connections={})", max_connections);
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}
