use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{ColaboradorStore, SearchFilter, StoreError};
use crate::models::colaborador::{Colaborador, ColaboradorFields};

const COLUMNS: &str = "id, nome_completo, cpf, funcao, status, data_cadastro";

pub struct PgColaboradorStore {
    pool: PgPool,
}

impl PgColaboradorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations in `./migrations`.
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// The `cpf` unique constraint is enforced by the table, not checked up front.
fn map_write_error(err: sqlx::Error, cpf: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::UniqueViolation {
            cpf: cpf.to_string(),
        },
        _ => StoreError::Database(err),
    }
}

/// Escapes `LIKE` wildcards so the term is matched literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_filter(query_builder: &mut QueryBuilder<'_, Postgres>, filter: &SearchFilter) {
    let Some(term) = filter.term() else {
        return;
    };
    if filter.fields().is_empty() {
        query_builder.push(" WHERE FALSE");
        return;
    }
    let pattern = like_pattern(term);
    query_builder.push(" WHERE ");
    for (i, field) in filter.fields().iter().enumerate() {
        if i > 0 {
            query_builder.push(" OR ");
        }
        query_builder.push(field.column());
        query_builder.push(" ILIKE ");
        query_builder.push_bind(pattern.clone());
    }
}

#[async_trait]
impl ColaboradorStore for PgColaboradorStore {
    async fn create(&self, fields: ColaboradorFields) -> Result<Colaborador, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO colaboradores (nome_completo, cpf, funcao, status, data_cadastro) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        let colaborador = sqlx::query_as::<_, Colaborador>(&sql)
            .bind(&fields.nome_completo)
            .bind(&fields.cpf)
            .bind(&fields.funcao)
            .bind(fields.status.as_str())
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| map_write_error(err, &fields.cpf))?;
        Ok(colaborador)
    }

    async fn get(&self, id: i64) -> Result<Colaborador, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM colaboradores WHERE id = $1");
        sqlx::query_as::<_, Colaborador>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: i64, fields: ColaboradorFields) -> Result<Colaborador, StoreError> {
        let sql = format!(
            "UPDATE colaboradores SET nome_completo = $1, cpf = $2, funcao = $3, status = $4 \
             WHERE id = $5 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Colaborador>(&sql)
            .bind(&fields.nome_completo)
            .bind(&fields.cpf)
            .bind(&fields.funcao)
            .bind(fields.status.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| map_write_error(err, &fields.cpf))?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM colaboradores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, filter: &SearchFilter) -> Result<Vec<Colaborador>, StoreError> {
        let mut query_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM colaboradores"));
        push_filter(&mut query_builder, filter);
        query_builder.push(" ORDER BY data_cadastro DESC, id DESC");

        let rows = query_builder
            .build_query_as::<Colaborador>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
