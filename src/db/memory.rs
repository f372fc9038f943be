use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{ColaboradorStore, SearchFilter, StoreError};
use crate::models::colaborador::{Colaborador, ColaboradorFields};

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Colaborador>,
}

impl Table {
    fn cpf_taken(&self, cpf: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|row| row.cpf == cpf && Some(row.id) != except)
    }
}

/// Mutex-guarded table. The lock plays the part of the database's unique
/// constraint: the CPF check and the write happen under one guard.
#[derive(Default)]
pub struct InMemoryColaboradorStore {
    inner: Mutex<Table>,
}

impl InMemoryColaboradorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        // A panic mid-write leaves every row whole, so a poisoned guard is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ColaboradorStore for InMemoryColaboradorStore {
    async fn create(&self, fields: ColaboradorFields) -> Result<Colaborador, StoreError> {
        let mut table = self.table();
        if table.cpf_taken(&fields.cpf, None) {
            return Err(StoreError::UniqueViolation { cpf: fields.cpf });
        }
        table.next_id += 1;
        let colaborador = Colaborador {
            id: table.next_id,
            nome_completo: fields.nome_completo,
            cpf: fields.cpf,
            funcao: fields.funcao,
            status: fields.status,
            data_cadastro: Utc::now(),
        };
        table.rows.insert(colaborador.id, colaborador.clone());
        Ok(colaborador)
    }

    async fn get(&self, id: i64) -> Result<Colaborador, StoreError> {
        self.table().rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: i64, fields: ColaboradorFields) -> Result<Colaborador, StoreError> {
        let mut table = self.table();
        if !table.rows.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if table.cpf_taken(&fields.cpf, Some(id)) {
            return Err(StoreError::UniqueViolation { cpf: fields.cpf });
        }
        let row = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        row.nome_completo = fields.nome_completo;
        row.cpf = fields.cpf;
        row.funcao = fields.funcao;
        row.status = fields.status;
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        match self.table().rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn list(&self, filter: &SearchFilter) -> Result<Vec<Colaborador>, StoreError> {
        let mut rows: Vec<Colaborador> = self
            .table()
            .rows
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.data_cadastro
                .cmp(&a.data_cadastro)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }
}
