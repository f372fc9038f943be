use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

use crate::utils::cpf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ativo,
    Inativo,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("status inválido: '{0}' (use 'Ativo' ou 'Inativo')")]
pub struct StatusParseError(pub String);

impl Status {
    pub const ALL: [Status; 2] = [Status::Ativo, Status::Inativo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ativo => "Ativo",
            Status::Inativo => "Inativo",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ativo" => Ok(Status::Ativo),
            "Inativo" => Ok(Status::Inativo),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

// Lets sqlx decode the TEXT column straight into the enum.
impl TryFrom<String> for Status {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Colaborador {
    pub id: i64,
    pub nome_completo: String,
    pub cpf: String,
    pub funcao: String,
    #[sqlx(try_from = "String")]
    pub status: Status,
    pub data_cadastro: DateTime<Utc>,
}

impl Colaborador {
    pub fn is_ativo(&self) -> bool {
        self.status == Status::Ativo
    }
}

impl fmt::Display for Colaborador {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nome_completo)
    }
}

/// The mutable part of a record, as written by create and update.
///
/// `cpf` is normalised to its digits on construction, so every value that
/// reaches a store already satisfies the at-rest invariant.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ColaboradorFields {
    #[validate(length(min = 1, max = 150, message = "Nome completo deve ter entre 1 e 150 caracteres"))]
    pub nome_completo: String,
    #[validate(length(min = 1, max = 11, message = "CPF deve ter entre 1 e 11 dígitos"))]
    pub cpf: String,
    #[validate(length(min = 1, max = 50, message = "Função deve ter entre 1 e 50 caracteres"))]
    pub funcao: String,
    pub status: Status,
}

impl ColaboradorFields {
    pub fn new(
        nome_completo: impl Into<String>,
        cpf_raw: &str,
        funcao: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            nome_completo: nome_completo.into(),
            cpf: cpf::strip_non_digits(cpf_raw),
            funcao: funcao.into(),
            status,
        }
    }
}
