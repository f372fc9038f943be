use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use std::fmt;
use validator::ValidationErrors;

use crate::db::StoreError;
use crate::views;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    MissingField(&'static str),
    Validation(Vec<String>),
    Conflict(String),
    InternalServerError(String),
    DatabaseError(String),
}

impl AppError {
    /// Errors the entry form shows back to the user next to the submitted values.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::MissingField(_) | AppError::Validation(_) | AppError::Conflict(_)
        )
    }

    pub fn messages(&self) -> Vec<String> {
        match self {
            AppError::MissingField(field) => vec![format!("Campo obrigatório ausente: {}", field)],
            AppError::Validation(messages) => messages.clone(),
            AppError::Conflict(msg) | AppError::NotFound(msg) => vec![msg.clone()],
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                vec!["Erro interno do servidor".to_string()]
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::MissingField(field) => write!(f, "Missing Field: {}", field),
            AppError::Validation(msgs) => write!(f, "Validation Error: {}", msgs.join("; ")),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("Colaborador não encontrado".to_string()),
            StoreError::UniqueViolation { cpf } => {
                AppError::Conflict(format!("Já existe um colaborador com o CPF {}", cpf))
            }
            StoreError::Database(err) => AppError::DatabaseError(err.to_string()),
            StoreError::Migration(err) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errs: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errs.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let messages = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Campo inválido: {}", field),
                })
            })
            .collect();
        AppError::Validation(messages)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MissingField(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(views::render_error(status, &self.messages()))
    }
}
