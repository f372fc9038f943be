use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpResponse, ResponseError};
use log::info;
use serde::Deserialize;

use crate::db::{ColaboradorStore, SearchFilter};
use crate::errors::AppError;
use crate::models::colaborador::{Colaborador, ColaboradorFields, Status};
use crate::utils::validation::validate_payload;
use crate::views::{self, FormPage, FormValues, IndexPage};

const CREATE_TITLE: &str = "Novo colaborador";
const EDIT_TITLE: &str = "Editar colaborador";

#[derive(Deserialize)]
pub struct ListQuery {
    q: Option<String>,
}

/// Body of the entry form. Every field is optional here so that an absent
/// field becomes `AppError::MissingField` instead of an extractor failure.
#[derive(Deserialize, Debug, Default)]
pub struct ColaboradorForm {
    nome_completo: Option<String>,
    cpf: Option<String>,
    funcao: Option<String>,
    status: Option<String>,
}

impl ColaboradorForm {
    /// Decodes an `application/x-www-form-urlencoded` body.
    fn decode(body: &[u8]) -> Result<Self, AppError> {
        let invalid = || AppError::Validation(vec!["Formulário inválido".to_string()]);
        let raw = std::str::from_utf8(body).map_err(|_| invalid())?;
        web::Query::<ColaboradorForm>::from_query(raw)
            .map(web::Query::into_inner)
            .map_err(|_| invalid())
    }

    fn into_fields(self) -> Result<ColaboradorFields, AppError> {
        let nome_completo = self.nome_completo.ok_or(AppError::MissingField("nome_completo"))?;
        let cpf = self.cpf.ok_or(AppError::MissingField("cpf"))?;
        let funcao = self.funcao.ok_or(AppError::MissingField("funcao"))?;
        let status = match self.status.as_deref() {
            None | Some("") => Status::default(),
            Some(raw) => raw
                .parse::<Status>()
                .map_err(|err| AppError::Validation(vec![err.to_string()]))?,
        };

        let fields = ColaboradorFields::new(nome_completo, &cpf, funcao, status);
        validate_payload(&fields)?;
        Ok(fields)
    }

    fn values(&self) -> FormValues {
        FormValues {
            nome_completo: self.nome_completo.clone().unwrap_or_default(),
            cpf: self.cpf.clone().unwrap_or_default(),
            funcao: self.funcao.clone().unwrap_or_default(),
            status: self.status.clone().unwrap_or_default(),
        }
    }
}

/// Aggregate counts shown above the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSummary {
    pub total_colaboradores: usize,
    pub colaboradores_ativos: usize,
    pub colaboradores_inativos: usize,
}

impl ListSummary {
    pub fn from_records(colaboradores: &[Colaborador]) -> Self {
        let total_colaboradores = colaboradores.len();
        let colaboradores_ativos = colaboradores.iter().filter(|c| c.is_ativo()).count();
        Self {
            total_colaboradores,
            colaboradores_ativos,
            colaboradores_inativos: total_colaboradores - colaboradores_ativos,
        }
    }
}

fn redirect_to_list() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

fn form_response(title: &str, action: &str, values: &FormValues, err: Option<&AppError>) -> HttpResponse {
    let errors = err.map(AppError::messages).unwrap_or_default();
    let body = views::render_form(&FormPage {
        title,
        action,
        values,
        errors: &errors,
    });
    match err {
        Some(err) => HttpResponse::build(err.status_code())
            .content_type(ContentType::html())
            .body(body),
        None => html(body),
    }
}

pub async fn list_colaboradores(
    store: web::Data<dyn ColaboradorStore>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let search_query = query.into_inner().q.unwrap_or_default();
    let filter = SearchFilter::from_query(&search_query);

    let colaboradores = store.list(&filter).await?;
    let summary = ListSummary::from_records(&colaboradores);

    Ok(html(views::render_index(&IndexPage {
        colaboradores: &colaboradores,
        total_colaboradores: summary.total_colaboradores,
        colaboradores_ativos: summary.colaboradores_ativos,
        colaboradores_inativos: summary.colaboradores_inativos,
        search_query: &search_query,
    })))
}

pub async fn new_colaborador_form() -> HttpResponse {
    form_response(CREATE_TITLE, "/cadastro/", &FormValues::default(), None)
}

pub async fn create_colaborador(
    store: web::Data<dyn ColaboradorStore>,
    form: web::Form<ColaboradorForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let values = form.values();

    let result = match form.into_fields() {
        Ok(fields) => store.create(fields).await.map_err(AppError::from),
        Err(err) => Err(err),
    };

    match result {
        Ok(colaborador) => {
            info!("Created colaborador {}", colaborador.id);
            Ok(redirect_to_list())
        }
        Err(err) if err.is_user_facing() => Ok(form_response(CREATE_TITLE, "/cadastro/", &values, Some(&err))),
        Err(err) => Err(err),
    }
}

pub async fn edit_colaborador_form(
    store: web::Data<dyn ColaboradorStore>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let colaborador = store.get(id).await?;

    let action = format!("/editar/{}/", id);
    Ok(form_response(EDIT_TITLE, &action, &FormValues::from(&colaborador), None))
}

pub async fn update_colaborador(
    store: web::Data<dyn ColaboradorStore>,
    id: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    // The body is decoded only after the lookup: an absent record is a 404
    // whatever was submitted.
    store.get(id).await?;

    let (values, result) = match ColaboradorForm::decode(&body) {
        Ok(form) => {
            let values = form.values();
            let result = match form.into_fields() {
                Ok(fields) => store.update(id, fields).await.map_err(AppError::from),
                Err(err) => Err(err),
            };
            (values, result)
        }
        Err(err) => (FormValues::default(), Err(err)),
    };

    match result {
        Ok(colaborador) => {
            info!("Updated colaborador {}", colaborador.id);
            Ok(redirect_to_list())
        }
        Err(err) if err.is_user_facing() => {
            let action = format!("/editar/{}/", id);
            Ok(form_response(EDIT_TITLE, &action, &values, Some(&err)))
        }
        Err(err) => Err(err),
    }
}

pub async fn delete_colaborador(
    store: web::Data<dyn ColaboradorStore>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    store.delete(id).await?;

    info!("Deleted colaborador {}", id);
    Ok(redirect_to_list())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(list_colaboradores)))
        .service(
            web::resource("/cadastro/")
                .route(web::get().to(new_colaborador_form))
                .route(web::post().to(create_colaborador)),
        )
        .service(
            web::resource("/editar/{id}/")
                .route(web::get().to(edit_colaborador_form))
                .route(web::post().to(update_colaborador)),
        )
        .service(
            web::resource("/excluir/{id}/")
                .route(web::get().to(delete_colaborador))
                .route(web::post().to(delete_colaborador)),
        );
}
