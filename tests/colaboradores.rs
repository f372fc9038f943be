//! HTTP-level tests for the colaborador pages, run against the in-memory store.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use std::sync::Arc;

use colaboradores::db::{ColaboradorStore, InMemoryColaboradorStore, SearchFilter};
use colaboradores::handlers;
use colaboradores::models::colaborador::{ColaboradorFields, Status};

fn ana_form(status: &str) -> Vec<(&'static str, String)> {
    vec![
        ("nome_completo", "Ana Silva".to_string()),
        ("cpf", "123.456.789-01".to_string()),
        ("funcao", "Analista".to_string()),
        ("status", status.to_string()),
    ]
}

macro_rules! app {
    ($store:expr) => {{
        let store: Arc<dyn ColaboradorStore> = $store;
        test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .configure(handlers::colaborador::configure),
        )
        .await
    }};
}

fn location(resp: &ServiceResponse<impl MessageBody>) -> Option<&str> {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

async fn body_text(resp: ServiceResponse<impl MessageBody>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn assert_counts(body: &str, total: usize, ativos: usize, inativos: usize) {
    assert!(
        body.contains(&format!("<span id=\"total-colaboradores\">{}</span>", total)),
        "total {} not found in {}",
        total,
        body
    );
    assert!(body.contains(&format!("<span id=\"colaboradores-ativos\">{}</span>", ativos)));
    assert!(body.contains(&format!("<span id=\"colaboradores-inativos\">{}</span>", inativos)));
}

#[actix_web::test]
async fn create_edit_delete_round_trip() {
    let store = Arc::new(InMemoryColaboradorStore::new());
    let app = app!(store.clone());

    let req = test::TestRequest::post().uri("/cadastro/").set_form(ana_form("Ativo")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), Some("/"));

    let created = store.list(&SearchFilter::all()).await.unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].cpf, "12345678901");
    let id = created[0].id;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_counts(&body_text(resp).await, 1, 1, 0);

    let req = test::TestRequest::post()
        .uri(&format!("/editar/{}/", id))
        .set_form(ana_form("Inativo"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let updated = store.get(id).await.unwrap();
    assert_eq!(updated.status, Status::Inativo);
    assert_eq!(updated.data_cadastro, created[0].data_cadastro);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_counts(&body_text(resp).await, 1, 0, 1);

    let req = test::TestRequest::get().uri(&format!("/excluir/{}/", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), Some("/"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_counts(&body_text(resp).await, 0, 0, 0);
    assert!(store.list(&SearchFilter::all()).await.unwrap().is_empty());
}

#[actix_web::test]
async fn search_is_case_insensitive_and_echoed() {
    let store = Arc::new(InMemoryColaboradorStore::new());
    store
        .create(ColaboradorFields::new("Ana Silva", "11111111111", "Analista", Status::Ativo))
        .await
        .unwrap();
    store
        .create(ColaboradorFields::new("Bruno Lima", "22222222222", "Gerente", Status::Inativo))
        .await
        .unwrap();
    let app = app!(store);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/?q=aNA").to_request()).await;
    let body = body_text(resp).await;
    assert!(body.contains("Ana Silva"));
    assert!(!body.contains("Bruno Lima"));
    assert!(body.contains("value=\"aNA\""));
    assert_counts(&body, 1, 1, 0);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/?q=").to_request()).await;
    assert_counts(&body_text(resp).await, 2, 1, 1);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/?q=Diretor").to_request()).await;
    let body = body_text(resp).await;
    assert_counts(&body, 0, 0, 0);
    assert!(body.contains("Nenhum colaborador encontrado."));
}

#[actix_web::test]
async fn list_shows_newest_first() {
    let store = Arc::new(InMemoryColaboradorStore::new());
    store
        .create(ColaboradorFields::new("Primeira Pessoa", "11111111111", "Analista", Status::Ativo))
        .await
        .unwrap();
    store
        .create(ColaboradorFields::new("Segunda Pessoa", "22222222222", "Analista", Status::Ativo))
        .await
        .unwrap();
    let app = app!(store);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let body = body_text(resp).await;
    let first = body.find("Primeira Pessoa").unwrap();
    let second = body.find("Segunda Pessoa").unwrap();
    assert!(second < first);
}

#[actix_web::test]
async fn duplicate_cpf_re_renders_form_with_conflict() {
    let store = Arc::new(InMemoryColaboradorStore::new());
    let app = app!(store.clone());

    let req = test::TestRequest::post().uri("/cadastro/").set_form(ana_form("Ativo")).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);

    let duplicate = vec![
        ("nome_completo", "Outra Ana"),
        ("cpf", "12345678901"),
        ("funcao", "Gerente"),
        ("status", "Ativo"),
    ];
    let req = test::TestRequest::post().uri("/cadastro/").set_form(duplicate).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body = body_text(resp).await;
    assert!(body.contains("Já existe um colaborador com o CPF 12345678901"));
    assert!(body.contains("value=\"Outra Ana\""));
    assert_eq!(store.list(&SearchFilter::all()).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn missing_field_is_reported_on_the_form() {
    let store = Arc::new(InMemoryColaboradorStore::new());
    let app = app!(store.clone());

    let req = test::TestRequest::post()
        .uri("/cadastro/")
        .set_form(vec![("nome_completo", "Ana Silva"), ("funcao", "Analista")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("Campo obrigatório ausente: cpf"));
    assert!(store.list(&SearchFilter::all()).await.unwrap().is_empty());
}

#[actix_web::test]
async fn forms_render() {
    let store = Arc::new(InMemoryColaboradorStore::new());
    let created = store
        .create(ColaboradorFields::new("Ana Silva", "12345678901", "Analista", Status::Inativo))
        .await
        .unwrap();
    let app = app!(store);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/cadastro/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Novo colaborador"));
    assert!(body.contains("action=\"/cadastro/\""));

    let uri = format!("/editar/{}/", created.id);
    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Editar colaborador"));
    assert!(body.contains("value=\"Ana Silva\""));
    assert!(body.contains("value=\"123.456.789-01\""));
    assert!(body.contains("<option value=\"Inativo\" selected>"));
}

#[actix_web::test]
async fn unknown_ids_are_not_found() {
    let store = Arc::new(InMemoryColaboradorStore::new());
    let app = app!(store);

    for req in [
        test::TestRequest::get().uri("/editar/99/").to_request(),
        test::TestRequest::post().uri("/editar/99/").set_form(ana_form("Ativo")).to_request(),
        test::TestRequest::get().uri("/excluir/99/").to_request(),
        test::TestRequest::post().uri("/excluir/99/").to_request(),
        test::TestRequest::get().uri("/editar/abc/").to_request(),
        test::TestRequest::post()
            .uri("/editar/99/")
            .insert_header(header::ContentType::json())
            .set_payload(r#"{"nome_completo":"Ana Silva"}"#)
            .to_request(),
    ] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn rejected_edit_re_renders_the_edit_form() {
    let store = Arc::new(InMemoryColaboradorStore::new());
    store
        .create(ColaboradorFields::new("Ana Silva", "11111111111", "Analista", Status::Ativo))
        .await
        .unwrap();
    let bruno = store
        .create(ColaboradorFields::new("Bruno Lima", "22222222222", "Gerente", Status::Ativo))
        .await
        .unwrap();
    let app = app!(store.clone());
    let uri = format!("/editar/{}/", bruno.id);
    let action = format!("action=\"/editar/{}/\"", bruno.id);

    let taken_cpf = vec![
        ("nome_completo", "Bruno Lima"),
        ("cpf", "111.111.111-11"),
        ("funcao", "Gerente"),
        ("status", "Ativo"),
    ];
    let req = test::TestRequest::post().uri(&uri).set_form(taken_cpf).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_text(resp).await;
    assert!(body.contains(&action));
    assert!(body.contains("Editar colaborador"));
    assert!(body.contains("Já existe um colaborador com o CPF 11111111111"));
    assert!(body.contains("value=\"111.111.111-11\""));

    let invalid = vec![
        ("nome_completo", ""),
        ("cpf", "222.222.222-22"),
        ("funcao", "Diretor"),
        ("status", "Zzz"),
    ];
    let req = test::TestRequest::post().uri(&uri).set_form(invalid).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_text(resp).await;
    assert!(body.contains(&action));
    assert!(body.contains("status inválido"));
    assert!(body.contains("value=\"Diretor\""));

    let empty_name = vec![
        ("nome_completo", ""),
        ("cpf", "222.222.222-22"),
        ("funcao", "Diretor"),
        ("status", "Inativo"),
    ];
    let req = test::TestRequest::post().uri(&uri).set_form(empty_name).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_text(resp).await;
    assert!(body.contains(&action));
    assert!(body.contains("Nome completo deve ter entre 1 e 150 caracteres"));

    let stored = store.get(bruno.id).await.unwrap();
    assert_eq!(stored, bruno);
}
