//! Server-rendered HTML pages.

use actix_web::http::StatusCode;

use crate::models::colaborador::{Colaborador, Status};
use crate::utils::cpf;

/// Data for the list page.
pub struct IndexPage<'a> {
    pub colaboradores: &'a [Colaborador],
    pub total_colaboradores: usize,
    pub colaboradores_ativos: usize,
    pub colaboradores_inativos: usize,
    pub search_query: &'a str,
}

/// Values shown in the entry form's inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub nome_completo: String,
    pub cpf: String,
    pub funcao: String,
    pub status: String,
}

impl From<&Colaborador> for FormValues {
    fn from(colaborador: &Colaborador) -> Self {
        Self {
            nome_completo: colaborador.nome_completo.clone(),
            cpf: cpf::format(&colaborador.cpf),
            funcao: colaborador.funcao.clone(),
            status: colaborador.status.as_str().to_string(),
        }
    }
}

/// Create and edit share this form; only the title and action differ.
pub struct FormPage<'a> {
    pub title: &'a str,
    pub action: &'a str,
    pub values: &'a FormValues,
    pub errors: &'a [String],
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
<html lang=\"pt-BR\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title}</title>\n\
</head>\n\
<body>\n\
{body}\
</body>\n\
</html>\n",
        title = escape(title),
        body = body,
    )
}

pub fn render_index(page: &IndexPage<'_>) -> String {
    let mut body = String::new();
    body.push_str("<h1>Colaboradores</h1>\n");
    body.push_str("<p><a href=\"/cadastro/\">Novo colaborador</a></p>\n");

    body.push_str(&format!(
        "<form method=\"get\" action=\"/\">\n\
<input type=\"search\" name=\"q\" value=\"{}\" placeholder=\"Buscar por nome, CPF ou função\">\n\
<button type=\"submit\">Buscar</button>\n\
</form>\n",
        escape(page.search_query)
    ));

    body.push_str(&format!(
        "<ul class=\"resumo\">\n\
<li>Total: <span id=\"total-colaboradores\">{}</span></li>\n\
<li>Ativos: <span id=\"colaboradores-ativos\">{}</span></li>\n\
<li>Inativos: <span id=\"colaboradores-inativos\">{}</span></li>\n\
</ul>\n",
        page.total_colaboradores, page.colaboradores_ativos, page.colaboradores_inativos
    ));

    if page.colaboradores.is_empty() {
        body.push_str("<p class=\"vazio\">Nenhum colaborador encontrado.</p>\n");
        return layout("Colaboradores", &body);
    }

    body.push_str(
        "<table>\n<thead><tr><th>Nome completo</th><th>CPF</th><th>Função</th>\
<th>Status</th><th>Data de cadastro</th><th></th></tr></thead>\n<tbody>\n",
    );
    for colaborador in page.colaboradores {
        body.push_str(&format!(
            "<tr><td>{nome}</td><td>{cpf}</td><td>{funcao}</td><td>{status}</td><td>{data}</td>\
<td><a href=\"/editar/{id}/\">Editar</a> <a href=\"/excluir/{id}/\">Excluir</a></td></tr>\n",
            nome = escape(&colaborador.nome_completo),
            cpf = escape(&cpf::format(&colaborador.cpf)),
            funcao = escape(&colaborador.funcao),
            status = colaborador.status,
            data = colaborador.data_cadastro.format("%d/%m/%Y %H:%M"),
            id = colaborador.id,
        ));
    }
    body.push_str("</tbody>\n</table>\n");

    layout("Colaboradores", &body)
}

// Client-side CPF mask: digits only, at most 11, punctuated as typed.
const CPF_MASK_SCRIPT: &str = r#"<script>
document.addEventListener("DOMContentLoaded", function () {
  var cpf = document.getElementById("cpf");
  if (!cpf) { return; }
  cpf.addEventListener("input", function (e) {
    var v = e.target.value.replace(/\D/g, "").substring(0, 11);
    if (v.length > 9) {
      v = v.replace(/(\d{3})(\d{3})(\d{3})(\d{1,2})/, "$1.$2.$3-$4");
    } else if (v.length > 6) {
      v = v.replace(/(\d{3})(\d{3})(\d{1,3})/, "$1.$2.$3");
    } else if (v.length > 3) {
      v = v.replace(/(\d{3})(\d{1,3})/, "$1.$2");
    }
    e.target.value = v;
  });
});
</script>
"#;

pub fn render_form(page: &FormPage<'_>) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", escape(page.title)));

    if !page.errors.is_empty() {
        body.push_str("<ul class=\"erros\">\n");
        for err in page.errors {
            body.push_str(&format!("<li>{}</li>\n", escape(err)));
        }
        body.push_str("</ul>\n");
    }

    let selected = if page.values.status.is_empty() {
        Status::default().as_str()
    } else {
        page.values.status.as_str()
    };
    let mut options = String::new();
    for status in Status::ALL {
        let attr = if status.as_str() == selected { " selected" } else { "" };
        options.push_str(&format!("<option value=\"{0}\"{1}>{0}</option>\n", status, attr));
    }

    body.push_str(&format!(
        "<form id=\"colaborador-form\" method=\"post\" action=\"{action}\">\n\
<label for=\"nome\">Nome completo</label>\n\
<input id=\"nome\" name=\"nome_completo\" maxlength=\"150\" value=\"{nome}\" required>\n\
<label for=\"cpf\">CPF</label>\n\
<input id=\"cpf\" name=\"cpf\" maxlength=\"14\" value=\"{cpf}\" required>\n\
<label for=\"funcao\">Função</label>\n\
<input id=\"funcao\" name=\"funcao\" maxlength=\"50\" value=\"{funcao}\" required>\n\
<label for=\"status\">Status</label>\n\
<select id=\"status\" name=\"status\">\n{options}</select>\n\
<button type=\"submit\">Salvar</button>\n\
<a href=\"/\">Cancelar</a>\n\
</form>\n",
        action = escape(page.action),
        nome = escape(&page.values.nome_completo),
        cpf = escape(&page.values.cpf),
        funcao = escape(&page.values.funcao),
        options = options,
    ));
    body.push_str(CPF_MASK_SCRIPT);

    layout(page.title, &body)
}

pub fn render_error(status: StatusCode, messages: &[String]) -> String {
    let reason = status.canonical_reason().unwrap_or("Erro");
    let mut body = format!("<h1>{} {}</h1>\n", status.as_u16(), escape(reason));
    for msg in messages {
        body.push_str(&format!("<p>{}</p>\n", escape(msg)));
    }
    body.push_str("<p><a href=\"/\">Voltar para a lista</a></p>\n");
    layout(reason, &body)
}
