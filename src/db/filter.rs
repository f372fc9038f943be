use crate::models::colaborador::Colaborador;

/// Text columns a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    NomeCompleto,
    Cpf,
    Funcao,
}

impl SearchField {
    pub const ALL: [SearchField; 3] = [SearchField::NomeCompleto, SearchField::Cpf, SearchField::Funcao];

    pub fn column(&self) -> &'static str {
        match self {
            SearchField::NomeCompleto => "nome_completo",
            SearchField::Cpf => "cpf",
            SearchField::Funcao => "funcao",
        }
    }

    pub fn value<'a>(&self, colaborador: &'a Colaborador) -> &'a str {
        match self {
            SearchField::NomeCompleto => &colaborador.nome_completo,
            SearchField::Cpf => &colaborador.cpf,
            SearchField::Funcao => &colaborador.funcao,
        }
    }
}

/// "Any of these fields contains this text, ignoring case."
///
/// An empty term matches every record. Stores either evaluate the filter with
/// [`SearchFilter::matches`] or translate it into their own query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    term: Option<String>,
    fields: Vec<SearchField>,
}

impl SearchFilter {
    pub fn all() -> Self {
        Self {
            term: None,
            fields: SearchField::ALL.to_vec(),
        }
    }

    /// Builds the filter for the list page's `q` parameter.
    pub fn from_query(q: &str) -> Self {
        if q.is_empty() {
            return Self::all();
        }
        Self {
            term: Some(q.to_string()),
            fields: SearchField::ALL.to_vec(),
        }
    }

    #[cfg(test)]
    pub fn with_fields(mut self, fields: &[SearchField]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn fields(&self) -> &[SearchField] {
        &self.fields
    }

    pub fn matches(&self, colaborador: &Colaborador) -> bool {
        let Some(term) = &self.term else {
            return true;
        };
        let needle = term.to_lowercase();
        self.fields
            .iter()
            .any(|field| field.value(colaborador).to_lowercase().contains(&needle))
    }
}
