pub mod cpf;
pub mod validation;
