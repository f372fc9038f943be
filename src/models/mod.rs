pub mod colaborador;
