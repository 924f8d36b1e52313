//! SeaORM entity definitions for PostgreSQL database.

pub mod categoria;
pub mod foto_instrumento;
pub mod instrumento;
pub mod marca;
pub mod modelo;
pub mod sub_categoria;
