//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_categorias;
mod m20260301_000002_create_marcas;
mod m20260301_000003_create_sub_categorias;
mod m20260301_000004_create_modelos;
mod m20260301_000005_create_instrumentos;
mod m20260301_000006_create_fotos_instrumento;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_categorias::Migration),
            Box::new(m20260301_000002_create_marcas::Migration),
            Box::new(m20260301_000003_create_sub_categorias::Migration),
            Box::new(m20260301_000004_create_modelos::Migration),
            Box::new(m20260301_000005_create_instrumentos::Migration),
            Box::new(m20260301_000006_create_fotos_instrumento::Migration),
        ]
    }
}
