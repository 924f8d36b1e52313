//! Migration: Create marcas table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE marcas (
                    id UUID PRIMARY KEY,
                    nome VARCHAR(100) NOT NULL UNIQUE,
                    descricao TEXT,
                    pais_origem VARCHAR(100),
                    website VARCHAR(255),

                    -- Stored logo file path under the media directory
                    logotipo VARCHAR(500),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_marcas_nome ON marcas(nome);
                CREATE INDEX idx_marcas_pais_origem ON marcas(pais_origem);

                CREATE TRIGGER update_marcas_updated_at
                    BEFORE UPDATE ON marcas
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_marcas_updated_at ON marcas;
                DROP TABLE IF EXISTS marcas CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
