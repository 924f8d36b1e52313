//! Migration: Create modelos table.

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
                CREATE TABLE modelos (
                    id UUID PRIMARY KEY,
                    nome VARCHAR(100) NOT NULL,
                    descricao TEXT,
                    marca_id UUID NOT NULL REFERENCES marcas(id) ON DELETE CASCADE,
                    sub_categoria_id UUID NOT NULL REFERENCES sub_categorias(id) ON DELETE CASCADE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                    -- Name is unique within its marca
                    CONSTRAINT uq_modelos_nome_marca UNIQUE (nome, marca_id)
                );

                CREATE INDEX idx_modelos_marca_id ON modelos(marca_id);
                CREATE INDEX idx_modelos_sub_categoria_id ON modelos(sub_categoria_id);
                CREATE INDEX idx_modelos_nome ON modelos(nome);

                CREATE TRIGGER update_modelos_updated_at
                    BEFORE UPDATE ON modelos
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
                DROP TRIGGER IF EXISTS update_modelos_updated_at ON modelos;
                DROP TABLE IF EXISTS modelos CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
