//! Migration: Create sub_categorias table.

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
                CREATE TABLE sub_categorias (
                    id UUID PRIMARY KEY,
                    nome VARCHAR(100) NOT NULL,
                    descricao TEXT,
                    categoria_id UUID NOT NULL REFERENCES categorias(id) ON DELETE CASCADE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                    -- Name is unique within its categoria, not globally
                    CONSTRAINT uq_sub_categorias_nome_categoria UNIQUE (nome, categoria_id)
                );

                CREATE INDEX idx_sub_categorias_categoria_id ON sub_categorias(categoria_id);
                CREATE INDEX idx_sub_categorias_nome ON sub_categorias(nome);

                CREATE TRIGGER update_sub_categorias_updated_at
                    BEFORE UPDATE ON sub_categorias
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
                DROP TRIGGER IF EXISTS update_sub_categorias_updated_at ON sub_categorias;
                DROP TABLE IF EXISTS sub_categorias CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
