//! Migration: Create instrumentos table.
//!
//! Instrumentos reference categoria/marca only transitively through modelo.

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
                CREATE TABLE instrumentos (
                    id UUID PRIMARY KEY,

                    -- Catalog code, the natural key of an inventory unit
                    codigo VARCHAR(50) NOT NULL UNIQUE,
                    numero_serie VARCHAR(100),

                    modelo_id UUID NOT NULL REFERENCES modelos(id) ON DELETE RESTRICT,

                    ano_fabricacao INTEGER NOT NULL,

                    -- Monetary values keep NUMERIC(10,2) for data compatibility
                    preco NUMERIC(10,2) NOT NULL,
                    valor_mercado NUMERIC(10,2) NOT NULL,

                    estado_conservacao VARCHAR(20) NOT NULL
                        CHECK (estado_conservacao IN ('novo', 'excelente', 'bom', 'regular', 'ruim')),
                    status VARCHAR(20) NOT NULL DEFAULT 'disponivel'
                        CHECK (status IN ('disponivel', 'vendido', 'reservado', 'manutencao')),

                    caracteristicas TEXT,
                    descricao TEXT,

                    data_aquisicao DATE NOT NULL,
                    data_venda DATE,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_instrumentos_modelo_id ON instrumentos(modelo_id);
                CREATE INDEX idx_instrumentos_status ON instrumentos(status);
                CREATE INDEX idx_instrumentos_estado ON instrumentos(estado_conservacao);
                CREATE INDEX idx_instrumentos_codigo ON instrumentos(codigo);

                CREATE TRIGGER update_instrumentos_updated_at
                    BEFORE UPDATE ON instrumentos
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
                DROP TRIGGER IF EXISTS update_instrumentos_updated_at ON instrumentos;
                DROP TABLE IF EXISTS instrumentos CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
