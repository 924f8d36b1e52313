//! Migration: Create fotos_instrumento table.
//!
//! Photo rows are owned exclusively by their instrumento and cascade with it.

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
                CREATE TABLE fotos_instrumento (
                    id UUID PRIMARY KEY,
                    instrumento_id UUID NOT NULL REFERENCES instrumentos(id) ON DELETE CASCADE,

                    -- Stored image file path under the media directory
                    imagem VARCHAR(500) NOT NULL,
                    descricao VARCHAR(100),

                    -- Display order within the owning instrumento
                    ordem INTEGER NOT NULL DEFAULT 0,

                    data_upload TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_fotos_instrumento_instrumento_id ON fotos_instrumento(instrumento_id);
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
                DROP TABLE IF EXISTS fotos_instrumento CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
