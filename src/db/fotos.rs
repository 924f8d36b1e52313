//! Database queries for instrumento photos.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::foto_instrumento::{self, ActiveModel, Entity as Foto};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Attach a photo to an instrumento, appended at the end of the order.
    pub async fn insert_foto(
        &self,
        instrumento_id: Uuid,
        imagem: String,
        descricao: Option<String>,
    ) -> AppResult<foto_instrumento::Model> {
        self.get_instrumento_by_id(instrumento_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Instrumento {}", instrumento_id))
            })?;

        let ordem = self.next_foto_ordem(instrumento_id).await?;
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            instrumento_id: Set(instrumento_id),
            imagem: Set(imagem),
            descricao: Set(descricao),
            ordem: Set(ordem),
            data_upload: Set(Utc::now()),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert foto: {}", e)))?;

        Ok(result)
    }

    /// Get a photo by ID.
    pub async fn get_foto_by_id(&self, id: Uuid) -> AppResult<Option<foto_instrumento::Model>> {
        let result = Foto::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get foto: {}", e)))?;

        Ok(result)
    }

    /// List an instrumento's photos in display order.
    pub async fn list_fotos_by_instrumento(
        &self,
        instrumento_id: Uuid,
    ) -> AppResult<Vec<foto_instrumento::Model>> {
        let result = Foto::find()
            .filter(foto_instrumento::Column::InstrumentoId.eq(instrumento_id))
            .order_by_asc(foto_instrumento::Column::Ordem)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list fotos: {}", e)))?;

        Ok(result)
    }

    /// Delete a photo row, returning the stored file path for cleanup.
    pub async fn delete_foto(&self, id: Uuid) -> AppResult<String> {
        let existing = self
            .get_foto_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Foto {}", id)))?;

        let path = existing.imagem.clone();
        Foto::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete foto: {}", e)))?;

        Ok(path)
    }

    /// Next free ordem slot for an instrumento's photos.
    async fn next_foto_ordem(&self, instrumento_id: Uuid) -> AppResult<i32> {
        let max: Option<i32> = Foto::find()
            .filter(foto_instrumento::Column::InstrumentoId.eq(instrumento_id))
            .select_only()
            .column(foto_instrumento::Column::Ordem)
            .order_by_desc(foto_instrumento::Column::Ordem)
            .limit(1)
            .into_tuple()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to read foto ordem: {}", e)))?;

        Ok(max.map_or(0, |m| m + 1))
    }
}
