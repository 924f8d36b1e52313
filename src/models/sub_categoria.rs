//! SubCategoria DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{categoria, sub_categoria};
use crate::error::{AppError, AppResult, FieldError};
use crate::models::common::default_limit;

/// Create/update payload for a sub-categoria.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubCategoriaRequest {
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub categoria_id: Uuid,
}

impl SubCategoriaRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();

        if self.nome.trim().is_empty() {
            errors.push(FieldError::new("nome", "campo obrigatório"));
        } else if self.nome.len() > 100 {
            errors.push(FieldError::new("nome", "máximo de 100 caracteres"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Sub-categoria row with its parent categoria name embedded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubCategoriaResponse {
    pub id: Uuid,
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    pub categoria_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_nome: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<(sub_categoria::Model, Option<categoria::Model>)> for SubCategoriaResponse {
    fn from((m, cat): (sub_categoria::Model, Option<categoria::Model>)) -> Self {
        Self {
            id: m.id,
            nome: m.nome,
            descricao: m.descricao,
            categoria_id: m.categoria_id,
            categoria_nome: cat.map(|c| c.nome),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Paginated sub-categoria list.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubCategoriaListResponse {
    pub sub_categorias: Vec<SubCategoriaResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Query parameters for listing sub-categorias.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListSubCategoriasQuery {
    #[serde(default)]
    pub search: Option<String>,
    /// Narrow to one parent categoria.
    #[serde(default)]
    pub categoria_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}
