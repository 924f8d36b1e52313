//! Categoria DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::categoria;
use crate::error::{AppError, AppResult, FieldError};
use crate::models::common::default_limit;

/// Create/update payload for a categoria.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoriaRequest {
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
}

impl CategoriaRequest {
    /// Validate required fields and length limits.
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

/// Categoria row returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoriaResponse {
    pub id: Uuid,
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    /// Number of sub-categorias owned by this categoria.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sub_categorias: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<categoria::Model> for CategoriaResponse {
    fn from(m: categoria::Model) -> Self {
        Self {
            id: m.id,
            nome: m.nome,
            descricao: m.descricao,
            total_sub_categorias: None,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Paginated categoria list.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriaListResponse {
    pub categorias: Vec<CategoriaResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Query parameters for listing categorias.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListCategoriasQuery {
    /// Case-insensitive match against nome/descricao.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_nome_is_rejected() {
        let req = CategoriaRequest {
            nome: "   ".to_string(),
            descricao: None,
        };
        let err = req.validate().unwrap_err();
        match err {
            AppError::Validation(fields) => assert_eq!(fields[0].field, "nome"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_request_passes() {
        let req = CategoriaRequest {
            nome: "Cordas".to_string(),
            descricao: Some("Instrumentos de cordas".to_string()),
        };
        assert!(req.validate().is_ok());
    }
}
