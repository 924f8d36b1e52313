//! Modelo DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{marca, modelo, sub_categoria};
use crate::error::{AppError, AppResult, FieldError};
use crate::models::common::default_limit;

/// Create/update payload for a modelo.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ModeloRequest {
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub marca_id: Uuid,
    pub sub_categoria_id: Uuid,
}

impl ModeloRequest {
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

/// Modelo row with parent names embedded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModeloResponse {
    pub id: Uuid,
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    pub marca_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marca_nome: Option<String>,
    pub sub_categoria_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_categoria_nome: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ModeloResponse {
    pub fn from_parts(
        m: modelo::Model,
        marca: Option<marca::Model>,
        sub: Option<sub_categoria::Model>,
    ) -> Self {
        Self {
            id: m.id,
            nome: m.nome,
            descricao: m.descricao,
            marca_id: m.marca_id,
            marca_nome: marca.map(|x| x.nome),
            sub_categoria_id: m.sub_categoria_id,
            sub_categoria_nome: sub.map(|x| x.nome),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Paginated modelo list.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModeloListResponse {
    pub modelos: Vec<ModeloResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Query parameters for listing modelos.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListModelosQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub marca_id: Option<Uuid>,
    #[serde(default)]
    pub sub_categoria_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}
