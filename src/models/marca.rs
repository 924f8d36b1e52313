//! Marca DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::marca;
use crate::error::{AppError, AppResult, FieldError};
use crate::models::common::default_limit;

/// Create/update payload for a marca. Logo replacement is a separate
/// multipart endpoint.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MarcaRequest {
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub pais_origem: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl MarcaRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();

        if self.nome.trim().is_empty() {
            errors.push(FieldError::new("nome", "campo obrigatório"));
        } else if self.nome.len() > 100 {
            errors.push(FieldError::new("nome", "máximo de 100 caracteres"));
        }

        if let Some(ref site) = self.website
            && !site.is_empty()
            && !(site.starts_with("http://") || site.starts_with("https://"))
        {
            errors.push(FieldError::new(
                "website",
                "deve começar com http:// ou https://",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Marca row returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarcaResponse {
    pub id: Uuid,
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pais_origem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Stored logo file path, when one has been uploaded or resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logotipo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<marca::Model> for MarcaResponse {
    fn from(m: marca::Model) -> Self {
        Self {
            id: m.id,
            nome: m.nome,
            descricao: m.descricao,
            pais_origem: m.pais_origem,
            website: m.website,
            logotipo: m.logotipo,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Paginated marca list, with the distinct country list for filter controls.
#[derive(Debug, Serialize, ToSchema)]
pub struct MarcaListResponse {
    pub marcas: Vec<MarcaResponse>,
    pub paises: Vec<String>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Query parameters for listing marcas.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListMarcasQuery {
    /// Case-insensitive match against nome/descricao/website.
    #[serde(default)]
    pub search: Option<String>,
    /// Case-insensitive match against pais_origem.
    #[serde(default)]
    pub pais: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn website_must_carry_scheme() {
        let req = MarcaRequest {
            nome: "Fender".to_string(),
            descricao: None,
            pais_origem: Some("Estados Unidos".to_string()),
            website: Some("fender.com".to_string()),
        };
        let err = req.validate().unwrap_err();
        match err {
            AppError::Validation(fields) => assert_eq!(fields[0].field, "website"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn https_website_passes() {
        let req = MarcaRequest {
            nome: "Fender".to_string(),
            descricao: None,
            pais_origem: None,
            website: Some("https://fender.com".to_string()),
        };
        assert!(req.validate().is_ok());
    }
}
