//! Instrumento domain models and DTOs.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{foto_instrumento, instrumento, marca, modelo};
use crate::error::{AppError, AppResult, FieldError};
use crate::models::common::default_limit;

/// Condition enum for inventory units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EstadoConservacao {
    Novo,
    Excelente,
    Bom,
    Regular,
    Ruim,
}

impl EstadoConservacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Novo => "novo",
            Self::Excelente => "excelente",
            Self::Bom => "bom",
            Self::Regular => "regular",
            Self::Ruim => "ruim",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "novo" => Some(Self::Novo),
            "excelente" => Some(Self::Excelente),
            "bom" => Some(Self::Bom),
            "regular" => Some(Self::Regular),
            "ruim" => Some(Self::Ruim),
            _ => None,
        }
    }
}

impl std::fmt::Display for EstadoConservacao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Availability enum for inventory units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusInstrumento {
    Disponivel,
    Vendido,
    Reservado,
    Manutencao,
}

impl StatusInstrumento {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disponivel => "disponivel",
            Self::Vendido => "vendido",
            Self::Reservado => "reservado",
            Self::Manutencao => "manutencao",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "disponivel" => Some(Self::Disponivel),
            "vendido" => Some(Self::Vendido),
            "reservado" => Some(Self::Reservado),
            "manutencao" => Some(Self::Manutencao),
            _ => None,
        }
    }
}

impl std::fmt::Display for StatusInstrumento {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_status() -> StatusInstrumento {
    StatusInstrumento::Disponivel
}

/// Create/update payload for an instrumento.
///
/// Create arrives as multipart text fields next to the photo files and is
/// assembled through [`InstrumentoRequest::from_fields`]; update arrives as
/// plain JSON.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InstrumentoRequest {
    pub codigo: String,
    #[serde(default)]
    pub numero_serie: Option<String>,
    pub modelo_id: Uuid,
    pub ano_fabricacao: i32,
    pub preco: Decimal,
    pub valor_mercado: Decimal,
    pub estado_conservacao: EstadoConservacao,
    #[serde(default = "default_status")]
    pub status: StatusInstrumento,
    #[serde(default)]
    pub caracteristicas: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    pub data_aquisicao: NaiveDate,
    #[serde(default)]
    pub data_venda: Option<NaiveDate>,
}

impl InstrumentoRequest {
    /// Assemble a request from multipart text fields, collecting one
    /// field-level error per problem instead of failing on the first.
    pub fn from_fields(fields: &HashMap<String, String>) -> AppResult<Self> {
        let mut errors = Vec::new();

        let codigo = fields.get("codigo").cloned().unwrap_or_default();

        let modelo_id = match fields.get("modelo_id").map(|v| v.parse::<Uuid>()) {
            Some(Ok(id)) => Some(id),
            Some(Err(_)) => {
                errors.push(FieldError::new("modelo_id", "UUID inválido"));
                None
            }
            None => {
                errors.push(FieldError::new("modelo_id", "campo obrigatório"));
                None
            }
        };

        let ano_fabricacao = match fields.get("ano_fabricacao").map(|v| v.parse::<i32>()) {
            Some(Ok(ano)) => Some(ano),
            Some(Err(_)) => {
                errors.push(FieldError::new("ano_fabricacao", "deve ser um número inteiro"));
                None
            }
            None => {
                errors.push(FieldError::new("ano_fabricacao", "campo obrigatório"));
                None
            }
        };

        let mut parse_decimal = |name: &str| match fields.get(name).map(|v| v.parse::<Decimal>()) {
            Some(Ok(d)) => Some(d),
            Some(Err(_)) => {
                errors.push(FieldError::new(name, "valor decimal inválido"));
                None
            }
            None => {
                errors.push(FieldError::new(name, "campo obrigatório"));
                None
            }
        };

        let preco = parse_decimal("preco");
        let valor_mercado = parse_decimal("valor_mercado");

        let estado_conservacao = match fields.get("estado_conservacao") {
            Some(v) => match EstadoConservacao::parse(v) {
                Some(e) => Some(e),
                None => {
                    errors.push(FieldError::new(
                        "estado_conservacao",
                        "valores aceitos: novo, excelente, bom, regular, ruim",
                    ));
                    None
                }
            },
            None => {
                errors.push(FieldError::new("estado_conservacao", "campo obrigatório"));
                None
            }
        };

        let status = match fields.get("status") {
            Some(v) => match StatusInstrumento::parse(v) {
                Some(s) => s,
                None => {
                    errors.push(FieldError::new(
                        "status",
                        "valores aceitos: disponivel, vendido, reservado, manutencao",
                    ));
                    StatusInstrumento::Disponivel
                }
            },
            None => StatusInstrumento::Disponivel,
        };

        let mut parse_date = |name: &str, required: bool| match fields.get(name) {
            Some(v) if !v.is_empty() => match NaiveDate::parse_from_str(v, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.push(FieldError::new(name, "data inválida, use o formato AAAA-MM-DD"));
                    None
                }
            },
            _ => {
                if required {
                    errors.push(FieldError::new(name, "campo obrigatório"));
                }
                None
            }
        };

        let data_aquisicao = parse_date("data_aquisicao", true);
        let data_venda = parse_date("data_venda", false);

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let req = Self {
            codigo,
            numero_serie: fields.get("numero_serie").cloned().filter(|v| !v.is_empty()),
            modelo_id: modelo_id.unwrap(),
            ano_fabricacao: ano_fabricacao.unwrap(),
            preco: preco.unwrap(),
            valor_mercado: valor_mercado.unwrap(),
            estado_conservacao: estado_conservacao.unwrap(),
            status,
            caracteristicas: fields.get("caracteristicas").cloned().filter(|v| !v.is_empty()),
            descricao: fields.get("descricao").cloned().filter(|v| !v.is_empty()),
            data_aquisicao: data_aquisicao.unwrap(),
            data_venda,
        };
        req.validate()?;
        Ok(req)
    }

    /// Validate field values against the catalog rules.
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();

        if self.codigo.trim().is_empty() {
            errors.push(FieldError::new("codigo", "campo obrigatório"));
        } else if self.codigo.len() > 50 {
            errors.push(FieldError::new("codigo", "máximo de 50 caracteres"));
        }

        let current_year = Utc::now().year();
        if self.ano_fabricacao < 1500 || self.ano_fabricacao > current_year + 1 {
            errors.push(FieldError::new(
                "ano_fabricacao",
                format!("deve estar entre 1500 e {}", current_year + 1),
            ));
        }

        if self.preco.is_sign_negative() {
            errors.push(FieldError::new("preco", "deve ser não-negativo"));
        }
        if self.valor_mercado.is_sign_negative() {
            errors.push(FieldError::new("valor_mercado", "deve ser não-negativo"));
        }

        if self.data_venda.is_some() && self.status != StatusInstrumento::Vendido {
            errors.push(FieldError::new(
                "data_venda",
                "só pode ser informada quando o status é vendido",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Photo row returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FotoResponse {
    pub id: Uuid,
    /// Stored image file path under the media directory.
    pub imagem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    pub ordem: i32,
    pub data_upload: DateTime<Utc>,
}

impl From<foto_instrumento::Model> for FotoResponse {
    fn from(m: foto_instrumento::Model) -> Self {
        Self {
            id: m.id,
            imagem: m.imagem,
            descricao: m.descricao,
            ordem: m.ordem,
            data_upload: m.data_upload,
        }
    }
}

/// Compact instrumento row for list views.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstrumentoSummary {
    pub id: Uuid,
    pub codigo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modelo_nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marca_nome: Option<String>,
    pub ano_fabricacao: i32,
    pub preco: Decimal,
    pub valor_mercado: Decimal,
    pub estado_conservacao: String,
    pub status: String,
}

impl InstrumentoSummary {
    pub fn from_parts(
        m: instrumento::Model,
        modelo: Option<modelo::Model>,
        marca: Option<marca::Model>,
    ) -> Self {
        Self {
            id: m.id,
            codigo: m.codigo,
            modelo_nome: modelo.map(|x| x.nome),
            marca_nome: marca.map(|x| x.nome),
            ano_fabricacao: m.ano_fabricacao,
            preco: m.preco,
            valor_mercado: m.valor_mercado,
            estado_conservacao: m.estado_conservacao,
            status: m.status,
        }
    }
}

/// Full instrumento detail with its ordered photo list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstrumentoDetailResponse {
    pub id: Uuid,
    pub codigo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_serie: Option<String>,
    pub modelo_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modelo_nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marca_nome: Option<String>,
    pub ano_fabricacao: i32,
    pub preco: Decimal,
    pub valor_mercado: Decimal,
    pub estado_conservacao: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caracteristicas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    pub data_aquisicao: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_venda: Option<NaiveDate>,
    pub fotos: Vec<FotoResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InstrumentoDetailResponse {
    pub fn from_parts(
        m: instrumento::Model,
        modelo: Option<modelo::Model>,
        marca: Option<marca::Model>,
        fotos: Vec<foto_instrumento::Model>,
    ) -> Self {
        Self {
            id: m.id,
            codigo: m.codigo,
            numero_serie: m.numero_serie,
            modelo_id: m.modelo_id,
            modelo_nome: modelo.map(|x| x.nome),
            marca_nome: marca.map(|x| x.nome),
            ano_fabricacao: m.ano_fabricacao,
            preco: m.preco,
            valor_mercado: m.valor_mercado,
            estado_conservacao: m.estado_conservacao,
            status: m.status,
            caracteristicas: m.caracteristicas,
            descricao: m.descricao,
            data_aquisicao: m.data_aquisicao,
            data_venda: m.data_venda,
            fotos: fotos.into_iter().map(FotoResponse::from).collect(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Paginated instrumento list.
#[derive(Debug, Serialize, ToSchema)]
pub struct InstrumentoListResponse {
    pub instrumentos: Vec<InstrumentoSummary>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Query parameters for listing instrumentos.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListInstrumentosQuery {
    /// Case-insensitive match against codigo/numero_serie/modelo nome.
    #[serde(default)]
    pub search: Option<String>,
    /// Filter by categoria (transitively through modelo and sub-categoria).
    #[serde(default)]
    pub categoria_id: Option<Uuid>,
    /// Filter by marca (through modelo).
    #[serde(default)]
    pub marca_id: Option<Uuid>,
    #[serde(default)]
    pub modelo_id: Option<Uuid>,
    #[serde(default)]
    pub estado: Option<EstadoConservacao>,
    #[serde(default)]
    pub status: Option<StatusInstrumento>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> HashMap<String, String> {
        let mut f = HashMap::new();
        f.insert("codigo".into(), "INST-001".into());
        f.insert("modelo_id".into(), Uuid::now_v7().to_string());
        f.insert("ano_fabricacao".into(), "2015".into());
        f.insert("preco".into(), "8500.00".into());
        f.insert("valor_mercado".into(), "9200.00".into());
        f.insert("estado_conservacao".into(), "excelente".into());
        f.insert("status".into(), "disponivel".into());
        f.insert("data_aquisicao".into(), "2023-05-10".into());
        f
    }

    #[test]
    fn estado_round_trips() {
        for estado in ["novo", "excelente", "bom", "regular", "ruim"] {
            assert_eq!(EstadoConservacao::parse(estado).unwrap().as_str(), estado);
        }
        assert!(EstadoConservacao::parse("quebrado").is_none());
    }

    #[test]
    fn status_round_trips() {
        for status in ["disponivel", "vendido", "reservado", "manutencao"] {
            assert_eq!(StatusInstrumento::parse(status).unwrap().as_str(), status);
        }
        assert!(StatusInstrumento::parse("emprestado").is_none());
    }

    #[test]
    fn from_fields_builds_valid_request() {
        let req = InstrumentoRequest::from_fields(&valid_fields()).unwrap();
        assert_eq!(req.codigo, "INST-001");
        assert_eq!(req.estado_conservacao, EstadoConservacao::Excelente);
        assert_eq!(req.preco.to_string(), "8500.00");
    }

    #[test]
    fn missing_data_aquisicao_is_field_error() {
        let mut fields = valid_fields();
        fields.remove("data_aquisicao");
        let err = InstrumentoRequest::from_fields(&fields).unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert!(fields.iter().any(|f| f.field == "data_aquisicao"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn negative_preco_is_rejected() {
        let mut fields = valid_fields();
        fields.insert("preco".into(), "-10.00".into());
        let err = InstrumentoRequest::from_fields(&fields).unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert!(fields.iter().any(|f| f.field == "preco"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn data_venda_requires_vendido_status() {
        let mut fields = valid_fields();
        fields.insert("data_venda".into(), "2024-01-15".into());
        let err = InstrumentoRequest::from_fields(&fields).unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert!(fields.iter().any(|f| f.field == "data_venda"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let mut fields = valid_fields();
        fields.insert("data_venda".into(), "2024-01-15".into());
        fields.insert("status".into(), "vendido".into());
        assert!(InstrumentoRequest::from_fields(&fields).is_ok());
    }

    #[test]
    fn ano_fabricacao_out_of_range_is_rejected() {
        let mut fields = valid_fields();
        fields.insert("ano_fabricacao".into(), "1400".into());
        assert!(InstrumentoRequest::from_fields(&fields).is_err());
    }
}
