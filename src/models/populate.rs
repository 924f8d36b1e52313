//! AI population request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Tables the population service knows how to fill, in dependency order.
pub const POPULATE_TABLES: &[&str] = &[
    "categorias",
    "sub_categorias",
    "marcas",
    "modelos",
    "instrumentos",
];

fn default_quantidade() -> u32 {
    10
}

/// Request to generate catalog rows with the chat model.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PopulateRequest {
    /// Which tables to fill. Always processed in dependency order
    /// regardless of the order given here.
    pub tables: Vec<String>,
    /// Target item count per table.
    #[serde(default = "default_quantidade")]
    pub quantidade: u32,
}

impl PopulateRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.tables.is_empty() {
            return Err(AppError::InvalidInput(
                "informe ao menos uma tabela para popular".to_string(),
            ));
        }
        for table in &self.tables {
            if !POPULATE_TABLES.contains(&table.as_str()) {
                return Err(AppError::InvalidInput(format!(
                    "tabela desconhecida: {table} (aceitas: {})",
                    POPULATE_TABLES.join(", ")
                )));
            }
        }
        if self.quantidade == 0 || self.quantidade > 100 {
            return Err(AppError::InvalidInput(
                "quantidade deve estar entre 1 e 100".to_string(),
            ));
        }
        Ok(())
    }

    /// Requested tables sorted into dependency order, deduplicated.
    pub fn ordered_tables(&self) -> Vec<String> {
        POPULATE_TABLES
            .iter()
            .filter(|t| self.tables.iter().any(|r| r == *t))
            .map(|t| t.to_string())
            .collect()
    }
}

/// Outcome for one table in a population run.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PopulateTableResult {
    pub tabela: String,
    /// Rows newly inserted.
    pub criados: u32,
    /// Rows that already existed and were left in place.
    pub atualizados: u32,
    /// True when some chunks failed but others landed.
    pub parcial: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erro: Option<String>,
}

/// Overall population run summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct PopulateResponse {
    pub resultados: Vec<PopulateTableResult>,
    pub total_criados: u32,
    pub total_atualizados: u32,
}

impl PopulateResponse {
    pub fn from_results(resultados: Vec<PopulateTableResult>) -> Self {
        let total_criados = resultados.iter().map(|r| r.criados).sum();
        let total_atualizados = resultados.iter().map(|r| r.atualizados).sum();
        Self {
            resultados,
            total_criados,
            total_atualizados,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_table_is_rejected() {
        let req = PopulateRequest {
            tables: vec!["usuarios".to_string()],
            quantidade: 10,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn tables_are_ordered_by_dependency() {
        let req = PopulateRequest {
            tables: vec![
                "instrumentos".to_string(),
                "categorias".to_string(),
                "marcas".to_string(),
            ],
            quantidade: 10,
        };
        assert_eq!(
            req.ordered_tables(),
            vec!["categorias", "marcas", "instrumentos"]
        );
    }

    #[test]
    fn quantidade_bounds() {
        let mut req = PopulateRequest {
            tables: vec!["marcas".to_string()],
            quantidade: 0,
        };
        assert!(req.validate().is_err());
        req.quantidade = 101;
        assert!(req.validate().is_err());
        req.quantidade = 25;
        assert!(req.validate().is_ok());
    }
}
