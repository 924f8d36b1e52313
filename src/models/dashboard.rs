//! Dashboard aggregation DTOs and value math.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Count bucket keyed by an entity row (categoria, marca).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GrupoContagem {
    pub id: Uuid,
    pub nome: String,
    pub total: i64,
}

/// Count bucket keyed by an enum value (estado, status).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContagemChave {
    pub chave: String,
    pub total: i64,
}

/// Aggregated collection overview.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub total_instrumentos: i64,
    pub total_categorias: i64,
    pub total_sub_categorias: i64,
    pub total_marcas: i64,
    pub total_modelos: i64,
    /// Sum of preco over all instrumentos.
    pub valor_total_aquisicao: Decimal,
    /// Sum of valor_mercado over all instrumentos.
    pub valor_total_mercado: Decimal,
    /// valor_total_mercado - valor_total_aquisicao.
    pub diferenca_total: Decimal,
    /// Appreciation as a percentage of the acquisition total, 2 decimals.
    pub percentual_valorizacao: Decimal,
    /// Instrumentos per categoria, only non-empty buckets.
    pub por_categoria: Vec<GrupoContagem>,
    /// Instrumentos per marca, only non-empty buckets.
    pub por_marca: Vec<GrupoContagem>,
    pub por_estado: Vec<ContagemChave>,
    pub por_status: Vec<ContagemChave>,
}

/// Appreciation percentage with a zero-division guard: an empty collection
/// (or one acquired for free) reports 0 instead of an error.
pub fn percentual_valorizacao(aquisicao: Decimal, diferenca: Decimal) -> Decimal {
    if aquisicao.is_zero() {
        return Decimal::ZERO;
    }
    (diferenca / aquisicao * Decimal::from(100)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentual_basic() {
        let pct = percentual_valorizacao(Decimal::from(1000), Decimal::from(200));
        assert_eq!(pct, Decimal::from(20));
    }

    #[test]
    fn percentual_rounds_to_two_decimals() {
        let pct = percentual_valorizacao(Decimal::from(8500), Decimal::from(700));
        assert_eq!(pct.to_string(), "8.24");
    }

    #[test]
    fn percentual_zero_aquisicao_is_zero() {
        let pct = percentual_valorizacao(Decimal::ZERO, Decimal::from(500));
        assert_eq!(pct, Decimal::ZERO);
    }
}
