//! Aggregation queries for the dashboard.

use rust_decimal::Decimal;
use sea_orm::{DatabaseBackend, EntityTrait, FromQueryResult, PaginatorTrait, Statement};
use uuid::Uuid;

use crate::entity::{categoria, instrumento, marca, modelo, sub_categoria};
use crate::error::{AppError, AppResult};
use crate::models::dashboard::percentual_valorizacao;
use crate::models::{ContagemChave, DashboardResponse, GrupoContagem};

use super::DbPool;

#[derive(Debug, FromQueryResult)]
struct ValueSums {
    valor_aquisicao: Decimal,
    valor_mercado: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct GroupCount {
    id: Uuid,
    nome: String,
    total: i64,
}

#[derive(Debug, FromQueryResult)]
struct KeyCount {
    chave: String,
    total: i64,
}

impl DbPool {
    /// Build the full collection overview.
    pub async fn get_dashboard(&self) -> AppResult<DashboardResponse> {
        let total_instrumentos = instrumento::Entity::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count instrumentos: {}", e)))?
            as i64;
        let total_marcas = marca::Entity::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count marcas: {}", e)))?
            as i64;
        let total_modelos = modelo::Entity::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count modelos: {}", e)))?
            as i64;
        let total_categorias = categoria::Entity::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count categorias: {}", e)))?
            as i64;
        let total_sub_categorias = sub_categoria::Entity::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count sub-categorias: {}", e)))?
            as i64;

        let sums = self.instrumento_value_sums().await?;
        let diferenca = sums.valor_mercado - sums.valor_aquisicao;
        let percentual = percentual_valorizacao(sums.valor_aquisicao, diferenca);

        Ok(DashboardResponse {
            total_instrumentos,
            total_categorias,
            total_sub_categorias,
            total_marcas,
            total_modelos,
            valor_total_aquisicao: sums.valor_aquisicao,
            valor_total_mercado: sums.valor_mercado,
            diferenca_total: diferenca,
            percentual_valorizacao: percentual,
            por_categoria: self.count_instrumentos_por_categoria().await?,
            por_marca: self.count_instrumentos_por_marca().await?,
            por_estado: self.count_instrumentos_por_coluna("estado_conservacao").await?,
            por_status: self.count_instrumentos_por_coluna("status").await?,
        })
    }

    async fn instrumento_value_sums(&self) -> AppResult<ValueSums> {
        let sums = ValueSums::find_by_statement(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT COALESCE(SUM(preco), 0) AS valor_aquisicao, \
             COALESCE(SUM(valor_mercado), 0) AS valor_mercado FROM instrumentos",
        ))
        .one(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to sum instrumento values: {}", e)))?
        .ok_or_else(|| AppError::Database("Value sum query returned no row".to_string()))?;

        Ok(sums)
    }

    /// Instrumento counts per categoria. Inner joins keep only categorias
    /// that actually hold instrumentos.
    async fn count_instrumentos_por_categoria(&self) -> AppResult<Vec<GrupoContagem>> {
        let rows = GroupCount::find_by_statement(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT c.id AS id, c.nome AS nome, COUNT(i.id) AS total \
             FROM categorias c \
             JOIN sub_categorias sc ON sc.categoria_id = c.id \
             JOIN modelos m ON m.sub_categoria_id = sc.id \
             JOIN instrumentos i ON i.modelo_id = m.id \
             GROUP BY c.id, c.nome \
             ORDER BY total DESC, c.nome ASC",
        ))
        .all(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to count by categoria: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|r| GrupoContagem {
                id: r.id,
                nome: r.nome,
                total: r.total,
            })
            .collect())
    }

    async fn count_instrumentos_por_marca(&self) -> AppResult<Vec<GrupoContagem>> {
        let rows = GroupCount::find_by_statement(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT ma.id AS id, ma.nome AS nome, COUNT(i.id) AS total \
             FROM marcas ma \
             JOIN modelos m ON m.marca_id = ma.id \
             JOIN instrumentos i ON i.modelo_id = m.id \
             GROUP BY ma.id, ma.nome \
             ORDER BY total DESC, ma.nome ASC",
        ))
        .all(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to count by marca: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|r| GrupoContagem {
                id: r.id,
                nome: r.nome,
                total: r.total,
            })
            .collect())
    }

    /// Instrumento counts grouped by one of the enum columns.
    async fn count_instrumentos_por_coluna(&self, column: &str) -> AppResult<Vec<ContagemChave>> {
        // column is one of two hardcoded call sites, never user input
        let sql = format!(
            "SELECT {column} AS chave, COUNT(*) AS total FROM instrumentos \
             GROUP BY {column} ORDER BY total DESC, chave ASC"
        );

        let rows = KeyCount::find_by_statement(Statement::from_string(
            DatabaseBackend::Postgres,
            sql,
        ))
        .all(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to count by {}: {}", column, e)))?;

        Ok(rows
            .into_iter()
            .map(|r| ContagemChave {
                chave: r.chave,
                total: r.total,
            })
            .collect())
    }
}
