//! Database queries for marcas.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::entity::instrumento::{self, Entity as Instrumento};
use crate::entity::marca::{self, ActiveModel, Entity as Marca};
use crate::entity::modelo;
use crate::error::{AppError, AppResult};
use crate::models::common::clamp_limit;
use crate::models::{ListMarcasQuery, MarcaRequest};

use super::DbPool;

impl DbPool {
    /// Insert a new marca. The name must not be taken.
    pub async fn insert_marca(&self, req: &MarcaRequest) -> AppResult<marca::Model> {
        let nome = req.nome.trim();
        if self.find_marca_by_nome(nome).await?.is_some() {
            return Err(AppError::Integrity(format!(
                "Já existe uma marca com o nome '{}'",
                nome
            )));
        }

        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            nome: Set(req.nome.trim().to_string()),
            descricao: Set(req.descricao.clone()),
            pais_origem: Set(req.pais_origem.clone()),
            website: Set(req.website.clone()),
            logotipo: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert marca: {}", e)))?;

        Ok(result)
    }

    /// Get a marca by ID.
    pub async fn get_marca_by_id(&self, id: Uuid) -> AppResult<Option<marca::Model>> {
        let result = Marca::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get marca: {}", e)))?;

        Ok(result)
    }

    /// Find a marca by exact name, used for upserts.
    pub async fn find_marca_by_nome(&self, nome: &str) -> AppResult<Option<marca::Model>> {
        let result = Marca::find()
            .filter(marca::Column::Nome.eq(nome))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find marca by nome: {}", e)))?;

        Ok(result)
    }

    /// All marcas ordered by name, for population runs.
    pub async fn list_all_marcas(&self) -> AppResult<Vec<marca::Model>> {
        let result = Marca::find()
            .order_by_asc(marca::Column::Nome)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list marcas: {}", e)))?;

        Ok(result)
    }

    /// Query marcas with search, country filter, and pagination.
    pub async fn query_marcas(
        &self,
        query: &ListMarcasQuery,
    ) -> AppResult<(Vec<marca::Model>, u64)> {
        let mut select = Marca::find();

        if let Some(ref search) = query.search
            && !search.is_empty()
        {
            let pattern = format!("%{}%", search);
            select = select.filter(
                Condition::any()
                    .add(Expr::cust_with_values("nome ILIKE $1", [pattern.clone()]))
                    .add(Expr::cust_with_values(
                        "descricao ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values("website ILIKE $1", [pattern])),
            );
        }

        if let Some(ref pais) = query.pais
            && !pais.is_empty()
        {
            select = select.filter(Expr::cust_with_values(
                "pais_origem ILIKE $1",
                [pais.clone()],
            ));
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count marcas: {}", e)))?;

        let limit = clamp_limit(query.limit);
        let marcas = select
            .order_by_asc(marca::Column::Nome)
            .offset(query.offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query marcas: {}", e)))?;

        Ok((marcas, total))
    }

    /// Distinct non-null countries of origin, for filter controls.
    pub async fn list_marca_paises(&self) -> AppResult<Vec<String>> {
        let rows: Vec<Option<String>> = Marca::find()
            .select_only()
            .column(marca::Column::PaisOrigem)
            .distinct()
            .filter(marca::Column::PaisOrigem.is_not_null())
            .order_by_asc(marca::Column::PaisOrigem)
            .into_tuple()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list countries: {}", e)))?;

        Ok(rows.into_iter().flatten().collect())
    }

    /// Update a marca. The logotipo column is managed separately.
    pub async fn update_marca(&self, id: Uuid, req: &MarcaRequest) -> AppResult<marca::Model> {
        let existing = self
            .get_marca_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Marca {}", id)))?;

        let nome = req.nome.trim();
        if let Some(other) = self.find_marca_by_nome(nome).await?
            && other.id != id
        {
            return Err(AppError::Integrity(format!(
                "Já existe uma marca com o nome '{}'",
                nome
            )));
        }

        let mut active: ActiveModel = existing.into();
        active.nome = Set(req.nome.trim().to_string());
        active.descricao = Set(req.descricao.clone());
        active.pais_origem = Set(req.pais_origem.clone());
        active.website = Set(req.website.clone());
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update marca: {}", e)))?;

        Ok(result)
    }

    /// Set or clear the stored logo path for a marca.
    pub async fn set_marca_logotipo(
        &self,
        id: Uuid,
        logotipo: Option<String>,
    ) -> AppResult<marca::Model> {
        let existing = self
            .get_marca_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Marca {}", id)))?;

        let mut active: ActiveModel = existing.into();
        active.logotipo = Set(logotipo);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update marca logo: {}", e)))?;

        Ok(result)
    }

    /// Delete a marca. Fails while instrumentos depend on it through a
    /// modelo; modelos underneath it are removed by the cascade. Returns
    /// the stored logo path so the caller can remove the file.
    pub async fn delete_marca(&self, id: Uuid) -> AppResult<Option<String>> {
        let existing = self
            .get_marca_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Marca {}", id)))?;

        let dependents = Instrumento::find()
            .join(JoinType::InnerJoin, instrumento::Relation::Modelo.def())
            .filter(modelo::Column::MarcaId.eq(id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count instrumentos: {}", e)))?;

        if dependents > 0 {
            return Err(AppError::Integrity(format!(
                "Não é possível excluir a marca '{}': existem {} instrumentos vinculados",
                existing.nome, dependents
            )));
        }

        let logotipo = existing.logotipo.clone();
        Marca::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete marca: {}", e)))?;

        Ok(logotipo)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;

    fn marca_row(id: Uuid, nome: &str) -> marca::Model {
        let now = Utc::now();
        marca::Model {
            id,
            nome: nome.to_string(),
            descricao: None,
            pais_origem: None,
            website: None,
            logotipo: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_nome() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![marca_row(Uuid::now_v7(), "Fender")]])
            .into_connection();
        let pool = DbPool::from_connection(conn);

        let req = MarcaRequest {
            nome: "Fender".to_string(),
            descricao: None,
            pais_origem: None,
            website: None,
        };
        let err = pool.insert_marca(&req).await.unwrap_err();
        match err {
            AppError::Integrity(msg) => assert!(msg.contains("Já existe uma marca")),
            other => panic!("expected integrity error, got {}", other),
        }
    }

    #[tokio::test]
    async fn delete_blocked_while_instrumentos_depend_on_it() {
        let id = Uuid::now_v7();
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![marca_row(id, "Fender")]])
            .append_query_results([vec![count_row(2)]])
            .into_connection();
        let pool = DbPool::from_connection(conn);

        let err = pool.delete_marca(id).await.unwrap_err();
        match err {
            AppError::Integrity(msg) => {
                assert!(msg.contains("existem 2 instrumentos vinculados"))
            }
            other => panic!("expected integrity error, got {}", other),
        }
    }
}
