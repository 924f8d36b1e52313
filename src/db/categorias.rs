//! Database queries for categorias.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::entity::categoria::{self, ActiveModel, Entity as Categoria};
use crate::entity::instrumento::{self, Entity as Instrumento};
use crate::entity::modelo;
use crate::entity::sub_categoria::{self, Entity as SubCategoria};
use crate::error::{AppError, AppResult};
use crate::models::common::clamp_limit;
use crate::models::{CategoriaRequest, ListCategoriasQuery};

use super::DbPool;

impl DbPool {
    /// Insert a new categoria. The name must not be taken.
    pub async fn insert_categoria(&self, req: &CategoriaRequest) -> AppResult<categoria::Model> {
        let nome = req.nome.trim();
        if self.find_categoria_by_nome(nome).await?.is_some() {
            return Err(AppError::Integrity(format!(
                "Já existe uma categoria com o nome '{}'",
                nome
            )));
        }

        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            nome: Set(req.nome.trim().to_string()),
            descricao: Set(req.descricao.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert categoria: {}", e)))?;

        Ok(result)
    }

    /// Get a categoria by ID.
    pub async fn get_categoria_by_id(&self, id: Uuid) -> AppResult<Option<categoria::Model>> {
        let result = Categoria::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get categoria: {}", e)))?;

        Ok(result)
    }

    /// Find a categoria by exact name, used for upserts.
    pub async fn find_categoria_by_nome(&self, nome: &str) -> AppResult<Option<categoria::Model>> {
        let result = Categoria::find()
            .filter(categoria::Column::Nome.eq(nome))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find categoria by nome: {}", e)))?;

        Ok(result)
    }

    /// All categorias ordered by name, for population runs.
    pub async fn list_all_categorias(&self) -> AppResult<Vec<categoria::Model>> {
        let result = Categoria::find()
            .order_by_asc(categoria::Column::Nome)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list categorias: {}", e)))?;

        Ok(result)
    }

    /// Query categorias with search and pagination.
    pub async fn query_categorias(
        &self,
        query: &ListCategoriasQuery,
    ) -> AppResult<(Vec<categoria::Model>, u64)> {
        let mut select = Categoria::find();

        if let Some(ref search) = query.search
            && !search.is_empty()
        {
            let pattern = format!("%{}%", search);
            select = select.filter(
                Condition::any()
                    .add(Expr::cust_with_values(
                        "nome ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values("descricao ILIKE $1", [pattern])),
            );
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count categorias: {}", e)))?;

        let limit = clamp_limit(query.limit);
        let categorias = select
            .order_by_asc(categoria::Column::Nome)
            .offset(query.offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query categorias: {}", e)))?;

        Ok((categorias, total))
    }

    /// Update a categoria.
    pub async fn update_categoria(
        &self,
        id: Uuid,
        req: &CategoriaRequest,
    ) -> AppResult<categoria::Model> {
        let existing = self
            .get_categoria_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Categoria {}", id)))?;

        let nome = req.nome.trim();
        if let Some(other) = self.find_categoria_by_nome(nome).await?
            && other.id != id
        {
            return Err(AppError::Integrity(format!(
                "Já existe uma categoria com o nome '{}'",
                nome
            )));
        }

        let mut active: ActiveModel = existing.into();
        active.nome = Set(req.nome.trim().to_string());
        active.descricao = Set(req.descricao.clone());
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update categoria: {}", e)))?;

        Ok(result)
    }

    /// Delete a categoria. Fails with an integrity error while instrumentos
    /// depend on it through a modelo; sub-categorias and modelos underneath
    /// it are removed by the cascade.
    pub async fn delete_categoria(&self, id: Uuid) -> AppResult<()> {
        let existing = self
            .get_categoria_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Categoria {}", id)))?;

        let dependents = self.count_instrumentos_by_categoria(id).await?;
        if dependents > 0 {
            return Err(AppError::Integrity(format!(
                "Não é possível excluir a categoria '{}': existem {} instrumentos vinculados",
                existing.nome, dependents
            )));
        }

        Categoria::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete categoria: {}", e)))?;

        Ok(())
    }

    /// Count sub-categorias under a categoria.
    pub async fn count_sub_categorias(&self, categoria_id: Uuid) -> AppResult<u64> {
        let count = SubCategoria::find()
            .filter(sub_categoria::Column::CategoriaId.eq(categoria_id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count sub-categorias: {}", e)))?;

        Ok(count)
    }

    /// Count instrumentos that reach a categoria through modelo → sub-categoria.
    async fn count_instrumentos_by_categoria(&self, categoria_id: Uuid) -> AppResult<u64> {
        let count = Instrumento::find()
            .join(JoinType::InnerJoin, instrumento::Relation::Modelo.def())
            .join(JoinType::InnerJoin, modelo::Relation::SubCategoria.def())
            .filter(sub_categoria::Column::CategoriaId.eq(categoria_id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count instrumentos: {}", e)))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    use super::*;

    fn categoria_row(id: Uuid, nome: &str) -> categoria::Model {
        let now = Utc::now();
        categoria::Model {
            id,
            nome: nome.to_string(),
            descricao: None,
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
            .append_query_results([vec![categoria_row(Uuid::now_v7(), "Cordas")]])
            .into_connection();
        let pool = DbPool::from_connection(conn);

        let req = CategoriaRequest {
            nome: "Cordas".to_string(),
            descricao: None,
        };
        let err = pool.insert_categoria(&req).await.unwrap_err();
        match err {
            AppError::Integrity(msg) => assert!(msg.contains("Já existe uma categoria")),
            other => panic!("expected integrity error, got {}", other),
        }
    }

    #[tokio::test]
    async fn delete_blocked_while_instrumentos_depend_on_it() {
        let id = Uuid::now_v7();
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![categoria_row(id, "Cordas")]])
            .append_query_results([vec![count_row(3)]])
            .into_connection();
        let pool = DbPool::from_connection(conn);

        let err = pool.delete_categoria(id).await.unwrap_err();
        match err {
            AppError::Integrity(msg) => {
                assert!(msg.contains("existem 3 instrumentos vinculados"))
            }
            other => panic!("expected integrity error, got {}", other),
        }
    }

    #[tokio::test]
    async fn delete_proceeds_without_dependent_instrumentos() {
        let id = Uuid::now_v7();
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![categoria_row(id, "Cordas")]])
            .append_query_results([vec![count_row(0)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let pool = DbPool::from_connection(conn);

        pool.delete_categoria(id).await.unwrap();
    }
}
