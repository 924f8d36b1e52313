//! Database queries for sub-categorias.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::entity::categoria;
use crate::entity::instrumento::{self, Entity as Instrumento};
use crate::entity::modelo;
use crate::entity::sub_categoria::{self, ActiveModel, Entity as SubCategoria};
use crate::error::{AppError, AppResult};
use crate::models::common::clamp_limit;
use crate::models::{IdNome, ListSubCategoriasQuery, SubCategoriaRequest};

use super::DbPool;

impl DbPool {
    /// Insert a new sub-categoria. The parent categoria must exist and the
    /// name must not be taken within it.
    pub async fn insert_sub_categoria(
        &self,
        req: &SubCategoriaRequest,
    ) -> AppResult<sub_categoria::Model> {
        self.get_categoria_by_id(req.categoria_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Categoria {}", req.categoria_id))
            })?;

        let nome = req.nome.trim();
        if self
            .find_sub_categoria_by_nome(req.categoria_id, nome)
            .await?
            .is_some()
        {
            return Err(AppError::Integrity(format!(
                "Já existe uma sub-categoria com o nome '{}' nesta categoria",
                nome
            )));
        }

        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            nome: Set(req.nome.trim().to_string()),
            descricao: Set(req.descricao.clone()),
            categoria_id: Set(req.categoria_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert sub-categoria: {}", e)))?;

        Ok(result)
    }

    /// Get a sub-categoria by ID.
    pub async fn get_sub_categoria_by_id(
        &self,
        id: Uuid,
    ) -> AppResult<Option<sub_categoria::Model>> {
        let result = SubCategoria::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get sub-categoria: {}", e)))?;

        Ok(result)
    }

    /// Find a sub-categoria by name within a categoria, used for upserts and
    /// the unique (nome, categoria_id) check.
    pub async fn find_sub_categoria_by_nome(
        &self,
        categoria_id: Uuid,
        nome: &str,
    ) -> AppResult<Option<sub_categoria::Model>> {
        let result = SubCategoria::find()
            .filter(sub_categoria::Column::CategoriaId.eq(categoria_id))
            .filter(sub_categoria::Column::Nome.eq(nome))
            .one(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to find sub-categoria by nome: {}", e))
            })?;

        Ok(result)
    }

    /// Query sub-categorias with their parent categoria rows.
    pub async fn query_sub_categorias(
        &self,
        query: &ListSubCategoriasQuery,
    ) -> AppResult<(Vec<(sub_categoria::Model, Option<categoria::Model>)>, u64)> {
        let mut select = SubCategoria::find();

        if let Some(categoria_id) = query.categoria_id {
            select = select.filter(sub_categoria::Column::CategoriaId.eq(categoria_id));
        }

        if let Some(ref search) = query.search
            && !search.is_empty()
        {
            let pattern = format!("%{}%", search);
            select = select.filter(
                Condition::any()
                    .add(Expr::cust_with_values(
                        "sub_categorias.nome ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        "sub_categorias.descricao ILIKE $1",
                        [pattern],
                    )),
            );
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count sub-categorias: {}", e)))?;

        let limit = clamp_limit(query.limit);
        let rows = select
            .find_also_related(categoria::Entity)
            .order_by_asc(categoria::Column::Nome)
            .order_by_asc(sub_categoria::Column::Nome)
            .offset(query.offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query sub-categorias: {}", e)))?;

        Ok((rows, total))
    }

    /// Compact sub-categoria list for one categoria, for dependent dropdowns.
    pub async fn list_sub_categorias_by_categoria(
        &self,
        categoria_id: Uuid,
    ) -> AppResult<Vec<IdNome>> {
        let rows = SubCategoria::find()
            .filter(sub_categoria::Column::CategoriaId.eq(categoria_id))
            .order_by_asc(sub_categoria::Column::Nome)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list sub-categorias: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|s| IdNome {
                id: s.id,
                nome: s.nome,
            })
            .collect())
    }

    /// Update a sub-categoria.
    pub async fn update_sub_categoria(
        &self,
        id: Uuid,
        req: &SubCategoriaRequest,
    ) -> AppResult<sub_categoria::Model> {
        let existing = self
            .get_sub_categoria_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sub-categoria {}", id)))?;

        self.get_categoria_by_id(req.categoria_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Categoria {}", req.categoria_id))
            })?;

        let nome = req.nome.trim();
        if let Some(other) = self
            .find_sub_categoria_by_nome(req.categoria_id, nome)
            .await?
            && other.id != id
        {
            return Err(AppError::Integrity(format!(
                "Já existe uma sub-categoria com o nome '{}' nesta categoria",
                nome
            )));
        }

        let mut active: ActiveModel = existing.into();
        active.nome = Set(req.nome.trim().to_string());
        active.descricao = Set(req.descricao.clone());
        active.categoria_id = Set(req.categoria_id);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update sub-categoria: {}", e)))?;

        Ok(result)
    }

    /// Delete a sub-categoria. Fails while instrumentos depend on it through
    /// a modelo; modelos underneath it are removed by the cascade.
    pub async fn delete_sub_categoria(&self, id: Uuid) -> AppResult<()> {
        let existing = self
            .get_sub_categoria_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sub-categoria {}", id)))?;

        let dependents = Instrumento::find()
            .join(JoinType::InnerJoin, instrumento::Relation::Modelo.def())
            .filter(modelo::Column::SubCategoriaId.eq(id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count instrumentos: {}", e)))?;

        if dependents > 0 {
            return Err(AppError::Integrity(format!(
                "Não é possível excluir a sub-categoria '{}': existem {} instrumentos vinculados",
                existing.nome, dependents
            )));
        }

        SubCategoria::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete sub-categoria: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, Value};

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

    fn sub_categoria_row(id: Uuid, categoria_id: Uuid, nome: &str) -> sub_categoria::Model {
        let now = Utc::now();
        sub_categoria::Model {
            id,
            nome: nome.to_string(),
            descricao: None,
            categoria_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_nome_within_categoria() {
        let categoria_id = Uuid::now_v7();
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![categoria_row(categoria_id, "Cordas")]])
            .append_query_results([vec![sub_categoria_row(
                Uuid::now_v7(),
                categoria_id,
                "Violões",
            )]])
            .into_connection();
        let pool = DbPool::from_connection(conn);

        let req = SubCategoriaRequest {
            nome: "Violões".to_string(),
            descricao: None,
            categoria_id,
        };
        let err = pool.insert_sub_categoria(&req).await.unwrap_err();
        match err {
            AppError::Integrity(msg) => assert!(msg.contains("Já existe uma sub-categoria")),
            other => panic!("expected integrity error, got {}", other),
        }
    }

    #[tokio::test]
    async fn delete_blocked_while_instrumentos_depend_on_it() {
        let id = Uuid::now_v7();
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sub_categoria_row(id, Uuid::now_v7(), "Violões")]])
            .append_query_results([vec![count_row(1)]])
            .into_connection();
        let pool = DbPool::from_connection(conn);

        let err = pool.delete_sub_categoria(id).await.unwrap_err();
        match err {
            AppError::Integrity(msg) => {
                assert!(msg.contains("existem 1 instrumentos vinculados"))
            }
            other => panic!("expected integrity error, got {}", other),
        }
    }
}
