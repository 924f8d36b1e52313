//! Database queries for modelos.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::entity::instrumento::{self, Entity as Instrumento};
use crate::entity::marca::{self, Entity as Marca};
use crate::entity::modelo::{self, ActiveModel, Entity as Modelo};
use crate::entity::sub_categoria::{self, Entity as SubCategoria};
use crate::error::{AppError, AppResult};
use crate::models::common::clamp_limit;
use crate::models::{IdNome, ListModelosQuery, ModeloRequest};

use super::DbPool;

/// Modelo row together with its resolved parents.
pub struct ModeloWithParents {
    pub modelo: modelo::Model,
    pub marca: Option<marca::Model>,
    pub sub_categoria: Option<sub_categoria::Model>,
}

impl DbPool {
    /// Insert a new modelo. Both parents must exist and the name must not be
    /// taken within the marca.
    pub async fn insert_modelo(&self, req: &ModeloRequest) -> AppResult<modelo::Model> {
        self.get_marca_by_id(req.marca_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Marca {}", req.marca_id)))?;
        self.get_sub_categoria_by_id(req.sub_categoria_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Sub-categoria {}", req.sub_categoria_id))
            })?;

        let nome = req.nome.trim();
        if self.find_modelo_by_nome(req.marca_id, nome).await?.is_some() {
            return Err(AppError::Integrity(format!(
                "Já existe um modelo com o nome '{}' nesta marca",
                nome
            )));
        }

        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            nome: Set(req.nome.trim().to_string()),
            descricao: Set(req.descricao.clone()),
            marca_id: Set(req.marca_id),
            sub_categoria_id: Set(req.sub_categoria_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert modelo: {}", e)))?;

        Ok(result)
    }

    /// Get a modelo by ID.
    pub async fn get_modelo_by_id(&self, id: Uuid) -> AppResult<Option<modelo::Model>> {
        let result = Modelo::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get modelo: {}", e)))?;

        Ok(result)
    }

    /// Find a modelo by name within a marca, used for upserts.
    pub async fn find_modelo_by_nome(
        &self,
        marca_id: Uuid,
        nome: &str,
    ) -> AppResult<Option<modelo::Model>> {
        let result = Modelo::find()
            .filter(modelo::Column::MarcaId.eq(marca_id))
            .filter(modelo::Column::Nome.eq(nome))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find modelo by nome: {}", e)))?;

        Ok(result)
    }

    /// All modelos ordered by name, for population runs.
    pub async fn list_all_modelos(&self) -> AppResult<Vec<modelo::Model>> {
        let result = Modelo::find()
            .order_by_asc(modelo::Column::Nome)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list modelos: {}", e)))?;

        Ok(result)
    }

    /// Query modelos with their parents resolved in a second batch fetch.
    pub async fn query_modelos(
        &self,
        query: &ListModelosQuery,
    ) -> AppResult<(Vec<ModeloWithParents>, u64)> {
        let mut select = Modelo::find();

        if let Some(marca_id) = query.marca_id {
            select = select.filter(modelo::Column::MarcaId.eq(marca_id));
        }
        if let Some(sub_categoria_id) = query.sub_categoria_id {
            select = select.filter(modelo::Column::SubCategoriaId.eq(sub_categoria_id));
        }

        if let Some(ref search) = query.search
            && !search.is_empty()
        {
            let pattern = format!("%{}%", search);
            select = select.filter(
                Condition::any()
                    .add(Expr::cust_with_values(
                        "modelos.nome ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        "modelos.descricao ILIKE $1",
                        [pattern],
                    )),
            );
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count modelos: {}", e)))?;

        let limit = clamp_limit(query.limit);
        let modelos = select
            .join(JoinType::InnerJoin, modelo::Relation::Marca.def())
            .order_by_asc(marca::Column::Nome)
            .order_by_asc(modelo::Column::Nome)
            .offset(query.offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query modelos: {}", e)))?;

        let (marcas, subs) = self.load_modelo_parents(&modelos).await?;

        let rows = modelos
            .into_iter()
            .map(|m| {
                let marca = marcas.get(&m.marca_id).cloned();
                let sub_categoria = subs.get(&m.sub_categoria_id).cloned();
                ModeloWithParents {
                    modelo: m,
                    marca,
                    sub_categoria,
                }
            })
            .collect();

        Ok((rows, total))
    }

    /// Batch-load the marca and sub-categoria rows referenced by a modelo page.
    async fn load_modelo_parents(
        &self,
        modelos: &[modelo::Model],
    ) -> AppResult<(
        HashMap<Uuid, marca::Model>,
        HashMap<Uuid, sub_categoria::Model>,
    )> {
        if modelos.is_empty() {
            return Ok((HashMap::new(), HashMap::new()));
        }

        let marca_ids: Vec<Uuid> = modelos.iter().map(|m| m.marca_id).collect();
        let sub_ids: Vec<Uuid> = modelos.iter().map(|m| m.sub_categoria_id).collect();

        let marcas = Marca::find()
            .filter(marca::Column::Id.is_in(marca_ids))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load marcas: {}", e)))?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let subs = SubCategoria::find()
            .filter(sub_categoria::Column::Id.is_in(sub_ids))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load sub-categorias: {}", e)))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok((marcas, subs))
    }

    /// Compact modelo list for one marca, for dependent dropdowns.
    pub async fn list_modelos_by_marca(&self, marca_id: Uuid) -> AppResult<Vec<IdNome>> {
        let rows = Modelo::find()
            .filter(modelo::Column::MarcaId.eq(marca_id))
            .order_by_asc(modelo::Column::Nome)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list modelos: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|m| IdNome {
                id: m.id,
                nome: m.nome,
            })
            .collect())
    }

    /// Update a modelo.
    pub async fn update_modelo(&self, id: Uuid, req: &ModeloRequest) -> AppResult<modelo::Model> {
        let existing = self
            .get_modelo_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Modelo {}", id)))?;

        self.get_marca_by_id(req.marca_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Marca {}", req.marca_id)))?;
        self.get_sub_categoria_by_id(req.sub_categoria_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Sub-categoria {}", req.sub_categoria_id))
            })?;

        let nome = req.nome.trim();
        if let Some(other) = self.find_modelo_by_nome(req.marca_id, nome).await?
            && other.id != id
        {
            return Err(AppError::Integrity(format!(
                "Já existe um modelo com o nome '{}' nesta marca",
                nome
            )));
        }

        let mut active: ActiveModel = existing.into();
        active.nome = Set(req.nome.trim().to_string());
        active.descricao = Set(req.descricao.clone());
        active.marca_id = Set(req.marca_id);
        active.sub_categoria_id = Set(req.sub_categoria_id);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update modelo: {}", e)))?;

        Ok(result)
    }

    /// Delete a modelo. Fails while instrumentos still reference it.
    pub async fn delete_modelo(&self, id: Uuid) -> AppResult<()> {
        let existing = self
            .get_modelo_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Modelo {}", id)))?;

        let dependents = Instrumento::find()
            .filter(instrumento::Column::ModeloId.eq(id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count instrumentos: {}", e)))?;

        if dependents > 0 {
            return Err(AppError::Integrity(format!(
                "Não é possível excluir o modelo '{}': existem {} instrumentos vinculados",
                existing.nome, dependents
            )));
        }

        Modelo::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete modelo: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    #[tokio::test]
    async fn insert_rejects_duplicate_nome_within_marca() {
        let now = Utc::now();
        let marca_id = Uuid::now_v7();
        let sub_id = Uuid::now_v7();

        let marca = marca::Model {
            id: marca_id,
            nome: "Fender".to_string(),
            descricao: None,
            pais_origem: None,
            website: None,
            logotipo: None,
            created_at: now,
            updated_at: now,
        };
        let sub = sub_categoria::Model {
            id: sub_id,
            nome: "Guitarras".to_string(),
            descricao: None,
            categoria_id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
        };
        let existing = modelo::Model {
            id: Uuid::now_v7(),
            nome: "Stratocaster".to_string(),
            descricao: None,
            marca_id,
            sub_categoria_id: sub_id,
            created_at: now,
            updated_at: now,
        };

        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![marca]])
            .append_query_results([vec![sub]])
            .append_query_results([vec![existing]])
            .into_connection();
        let pool = DbPool::from_connection(conn);

        let req = ModeloRequest {
            nome: "Stratocaster".to_string(),
            descricao: None,
            marca_id,
            sub_categoria_id: sub_id,
        };
        let err = pool.insert_modelo(&req).await.unwrap_err();
        match err {
            AppError::Integrity(msg) => assert!(msg.contains("Já existe um modelo")),
            other => panic!("expected integrity error, got {}", other),
        }
    }
}
