//! Database queries for instrumentos.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::foto_instrumento::{self, Entity as Foto};
use crate::entity::instrumento::{self, ActiveModel, Entity as Instrumento};
use crate::entity::{marca, modelo, sub_categoria};
use crate::error::{AppError, AppResult};
use crate::models::common::clamp_limit;
use crate::models::{InstrumentoRequest, ListInstrumentosQuery};

use super::DbPool;

/// Photo payload for the combined create path: the file is already on disk.
pub struct NewFoto {
    pub imagem: String,
    pub descricao: Option<String>,
    pub ordem: i32,
}

/// Instrumento row with its modelo and marca resolved.
pub struct InstrumentoWithParents {
    pub instrumento: instrumento::Model,
    pub modelo: Option<modelo::Model>,
    pub marca: Option<marca::Model>,
}

impl DbPool {
    /// Insert an instrumento and its photos in one transaction. The photo
    /// files must already be saved; on error the caller removes them.
    pub async fn insert_instrumento_with_fotos(
        &self,
        id: Uuid,
        req: &InstrumentoRequest,
        fotos: Vec<NewFoto>,
    ) -> AppResult<instrumento::Model> {
        self.get_modelo_by_id(req.modelo_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Modelo {}", req.modelo_id)))?;

        if self.find_instrumento_by_codigo(&req.codigo).await?.is_some() {
            return Err(AppError::Integrity(format!(
                "Já existe um instrumento com o código '{}'",
                req.codigo
            )));
        }

        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to start transaction: {}", e)))?;

        let now = Utc::now();
        let model = ActiveModel {
            id: Set(id),
            codigo: Set(req.codigo.trim().to_string()),
            numero_serie: Set(req.numero_serie.clone()),
            modelo_id: Set(req.modelo_id),
            ano_fabricacao: Set(req.ano_fabricacao),
            preco: Set(req.preco),
            valor_mercado: Set(req.valor_mercado),
            estado_conservacao: Set(req.estado_conservacao.as_str().to_string()),
            status: Set(req.status.as_str().to_string()),
            caracteristicas: Set(req.caracteristicas.clone()),
            descricao: Set(req.descricao.clone()),
            data_aquisicao: Set(req.data_aquisicao),
            data_venda: Set(req.data_venda),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert instrumento: {}", e)))?;

        for foto in fotos {
            let foto_model = foto_instrumento::ActiveModel {
                id: Set(Uuid::now_v7()),
                instrumento_id: Set(inserted.id),
                imagem: Set(foto.imagem),
                descricao: Set(foto.descricao),
                ordem: Set(foto.ordem),
                data_upload: Set(now),
            };
            foto_model
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to insert foto: {}", e)))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit instrumento: {}", e)))?;

        Ok(inserted)
    }

    /// Get an instrumento by ID.
    pub async fn get_instrumento_by_id(&self, id: Uuid) -> AppResult<Option<instrumento::Model>> {
        let result = Instrumento::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get instrumento: {}", e)))?;

        Ok(result)
    }

    /// Find an instrumento by its catalog code.
    pub async fn find_instrumento_by_codigo(
        &self,
        codigo: &str,
    ) -> AppResult<Option<instrumento::Model>> {
        let result = Instrumento::find()
            .filter(instrumento::Column::Codigo.eq(codigo.trim()))
            .one(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to find instrumento by codigo: {}", e))
            })?;

        Ok(result)
    }

    /// Get an instrumento with its modelo and marca resolved.
    pub async fn get_instrumento_with_parents(
        &self,
        id: Uuid,
    ) -> AppResult<Option<InstrumentoWithParents>> {
        let Some(inst) = self.get_instrumento_by_id(id).await? else {
            return Ok(None);
        };

        let modelo = self.get_modelo_by_id(inst.modelo_id).await?;
        let marca = match &modelo {
            Some(m) => self.get_marca_by_id(m.marca_id).await?,
            None => None,
        };

        Ok(Some(InstrumentoWithParents {
            instrumento: inst,
            modelo,
            marca,
        }))
    }

    /// Query instrumentos with filters and pagination. The modelo is always
    /// joined; the sub-categoria join is added only for the categoria filter.
    pub async fn query_instrumentos(
        &self,
        query: &ListInstrumentosQuery,
    ) -> AppResult<(Vec<InstrumentoWithParents>, u64)> {
        let mut select =
            Instrumento::find().join(JoinType::InnerJoin, instrumento::Relation::Modelo.def());

        if let Some(modelo_id) = query.modelo_id {
            select = select.filter(instrumento::Column::ModeloId.eq(modelo_id));
        }
        if let Some(marca_id) = query.marca_id {
            select = select.filter(modelo::Column::MarcaId.eq(marca_id));
        }
        if let Some(categoria_id) = query.categoria_id {
            select = select
                .join(JoinType::InnerJoin, modelo::Relation::SubCategoria.def())
                .filter(sub_categoria::Column::CategoriaId.eq(categoria_id));
        }
        if let Some(estado) = query.estado {
            select = select.filter(instrumento::Column::EstadoConservacao.eq(estado.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(instrumento::Column::Status.eq(status.as_str()));
        }

        if let Some(ref search) = query.search
            && !search.is_empty()
        {
            let pattern = format!("%{}%", search);
            select = select.filter(
                Condition::any()
                    .add(Expr::cust_with_values(
                        "instrumentos.codigo ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        "instrumentos.numero_serie ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        "modelos.nome ILIKE $1",
                        [pattern],
                    )),
            );
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count instrumentos: {}", e)))?;

        let limit = clamp_limit(query.limit);
        let instrumentos = select
            .order_by_desc(instrumento::Column::CreatedAt)
            .offset(query.offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query instrumentos: {}", e)))?;

        // Resolve parents per page in two batch fetches.
        let modelo_ids: Vec<Uuid> = instrumentos.iter().map(|i| i.modelo_id).collect();
        let modelos: std::collections::HashMap<Uuid, modelo::Model> = modelo::Entity::find()
            .filter(modelo::Column::Id.is_in(modelo_ids))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load modelos: {}", e)))?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let marca_ids: Vec<Uuid> = modelos.values().map(|m| m.marca_id).collect();
        let marcas: std::collections::HashMap<Uuid, marca::Model> = marca::Entity::find()
            .filter(marca::Column::Id.is_in(marca_ids))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load marcas: {}", e)))?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let rows = instrumentos
            .into_iter()
            .map(|i| {
                let modelo = modelos.get(&i.modelo_id).cloned();
                let marca = modelo
                    .as_ref()
                    .and_then(|m| marcas.get(&m.marca_id).cloned());
                InstrumentoWithParents {
                    instrumento: i,
                    modelo,
                    marca,
                }
            })
            .collect();

        Ok((rows, total))
    }

    /// Update an instrumento. The codigo stays unique across the catalog.
    pub async fn update_instrumento(
        &self,
        id: Uuid,
        req: &InstrumentoRequest,
    ) -> AppResult<instrumento::Model> {
        let existing = self
            .get_instrumento_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Instrumento {}", id)))?;

        self.get_modelo_by_id(req.modelo_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Modelo {}", req.modelo_id)))?;

        if let Some(other) = self.find_instrumento_by_codigo(&req.codigo).await?
            && other.id != id
        {
            return Err(AppError::Integrity(format!(
                "Já existe um instrumento com o código '{}'",
                req.codigo
            )));
        }

        let mut active: ActiveModel = existing.into();
        active.codigo = Set(req.codigo.trim().to_string());
        active.numero_serie = Set(req.numero_serie.clone());
        active.modelo_id = Set(req.modelo_id);
        active.ano_fabricacao = Set(req.ano_fabricacao);
        active.preco = Set(req.preco);
        active.valor_mercado = Set(req.valor_mercado);
        active.estado_conservacao = Set(req.estado_conservacao.as_str().to_string());
        active.status = Set(req.status.as_str().to_string());
        active.caracteristicas = Set(req.caracteristicas.clone());
        active.descricao = Set(req.descricao.clone());
        active.data_aquisicao = Set(req.data_aquisicao);
        active.data_venda = Set(req.data_venda);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update instrumento: {}", e)))?;

        Ok(result)
    }

    /// Delete an instrumento. Photo rows cascade; the stored file paths are
    /// returned so the caller can remove the files.
    pub async fn delete_instrumento(&self, id: Uuid) -> AppResult<Vec<String>> {
        self.get_instrumento_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Instrumento {}", id)))?;

        let paths: Vec<String> = Foto::find()
            .filter(foto_instrumento::Column::InstrumentoId.eq(id))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load fotos: {}", e)))?
            .into_iter()
            .map(|f| f.imagem)
            .collect();

        Instrumento::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete instrumento: {}", e)))?;

        Ok(paths)
    }
}
