//! SubCategoria entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sub_categorias")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Unique within the owning categoria.
    pub nome: String,
    pub descricao: Option<String>,
    pub categoria_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categoria::Entity",
        from = "Column::CategoriaId",
        to = "super::categoria::Column::Id",
        on_delete = "Cascade"
    )]
    Categoria,
    #[sea_orm(has_many = "super::modelo::Entity")]
    Modelos,
}

impl Related<super::categoria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categoria.def()
    }
}

impl Related<super::modelo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Modelos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
