//! Categoria entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categorias")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub nome: String,
    pub descricao: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sub_categoria::Entity")]
    SubCategorias,
}

impl Related<super::sub_categoria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCategorias.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
