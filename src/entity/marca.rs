//! Marca entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "marcas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub nome: String,
    pub descricao: Option<String>,
    pub pais_origem: Option<String>,
    pub website: Option<String>,
    /// Stored logo file path under the media directory.
    pub logotipo: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::modelo::Entity")]
    Modelos,
}

impl Related<super::modelo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Modelos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
