//! Modelo entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "modelos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Unique within the owning marca.
    pub nome: String,
    pub descricao: Option<String>,
    pub marca_id: Uuid,
    pub sub_categoria_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::marca::Entity",
        from = "Column::MarcaId",
        to = "super::marca::Column::Id",
        on_delete = "Cascade"
    )]
    Marca,
    #[sea_orm(
        belongs_to = "super::sub_categoria::Entity",
        from = "Column::SubCategoriaId",
        to = "super::sub_categoria::Column::Id",
        on_delete = "Cascade"
    )]
    SubCategoria,
    #[sea_orm(has_many = "super::instrumento::Entity")]
    Instrumentos,
}

impl Related<super::marca::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marca.def()
    }
}

impl Related<super::sub_categoria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCategoria.def()
    }
}

impl Related<super::instrumento::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instrumentos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
