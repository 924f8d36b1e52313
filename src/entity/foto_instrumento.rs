//! FotoInstrumento entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fotos_instrumento")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub instrumento_id: Uuid,
    /// Stored image file path under the media directory.
    pub imagem: String,
    pub descricao: Option<String>,
    /// Display order within the owning instrumento.
    pub ordem: i32,
    pub data_upload: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::instrumento::Entity",
        from = "Column::InstrumentoId",
        to = "super::instrumento::Column::Id",
        on_delete = "Cascade"
    )]
    Instrumento,
}

impl Related<super::instrumento::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instrumento.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
