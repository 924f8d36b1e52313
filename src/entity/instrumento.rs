//! Instrumento entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "instrumentos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Catalog code, the natural key of an inventory unit.
    #[sea_orm(unique)]
    pub codigo: String,
    pub numero_serie: Option<String>,
    pub modelo_id: Uuid,
    pub ano_fabricacao: i32,
    /// Acquisition price, NUMERIC(10,2).
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub preco: Decimal,
    /// Current market value, NUMERIC(10,2).
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub valor_mercado: Decimal,
    /// Condition: novo, excelente, bom, regular, ruim.
    pub estado_conservacao: String,
    /// Availability: disponivel, vendido, reservado, manutencao.
    pub status: String,
    pub caracteristicas: Option<String>,
    pub descricao: Option<String>,
    pub data_aquisicao: Date,
    pub data_venda: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::modelo::Entity",
        from = "Column::ModeloId",
        to = "super::modelo::Column::Id",
        on_delete = "Restrict"
    )]
    Modelo,
    #[sea_orm(has_many = "super::foto_instrumento::Entity")]
    Fotos,
}

impl Related<super::modelo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Modelo.def()
    }
}

impl Related<super::foto_instrumento::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fotos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
