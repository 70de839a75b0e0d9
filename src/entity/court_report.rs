//! Court report attachment metadata. The document bytes live in S3.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "court_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub casa_case_id: Uuid,
    pub filename: String,
    pub storage_key: String,
    pub content_type: String,
    pub byte_size: i64,
    pub generated_by: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::casa_case::Entity",
        from = "Column::CasaCaseId",
        to = "super::casa_case::Column::Id",
        on_delete = "Cascade"
    )]
    CasaCase,
}

impl Related<super::casa_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CasaCase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
