//! Case assignment entity linking volunteers to cases.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "case_assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub casa_case_id: Uuid,
    pub volunteer_id: Uuid,
    pub active: bool,
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
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::VolunteerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Volunteer,
}

impl Related<super::casa_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CasaCase.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Volunteer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
