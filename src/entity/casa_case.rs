//! Case entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "casa_cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub case_number: String,
    pub transition_aged_youth: bool,
    pub court_date: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::case_assignment::Entity")]
    Assignments,
    #[sea_orm(has_one = "super::court_report::Entity")]
    CourtReport,
}

impl Related<super::case_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::court_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourtReport.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
