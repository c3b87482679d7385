//! `SeaORM` Entity for project_permissions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RecordStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub permission: String,
    pub status: RecordStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::commission_projects::Entity")]
    CommissionProjects,
}

impl Related<super::commission_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommissionProjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
