//! `SeaORM` Entity for commission_projects table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RecordStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commission_projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub field_name: String,
    pub project_perm_id: i32,
    pub status: RecordStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project_permissions::Entity",
        from = "Column::ProjectPermId",
        to = "super::project_permissions::Column::Id"
    )]
    ProjectPermissions,
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
}

impl Related<super::project_permissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectPermissions.def()
    }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
