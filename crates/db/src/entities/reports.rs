//! `SeaORM` Entity for reports table.
//!
//! `employee_name`, `company_id`, `department_id` and `position_id` are
//! copied from the employee when the report is written or re-pointed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RecordStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// `YYYY-MM-DD`
    pub date: String,
    pub employee_id: i32,
    pub employee_name: String,
    pub company_id: i32,
    pub department_id: i32,
    pub position_id: i32,
    pub commission_project_id: i32,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub commission_value: Decimal,
    pub status: RecordStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id"
    )]
    Employees,
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(
        belongs_to = "super::departments::Entity",
        from = "Column::DepartmentId",
        to = "super::departments::Column::Id"
    )]
    Departments,
    #[sea_orm(
        belongs_to = "super::positions::Entity",
        from = "Column::PositionId",
        to = "super::positions::Column::Id"
    )]
    Positions,
    #[sea_orm(
        belongs_to = "super::commission_projects::Entity",
        from = "Column::CommissionProjectId",
        to = "super::commission_projects::Column::Id"
    )]
    CommissionProjects,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl Related<super::commission_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommissionProjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
