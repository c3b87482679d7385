//! Initial schema for the commission tracker.
//!
//! Built with the schema builder so the same migration runs on PostgreSQL
//! and on the SQLite databases used in tests. Every foreign key is
//! `ON DELETE RESTRICT`.

use sea_orm_migration::prelude::*;

/// Creates every table, foreign key and index of the schema.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ====================================================================
        // Organization
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(pk(Companies::Id))
                    .col(ColumnDef::new(Companies::Name).string_len(100).not_null())
                    .col(status(Companies::Status))
                    .col(timestamp(Companies::CreatedAt))
                    .col(timestamp(Companies::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(pk(Departments::Id))
                    .col(ColumnDef::new(Departments::CompanyId).integer().not_null())
                    .col(ColumnDef::new(Departments::Name).string_len(100).not_null())
                    .col(status(Departments::Status))
                    .col(timestamp(Departments::CreatedAt))
                    .col(timestamp(Departments::UpdatedAt))
                    .foreign_key(&mut restrict(
                        "fk_departments_company",
                        (Departments::Table, Departments::CompanyId),
                        (Companies::Table, Companies::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(pk(Positions::Id))
                    .col(ColumnDef::new(Positions::Name).string_len(100).not_null())
                    .col(status(Positions::Status))
                    .col(timestamp(Positions::CreatedAt))
                    .col(timestamp(Positions::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // Commission projects
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(ProjectPermissions::Table)
                    .if_not_exists()
                    .col(pk(ProjectPermissions::Id))
                    .col(
                        ColumnDef::new(ProjectPermissions::Permission)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(status(ProjectPermissions::Status))
                    .col(timestamp(ProjectPermissions::CreatedAt))
                    .col(timestamp(ProjectPermissions::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommissionProjects::Table)
                    .if_not_exists()
                    .col(pk(CommissionProjects::Id))
                    .col(
                        ColumnDef::new(CommissionProjects::FieldName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionProjects::ProjectPermId)
                            .integer()
                            .not_null(),
                    )
                    .col(status(CommissionProjects::Status))
                    .col(timestamp(CommissionProjects::CreatedAt))
                    .col(timestamp(CommissionProjects::UpdatedAt))
                    .foreign_key(&mut restrict(
                        "fk_commission_projects_permission",
                        (CommissionProjects::Table, CommissionProjects::ProjectPermId),
                        (ProjectPermissions::Table, ProjectPermissions::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // Employees
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk(Employees::Id))
                    .col(ColumnDef::new(Employees::CompanyId).integer().not_null())
                    .col(ColumnDef::new(Employees::DepartmentId).integer().not_null())
                    .col(ColumnDef::new(Employees::PositionId).integer().not_null())
                    .col(
                        ColumnDef::new(Employees::ProjectPermIds)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Employees::Name).string_len(100).not_null())
                    .col(status(Employees::Status))
                    .col(timestamp(Employees::CreatedAt))
                    .col(timestamp(Employees::UpdatedAt))
                    .foreign_key(&mut restrict(
                        "fk_employees_company",
                        (Employees::Table, Employees::CompanyId),
                        (Companies::Table, Companies::Id),
                    ))
                    .foreign_key(&mut restrict(
                        "fk_employees_department",
                        (Employees::Table, Employees::DepartmentId),
                        (Departments::Table, Departments::Id),
                    ))
                    .foreign_key(&mut restrict(
                        "fk_employees_position",
                        (Employees::Table, Employees::PositionId),
                        (Positions::Table, Positions::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // Reports
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(pk(Reports::Id))
                    .col(ColumnDef::new(Reports::Date).string_len(10).not_null())
                    .col(ColumnDef::new(Reports::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(Reports::EmployeeName).string_len(100).not_null())
                    .col(ColumnDef::new(Reports::CompanyId).integer().not_null())
                    .col(ColumnDef::new(Reports::DepartmentId).integer().not_null())
                    .col(ColumnDef::new(Reports::PositionId).integer().not_null())
                    .col(
                        ColumnDef::new(Reports::CommissionProjectId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reports::CommissionValue)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(status(Reports::Status))
                    .col(timestamp(Reports::CreatedAt))
                    .col(timestamp(Reports::UpdatedAt))
                    .foreign_key(&mut restrict(
                        "fk_reports_employee",
                        (Reports::Table, Reports::EmployeeId),
                        (Employees::Table, Employees::Id),
                    ))
                    .foreign_key(&mut restrict(
                        "fk_reports_commission_project",
                        (Reports::Table, Reports::CommissionProjectId),
                        (CommissionProjects::Table, CommissionProjects::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_date")
                    .table(Reports::Table)
                    .col(Reports::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_employee_date")
                    .table(Reports::Table)
                    .col(Reports::EmployeeId)
                    .col(Reports::Date)
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // Users
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::EmployeeScope)
                            .string_len(1000)
                            .not_null()
                            .default(""),
                    )
                    .col(status(Users::Status))
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reports::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(CommissionProjects::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(ProjectPermissions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Positions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn status<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).integer().not_null().default(1).to_owned()
}

fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn restrict<T, C, R, K>(name: &str, from: (T, C), to: (R, K)) -> ForeignKeyCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden,
    R: IntoIden + 'static,
    K: IntoIden,
{
    ForeignKey::create()
        .name(name)
        .from(from.0, from.1)
        .to(to.0, to.1)
        .on_delete(ForeignKeyAction::Restrict)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Id,
    CompanyId,
    Name,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Positions {
    Table,
    Id,
    Name,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProjectPermissions {
    Table,
    Id,
    Permission,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CommissionProjects {
    Table,
    Id,
    FieldName,
    ProjectPermId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    CompanyId,
    DepartmentId,
    PositionId,
    ProjectPermIds,
    Name,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
    Date,
    EmployeeId,
    EmployeeName,
    CompanyId,
    DepartmentId,
    PositionId,
    CommissionProjectId,
    CommissionValue,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Name,
    IsAdmin,
    EmployeeScope,
    Status,
    CreatedAt,
    UpdatedAt,
}
