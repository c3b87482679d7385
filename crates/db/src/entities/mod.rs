//! `SeaORM` entity definitions.
//!
//! Columns mirror the migration one to one; `DeriveEntityModel` expands each
//! model into undocumented `Column`, `ActiveModel` and `PrimaryKey` items.

#![allow(missing_docs)]

pub mod commission_projects;
pub mod companies;
pub mod departments;
pub mod employees;
pub mod positions;
pub mod project_permissions;
pub mod reports;
pub mod sea_orm_active_enums;
pub mod users;
