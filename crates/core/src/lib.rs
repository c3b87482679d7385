//! Core business logic for the commission tracker.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Services borrow an [`store::EntityStore`] and never name a concrete engine.
//!
//! # Modules
//!
//! - `store` - Storage seam and entity/foreign-key vocabulary
//! - `scope` - Employee scope parsing and per-request visibility
//! - `integrity` - Delete blocking and foreign-key existence checks
//! - `summary` - Monthly per-employee, per-project totals
//! - `report` - Report write planning and denormalization

pub mod integrity;
pub mod report;
pub mod scope;
pub mod store;
pub mod summary;
