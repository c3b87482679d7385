//! Referential integrity checks.
//!
//! Deletes are refused while dependents still point at a row, and writes are
//! refused when a supplied foreign key names a row that does not exist.
//! Status is not consulted: an inactive row is still a valid reference and
//! still blocks deletion of its parent.

pub mod error;
pub mod guard;

#[cfg(test)]
mod tests;

pub use error::GuardError;
pub use guard::{DeleteCheck, IntegrityGuard};
