//! Employee scope resolution.
//!
//! A non-admin user carries a stored scope descriptor naming the employees
//! they may see or submit reports for. This module parses that descriptor
//! into a [`Scope`] and resolves it per request into a [`Visibility`]:
//! - `""` means no employees
//! - `"0"` means every employee stored at resolution time
//! - `"1,2,3"` means exactly those employees

pub mod error;
pub mod resolver;
pub mod types;


pub use error::ScopeError;
pub use resolver::ScopeResolver;
pub use types::{Principal, Scope, Visibility};
