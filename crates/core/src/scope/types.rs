//! Scope and visibility types.

use std::collections::BTreeSet;
use std::fmt;

use commission_shared::Claims;
use commission_shared::types::{EmployeeId, UserId};

/// Descriptor value granting every employee.
pub const ALL_EMPLOYEES: &str = "0";

/// A user's declared employee scope, parsed from its stored descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// No employees.
    #[default]
    None,
    /// Every employee in the store at resolution time.
    All,
    /// Exactly these employees.
    Explicit(BTreeSet<EmployeeId>),
}

impl Scope {
    /// Parses a stored descriptor.
    ///
    /// Tokens are comma separated and trimmed; tokens that are not integers
    /// are dropped. A descriptor with no usable token is [`Scope::None`].
    #[must_use]
    pub fn parse(descriptor: &str) -> Self {
        if descriptor.is_empty() {
            return Self::None;
        }
        if descriptor == ALL_EMPLOYEES {
            return Self::All;
        }

        let ids: BTreeSet<EmployeeId> = descriptor
            .split(',')
            .filter_map(|token| token.trim().parse::<i32>().ok())
            .map(EmployeeId::new)
            .collect();

        if ids.is_empty() {
            Self::None
        } else {
            Self::Explicit(ids)
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::All => f.write_str(ALL_EMPLOYEES),
            Self::Explicit(ids) => {
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{id}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Scope {
    fn from(descriptor: &str) -> Self {
        Self::parse(descriptor)
    }
}

/// The employees a request may see, resolved once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// No restriction (administrators).
    All,
    /// Only these employees.
    Only(BTreeSet<EmployeeId>),
}

impl Visibility {
    /// A visibility that admits nobody.
    #[must_use]
    pub const fn nobody() -> Self {
        Self::Only(BTreeSet::new())
    }

    /// Returns true if records of `employee` are visible.
    #[must_use]
    pub fn allows(&self, employee: EmployeeId) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(&employee),
        }
    }

    /// The explicit id set, or `None` when unrestricted.
    #[must_use]
    pub const fn employee_ids(&self) -> Option<&BTreeSet<EmployeeId>> {
        match self {
            Self::All => None,
            Self::Only(ids) => Some(ids),
        }
    }

    /// Returns true if nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Only(ids) if ids.is_empty())
    }

    /// Returns true if unrestricted.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// User id from the bearer token.
    pub user_id: UserId,
    /// Administrators bypass scoping.
    pub is_admin: bool,
}

impl From<&Claims> for Principal {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id(),
            is_admin: claims.is_admin,
        }
    }
}
