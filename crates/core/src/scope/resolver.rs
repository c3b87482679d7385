//! Per-request scope resolution.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::error::ScopeError;
use super::types::{Principal, Scope, Visibility};
use crate::store::EntityStore;

/// Turns a principal into the set of employees the request may touch.
///
/// Holds no state between calls; construct one per request around the
/// request's store handle.
#[derive(Debug)]
pub struct ScopeResolver<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> ScopeResolver<'a, S> {
    /// Creates a resolver reading from `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolves the visibility of `principal`.
    ///
    /// Administrators get [`Visibility::All`] without touching the store. A
    /// `"0"` scope is a snapshot of the employee ids present right now; if
    /// that listing fails the request sees nobody.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::UnknownPrincipal` if the user does not exist, or
    /// `ScopeError::Store` if the user record cannot be read.
    pub async fn resolve(&self, principal: &Principal) -> Result<Visibility, ScopeError> {
        if principal.is_admin {
            return Ok(Visibility::All);
        }

        let scope = self
            .store
            .employee_scope(principal.user_id)
            .await?
            .ok_or(ScopeError::UnknownPrincipal(principal.user_id))?;

        let visibility = match scope {
            Scope::None => Visibility::nobody(),
            Scope::Explicit(ids) => Visibility::Only(ids),
            Scope::All => match self.store.employee_ids().await {
                Ok(ids) => Visibility::Only(ids.into_iter().collect::<BTreeSet<_>>()),
                Err(e) => {
                    warn!(
                        user_id = %principal.user_id,
                        error = %e,
                        "Employee listing failed, scope resolved to nobody"
                    );
                    Visibility::nobody()
                }
            },
        };

        debug!(
            user_id = %principal.user_id,
            visible = visibility.employee_ids().map_or(0, BTreeSet::len),
            "Scope resolved"
        );

        Ok(visibility)
    }
}
