// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The identity a request is made under.
//!
//! Identity and authorization are established by the caller. This crate
//! only uses the tenant to scope every lookup and the user to attribute
//! audit events and derive closure signatures.

use fleet_maint_audit::Actor;
use fleet_maint_domain::UserRole;

/// An authenticated fleet user acting within one tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The tenant every operation is scoped to.
    pub tenant_id: i64,
    /// The acting user.
    pub user_id: i64,
    /// The role the caller authenticated the user with.
    pub role: UserRole,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `tenant_id` - The tenant the actor belongs to
    /// * `user_id` - The acting user
    /// * `role` - The user's role
    #[must_use]
    pub const fn new(tenant_id: i64, user_id: i64, role: UserRole) -> Self {
        Self {
            tenant_id,
            user_id,
            role,
        }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::user(self.user_id)
    }
}
