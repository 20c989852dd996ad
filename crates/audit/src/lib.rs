// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Represents the entity performing an action.
///
/// Users act through the operation surface; import tooling and other
/// automated producers act as `system`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (`user` or `system`).
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates an actor for a fleet user.
    #[must_use]
    pub fn user(user_id: i64) -> Self {
        Self::new(user_id.to_string(), String::from("user"))
    }

    /// Creates an actor for an automated producer.
    #[must_use]
    pub fn system(name: &str) -> Self {
        Self::new(name.to_string(), String::from("system"))
    }

    /// Returns the user identifier when this actor is a user.
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        if self.actor_type == "user" {
            self.id.parse().ok()
        } else {
            None
        }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, import batch).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`CloseWorkOrder`", "`DuplicatePlan`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A string rendering of an entity's state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Snapshot used when the entity did not exist before, or no longer exists after.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(String::from("absent"))
    }
}

/// The kind of entity an audit event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A maintenance plan, including its intervals, activities and matrix.
    Plan,
    /// A work order, including its items and signatures.
    WorkOrder,
}

impl EntityKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plan => "PLAN",
            Self::WorkOrder => "WORK_ORDER",
        }
    }

    /// Parses a stored entity kind.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PLAN" => Some(Self::Plan),
            "WORK_ORDER" => Some(Self::WorkOrder),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The tenant and entity an audit event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditScope {
    /// The owning tenant.
    pub tenant_id: i64,
    /// The kind of entity.
    pub entity_kind: EntityKind,
    /// The entity identifier. `None` until a newly created entity is persisted.
    pub entity_id: Option<i64>,
}

impl AuditScope {
    /// Creates a new scope.
    #[must_use]
    pub const fn new(tenant_id: i64, entity_kind: EntityKind, entity_id: Option<i64>) -> Self {
        Self {
            tenant_id,
            entity_kind,
            entity_id,
        }
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful state change produces exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Which entity changed (scope)
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before and after the transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The tenant and entity this event is about.
    pub scope: AuditScope,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `scope` - The tenant and entity that changed
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        scope: AuditScope,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            scope,
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// Returns this event bound to a persisted entity identifier.
    #[must_use]
    pub const fn with_entity_id(mut self, entity_id: i64) -> Self {
        self.scope.entity_id = Some(entity_id);
        self
    }
}
