// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fleet_maint::CoreError;
use fleet_maint_domain::DomainError;
use fleet_maint_persistence::PersistenceError;
use thiserror::Error;

/// API-level errors.
///
/// These are distinct from domain, core and persistence errors and represent
/// the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found in the tenant.
    #[error("{resource} not found: {message}")]
    NotFound {
        /// The type of resource that was not found.
        resource: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request conflicts with the current state.
    #[error("Conflict ({rule}): {message}")]
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The store failed to commit. Nothing was written and the request may be retried.
    #[error("Integrity error: {message}")]
    Integrity {
        /// A description of the failure.
        message: String,
    },
}

fn validation(field: &str, err: &DomainError) -> ApiError {
    ApiError::Validation {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn not_found(resource: &str, err: &DomainError) -> ApiError {
    ApiError::NotFound {
        resource: resource.to_string(),
        message: err.to_string(),
    }
}

fn conflict(rule: &str, err: &DomainError) -> ApiError {
    ApiError::Conflict {
        rule: rule.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidPlanName(_) => validation("name", &err),
        DomainError::EmptyIntervals | DomainError::InvalidSequenceOrder { .. } => {
            validation("intervals", &err)
        }
        DomainError::DuplicateSequenceOrder(_) => validation("sequence_order", &err),
        DomainError::InvalidThreshold { field, .. } | DomainError::InvalidCounter { field, .. } => {
            validation(field, &err)
        }
        DomainError::EmptyActivities
        | DomainError::InvalidActivityDescription { .. }
        | DomainError::UnknownIntervalSequence { .. } => validation("activities", &err),
        DomainError::InvalidActivityCode(_) => validation("code", &err),
        DomainError::EmptyItemDescription => validation("description", &err),
        DomainError::WorkshopRequired => validation("workshop_id", &err),
        DomainError::InvalidWorkOrderType(_) => validation("order_type", &err),
        DomainError::InvalidStatus(_) => validation("status", &err),
        DomainError::InvalidRole(_) => validation("role", &err),
        DomainError::InvalidCost(_) => validation("cost", &err),
        DomainError::InvalidLaborHours(_) => validation("labor_hours", &err),
        DomainError::UnknownIntervalId(_) => not_found("Interval", &err),
        DomainError::PlanNotFound(_) => not_found("Plan", &err),
        DomainError::VehicleNotFound(_) => not_found("Vehicle", &err),
        DomainError::WorkshopNotFound(_) => not_found("Workshop", &err),
        DomainError::UserNotFound(_) => not_found("User", &err),
        DomainError::WorkOrderNotFound(_) => not_found("Work order", &err),
        DomainError::WorkOrderItemNotFound { .. } => not_found("Work order item", &err),
        DomainError::DuplicateActivityCode(_) => conflict("activity_code_unique", &err),
        DomainError::MatrixPlanMismatch { .. } => conflict("matrix_same_plan", &err),
        DomainError::PlanActive(_) => conflict("plan_inactive_for_delete", &err),
        DomainError::InvalidWorkOrderTransition { .. } => conflict("work_order_transition", &err),
        DomainError::InvalidItemTransition { .. } => conflict("item_transition", &err),
        DomainError::WorkOrderTerminal { .. } => conflict("work_order_terminal", &err),
        DomainError::PendingItemsRemain { .. } => conflict("no_pending_items_on_close", &err),
        DomainError::WorkOrderNotDeletable { .. } => conflict("work_order_deletable", &err),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        // Another tenant's entity is reported as absent.
        CoreError::TenantMismatch { .. } => ApiError::NotFound {
            resource: String::from("Entity"),
            message: String::from("Entity does not exist in this tenant"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Missing rows become `NotFound`, constraint failures become `Conflict` and
/// every other failure is an `Integrity` error: the transaction rolled back.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::PlanNotFound(id) => translate_domain_error(DomainError::PlanNotFound(id)),
        PersistenceError::VehicleNotFound(id) => {
            translate_domain_error(DomainError::VehicleNotFound(id))
        }
        PersistenceError::WorkOrderNotFound(id) => {
            translate_domain_error(DomainError::WorkOrderNotFound(id))
        }
        PersistenceError::NotFound(message) => ApiError::NotFound {
            resource: String::from("Record"),
            message,
        },
        PersistenceError::ConstraintViolation(message) => ApiError::Conflict {
            rule: String::from("unique_constraint"),
            message,
        },
        PersistenceError::ForeignKeyViolation(message) => ApiError::Conflict {
            rule: String::from("referential_integrity"),
            message,
        },
        PersistenceError::IncompleteWrite(message) => ApiError::Integrity { message },
        other => ApiError::Integrity {
            message: other.to_string(),
        },
    }
}
