// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work order creation planning.
//!
//! Everything except number assignment and storage identifiers is decided
//! here, before the persistence layer opens its transaction.

use crate::error::CoreError;
use fleet_maint_audit::{Action, Actor, AuditEvent, AuditScope, Cause, EntityKind, StateSnapshot};
use fleet_maint_domain::{
    DomainError, MaintenancePrediction, Vehicle, WorkOrderType, Workshop, validate_counter,
};
use time::OffsetDateTime;

/// An item supplied by the caller rather than seeded from a prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdHocItem {
    /// What is to be done.
    pub description: String,
    /// Optional cataloged activity.
    pub activity_id: Option<i64>,
}

/// A request to open a work order.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWorkOrder {
    /// The vehicle to maintain.
    pub vehicle_id: i64,
    /// Preventive or corrective.
    pub order_type: WorkOrderType,
    /// Whether the work happens in-house.
    pub is_internal: bool,
    /// External workshop. Required when `is_internal` is false.
    pub workshop_id: Option<i64>,
    /// The operator executing the work.
    pub operator_id: Option<i64>,
    /// The supervising user.
    pub supervisor_id: Option<i64>,
    /// Odometer reading at opening. Defaults to the vehicle's current reading.
    pub odometer_at_start: Option<f64>,
    /// Hourmeter reading at opening. Defaults to the vehicle's current reading.
    pub hourmeter_at_start: Option<f64>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Caller-supplied items.
    pub items: Vec<AdHocItem>,
}

/// The header of a work order that has not been numbered yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkOrder {
    /// The owning tenant.
    pub tenant_id: i64,
    /// The vehicle being maintained.
    pub vehicle_id: i64,
    /// Preventive or corrective.
    pub order_type: WorkOrderType,
    /// The plan that seeded the items.
    pub plan_id: Option<i64>,
    /// Odometer reading at opening.
    pub odometer_at_start: Option<f64>,
    /// Hourmeter reading at opening.
    pub hourmeter_at_start: Option<f64>,
    /// The operator executing the work.
    pub operator_id: Option<i64>,
    /// The supervising user.
    pub supervisor_id: Option<i64>,
    /// Whether the work happens in-house.
    pub is_internal: bool,
    /// External workshop.
    pub workshop_id: Option<i64>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// The creating user.
    pub created_by: Option<i64>,
    /// Creation time.
    pub created_at: OffsetDateTime,
}

/// An item that has not been stored yet. Always starts `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkOrderItem {
    /// The cataloged activity, if any.
    pub activity_id: Option<i64>,
    /// What is to be done.
    pub description: String,
}

/// Everything needed to write a new work order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrderCreation {
    /// The order header.
    pub order: NewWorkOrder,
    /// Items in insertion order.
    pub items: Vec<NewWorkOrderItem>,
    /// The audit event. Its entity id is bound once the order is stored.
    pub audit_event: AuditEvent,
}

/// Validates the workshop requirement of a request.
///
/// `workshop` is the result of looking up `request.workshop_id` among the
/// active workshops of the tenant.
fn check_workshop(
    tenant_id: i64,
    request: &CreateWorkOrder,
    workshop: Option<&Workshop>,
) -> Result<Option<i64>, DomainError> {
    match request.workshop_id {
        None if request.is_internal => Ok(None),
        None => Err(DomainError::WorkshopRequired),
        Some(workshop_id) => match workshop {
            Some(w) if w.workshop_id == workshop_id && w.tenant_id == tenant_id && w.is_active => {
                Ok(Some(workshop_id))
            }
            _ => Err(DomainError::WorkshopNotFound(workshop_id)),
        },
    }
}

/// Plans a new work order.
///
/// # Arguments
///
/// * `tenant_id` - The tenant the request is scoped to
/// * `request` - The creation request
/// * `vehicle` - The vehicle, already looked up by id and tenant
/// * `workshop` - The active workshop matching `request.workshop_id`, if found
/// * `seed` - The resolved plan id and its prediction for the vehicle, when
///   a plan applies. Only preventive orders use it.
/// * `actor` - The actor creating the order
/// * `cause` - The cause of the creation
/// * `now` - Creation time
///
/// # Errors
///
/// Returns an error if:
/// - The vehicle belongs to another tenant
/// - An external order names no workshop, or an unknown/inactive one
/// - A start counter is negative
/// - An ad-hoc item has an empty description
#[allow(clippy::too_many_arguments, clippy::needless_pass_by_value)]
pub fn plan_work_order(
    tenant_id: i64,
    request: CreateWorkOrder,
    vehicle: &Vehicle,
    workshop: Option<&Workshop>,
    seed: Option<(i64, &MaintenancePrediction)>,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<WorkOrderCreation, CoreError> {
    if vehicle.tenant_id != tenant_id {
        return Err(CoreError::TenantMismatch {
            expected: tenant_id,
            actual: vehicle.tenant_id,
        });
    }
    if vehicle.vehicle_id != request.vehicle_id {
        return Err(CoreError::DomainViolation(DomainError::VehicleNotFound(
            request.vehicle_id,
        )));
    }

    let workshop_id: Option<i64> = check_workshop(tenant_id, &request, workshop)?;

    let odometer: f64 = request.odometer_at_start.unwrap_or(vehicle.odometer);
    let hourmeter: f64 = request.hourmeter_at_start.unwrap_or(vehicle.hourmeter);
    validate_counter("odometer_at_start", odometer)?;
    validate_counter("hourmeter_at_start", hourmeter)?;

    let mut items: Vec<NewWorkOrderItem> = Vec::new();
    let mut plan_id: Option<i64> = None;
    if let Some((seed_plan_id, prediction)) =
        seed.filter(|_| request.order_type == WorkOrderType::Preventive)
    {
        plan_id = Some(seed_plan_id);
        items.extend(
            prediction
                .applicable_activities
                .iter()
                .map(|a| NewWorkOrderItem {
                    activity_id: Some(a.activity_id),
                    description: a.description.clone(),
                }),
        );
    }

    for item in &request.items {
        let description: &str = item.description.trim();
        if description.is_empty() {
            return Err(CoreError::DomainViolation(DomainError::EmptyItemDescription));
        }
        items.push(NewWorkOrderItem {
            activity_id: item.activity_id,
            description: description.to_string(),
        });
    }

    let details: String = format!(
        "{} order for vehicle {} with {} items",
        request.order_type,
        vehicle.plate,
        items.len()
    );
    let audit_event: AuditEvent = AuditEvent::new(
        AuditScope::new(tenant_id, EntityKind::WorkOrder, None),
        actor.clone(),
        cause,
        Action::new(String::from("CreateWorkOrder"), Some(details)),
        StateSnapshot::absent(),
        StateSnapshot::new(format!("status=PENDING,items={}", items.len())),
    );

    Ok(WorkOrderCreation {
        order: NewWorkOrder {
            tenant_id,
            vehicle_id: vehicle.vehicle_id,
            order_type: request.order_type,
            plan_id,
            odometer_at_start: Some(odometer),
            hourmeter_at_start: Some(hourmeter),
            operator_id: request.operator_id,
            supervisor_id: request.supervisor_id,
            is_internal: request.is_internal,
            workshop_id,
            notes: request.notes,
            created_by: actor.user_id(),
            created_at: now,
        },
        items,
        audit_event,
    })
}
