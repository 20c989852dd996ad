// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Each handler scopes every lookup to the actor's tenant, plans the change
//! with the pure core, and hands the result to persistence, which commits
//! it in one transaction.

use fleet_maint::{
    Closer, Command, ItemUpdate, PlanCreation, PlanReplacement, TransitionResult,
    WorkOrderCreation, WorkOrderState, apply, apply_deletion, plan_activation, plan_creation,
    plan_deletion, plan_duplicate, plan_replacement, plan_work_order,
};
use fleet_maint_audit::{Actor, AuditEvent, Cause};
use fleet_maint_domain::{
    DomainError, FleetUser, MaintenancePlan, MaintenancePrediction, PlanSource, Vehicle,
    WorkOrderType, Workshop, baseline_from, predict_maintenance, resolve_plan_for_vehicle,
};
use fleet_maint_persistence::SqlitePersistence;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::auth::AuthenticatedActor;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    CancelWorkOrderRequest, CloseWorkOrderRequest, CreatePlanRequest, CreateWorkOrderRequest,
    DeletePlanResponse, DeleteWorkOrderResponse, DuplicatePlanRequest, ListPlansRequest,
    ListPlansResponse, ListWorkOrdersRequest, ListWorkOrdersResponse, PlanInfo, PlanResponse,
    PredictionResponse, StartWorkOrderRequest, UpdatePlanRequest, UpdateWorkOrderItemRequest,
    WorkOrderResponse,
};

// ============================================================================
// Lookups
// ============================================================================

fn load_plan(
    persistence: &mut SqlitePersistence,
    tenant_id: i64,
    plan_id: i64,
) -> Result<MaintenancePlan, ApiError> {
    persistence
        .get_plan(tenant_id, plan_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::PlanNotFound(plan_id)))
}

fn load_vehicle(
    persistence: &mut SqlitePersistence,
    tenant_id: i64,
    vehicle_id: i64,
) -> Result<Vehicle, ApiError> {
    persistence
        .get_vehicle(tenant_id, vehicle_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::VehicleNotFound(vehicle_id)))
}

fn load_work_order(
    persistence: &mut SqlitePersistence,
    tenant_id: i64,
    work_order_id: i64,
) -> Result<WorkOrderState, ApiError> {
    persistence
        .get_work_order(tenant_id, work_order_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::WorkOrderNotFound(work_order_id)))
}

/// Resolves the plan for a vehicle and predicts against it.
///
/// Returns `None` when no plan applies.
fn forecast_for_vehicle(
    persistence: &mut SqlitePersistence,
    vehicle: &Vehicle,
) -> Result<Option<(PlanSource, MaintenancePlan, MaintenancePrediction)>, ApiError> {
    let plans: Vec<MaintenancePlan> = persistence
        .list_plans(vehicle.tenant_id, None, None)
        .map_err(translate_persistence_error)?;
    let Some((source, plan)) = resolve_plan_for_vehicle(vehicle, &plans) else {
        return Ok(None);
    };

    let last_completed: Option<WorkOrderState> = persistence
        .get_last_completed_work_order(vehicle.tenant_id, vehicle.vehicle_id)
        .map_err(translate_persistence_error)?;
    let prediction: MaintenancePrediction = predict_maintenance(
        vehicle,
        plan,
        last_completed.as_ref().map(|state| &state.order),
    );

    debug!(
        vehicle_id = vehicle.vehicle_id,
        plan_id = plan.plan_id,
        ?source,
        intervals = prediction.due_or_upcoming.len(),
        activities = prediction.applicable_activities.len(),
        "Predicted maintenance"
    );
    Ok(Some((source, plan.clone(), prediction)))
}

fn plan_response(plan: MaintenancePlan, message: String) -> PlanResponse {
    PlanResponse { plan, message }
}

fn work_order_response(state: WorkOrderState, message: String) -> WorkOrderResponse {
    WorkOrderResponse {
        work_order: state.order,
        items: state.items,
        signatures: state.signatures,
        message,
    }
}

// ============================================================================
// Plan Catalog
// ============================================================================

/// Creates a plan with its intervals, activities and matrix.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The plan as submitted
/// * `authenticated_actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty, or there are no intervals or no activities
/// - A threshold is negative or not finite
/// - Sequence orders or activity codes are not unique
/// - An activity references an unknown sequence order
/// - The transaction fails
pub fn create_plan(
    persistence: &mut SqlitePersistence,
    request: &CreatePlanRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PlanResponse, ApiError> {
    let tenant_id: i64 = authenticated_actor.tenant_id;
    let creation: PlanCreation = plan_creation(
        tenant_id,
        &request.to_draft(),
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let plan: MaintenancePlan = persistence
        .create_plan(tenant_id, &creation, OffsetDateTime::now_utc())
        .map_err(translate_persistence_error)?;

    info!(tenant_id, plan_id = plan.plan_id, "Created plan");
    let message: String = format!(
        "Created plan '{}' with {} intervals and {} activities",
        plan.name,
        plan.intervals.len(),
        plan.activities.len()
    );
    Ok(plan_response(plan, message))
}

/// Retrieves a plan with intervals in sequence order and activities joined
/// to their matrix rows.
///
/// # Errors
///
/// Returns `NotFound` if the plan is not in the actor's tenant.
pub fn get_plan(
    persistence: &mut SqlitePersistence,
    plan_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<PlanResponse, ApiError> {
    let plan: MaintenancePlan = load_plan(persistence, authenticated_actor.tenant_id, plan_id)?;
    let message: String = format!("Plan '{}'", plan.name);
    Ok(plan_response(plan, message))
}

/// Lists the plans of the actor's tenant.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_plans(
    persistence: &mut SqlitePersistence,
    request: &ListPlansRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListPlansResponse, ApiError> {
    let plans: Vec<MaintenancePlan> = persistence
        .list_plans(
            authenticated_actor.tenant_id,
            request.vehicle_type.as_deref(),
            request.is_active,
        )
        .map_err(translate_persistence_error)?;

    Ok(ListPlansResponse {
        plans: plans.iter().map(PlanInfo::from).collect(),
    })
}

/// Replaces a plan's header, intervals and/or activities.
///
/// A new interval list recreates all intervals. A new activity list updates
/// activities by code and creates the rest. Matrix rows are always rebuilt.
///
/// # Errors
///
/// Returns an error if:
/// - The plan is not in the actor's tenant
/// - Any replacement list fails validation
/// - An activity references an interval id of another plan
/// - The transaction fails
pub fn update_plan(
    persistence: &mut SqlitePersistence,
    plan_id: i64,
    request: &UpdatePlanRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PlanResponse, ApiError> {
    let tenant_id: i64 = authenticated_actor.tenant_id;
    let current: MaintenancePlan = load_plan(persistence, tenant_id, plan_id)?;

    let replacement: PlanReplacement = plan_replacement(
        &current,
        &request.to_update(),
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let plan: MaintenancePlan = persistence
        .replace_plan(tenant_id, &replacement, OffsetDateTime::now_utc())
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id,
        plan_id,
        intervals_replaced = replacement.intervals.is_some(),
        activity_changes = replacement.activity_changes.len(),
        "Updated plan"
    );
    let message: String = format!("Updated plan '{}'", plan.name);
    Ok(plan_response(plan, message))
}

fn set_plan_active(
    persistence: &mut SqlitePersistence,
    plan_id: i64,
    is_active: bool,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PlanResponse, ApiError> {
    let tenant_id: i64 = authenticated_actor.tenant_id;
    let current: MaintenancePlan = load_plan(persistence, tenant_id, plan_id)?;
    let event: AuditEvent = plan_activation(
        &current,
        is_active,
        authenticated_actor.to_audit_actor(),
        cause,
    );

    let plan: MaintenancePlan = persistence
        .set_plan_active(tenant_id, plan_id, is_active, &event, OffsetDateTime::now_utc())
        .map_err(translate_persistence_error)?;

    info!(tenant_id, plan_id, is_active, "Changed plan activation");
    let message: String = if is_active {
        format!("Activated plan '{}'", plan.name)
    } else {
        format!("Deactivated plan '{}'", plan.name)
    };
    Ok(plan_response(plan, message))
}

/// Activates a plan. Other plans are not affected.
///
/// # Errors
///
/// Returns `NotFound` if the plan is not in the actor's tenant.
pub fn activate_plan(
    persistence: &mut SqlitePersistence,
    plan_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PlanResponse, ApiError> {
    set_plan_active(persistence, plan_id, true, authenticated_actor, cause)
}

/// Deactivates a plan. Other plans are not affected.
///
/// # Errors
///
/// Returns `NotFound` if the plan is not in the actor's tenant.
pub fn deactivate_plan(
    persistence: &mut SqlitePersistence,
    plan_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PlanResponse, ApiError> {
    set_plan_active(persistence, plan_id, false, authenticated_actor, cause)
}

/// Deletes an inactive plan with its intervals, activities and matrix.
///
/// # Errors
///
/// Returns an error if:
/// - The plan is not in the actor's tenant
/// - The plan is active (`Conflict`)
/// - The transaction fails
pub fn delete_plan(
    persistence: &mut SqlitePersistence,
    plan_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<DeletePlanResponse, ApiError> {
    let tenant_id: i64 = authenticated_actor.tenant_id;
    let current: MaintenancePlan = load_plan(persistence, tenant_id, plan_id)?;
    let event: AuditEvent = plan_deletion(&current, authenticated_actor.to_audit_actor(), cause)
        .map_err(translate_core_error)?;

    persistence
        .delete_plan(tenant_id, plan_id, &event, OffsetDateTime::now_utc())
        .map_err(translate_persistence_error)?;

    info!(tenant_id, plan_id, "Deleted plan");
    Ok(DeletePlanResponse {
        plan_id,
        message: format!("Deleted plan '{}'", current.name),
    })
}

/// Copies a plan under a new identity, inactive.
///
/// Intervals are cloned by sequence order and every matrix row is remapped
/// onto the copied interval with the same sequence order.
///
/// # Errors
///
/// Returns an error if:
/// - The source plan is not in the actor's tenant
/// - An explicit name is empty
/// - The transaction fails
pub fn duplicate_plan(
    persistence: &mut SqlitePersistence,
    plan_id: i64,
    request: &DuplicatePlanRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PlanResponse, ApiError> {
    let tenant_id: i64 = authenticated_actor.tenant_id;
    let source: MaintenancePlan = load_plan(persistence, tenant_id, plan_id)?;
    let creation: PlanCreation = plan_duplicate(
        &source,
        request.name.as_deref(),
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let plan: MaintenancePlan = persistence
        .create_plan(tenant_id, &creation, OffsetDateTime::now_utc())
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id,
        source_plan_id = plan_id,
        plan_id = plan.plan_id,
        "Duplicated plan"
    );
    let message: String = format!("Duplicated plan '{}' as '{}'", source.name, plan.name);
    Ok(plan_response(plan, message))
}

// ============================================================================
// Maintenance Predictor
// ============================================================================

/// Predicts the next maintenance of a vehicle.
///
/// Resolves the vehicle's plan (direct reference, then vehicle type, then
/// any active plan of the tenant) and measures each interval from the start
/// counters of the last completed work order.
///
/// # Errors
///
/// Returns `NotFound` if the vehicle is not in the actor's tenant.
pub fn predict_next_maintenance(
    persistence: &mut SqlitePersistence,
    vehicle_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<PredictionResponse, ApiError> {
    let vehicle: Vehicle = load_vehicle(persistence, authenticated_actor.tenant_id, vehicle_id)?;

    let Some((source, plan, prediction)) = forecast_for_vehicle(persistence, &vehicle)? else {
        return Ok(PredictionResponse {
            vehicle_id,
            plan_id: None,
            plan_name: None,
            plan_source: None,
            current: vehicle.counters(),
            baseline: baseline_from(None),
            due_or_upcoming: Vec::new(),
            applicable_activities: Vec::new(),
            message: format!("No active maintenance plan applies to vehicle {}", vehicle.plate),
        });
    };

    let message: String = if prediction.has_due() {
        format!(
            "Maintenance due for vehicle {}: {} activities",
            vehicle.plate,
            prediction.applicable_activities.len()
        )
    } else if prediction.due_or_upcoming.is_empty() {
        format!("No maintenance due or upcoming for vehicle {}", vehicle.plate)
    } else {
        format!("Maintenance upcoming for vehicle {}", vehicle.plate)
    };

    Ok(PredictionResponse {
        vehicle_id,
        plan_id: Some(plan.plan_id),
        plan_name: Some(plan.name),
        plan_source: Some(source),
        current: vehicle.counters(),
        baseline: prediction.baseline,
        due_or_upcoming: prediction.due_or_upcoming,
        applicable_activities: prediction.applicable_activities,
        message,
    })
}

// ============================================================================
// Work Order Lifecycle
// ============================================================================

/// Creates a work order under the tenant's next number.
///
/// Preventive orders are seeded with one pending item per activity the
/// prediction finds applicable. When no plan applies, the order is created
/// without seeded items.
///
/// # Errors
///
/// Returns an error if:
/// - The vehicle is not in the actor's tenant
/// - An external order names no workshop, or one that is unknown or inactive
/// - A start counter is negative
/// - An ad-hoc item has an empty description
/// - The transaction fails
pub fn create_work_order(
    persistence: &mut SqlitePersistence,
    request: &CreateWorkOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<WorkOrderResponse, ApiError> {
    let tenant_id: i64 = authenticated_actor.tenant_id;
    let vehicle: Vehicle = load_vehicle(persistence, tenant_id, request.vehicle_id)?;

    let workshop: Option<Workshop> = match request.workshop_id {
        Some(workshop_id) => persistence
            .get_active_workshop(tenant_id, workshop_id)
            .map_err(translate_persistence_error)?,
        None => None,
    };

    let forecast: Option<(PlanSource, MaintenancePlan, MaintenancePrediction)> =
        if request.order_type == WorkOrderType::Preventive {
            let forecast = forecast_for_vehicle(persistence, &vehicle)?;
            if forecast.is_none() {
                warn!(
                    tenant_id,
                    vehicle_id = vehicle.vehicle_id,
                    "No active plan found, creating work order without seeded items"
                );
            }
            forecast
        } else {
            None
        };
    let seed: Option<(i64, &MaintenancePrediction)> = forecast
        .as_ref()
        .map(|(_, plan, prediction)| (plan.plan_id, prediction));

    let creation: WorkOrderCreation = plan_work_order(
        tenant_id,
        request.to_command(),
        &vehicle,
        workshop.as_ref(),
        seed,
        authenticated_actor.to_audit_actor(),
        cause,
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    let state: WorkOrderState = persistence
        .create_work_order(&creation)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id,
        work_order_id = state.order.work_order_id,
        number = state.order.number,
        items = state.items.len(),
        "Created work order"
    );
    let message: String = format!(
        "Created work order #{} with {} items",
        state.order.number,
        state.items.len()
    );
    Ok(work_order_response(state, message))
}

/// Loads, transitions and persists a work order.
fn transition(
    persistence: &mut SqlitePersistence,
    work_order_id: i64,
    command: Command,
    actor: Actor,
    tenant_id: i64,
    cause: Cause,
) -> Result<WorkOrderState, ApiError> {
    let current: WorkOrderState = load_work_order(persistence, tenant_id, work_order_id)?;
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let result: TransitionResult =
        apply(&current, command, actor, cause, now).map_err(translate_core_error)?;

    persistence
        .persist_transition(&result, now)
        .map_err(translate_persistence_error)
}

/// Starts a pending work order.
///
/// # Errors
///
/// Returns an error if:
/// - The order is not in the actor's tenant
/// - The order is not `Pending` (`Conflict`)
/// - The transaction fails
pub fn start_work_order(
    persistence: &mut SqlitePersistence,
    work_order_id: i64,
    request: &StartWorkOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<WorkOrderResponse, ApiError> {
    let state: WorkOrderState = transition(
        persistence,
        work_order_id,
        Command::StartWorkOrder {
            operator_id: request.operator_id,
        },
        authenticated_actor.to_audit_actor(),
        authenticated_actor.tenant_id,
        cause,
    )?;

    let message: String = format!("Started work order #{}", state.order.number);
    Ok(work_order_response(state, message))
}

/// Updates one item of a work order.
///
/// # Errors
///
/// Returns an error if:
/// - The order or item is not found
/// - The order is completed or cancelled (`Conflict`)
/// - The item status change is not allowed (`Conflict`)
/// - Labor hours or cost are invalid
/// - The transaction fails
pub fn update_work_order_item(
    persistence: &mut SqlitePersistence,
    work_order_id: i64,
    request: &UpdateWorkOrderItemRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<WorkOrderResponse, ApiError> {
    let update: ItemUpdate = ItemUpdate {
        status: request.status,
        observations: request.observations.clone(),
        parts_used: request.parts_used.clone(),
        labor_hours: request.labor_hours,
        cost: request.cost,
    };
    let state: WorkOrderState = transition(
        persistence,
        work_order_id,
        Command::UpdateItem {
            item_id: request.item_id,
            update,
        },
        authenticated_actor.to_audit_actor(),
        authenticated_actor.tenant_id,
        cause,
    )?;

    let message: String = format!(
        "Updated item {} of work order #{}",
        request.item_id, state.order.number
    );
    Ok(work_order_response(state, message))
}

/// Closes an in-progress work order and signs it as the acting user.
///
/// The signature type follows the user's stored role. Closing writes the
/// order's start counters and the closing date back to the vehicle.
///
/// # Errors
///
/// Returns an error if:
/// - The order or the acting user is not in the actor's tenant
/// - The order is not `InProgress` (`Conflict`)
/// - Any item is still pending (`Conflict`)
/// - The transaction fails
pub fn close_work_order(
    persistence: &mut SqlitePersistence,
    work_order_id: i64,
    request: &CloseWorkOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<WorkOrderResponse, ApiError> {
    let tenant_id: i64 = authenticated_actor.tenant_id;
    let user: FleetUser = persistence
        .get_user(tenant_id, authenticated_actor.user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| {
            translate_domain_error(DomainError::UserNotFound(authenticated_actor.user_id))
        })?;

    let closer: Closer = Closer {
        user_id: user.user_id,
        role: user.role,
        ip_address: request.ip_address.clone(),
        user_agent: request.user_agent.clone(),
    };
    let state: WorkOrderState = transition(
        persistence,
        work_order_id,
        Command::CloseWorkOrder { closer },
        authenticated_actor.to_audit_actor(),
        tenant_id,
        cause,
    )?;

    info!(
        tenant_id,
        work_order_id,
        total_cost = %state.order.total_cost,
        "Closed work order"
    );
    let message: String = format!(
        "Closed work order #{} with total cost {}",
        state.order.number, state.order.total_cost
    );
    Ok(work_order_response(state, message))
}

/// Cancels a pending or in-progress work order.
///
/// Cancelling an already cancelled order returns it unchanged.
///
/// # Errors
///
/// Returns an error if:
/// - The order is not in the actor's tenant
/// - The order is completed (`Conflict`)
/// - The transaction fails
pub fn cancel_work_order(
    persistence: &mut SqlitePersistence,
    work_order_id: i64,
    request: &CancelWorkOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<WorkOrderResponse, ApiError> {
    let state: WorkOrderState = transition(
        persistence,
        work_order_id,
        Command::CancelWorkOrder {
            reason: request.reason.clone(),
        },
        authenticated_actor.to_audit_actor(),
        authenticated_actor.tenant_id,
        cause,
    )?;

    let message: String = format!("Work order #{} is cancelled", state.order.number);
    Ok(work_order_response(state, message))
}

/// Deletes a pending or cancelled work order with its items and signatures.
///
/// # Errors
///
/// Returns an error if:
/// - The order is not in the actor's tenant
/// - The order is in progress or completed (`Conflict`)
/// - The transaction fails
pub fn delete_work_order(
    persistence: &mut SqlitePersistence,
    work_order_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<DeleteWorkOrderResponse, ApiError> {
    let tenant_id: i64 = authenticated_actor.tenant_id;
    let current: WorkOrderState = load_work_order(persistence, tenant_id, work_order_id)?;
    let event: AuditEvent = apply_deletion(&current, authenticated_actor.to_audit_actor(), cause)
        .map_err(translate_core_error)?;

    persistence
        .delete_work_order(tenant_id, work_order_id, &event, OffsetDateTime::now_utc())
        .map_err(translate_persistence_error)?;

    Ok(DeleteWorkOrderResponse {
        work_order_id,
        number: current.order.number,
        message: format!("Deleted work order #{}", current.order.number),
    })
}

/// Retrieves a work order with its items and signatures.
///
/// # Errors
///
/// Returns `NotFound` if the order is not in the actor's tenant.
pub fn get_work_order(
    persistence: &mut SqlitePersistence,
    work_order_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<WorkOrderResponse, ApiError> {
    let state: WorkOrderState =
        load_work_order(persistence, authenticated_actor.tenant_id, work_order_id)?;
    let message: String = format!("Work order #{}", state.order.number);
    Ok(work_order_response(state, message))
}

/// Lists work order headers of the actor's tenant.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_work_orders(
    persistence: &mut SqlitePersistence,
    request: &ListWorkOrdersRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListWorkOrdersResponse, ApiError> {
    let work_orders = persistence
        .list_work_orders(
            authenticated_actor.tenant_id,
            request.vehicle_id,
            request.status,
        )
        .map_err(translate_persistence_error)?;
    Ok(ListWorkOrdersResponse { work_orders })
}
