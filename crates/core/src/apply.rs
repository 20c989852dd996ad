// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Closer, Command, ItemUpdate};
use crate::error::CoreError;
use crate::state::{NewSignature, TransitionResult, VehicleUsageUpdate, WorkOrderState};
use fleet_maint_audit::{Action, Actor, AuditEvent, AuditScope, Cause, EntityKind, StateSnapshot};
use fleet_maint_domain::{
    DomainError, SignatureType, WorkOrder, WorkOrderItem, WorkOrderItemStatus, WorkOrderStatus,
    validate_cost, validate_labor_hours,
};
use rust_decimal::Decimal;
use time::OffsetDateTime;

fn work_order_scope(order: &WorkOrder) -> AuditScope {
    AuditScope::new(
        order.tenant_id,
        EntityKind::WorkOrder,
        Some(order.work_order_id),
    )
}

fn ensure_transition(order: &WorkOrder, target: WorkOrderStatus) -> Result<(), DomainError> {
    if order.status.can_transition_to(target) {
        Ok(())
    } else {
        Err(DomainError::InvalidWorkOrderTransition {
            current: order.status,
            target,
        })
    }
}

/// Sums item costs, counting missing costs as zero.
#[must_use]
pub fn total_cost(items: &[WorkOrderItem]) -> Decimal {
    items
        .iter()
        .map(|i| i.cost.unwrap_or(Decimal::ZERO))
        .sum()
}

fn apply_item_update(
    state: &WorkOrderState,
    item_id: i64,
    update: ItemUpdate,
    now: OffsetDateTime,
) -> Result<(WorkOrderState, String), DomainError> {
    let order: &WorkOrder = &state.order;
    if order.status.is_terminal() {
        return Err(DomainError::WorkOrderTerminal {
            number: order.number,
            status: order.status,
        });
    }

    let position: usize = state
        .items
        .iter()
        .position(|i| i.item_id == item_id)
        .ok_or(DomainError::WorkOrderItemNotFound {
            work_order_id: order.work_order_id,
            item_id,
        })?;

    let mut item: WorkOrderItem = state.items[position].clone();
    let target: WorkOrderItemStatus = update.status.unwrap_or(item.status);
    if !item.status.can_transition_to(target) {
        return Err(DomainError::InvalidItemTransition {
            item_id,
            current: item.status,
            target,
        });
    }
    if let Some(hours) = update.labor_hours {
        validate_labor_hours(hours)?;
    }
    if let Some(cost) = update.cost {
        validate_cost(cost)?;
    }

    let details: String = format!("item {item_id}: {} -> {target}", item.status);
    item.status = target;
    if update.observations.is_some() {
        item.observations = update.observations;
    }
    if update.parts_used.is_some() {
        item.parts_used = update.parts_used;
    }
    if update.labor_hours.is_some() {
        item.labor_hours = update.labor_hours;
    }
    if update.cost.is_some() {
        item.cost = update.cost;
    }
    // Stamped on first entry into Completed only; reopening keeps the stamp.
    if target == WorkOrderItemStatus::Completed && item.completed_at.is_none() {
        item.completed_at = Some(now);
    }

    let mut new_state: WorkOrderState = state.clone();
    new_state.items[position] = item;
    Ok((new_state, details))
}

fn signature_for(closer: Closer, now: OffsetDateTime) -> NewSignature {
    NewSignature {
        user_id: closer.user_id,
        role: closer.role,
        signature_type: SignatureType::for_role(closer.role),
        ip_address: closer.ip_address,
        user_agent: closer.user_agent,
        signed_at: now,
    }
}

fn append_note(notes: Option<&str>, line: &str) -> String {
    match notes {
        Some(existing) if !existing.trim().is_empty() => format!("{existing}\n{line}"),
        _ => line.to_string(),
    }
}

/// Applies a command to a work order, producing a new state and audit event.
///
/// # Arguments
///
/// * `state` - The current work order with items and signatures (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The transition time
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The status transition is not allowed
/// - An item update targets a terminal order or an unknown item
/// - Closing while items are still pending
/// - Labor hours or cost are invalid
#[allow(clippy::too_many_lines, clippy::needless_pass_by_value)]
pub fn apply(
    state: &WorkOrderState,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let before: StateSnapshot = state.to_snapshot();
    let action_name: &'static str = command.action_name();

    let mut signature: Option<NewSignature> = None;
    let mut vehicle_update: Option<VehicleUsageUpdate> = None;
    let mut changed_item_id: Option<i64> = None;

    let (new_state, details): (WorkOrderState, Option<String>) = match command {
        Command::StartWorkOrder { operator_id } => {
            ensure_transition(&state.order, WorkOrderStatus::InProgress)?;

            let mut new_state: WorkOrderState = state.clone();
            new_state.order.status = WorkOrderStatus::InProgress;
            new_state.order.started_at = Some(now);
            if operator_id.is_some() {
                new_state.order.operator_id = operator_id;
            }
            (new_state, None)
        }
        Command::UpdateItem { item_id, update } => {
            let (new_state, details) = apply_item_update(state, item_id, update, now)?;
            changed_item_id = Some(item_id);
            (new_state, Some(details))
        }
        Command::CloseWorkOrder { closer } => {
            ensure_transition(&state.order, WorkOrderStatus::Completed)?;
            let pending: usize = state.pending_items();
            if pending > 0 {
                return Err(CoreError::DomainViolation(
                    DomainError::PendingItemsRemain { pending },
                ));
            }

            let mut new_state: WorkOrderState = state.clone();
            new_state.order.status = WorkOrderStatus::Completed;
            new_state.order.completed_at = Some(now);
            new_state.order.total_cost = total_cost(&state.items);

            let sig: NewSignature = signature_for(closer, now);
            let details: String = format!(
                "signed by user {} as {}",
                sig.user_id,
                sig.signature_type.as_str()
            );
            signature = Some(sig);
            vehicle_update = Some(VehicleUsageUpdate {
                vehicle_id: state.order.vehicle_id,
                odometer: state.order.odometer_at_start,
                hourmeter: state.order.hourmeter_at_start,
                last_maintenance_at: now,
            });
            (new_state, Some(details))
        }
        Command::CancelWorkOrder { reason } => {
            if state.order.status == WorkOrderStatus::Cancelled {
                return Ok(TransitionResult {
                    new_state: state.clone(),
                    audit_event: None,
                    signature: None,
                    vehicle_update: None,
                    changed_item_id: None,
                });
            }
            ensure_transition(&state.order, WorkOrderStatus::Cancelled)?;

            let mut new_state: WorkOrderState = state.clone();
            new_state.order.status = WorkOrderStatus::Cancelled;
            new_state.order.completed_at = Some(now);
            if let Some(reason) = reason.as_deref() {
                new_state.order.notes = Some(append_note(
                    state.order.notes.as_deref(),
                    &format!("Cancelled: {reason}"),
                ));
            }
            (new_state, reason)
        }
    };

    let after: StateSnapshot = new_state.to_snapshot();
    let audit_event: AuditEvent = AuditEvent::new(
        work_order_scope(&state.order),
        actor,
        cause,
        Action::new(String::from(action_name), details),
        before,
        after,
    );

    Ok(TransitionResult {
        new_state,
        audit_event: Some(audit_event),
        signature,
        vehicle_update,
        changed_item_id,
    })
}

/// Checks that a work order may be deleted and records the deletion.
///
/// # Errors
///
/// Returns an error if the order is neither `Pending` nor `Cancelled`.
pub fn apply_deletion(
    state: &WorkOrderState,
    actor: Actor,
    cause: Cause,
) -> Result<AuditEvent, CoreError> {
    if !state.order.status.is_deletable() {
        return Err(CoreError::DomainViolation(
            DomainError::WorkOrderNotDeletable {
                number: state.order.number,
                status: state.order.status,
            },
        ));
    }

    Ok(AuditEvent::new(
        work_order_scope(&state.order),
        actor,
        cause,
        Action::new(
            String::from("DeleteWorkOrder"),
            Some(format!(
                "deleted {} items and {} signatures",
                state.items.len(),
                state.signatures.len()
            )),
        ),
        state.to_snapshot(),
        StateSnapshot::absent(),
    ))
}
