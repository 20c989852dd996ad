// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_test_actor, create_test_cause, create_test_item, create_test_state, test_now,
};
use crate::{
    Closer, Command, CoreError, ItemUpdate, TransitionResult, WorkOrderState, apply,
    apply_deletion,
};
use fleet_maint_domain::{
    DomainError, SignatureType, UserRole, WorkOrderItemStatus, WorkOrderStatus,
};
use rust_decimal::Decimal;

fn create_test_closer(role: UserRole) -> Closer {
    Closer {
        user_id: 42,
        role,
        ip_address: Some(String::from("10.0.0.8")),
        user_agent: Some(String::from("fleet-tablet/2.1")),
    }
}

fn run(state: &WorkOrderState, command: Command) -> Result<TransitionResult, CoreError> {
    apply(
        state,
        command,
        create_test_actor(),
        create_test_cause(),
        test_now(),
    )
}

fn close(state: &WorkOrderState, role: UserRole) -> Result<TransitionResult, CoreError> {
    run(
        state,
        Command::CloseWorkOrder {
            closer: create_test_closer(role),
        },
    )
}

#[test]
fn test_start_moves_pending_to_in_progress() {
    let state = create_test_state(WorkOrderStatus::Pending, Vec::new());

    let result = run(
        &state,
        Command::StartWorkOrder {
            operator_id: Some(9),
        },
    )
    .unwrap();

    assert_eq!(result.new_state.order.status, WorkOrderStatus::InProgress);
    assert_eq!(result.new_state.order.started_at, Some(test_now()));
    assert_eq!(result.new_state.order.operator_id, Some(9));
    let event = result.audit_event.unwrap();
    assert_eq!(event.action.name, "StartWorkOrder");
    assert_eq!(event.scope.entity_id, Some(77));
    assert!(event.before.data.contains("status=PENDING"));
    assert!(event.after.data.contains("status=IN_PROGRESS"));
}

#[test]
fn test_start_is_rejected_outside_pending() {
    let state = create_test_state(WorkOrderStatus::InProgress, Vec::new());

    let result = run(&state, Command::StartWorkOrder { operator_id: None });

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidWorkOrderTransition {
                current: WorkOrderStatus::InProgress,
                target: WorkOrderStatus::InProgress,
            }
        ))
    );
}

#[test]
fn test_close_with_completed_and_skipped_items_sums_costs() {
    let state = create_test_state(
        WorkOrderStatus::InProgress,
        vec![
            create_test_item(1, WorkOrderItemStatus::Completed, Some(Decimal::new(50, 0))),
            create_test_item(2, WorkOrderItemStatus::Skipped, None),
        ],
    );

    let result = close(&state, UserRole::Operator).unwrap();

    assert_eq!(result.new_state.order.status, WorkOrderStatus::Completed);
    assert_eq!(result.new_state.order.total_cost, Decimal::new(50, 0));
    assert_eq!(result.new_state.order.completed_at, Some(test_now()));
}

#[test]
fn test_close_with_pending_item_fails_and_keeps_status() {
    let state = create_test_state(
        WorkOrderStatus::InProgress,
        vec![
            create_test_item(1, WorkOrderItemStatus::Completed, Some(Decimal::new(50, 0))),
            create_test_item(2, WorkOrderItemStatus::Pending, None),
        ],
    );

    let result = close(&state, UserRole::Supervisor);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::PendingItemsRemain {
            pending: 1
        }))
    );
    assert_eq!(state.order.status, WorkOrderStatus::InProgress);
}

#[test]
fn test_in_progress_items_do_not_block_close() {
    let state = create_test_state(
        WorkOrderStatus::InProgress,
        vec![create_test_item(
            1,
            WorkOrderItemStatus::InProgress,
            Some(Decimal::new(1999, 2)),
        )],
    );

    let result = close(&state, UserRole::Operator).unwrap();

    assert_eq!(result.new_state.order.total_cost, Decimal::new(1999, 2));
}

#[test]
fn test_close_requires_in_progress() {
    let state = create_test_state(WorkOrderStatus::Pending, Vec::new());

    assert!(matches!(
        close(&state, UserRole::Supervisor),
        Err(CoreError::DomainViolation(
            DomainError::InvalidWorkOrderTransition { .. }
        ))
    ));
}

#[test]
fn test_close_signature_type_follows_role() {
    let state = create_test_state(WorkOrderStatus::InProgress, Vec::new());

    let supervisor = close(&state, UserRole::Supervisor).unwrap();
    let admin = close(&state, UserRole::Admin).unwrap();
    let operator = close(&state, UserRole::Operator).unwrap();

    assert_eq!(
        supervisor.signature.unwrap().signature_type,
        SignatureType::Supervisor
    );
    assert_eq!(
        admin.signature.unwrap().signature_type,
        SignatureType::Supervisor
    );
    let signature = operator.signature.unwrap();
    assert_eq!(signature.signature_type, SignatureType::Operator);
    assert_eq!(signature.ip_address.as_deref(), Some("10.0.0.8"));
    assert_eq!(signature.signed_at, test_now());
}

#[test]
fn test_close_writes_back_start_counters() {
    let mut state = create_test_state(WorkOrderStatus::InProgress, Vec::new());
    state.order.hourmeter_at_start = None;

    let update = close(&state, UserRole::Operator)
        .unwrap()
        .vehicle_update
        .unwrap();

    assert_eq!(update.vehicle_id, 5);
    assert_eq!(update.odometer, Some(20_500.0));
    assert_eq!(update.hourmeter, None);
    assert_eq!(update.last_maintenance_at, test_now());
}

#[test]
fn test_cancel_completed_is_rejected() {
    let state = create_test_state(WorkOrderStatus::Completed, Vec::new());

    let result = run(
        &state,
        Command::CancelWorkOrder {
            reason: Some(String::from("too late")),
        },
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidWorkOrderTransition {
                current: WorkOrderStatus::Completed,
                target: WorkOrderStatus::Cancelled,
            }
        ))
    );
}

#[test]
fn test_cancel_cancelled_is_noop() {
    let state = create_test_state(WorkOrderStatus::Cancelled, Vec::new());

    let result = run(
        &state,
        Command::CancelWorkOrder {
            reason: Some(String::from("again")),
        },
    )
    .unwrap();

    assert!(result.is_noop());
    assert_eq!(result.new_state, state);
}

#[test]
fn test_cancel_appends_reason_and_stamps_completion() {
    let mut state = create_test_state(WorkOrderStatus::InProgress, Vec::new());
    state.order.notes = Some(String::from("Noise from rear axle"));

    let result = run(
        &state,
        Command::CancelWorkOrder {
            reason: Some(String::from("vehicle sold")),
        },
    )
    .unwrap();

    assert_eq!(result.new_state.order.status, WorkOrderStatus::Cancelled);
    assert_eq!(result.new_state.order.completed_at, Some(test_now()));
    assert_eq!(
        result.new_state.order.notes.as_deref(),
        Some("Noise from rear axle\nCancelled: vehicle sold")
    );
    assert_eq!(
        result.audit_event.unwrap().action.details.as_deref(),
        Some("vehicle sold")
    );
}

#[test]
fn test_item_completion_is_stamped_once() {
    let state = create_test_state(
        WorkOrderStatus::InProgress,
        vec![create_test_item(1, WorkOrderItemStatus::Pending, None)],
    );
    let complete = |state: &WorkOrderState, status| {
        run(
            state,
            Command::UpdateItem {
                item_id: 1,
                update: ItemUpdate {
                    status: Some(status),
                    ..ItemUpdate::default()
                },
            },
        )
        .unwrap()
        .new_state
    };

    let completed = complete(&state, WorkOrderItemStatus::Completed);
    assert_eq!(completed.items[0].completed_at, Some(test_now()));

    let mut reopened = complete(&completed, WorkOrderItemStatus::InProgress);
    reopened.items[0].completed_at = Some(time::macros::datetime!(2026-03-02 09:00 UTC));
    let recompleted = complete(&reopened, WorkOrderItemStatus::Completed);

    assert_eq!(
        recompleted.items[0].completed_at,
        Some(time::macros::datetime!(2026-03-02 09:00 UTC))
    );
}

#[test]
fn test_item_update_sets_fields() {
    let state = create_test_state(
        WorkOrderStatus::Pending,
        vec![create_test_item(1, WorkOrderItemStatus::Pending, None)],
    );

    let result = run(
        &state,
        Command::UpdateItem {
            item_id: 1,
            update: ItemUpdate {
                status: Some(WorkOrderItemStatus::InProgress),
                observations: Some(String::from("Leak at gasket")),
                parts_used: Some(String::from("Gasket 4412")),
                labor_hours: Some(1.5),
                cost: Some(Decimal::new(3250, 2)),
            },
        },
    )
    .unwrap();

    let item = &result.new_state.items[0];
    assert_eq!(item.status, WorkOrderItemStatus::InProgress);
    assert_eq!(item.observations.as_deref(), Some("Leak at gasket"));
    assert_eq!(item.parts_used.as_deref(), Some("Gasket 4412"));
    assert_eq!(item.labor_hours, Some(1.5));
    assert_eq!(item.cost, Some(Decimal::new(3250, 2)));
    assert_eq!(item.completed_at, None);
    assert_eq!(result.changed_item_id, Some(1));
}

#[test]
fn test_item_update_on_terminal_order_is_rejected() {
    let state = create_test_state(
        WorkOrderStatus::Completed,
        vec![create_test_item(1, WorkOrderItemStatus::Completed, None)],
    );

    let result = run(
        &state,
        Command::UpdateItem {
            item_id: 1,
            update: ItemUpdate::default(),
        },
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::WorkOrderTerminal {
            number: 12,
            status: WorkOrderStatus::Completed,
        }))
    );
}

#[test]
fn test_item_update_rejects_forbidden_move_and_bad_values() {
    let state = create_test_state(
        WorkOrderStatus::InProgress,
        vec![
            create_test_item(1, WorkOrderItemStatus::Completed, None),
            create_test_item(2, WorkOrderItemStatus::Pending, None),
        ],
    );
    let update = |item_id: i64, update: ItemUpdate| {
        run(&state, Command::UpdateItem { item_id, update })
    };

    assert!(matches!(
        update(
            1,
            ItemUpdate {
                status: Some(WorkOrderItemStatus::Pending),
                ..ItemUpdate::default()
            }
        ),
        Err(CoreError::DomainViolation(
            DomainError::InvalidItemTransition { item_id: 1, .. }
        ))
    ));
    assert!(matches!(
        update(
            2,
            ItemUpdate {
                cost: Some(Decimal::new(-5, 0)),
                ..ItemUpdate::default()
            }
        ),
        Err(CoreError::DomainViolation(DomainError::InvalidCost(_)))
    ));
    assert_eq!(
        update(9, ItemUpdate::default()),
        Err(CoreError::DomainViolation(
            DomainError::WorkOrderItemNotFound {
                work_order_id: 77,
                item_id: 9,
            }
        ))
    );
}

#[test]
fn test_only_pending_or_cancelled_orders_can_be_deleted() {
    let pending = create_test_state(
        WorkOrderStatus::Pending,
        vec![create_test_item(1, WorkOrderItemStatus::Pending, None)],
    );
    let in_progress = create_test_state(WorkOrderStatus::InProgress, Vec::new());

    let event = apply_deletion(&pending, create_test_actor(), create_test_cause()).unwrap();
    assert_eq!(event.action.name, "DeleteWorkOrder");
    assert_eq!(event.after.data, "absent");

    assert_eq!(
        apply_deletion(&in_progress, create_test_actor(), create_test_cause()),
        Err(CoreError::DomainViolation(
            DomainError::WorkOrderNotDeletable {
                number: 12,
                status: WorkOrderStatus::InProgress,
            }
        ))
    );
}
