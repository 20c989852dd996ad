// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::work_order::{WorkOrderItemStatus, WorkOrderStatus};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Plan name is empty or invalid.
    InvalidPlanName(String),
    /// A plan must contain at least one interval.
    EmptyIntervals,
    /// A plan must contain at least one activity.
    EmptyActivities,
    /// A work order item needs a description.
    EmptyItemDescription,
    /// An interval threshold is negative or not a finite number.
    InvalidThreshold {
        /// The threshold that was rejected (`hours` or `kilometers`).
        field: &'static str,
        /// The rejected value, rendered for display.
        value: String,
    },
    /// Sequence order must be a positive integer.
    InvalidSequenceOrder {
        /// Position of the offending interval in the submitted list.
        position: usize,
    },
    /// Two intervals of the same plan share a sequence order.
    DuplicateSequenceOrder(u32),
    /// Activity code is empty or invalid.
    InvalidActivityCode(String),
    /// Activity description is empty.
    InvalidActivityDescription {
        /// The code of the activity with the missing description.
        code: String,
    },
    /// Two activities of the same plan share a code.
    DuplicateActivityCode(String),
    /// An activity references a sequence order that no interval carries.
    UnknownIntervalSequence {
        /// The activity code holding the reference.
        code: String,
        /// The unresolved sequence order.
        sequence_order: u32,
    },
    /// An activity references a persisted interval that is not part of the plan.
    UnknownIntervalId(i64),
    /// A matrix row links an activity and an interval of different plans.
    MatrixPlanMismatch {
        /// The activity side of the row.
        activity_id: i64,
        /// The interval side of the row.
        interval_id: i64,
    },
    /// Plan does not exist in the tenant.
    PlanNotFound(i64),
    /// Active plans cannot be deleted.
    PlanActive(i64),
    /// Vehicle does not exist in the tenant.
    VehicleNotFound(i64),
    /// Workshop does not exist in the tenant or is inactive.
    WorkshopNotFound(i64),
    /// External work orders must name a workshop.
    WorkshopRequired,
    /// User does not exist in the tenant.
    UserNotFound(i64),
    /// Work order does not exist in the tenant.
    WorkOrderNotFound(i64),
    /// Work order item does not exist on the work order.
    WorkOrderItemNotFound {
        /// The work order searched.
        work_order_id: i64,
        /// The missing item.
        item_id: i64,
    },
    /// The work order status does not allow the requested transition.
    InvalidWorkOrderTransition {
        /// Current status.
        current: WorkOrderStatus,
        /// Requested status.
        target: WorkOrderStatus,
    },
    /// The item status does not allow the requested transition.
    InvalidItemTransition {
        /// The item being updated.
        item_id: i64,
        /// Current status.
        current: WorkOrderItemStatus,
        /// Requested status.
        target: WorkOrderItemStatus,
    },
    /// Items cannot change once the work order is completed or cancelled.
    WorkOrderTerminal {
        /// The tenant-scoped work order number.
        number: i64,
        /// The terminal status.
        status: WorkOrderStatus,
    },
    /// Work order cannot be closed while items are still pending.
    PendingItemsRemain {
        /// Number of pending items.
        pending: usize,
    },
    /// Work order can only be deleted while pending or cancelled.
    WorkOrderNotDeletable {
        /// The tenant-scoped work order number.
        number: i64,
        /// The current status.
        status: WorkOrderStatus,
    },
    /// Unrecognised work order type.
    InvalidWorkOrderType(String),
    /// Unrecognised status value.
    InvalidStatus(String),
    /// Unrecognised user role.
    InvalidRole(String),
    /// Cost must be zero or positive.
    InvalidCost(String),
    /// Labor hours must be a finite, non-negative number.
    InvalidLaborHours(String),
    /// Usage counter must be a finite, non-negative number.
    InvalidCounter {
        /// The counter (`odometer` or `hourmeter`).
        field: &'static str,
        /// The rejected value, rendered for display.
        value: String,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPlanName(msg) => write!(f, "Invalid plan name: {msg}"),
            Self::EmptyIntervals => write!(f, "A plan requires at least one interval"),
            Self::EmptyActivities => write!(f, "A plan requires at least one activity"),
            Self::EmptyItemDescription => write!(f, "Work order item description cannot be empty"),
            Self::InvalidThreshold { field, value } => {
                write!(
                    f,
                    "Invalid interval {field}: {value}. Must be a finite number >= 0"
                )
            }
            Self::InvalidSequenceOrder { position } => {
                write!(
                    f,
                    "Invalid sequence order for interval at position {position}: must be positive"
                )
            }
            Self::DuplicateSequenceOrder(order) => {
                write!(f, "Sequence order {order} is used by more than one interval")
            }
            Self::InvalidActivityCode(msg) => write!(f, "Invalid activity code: {msg}"),
            Self::InvalidActivityDescription { code } => {
                write!(f, "Activity '{code}' requires a description")
            }
            Self::DuplicateActivityCode(code) => {
                write!(f, "Activity code '{code}' already exists in this plan")
            }
            Self::UnknownIntervalSequence {
                code,
                sequence_order,
            } => {
                write!(
                    f,
                    "Activity '{code}' references sequence order {sequence_order}, which no interval carries"
                )
            }
            Self::UnknownIntervalId(id) => {
                write!(f, "Interval {id} does not belong to this plan")
            }
            Self::MatrixPlanMismatch {
                activity_id,
                interval_id,
            } => {
                write!(
                    f,
                    "Activity {activity_id} and interval {interval_id} belong to different plans"
                )
            }
            Self::PlanNotFound(id) => write!(f, "Maintenance plan {id} not found"),
            Self::PlanActive(id) => {
                write!(
                    f,
                    "Maintenance plan {id} is active: deactivate before delete"
                )
            }
            Self::VehicleNotFound(id) => write!(f, "Vehicle {id} not found"),
            Self::WorkshopNotFound(id) => write!(f, "Active workshop {id} not found"),
            Self::WorkshopRequired => {
                write!(f, "External work orders require a workshop")
            }
            Self::UserNotFound(id) => write!(f, "User {id} not found"),
            Self::WorkOrderNotFound(id) => write!(f, "Work order {id} not found"),
            Self::WorkOrderItemNotFound {
                work_order_id,
                item_id,
            } => {
                write!(
                    f,
                    "Item {item_id} not found on work order {work_order_id}"
                )
            }
            Self::InvalidWorkOrderTransition { current, target } => {
                write!(
                    f,
                    "Invalid work order transition from {current} to {target}"
                )
            }
            Self::InvalidItemTransition {
                item_id,
                current,
                target,
            } => {
                write!(
                    f,
                    "Invalid transition for item {item_id} from {current} to {target}"
                )
            }
            Self::WorkOrderTerminal { number, status } => {
                write!(f, "Work order #{number} is {status} and can no longer change")
            }
            Self::PendingItemsRemain { pending } => {
                write!(
                    f,
                    "Cannot close work order: {pending} item(s) are still pending"
                )
            }
            Self::WorkOrderNotDeletable { number, status } => {
                write!(
                    f,
                    "Work order #{number} is {status}: only pending or cancelled orders can be deleted"
                )
            }
            Self::InvalidWorkOrderType(value) => write!(f, "Invalid work order type: {value}"),
            Self::InvalidStatus(value) => write!(f, "Invalid status: {value}"),
            Self::InvalidRole(value) => write!(f, "Invalid role: {value}"),
            Self::InvalidCost(value) => {
                write!(f, "Invalid cost: {value}. Must be zero or positive")
            }
            Self::InvalidLaborHours(value) => {
                write!(
                    f,
                    "Invalid labor hours: {value}. Must be a finite number >= 0"
                )
            }
            Self::InvalidCounter { field, value } => {
                write!(f, "Invalid {field}: {value}. Must be a finite number >= 0")
            }
        }
    }
}

impl std::error::Error for DomainError {}
