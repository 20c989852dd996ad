// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_maint_audit::{AuditEvent, StateSnapshot};
use fleet_maint_domain::{
    SignatureType, UserRole, WorkOrder, WorkOrderItem, WorkOrderItemStatus, WorkOrderSignature,
};
use time::OffsetDateTime;

/// A work order together with its items and signatures.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrderState {
    /// The order header.
    pub order: WorkOrder,
    /// Items in insertion order.
    pub items: Vec<WorkOrderItem>,
    /// Closure signatures.
    pub signatures: Vec<WorkOrderSignature>,
}

impl WorkOrderState {
    /// Creates a new state.
    #[must_use]
    pub const fn new(
        order: WorkOrder,
        items: Vec<WorkOrderItem>,
        signatures: Vec<WorkOrderSignature>,
    ) -> Self {
        Self {
            order,
            items,
            signatures,
        }
    }

    /// Counts items still in `Pending`.
    #[must_use]
    pub fn pending_items(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.status == WorkOrderItemStatus::Pending)
            .count()
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "number={},status={},items={},pending={},total_cost={}",
            self.order.number,
            self.order.status,
            self.items.len(),
            self.pending_items(),
            self.order.total_cost
        ))
    }
}

/// A closure signature that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSignature {
    /// The closing user.
    pub user_id: i64,
    /// The closing user's role.
    pub role: UserRole,
    /// Authority derived from the role.
    pub signature_type: SignatureType,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Signing time.
    pub signed_at: OffsetDateTime,
}

/// The usage snapshot written back to a vehicle when its order closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleUsageUpdate {
    /// The vehicle to update.
    pub vehicle_id: i64,
    /// New odometer reading, when the order recorded one.
    pub odometer: Option<f64>,
    /// New hourmeter reading, when the order recorded one.
    pub hourmeter: Option<f64>,
    /// New last-maintenance date.
    pub last_maintenance_at: OffsetDateTime,
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: WorkOrderState,
    /// The audit event recording this transition. `None` for no-ops.
    pub audit_event: Option<AuditEvent>,
    /// Signature to append, on close.
    pub signature: Option<NewSignature>,
    /// Vehicle usage write-back, on close.
    pub vehicle_update: Option<VehicleUsageUpdate>,
    /// The item changed by an item update.
    pub changed_item_id: Option<i64>,
}

impl TransitionResult {
    /// Returns whether the transition changed anything.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.audit_event.is_none()
    }
}
