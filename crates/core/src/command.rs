// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_maint_domain::{UserRole, WorkOrderItemStatus};
use rust_decimal::Decimal;

/// Field changes for a single work order item.
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemUpdate {
    /// Target status.
    pub status: Option<WorkOrderItemStatus>,
    /// Mechanic observations.
    pub observations: Option<String>,
    /// Parts used.
    pub parts_used: Option<String>,
    /// Labor hours spent.
    pub labor_hours: Option<f64>,
    /// Item cost.
    pub cost: Option<Decimal>,
}

/// The user closing a work order and the request they closed it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closer {
    /// The closing user.
    pub user_id: i64,
    /// The closing user's role, looked up at closing time.
    pub role: UserRole,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
}

/// A command represents user intent against one work order, as data only.
///
/// Commands are the only way to request work order state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Begin execution.
    StartWorkOrder {
        /// The operator executing the work. Keeps the current operator when absent.
        operator_id: Option<i64>,
    },
    /// Change one item.
    UpdateItem {
        /// The item to change.
        item_id: i64,
        /// The changes.
        update: ItemUpdate,
    },
    /// Close the order with a signature.
    CloseWorkOrder {
        /// Who closes it.
        closer: Closer,
    },
    /// Abandon the order.
    CancelWorkOrder {
        /// Free-text reason, appended to the notes.
        reason: Option<String>,
    },
}

impl Command {
    /// Returns the audit action name of this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::StartWorkOrder { .. } => "StartWorkOrder",
            Self::UpdateItem { .. } => "UpdateWorkOrderItem",
            Self::CloseWorkOrder { .. } => "CloseWorkOrder",
            Self::CancelWorkOrder { .. } => "CancelWorkOrder",
        }
    }
}
