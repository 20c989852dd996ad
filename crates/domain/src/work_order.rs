// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::fleet::{UsageCounters, UserRole};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Kind of maintenance a work order performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderType {
    /// Planned maintenance seeded from the vehicle's plan.
    Preventive,
    /// Repair work with ad-hoc items.
    Corrective,
}

impl WorkOrderType {
    /// Converts this type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Preventive => "PREVENTIVE",
            Self::Corrective => "CORRECTIVE",
        }
    }
}

impl FromStr for WorkOrderType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PREVENTIVE" => Ok(Self::Preventive),
            "CORRECTIVE" => Ok(Self::Corrective),
            _ => Err(DomainError::InvalidWorkOrderType(s.to_string())),
        }
    }
}

impl std::fmt::Display for WorkOrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WorkOrderStatus {
    /// Created, not yet started.
    #[default]
    Pending,
    /// Work is being executed.
    InProgress,
    /// Closed with a signature. Terminal.
    Completed,
    /// Abandoned. Terminal.
    Cancelled,
}

impl WorkOrderStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `Pending` → `InProgress` (start)
    /// - `InProgress` → `Completed` (close)
    /// - `Pending` | `InProgress` → `Cancelled` (cancel)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::Pending | Self::InProgress, Self::Cancelled)
        )
    }

    /// Returns whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether an order in this status may be deleted.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        matches!(self, Self::Pending | Self::Cancelled)
    }
}

impl FromStr for WorkOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Execution state of a single work order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WorkOrderItemStatus {
    /// Not yet worked on. Blocks closure.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
    /// Deliberately not performed. Does not block closure.
    Skipped,
}

impl WorkOrderItemStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Skipped => "SKIPPED",
        }
    }

    /// Checks if an item may move from this status to another.
    ///
    /// Staying in the same status is always allowed (field-only updates).
    /// Otherwise:
    /// - `Pending` → `InProgress` | `Completed` | `Skipped`
    /// - `InProgress` → `Pending` | `Completed` | `Skipped`
    /// - `Completed` → `InProgress` (reopen)
    /// - `Skipped` → `Pending` | `InProgress`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Pending)
                | (Self::InProgress, Self::InProgress)
                | (Self::Completed, Self::Completed)
                | (Self::Skipped, Self::Skipped)
                | (
                    Self::Pending,
                    Self::InProgress | Self::Completed | Self::Skipped
                )
                | (
                    Self::InProgress,
                    Self::Pending | Self::Completed | Self::Skipped
                )
                | (Self::Completed, Self::InProgress)
                | (Self::Skipped, Self::Pending | Self::InProgress)
        )
    }
}

impl FromStr for WorkOrderItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "SKIPPED" => Ok(Self::Skipped),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for WorkOrderItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authority under which a work order was signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureType {
    /// The closer holds a supervisor-equivalent role.
    Supervisor,
    /// Any other closer.
    Operator,
}

impl SignatureType {
    /// Derives the signature type from the closer's role.
    #[must_use]
    pub const fn for_role(role: UserRole) -> Self {
        if role.is_supervisor_equivalent() {
            Self::Supervisor
        } else {
            Self::Operator
        }
    }

    /// Converts this type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Supervisor => "SUPERVISOR",
            Self::Operator => "OPERATOR",
        }
    }
}

impl FromStr for SignatureType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPERVISOR" => Ok(Self::Supervisor),
            "OPERATOR" => Ok(Self::Operator),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for SignatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An executable, auditable instance of maintenance work against one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    /// The canonical numeric identifier assigned by the database.
    pub work_order_id: i64,
    /// The owning tenant.
    pub tenant_id: i64,
    /// The vehicle being maintained.
    pub vehicle_id: i64,
    /// Tenant-scoped sequential number.
    pub number: i64,
    /// Preventive or corrective.
    pub order_type: WorkOrderType,
    /// Lifecycle state.
    pub status: WorkOrderStatus,
    /// The plan whose prediction seeded the items, if any.
    pub plan_id: Option<i64>,
    /// Odometer reading when the order was opened.
    pub odometer_at_start: Option<f64>,
    /// Hourmeter reading when the order was opened.
    pub hourmeter_at_start: Option<f64>,
    /// The operator executing the work.
    pub operator_id: Option<i64>,
    /// The supervising user.
    pub supervisor_id: Option<i64>,
    /// Whether the work happens in-house.
    pub is_internal: bool,
    /// External workshop. Required when `is_internal` is false.
    pub workshop_id: Option<i64>,
    /// Sum of item costs, computed at closure.
    pub total_cost: Decimal,
    /// Free-text notes. Cancellation reasons are appended here.
    pub notes: Option<String>,
    /// The user who created the order.
    pub created_by: Option<i64>,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the order was started.
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    /// When the order was closed or cancelled.
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

impl WorkOrder {
    /// Returns the start counters, with missing readings treated as zero.
    #[must_use]
    pub fn start_counters(&self) -> UsageCounters {
        UsageCounters::new(
            self.odometer_at_start.unwrap_or(0.0),
            self.hourmeter_at_start.unwrap_or(0.0),
        )
    }
}

/// One task within a work order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderItem {
    /// The canonical numeric identifier assigned by the database.
    pub item_id: i64,
    /// The owning work order.
    pub work_order_id: i64,
    /// The cataloged activity, absent for ad-hoc corrective items.
    pub activity_id: Option<i64>,
    /// What is to be done.
    pub description: String,
    /// Execution state.
    pub status: WorkOrderItemStatus,
    /// Mechanic observations.
    pub observations: Option<String>,
    /// Parts used, free text.
    pub parts_used: Option<String>,
    /// Labor hours spent.
    pub labor_hours: Option<f64>,
    /// Cost of the item.
    pub cost: Option<Decimal>,
    /// First time the item entered `Completed`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

/// Closure signature. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderSignature {
    /// The canonical numeric identifier assigned by the database.
    pub signature_id: i64,
    /// The signed work order.
    pub work_order_id: i64,
    /// The closing user.
    pub user_id: i64,
    /// The closing user's role at signing time.
    pub role: UserRole,
    /// Authority derived from the role.
    pub signature_type: SignatureType,
    /// Client IP address of the closing request.
    pub ip_address: Option<String>,
    /// Client user agent of the closing request.
    pub user_agent: Option<String>,
    /// Signing time.
    #[serde(with = "time::serde::rfc3339")]
    pub signed_at: OffsetDateTime,
}
