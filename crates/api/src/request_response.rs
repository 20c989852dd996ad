// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use fleet_maint::{AdHocItem, CreateWorkOrder, PlanHeaderPatch, PlanUpdate};
use fleet_maint_domain::{
    ActivityDraft, IntervalDraft, IntervalForecast, MaintenanceActivity, MaintenancePlan,
    PlanDraft, PlanSource, UsageCounters, WorkOrder, WorkOrderItem, WorkOrderItemStatus,
    WorkOrderSignature, WorkOrderStatus, WorkOrderType,
};
use rust_decimal::Decimal;

/// API request to create a plan.
///
/// Activities reference intervals by sequence order, by the client draft
/// key of an interval in the same request, or by persisted interval id.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CreatePlanRequest {
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Vehicle type filter.
    #[serde(default)]
    pub vehicle_type: Option<String>,
    /// Whether the plan starts active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Intervals in submission order.
    pub intervals: Vec<IntervalDraft>,
    /// Activities in submission order.
    pub activities: Vec<ActivityDraft>,
}

const fn default_active() -> bool {
    true
}

impl CreatePlanRequest {
    /// Converts this request into an unvalidated plan draft.
    #[must_use]
    pub fn to_draft(&self) -> PlanDraft {
        PlanDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            vehicle_type: self.vehicle_type.clone(),
            is_active: self.is_active,
            intervals: self.intervals.clone(),
            activities: self.activities.clone(),
        }
    }
}

/// Reads a present field as `Some`, so an explicit `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}

/// API request to replace parts of a plan.
///
/// Absent fields and lists keep what is stored. A present list replaces it.
/// An explicit `null` description or vehicle type clears it.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UpdatePlanRequest {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description. `Some(None)` clears it.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    /// New vehicle type filter. `Some(None)` clears it.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub vehicle_type: Option<Option<String>>,
    /// New active flag.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Replacement interval list.
    #[serde(default)]
    pub intervals: Option<Vec<IntervalDraft>>,
    /// Replacement activity list.
    #[serde(default)]
    pub activities: Option<Vec<ActivityDraft>>,
}

impl UpdatePlanRequest {
    /// Converts this request into a plan update.
    #[must_use]
    pub fn to_update(&self) -> PlanUpdate {
        PlanUpdate {
            header: PlanHeaderPatch {
                name: self.name.clone(),
                description: self.description.clone(),
                vehicle_type: self.vehicle_type.clone(),
                is_active: self.is_active,
            },
            intervals: self.intervals.clone(),
            activities: self.activities.clone(),
        }
    }
}

/// API request to list plans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPlansRequest {
    /// Only plans targeting this vehicle type (case-insensitive).
    pub vehicle_type: Option<String>,
    /// Only plans with this active flag.
    pub is_active: Option<bool>,
}

/// API request to duplicate a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicatePlanRequest {
    /// Name of the copy. Defaults to `"<name> (copy)"`.
    pub name: Option<String>,
}

/// API response carrying a full plan.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlanResponse {
    /// The plan, intervals in sequence order, activities with their interval ids.
    pub plan: MaintenancePlan,
    /// A success message.
    pub message: String,
}

/// Summary information about a plan.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlanInfo {
    /// The canonical plan identifier.
    pub plan_id: i64,
    /// Display name.
    pub name: String,
    /// Vehicle type filter.
    pub vehicle_type: Option<String>,
    /// Active flag.
    pub is_active: bool,
    /// Number of intervals.
    pub interval_count: usize,
    /// Number of activities.
    pub activity_count: usize,
    /// Number of `applies` matrix rows.
    pub matrix_row_count: usize,
}

impl From<&MaintenancePlan> for PlanInfo {
    fn from(plan: &MaintenancePlan) -> Self {
        Self {
            plan_id: plan.plan_id,
            name: plan.name.clone(),
            vehicle_type: plan.vehicle_type.clone(),
            is_active: plan.is_active,
            interval_count: plan.intervals.len(),
            activity_count: plan.activities.len(),
            matrix_row_count: plan.matrix_rows().len(),
        }
    }
}

/// API response for listing plans.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPlansResponse {
    /// Matching plans, oldest first.
    pub plans: Vec<PlanInfo>,
}

/// API response for a plan deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeletePlanResponse {
    /// The deleted plan.
    pub plan_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for a maintenance prediction.
///
/// When no plan applies, `plan_id` and `plan_source` are absent and the
/// forecast is empty. This is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PredictionResponse {
    /// The vehicle predicted for.
    pub vehicle_id: i64,
    /// The resolved plan.
    pub plan_id: Option<i64>,
    /// The resolved plan's name.
    pub plan_name: Option<String>,
    /// How the plan was chosen.
    pub plan_source: Option<PlanSource>,
    /// The vehicle's current counters.
    pub current: UsageCounters,
    /// Counters distances were measured from.
    pub baseline: UsageCounters,
    /// First due or upcoming intervals in sequence order.
    pub due_or_upcoming: Vec<IntervalForecast>,
    /// Activities mapped to any due interval.
    pub applicable_activities: Vec<MaintenanceActivity>,
    /// A human-readable summary.
    pub message: String,
}

/// An ad-hoc item on a new work order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdHocItemRequest {
    /// What is to be done.
    pub description: String,
    /// Optional cataloged activity.
    #[serde(default)]
    pub activity_id: Option<i64>,
}

/// API request to create a work order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CreateWorkOrderRequest {
    /// The vehicle to maintain.
    pub vehicle_id: i64,
    /// Preventive or corrective.
    pub order_type: WorkOrderType,
    /// Whether the work happens in-house.
    pub is_internal: bool,
    /// External workshop. Required when `is_internal` is false.
    #[serde(default)]
    pub workshop_id: Option<i64>,
    /// Operator executing the work.
    #[serde(default)]
    pub operator_id: Option<i64>,
    /// Supervising user.
    #[serde(default)]
    pub supervisor_id: Option<i64>,
    /// Odometer reading. Defaults to the vehicle's.
    #[serde(default)]
    pub odometer_at_start: Option<f64>,
    /// Hourmeter reading. Defaults to the vehicle's.
    #[serde(default)]
    pub hourmeter_at_start: Option<f64>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Ad-hoc items, appended after seeded ones.
    #[serde(default)]
    pub items: Vec<AdHocItemRequest>,
}

impl CreateWorkOrderRequest {
    pub(crate) fn to_command(&self) -> CreateWorkOrder {
        CreateWorkOrder {
            vehicle_id: self.vehicle_id,
            order_type: self.order_type,
            is_internal: self.is_internal,
            workshop_id: self.workshop_id,
            operator_id: self.operator_id,
            supervisor_id: self.supervisor_id,
            odometer_at_start: self.odometer_at_start,
            hourmeter_at_start: self.hourmeter_at_start,
            notes: self.notes.clone(),
            items: self
                .items
                .iter()
                .map(|i| AdHocItem {
                    description: i.description.clone(),
                    activity_id: i.activity_id,
                })
                .collect(),
        }
    }
}

/// API request to start a work order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartWorkOrderRequest {
    /// Operator executing the work. Keeps the current one when absent.
    pub operator_id: Option<i64>,
}

/// API request to update one work order item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateWorkOrderItemRequest {
    /// The item to change.
    pub item_id: i64,
    /// Target status.
    pub status: Option<WorkOrderItemStatus>,
    /// Mechanic observations.
    pub observations: Option<String>,
    /// Parts used.
    pub parts_used: Option<String>,
    /// Labor hours.
    pub labor_hours: Option<f64>,
    /// Cost.
    pub cost: Option<Decimal>,
}

/// API request to close a work order.
///
/// The closer is the authenticated user; their stored role decides the
/// signature type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseWorkOrderRequest {
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
}

/// API request to cancel a work order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelWorkOrderRequest {
    /// Reason, appended to the notes.
    pub reason: Option<String>,
}

/// API request to list work orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListWorkOrdersRequest {
    /// Only orders of this vehicle.
    pub vehicle_id: Option<i64>,
    /// Only orders in this status.
    pub status: Option<WorkOrderStatus>,
}

/// API response carrying a work order with items and signatures.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkOrderResponse {
    /// The order header.
    pub work_order: WorkOrder,
    /// Items in creation order.
    pub items: Vec<WorkOrderItem>,
    /// Closure signatures.
    pub signatures: Vec<WorkOrderSignature>,
    /// A success message.
    pub message: String,
}

/// API response for listing work orders.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListWorkOrdersResponse {
    /// Matching order headers, newest number first.
    pub work_orders: Vec<WorkOrder>,
}

/// API response for a work order deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteWorkOrderResponse {
    /// The deleted order.
    pub work_order_id: i64,
    /// Its tenant-scoped number.
    pub number: i64,
    /// A success message.
    pub message: String,
}
