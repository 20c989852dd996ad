// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod draft;
mod error;
mod fleet;
mod plan;
mod predictor;
mod resolver;
mod validation;
mod work_order;

#[cfg(test)]
mod tests;

pub use draft::{
    ActivityDraft, IntervalDraft, IntervalRef, PlanDraft, resolve_activities, resolve_intervals,
    resolve_plan_draft,
};
pub use error::DomainError;
pub use fleet::{FleetUser, UsageCounters, UserRole, Vehicle, Workshop};
pub use plan::{
    ActivityDefinition, IntervalDefinition, MaintenanceActivity, MaintenanceInterval,
    MaintenancePlan, MatrixRow, PlanHeader, ResolvedPlan,
};
pub use predictor::{
    IntervalForecast, IntervalStatus, MAX_FORECAST_INTERVALS, MaintenancePrediction,
    UPCOMING_THRESHOLD_RATIO, baseline_from, predict_maintenance,
};
pub use resolver::{PlanSource, resolve_plan_for_vehicle};
pub use validation::{
    validate_activity_code, validate_cost, validate_counter, validate_labor_hours,
    validate_plan_name, validate_threshold,
};
pub use work_order::{
    SignatureType, WorkOrder, WorkOrderItem, WorkOrderItemStatus, WorkOrderSignature,
    WorkOrderStatus, WorkOrderType,
};
