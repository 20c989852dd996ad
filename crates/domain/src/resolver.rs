// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ordered plan resolution for a vehicle.
//!
//! Several active plans may target the same vehicle type; nothing enforces
//! a single match. Resolution is therefore a fallback chain, and "first"
//! means the lowest plan identifier (the oldest plan).

use crate::fleet::Vehicle;
use crate::plan::MaintenancePlan;
use serde::{Deserialize, Serialize};

/// How a plan was chosen for a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanSource {
    /// The vehicle references the plan directly.
    VehicleOverride,
    /// First active plan whose vehicle type matches.
    VehicleType,
    /// First active plan of the tenant.
    TenantFallback,
}

/// Resolves the plan that applies to a vehicle.
///
/// Order: the vehicle's direct plan reference, then the first active plan
/// matching the vehicle type, then any active plan of the tenant. Only
/// plans of the vehicle's tenant are considered. A direct reference is
/// honored whether or not the plan is active.
///
/// # Returns
///
/// `None` when no plan applies. This is a normal outcome.
#[must_use]
pub fn resolve_plan_for_vehicle<'a>(
    vehicle: &Vehicle,
    plans: &'a [MaintenancePlan],
) -> Option<(PlanSource, &'a MaintenancePlan)> {
    let tenant_plans = || plans.iter().filter(|p| p.tenant_id == vehicle.tenant_id);

    if let Some(plan) = vehicle
        .plan_id
        .and_then(|plan_id| tenant_plans().find(|p| p.plan_id == plan_id))
    {
        return Some((PlanSource::VehicleOverride, plan));
    }

    if let Some(plan) = tenant_plans()
        .filter(|p| p.is_active && p.matches_vehicle_type(&vehicle.vehicle_type))
        .min_by_key(|p| p.plan_id)
    {
        return Some((PlanSource::VehicleType, plan));
    }

    tenant_plans()
        .filter(|p| p.is_active)
        .min_by_key(|p| p.plan_id)
        .map(|plan| (PlanSource::TenantFallback, plan))
}
