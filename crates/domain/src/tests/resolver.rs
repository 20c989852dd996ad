// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_scenario_plan, create_test_vehicle};
use crate::{MaintenancePlan, PlanSource, resolve_plan_for_vehicle};

fn create_plan(plan_id: i64, vehicle_type: Option<&str>, is_active: bool) -> MaintenancePlan {
    let mut plan = create_scenario_plan();
    plan.plan_id = plan_id;
    plan.vehicle_type = vehicle_type.map(str::to_string);
    plan.is_active = is_active;
    plan
}

fn resolved_id(source: Option<(PlanSource, &MaintenancePlan)>) -> Option<(PlanSource, i64)> {
    source.map(|(s, p)| (s, p.plan_id))
}

#[test]
fn test_direct_reference_wins_even_when_inactive() {
    let plans = vec![
        create_plan(1, Some("TRUCK"), true),
        create_plan(2, Some("PICKUP"), false),
    ];
    let mut vehicle = create_test_vehicle(0.0, 0.0);
    vehicle.plan_id = Some(2);

    assert_eq!(
        resolved_id(resolve_plan_for_vehicle(&vehicle, &plans)),
        Some((PlanSource::VehicleOverride, 2))
    );
}

#[test]
fn test_lowest_active_type_match_is_chosen() {
    let plans = vec![
        create_plan(7, Some("TRUCK"), true),
        create_plan(3, Some("truck"), true),
        create_plan(1, Some("TRUCK"), false),
        create_plan(2, None, true),
    ];
    let vehicle = create_test_vehicle(0.0, 0.0);

    assert_eq!(
        resolved_id(resolve_plan_for_vehicle(&vehicle, &plans)),
        Some((PlanSource::VehicleType, 3))
    );
}

#[test]
fn test_falls_back_to_any_active_tenant_plan() {
    let plans = vec![
        create_plan(9, Some("PICKUP"), true),
        create_plan(4, None, true),
        create_plan(1, None, false),
    ];
    let vehicle = create_test_vehicle(0.0, 0.0);

    assert_eq!(
        resolved_id(resolve_plan_for_vehicle(&vehicle, &plans)),
        Some((PlanSource::TenantFallback, 4))
    );
}

#[test]
fn test_other_tenants_are_ignored() {
    let mut foreign = create_plan(1, Some("TRUCK"), true);
    foreign.tenant_id = 99;
    let plans = vec![foreign];
    let mut vehicle = create_test_vehicle(0.0, 0.0);
    vehicle.plan_id = Some(1);

    assert!(resolve_plan_for_vehicle(&vehicle, &plans).is_none());
}

#[test]
fn test_no_active_plan_resolves_to_none() {
    let plans = vec![create_plan(1, Some("TRUCK"), false)];
    let vehicle = create_test_vehicle(0.0, 0.0);

    assert!(resolve_plan_for_vehicle(&vehicle, &plans).is_none());
}
