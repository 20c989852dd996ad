// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod audit_tests;
mod plan_tests;

use fleet_maint::{
    CreateWorkOrder, WorkOrderCreation, WorkOrderState, plan_creation, plan_work_order,
};
use fleet_maint_audit::{Actor, Cause};
use fleet_maint_domain::{
    ActivityDraft, IntervalDraft, IntervalRef, MaintenancePlan, MaintenancePrediction, PlanDraft,
    UsageCounters, Vehicle, WorkOrderType, predict_maintenance,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::SqlitePersistence;

pub const TENANT: i64 = 10;
pub const OTHER_TENANT: i64 = 20;

pub fn create_test_actor() -> Actor {
    Actor::user(42)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-789"), String::from("Fleet office request"))
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-02 14:30 UTC)
}

fn interval_draft(key: &str, hours: f64, kilometers: f64) -> IntervalDraft {
    IntervalDraft {
        draft_key: Some(key.to_string()),
        sequence_order: None,
        hours,
        kilometers,
        name: None,
    }
}

fn activity_draft(code: &str, applies_to: Vec<IntervalRef>) -> ActivityDraft {
    ActivityDraft {
        code: code.to_string(),
        description: format!("Activity {code}"),
        category: None,
        is_active: true,
        applies_to,
    }
}

/// Three intervals (250 h / 10 000 km, 500 h / 20 000 km, 1 000 h / 40 000 km)
/// and three activities: OIL everywhere, FILTER at seq 2, BELTS at seq 3.
pub fn create_test_draft(name: &str) -> PlanDraft {
    PlanDraft {
        name: name.to_string(),
        description: Some(String::from("Standard service schedule")),
        vehicle_type: Some(String::from("TRUCK")),
        is_active: true,
        intervals: vec![
            interval_draft("a", 250.0, 10_000.0),
            interval_draft("b", 500.0, 20_000.0),
            interval_draft("c", 1_000.0, 40_000.0),
        ],
        activities: vec![
            activity_draft(
                "OIL",
                vec![
                    IntervalRef::Draft(String::from("a")),
                    IntervalRef::Draft(String::from("b")),
                    IntervalRef::Draft(String::from("c")),
                ],
            ),
            activity_draft("FILTER", vec![IntervalRef::Sequence(2)]),
            activity_draft(
                "BELTS",
                vec![
                    IntervalRef::Draft(String::from("c")),
                    IntervalRef::Draft(String::from("ghost")),
                ],
            ),
        ],
    }
}

pub fn create_stored_plan(persistence: &mut SqlitePersistence, name: &str) -> MaintenancePlan {
    let creation = plan_creation(
        TENANT,
        &create_test_draft(name),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.create_plan(TENANT, &creation, test_now()).unwrap()
}

pub fn create_stored_vehicle(
    persistence: &mut SqlitePersistence,
    plate: &str,
    odometer: f64,
    hourmeter: f64,
) -> Vehicle {
    let vehicle_id: i64 = persistence
        .register_vehicle(
            TENANT,
            plate,
            "TRUCK",
            UsageCounters::new(odometer, hourmeter),
            None,
        )
        .unwrap();
    persistence.get_vehicle(TENANT, vehicle_id).unwrap().unwrap()
}

pub fn create_test_request(vehicle_id: i64, order_type: WorkOrderType) -> CreateWorkOrder {
    CreateWorkOrder {
        vehicle_id,
        order_type,
        is_internal: true,
        workshop_id: None,
        operator_id: None,
        supervisor_id: None,
        odometer_at_start: None,
        hourmeter_at_start: None,
        notes: None,
        items: Vec::new(),
    }
}

/// Plans and stores a preventive order seeded from `plan`.
pub fn create_stored_order(
    persistence: &mut SqlitePersistence,
    vehicle: &Vehicle,
    plan: &MaintenancePlan,
) -> WorkOrderState {
    let prediction: MaintenancePrediction = predict_maintenance(vehicle, plan, None);
    let creation: WorkOrderCreation = plan_work_order(
        TENANT,
        create_test_request(vehicle.vehicle_id, WorkOrderType::Preventive),
        vehicle,
        None,
        Some((plan.plan_id, &prediction)),
        create_test_actor(),
        create_test_cause(),
        test_now(),
    )
    .unwrap();
    persistence.create_work_order(&creation).unwrap()
}
