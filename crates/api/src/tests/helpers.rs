// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use fleet_maint_audit::Cause;
use fleet_maint_domain::{
    ActivityDraft, IntervalDraft, IntervalRef, UsageCounters, UserRole, WorkOrderType,
};
use fleet_maint_persistence::SqlitePersistence;

use crate::{
    AuthenticatedActor, CreatePlanRequest, CreateWorkOrderRequest, WorkOrderResponse,
    create_plan, create_work_order,
};

pub const TENANT: i64 = 1;
pub const OTHER_TENANT: i64 = 2;

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Registers a user in `TENANT` and returns them as an authenticated actor.
pub fn register_actor(persistence: &mut SqlitePersistence, role: UserRole) -> AuthenticatedActor {
    let user_id: i64 = persistence
        .register_user(TENANT, "Test User", role)
        .expect("Failed to register user");
    AuthenticatedActor::new(TENANT, user_id, role)
}

pub fn register_supervisor(persistence: &mut SqlitePersistence) -> AuthenticatedActor {
    register_actor(persistence, UserRole::Supervisor)
}

pub fn register_test_vehicle(
    persistence: &mut SqlitePersistence,
    odometer: f64,
    hourmeter: f64,
) -> i64 {
    persistence
        .register_vehicle(
            TENANT,
            "TRK-001",
            "TRUCK",
            UsageCounters::new(odometer, hourmeter),
            None,
        )
        .expect("Failed to register vehicle")
}

fn activity(code: &str, applies_to: Vec<IntervalRef>) -> ActivityDraft {
    ActivityDraft {
        code: code.to_string(),
        description: format!("{code} service"),
        category: None,
        is_active: true,
        applies_to,
    }
}

/// One interval at 500 h / 20 000 km (seq 1) and one at 1 000 h / 40 000 km
/// (seq 2). OIL and FILTER apply at seq 1, BELTS at seq 2.
pub fn create_test_plan_request(name: &str) -> CreatePlanRequest {
    CreatePlanRequest {
        name: name.to_string(),
        description: None,
        vehicle_type: Some(String::from("TRUCK")),
        is_active: true,
        intervals: vec![
            IntervalDraft {
                draft_key: Some(String::from("first")),
                sequence_order: Some(1),
                hours: 500.0,
                kilometers: 20_000.0,
                name: Some(String::from("Minor")),
            },
            IntervalDraft {
                draft_key: Some(String::from("second")),
                sequence_order: Some(2),
                hours: 1_000.0,
                kilometers: 40_000.0,
                name: Some(String::from("Major")),
            },
        ],
        activities: vec![
            activity("OIL", vec![IntervalRef::Draft(String::from("first"))]),
            activity("FILTER", vec![IntervalRef::Sequence(1)]),
            activity("BELTS", vec![IntervalRef::Sequence(2)]),
        ],
    }
}

pub fn create_test_plan(persistence: &mut SqlitePersistence, actor: &AuthenticatedActor) -> i64 {
    create_plan(
        persistence,
        &create_test_plan_request("Truck plan"),
        actor,
        create_test_cause(),
    )
    .expect("Failed to create plan")
    .plan
    .plan_id
}

pub fn create_test_work_order_request(
    vehicle_id: i64,
    order_type: WorkOrderType,
) -> CreateWorkOrderRequest {
    CreateWorkOrderRequest {
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

pub struct SeededOrder {
    pub persistence: SqlitePersistence,
    pub actor: AuthenticatedActor,
    pub vehicle_id: i64,
    pub order: WorkOrderResponse,
}

/// Creates a preventive order for a vehicle at 20 500 km / 480 h under the
/// test plan, seeded with OIL and FILTER.
pub fn create_seeded_order() -> SeededOrder {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let actor: AuthenticatedActor = register_supervisor(&mut persistence);
    create_test_plan(&mut persistence, &actor);
    let vehicle_id: i64 = register_test_vehicle(&mut persistence, 20_500.0, 480.0);
    let order: WorkOrderResponse = create_work_order(
        &mut persistence,
        &create_test_work_order_request(vehicle_id, WorkOrderType::Preventive),
        &actor,
        create_test_cause(),
    )
    .expect("Failed to create work order");
    SeededOrder {
        persistence,
        actor,
        vehicle_id,
        order,
    }
}
