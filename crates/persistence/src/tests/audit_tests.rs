// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_maint::plan_activation;
use fleet_maint_audit::{Actor, Cause, EntityKind};

use crate::SqlitePersistence;
use crate::tests::{
    OTHER_TENANT, TENANT, create_stored_order, create_stored_plan, create_stored_vehicle,
    create_test_cause, test_now,
};

#[test]
fn test_plan_timeline_lists_events_in_order() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let plan = create_stored_plan(&mut persistence, "Heavy truck plan");
    for is_active in [false, true] {
        let event = plan_activation(
            &plan,
            is_active,
            Actor::system("scheduler"),
            create_test_cause(),
        );
        persistence
            .set_plan_active(TENANT, plan.plan_id, is_active, &event, test_now())
            .unwrap();
    }

    let timeline = persistence
        .get_entity_timeline(TENANT, EntityKind::Plan, plan.plan_id)
        .unwrap();

    let actions: Vec<&str> = timeline.iter().map(|e| e.action.name.as_str()).collect();
    assert_eq!(actions, vec!["CreatePlan", "DeactivatePlan", "ActivatePlan"]);
    assert!(timeline.iter().all(|e| e.scope.tenant_id == TENANT));
}

#[test]
fn test_actor_and_cause_survive_storage() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let plan = create_stored_plan(&mut persistence, "Heavy truck plan");
    let cause = Cause::new(String::from("ticket-55"), String::from("Seasonal review"));
    let event = plan_activation(&plan, false, Actor::system("scheduler"), cause.clone());
    persistence
        .set_plan_active(TENANT, plan.plan_id, false, &event, test_now())
        .unwrap();

    let timeline = persistence
        .get_entity_timeline(TENANT, EntityKind::Plan, plan.plan_id)
        .unwrap();
    let stored = timeline.last().unwrap();

    assert_eq!(stored.actor, Actor::system("scheduler"));
    assert_eq!(stored.cause, cause);
    assert_eq!(stored.before, event.before);
    assert_eq!(stored.after, event.after);
}

#[test]
fn test_created_work_order_event_carries_new_id() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let plan = create_stored_plan(&mut persistence, "Heavy truck plan");
    let vehicle = create_stored_vehicle(&mut persistence, "ABC-123", 20_500.0, 480.0);

    let state = create_stored_order(&mut persistence, &vehicle, &plan);

    let events = persistence.get_tenant_audit_events(TENANT).unwrap();
    let created = events
        .iter()
        .find(|e| e.scope.entity_kind == EntityKind::WorkOrder)
        .unwrap();
    assert_eq!(created.action.name, "CreateWorkOrder");
    assert_eq!(created.scope.entity_id, Some(state.order.work_order_id));
}

#[test]
fn test_tenant_events_exclude_other_tenants() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    create_stored_plan(&mut persistence, "Heavy truck plan");

    assert_eq!(persistence.get_tenant_audit_events(TENANT).unwrap().len(), 1);
    assert!(
        persistence
            .get_tenant_audit_events(OTHER_TENANT)
            .unwrap()
            .is_empty()
    );
}
