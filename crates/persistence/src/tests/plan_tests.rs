// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use fleet_maint::{
    PlanCreation, PlanHeaderPatch, PlanReplacement, PlanUpdate, plan_activation, plan_creation,
    plan_deletion, plan_duplicate, plan_replacement,
};
use fleet_maint_audit::EntityKind;
use fleet_maint_domain::{
    ActivityDraft, IntervalDraft, IntervalRef, MaintenancePlan, UsageCounters,
};
use std::collections::BTreeSet;

use crate::diesel_schema::{activity_interval_matrix, maintenance_activities, maintenance_intervals};
use crate::tests::{
    OTHER_TENANT, TENANT, create_stored_plan, create_test_actor, create_test_cause,
    create_test_draft, test_now,
};
use crate::{PersistenceError, SqlitePersistence};

fn interval_id_at(plan: &MaintenancePlan, sequence_order: u32) -> i64 {
    plan.interval_by_sequence(sequence_order).unwrap().interval_id
}

fn sequences_of(plan: &MaintenancePlan, code: &str) -> BTreeSet<u32> {
    plan.sequence_orders_for(plan.activity_by_code(code).unwrap())
}

#[test]
fn test_create_plan_maps_matrix_onto_stored_intervals() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let plan = create_stored_plan(&mut persistence, "Heavy truck plan");

    let orders: Vec<u32> = plan.intervals.iter().map(|i| i.sequence_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert_eq!(plan.activities.len(), 3);
    assert_eq!(plan.matrix_rows().len(), 5);
    assert_eq!(
        plan.activity_by_code("FILTER").unwrap().interval_ids,
        vec![interval_id_at(&plan, 2)]
    );
    // The unknown draft key is dropped; only the known one survives.
    assert_eq!(sequences_of(&plan, "BELTS"), BTreeSet::from([3]));
    assert!(plan.validate_matrix().is_ok());
}

#[test]
fn test_create_plan_records_audit_event_for_new_plan() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let plan = create_stored_plan(&mut persistence, "Heavy truck plan");

    let timeline = persistence
        .get_entity_timeline(TENANT, EntityKind::Plan, plan.plan_id)
        .unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].action.name, "CreatePlan");
    assert_eq!(timeline[0].scope.entity_id, Some(plan.plan_id));
}

#[test]
fn test_failed_plan_creation_leaves_nothing_behind() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let mut creation: PlanCreation = plan_creation(
        TENANT,
        &create_test_draft("Broken plan"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    creation.plan.activities[0].sequence_orders.insert(9);

    let result = persistence.create_plan(TENANT, &creation, test_now());

    assert!(matches!(result, Err(PersistenceError::IncompleteWrite(_))));
    assert!(persistence.list_plans(TENANT, None, None).unwrap().is_empty());
    assert!(persistence.get_tenant_audit_events(TENANT).unwrap().is_empty());
}

#[test]
fn test_get_plan_is_tenant_scoped() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let plan = create_stored_plan(&mut persistence, "Heavy truck plan");

    assert!(persistence.get_plan(OTHER_TENANT, plan.plan_id).unwrap().is_none());
    assert!(persistence.get_plan(TENANT, plan.plan_id).unwrap().is_some());
}

#[test]
fn test_list_plans_filters_by_vehicle_type_and_active_flag() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let truck = create_stored_plan(&mut persistence, "Truck plan");
    let old_truck = create_stored_plan(&mut persistence, "Old truck plan");
    let mut bus_draft = create_test_draft("Bus plan");
    bus_draft.vehicle_type = Some(String::from("BUS"));
    let bus_creation =
        plan_creation(TENANT, &bus_draft, create_test_actor(), create_test_cause()).unwrap();
    persistence.create_plan(TENANT, &bus_creation, test_now()).unwrap();

    let event = plan_activation(&old_truck, false, create_test_actor(), create_test_cause());
    persistence
        .set_plan_active(TENANT, old_truck.plan_id, false, &event, test_now())
        .unwrap();

    let all = persistence.list_plans(TENANT, None, None).unwrap();
    let active_trucks = persistence
        .list_plans(TENANT, Some("truck"), Some(true))
        .unwrap();
    let inactive = persistence.list_plans(TENANT, None, Some(false)).unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(active_trucks.len(), 1);
    assert_eq!(active_trucks[0].plan_id, truck.plan_id);
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].plan_id, old_truck.plan_id);
}

#[test]
fn test_replacing_intervals_carries_matrix_by_sequence_order() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let current = create_stored_plan(&mut persistence, "Heavy truck plan");
    let update = PlanUpdate {
        header: PlanHeaderPatch::default(),
        intervals: Some(vec![
            IntervalDraft {
                draft_key: None,
                sequence_order: None,
                hours: 300.0,
                kilometers: 12_000.0,
                name: None,
            },
            IntervalDraft {
                draft_key: None,
                sequence_order: None,
                hours: 600.0,
                kilometers: 24_000.0,
                name: Some(String::from("Major")),
            },
        ]),
        activities: None,
    };
    let replacement: PlanReplacement =
        plan_replacement(&current, &update, create_test_actor(), create_test_cause()).unwrap();

    let updated = persistence
        .replace_plan(TENANT, &replacement, test_now())
        .unwrap();

    assert_eq!(updated.intervals.len(), 2);
    assert!((updated.intervals[0].hours - 300.0).abs() < f64::EPSILON);
    assert!(updated.interval(interval_id_at(&current, 1)).is_none());
    assert_eq!(sequences_of(&updated, "OIL"), BTreeSet::from([1, 2]));
    assert_eq!(sequences_of(&updated, "FILTER"), BTreeSet::from([2]));
    assert!(sequences_of(&updated, "BELTS").is_empty());
    assert_eq!(
        updated.activity_by_code("OIL").unwrap().activity_id,
        current.activity_by_code("OIL").unwrap().activity_id
    );
    assert!(updated.validate_matrix().is_ok());
}

#[test]
fn test_failed_replacement_keeps_prior_plan() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let current = create_stored_plan(&mut persistence, "Heavy truck plan");
    let update = PlanUpdate {
        header: PlanHeaderPatch {
            name: Some(String::from("Heavy truck plan v2")),
            ..PlanHeaderPatch::default()
        },
        intervals: Some(vec![IntervalDraft {
            draft_key: None,
            sequence_order: None,
            hours: 300.0,
            kilometers: 12_000.0,
            name: None,
        }]),
        activities: None,
    };
    let mut replacement: PlanReplacement =
        plan_replacement(&current, &update, create_test_actor(), create_test_cause()).unwrap();
    // The new intervals are written before the matrix finds order 9 missing.
    replacement
        .matrix
        .entry(String::from("OIL"))
        .or_default()
        .insert(9);

    let result = persistence.replace_plan(TENANT, &replacement, test_now());

    assert!(matches!(result, Err(PersistenceError::IncompleteWrite(_))));
    let stored = persistence.get_plan(TENANT, current.plan_id).unwrap().unwrap();
    assert_eq!(stored, current);
    assert_eq!(stored.matrix_rows(), current.matrix_rows());
    assert_eq!(
        persistence
            .get_entity_timeline(TENANT, EntityKind::Plan, current.plan_id)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_failed_duplicate_leaves_only_the_source() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let source = create_stored_plan(&mut persistence, "Heavy truck plan");
    let mut creation: PlanCreation =
        plan_duplicate(&source, None, create_test_actor(), create_test_cause()).unwrap();
    creation.plan.activities[0].sequence_orders.insert(9);

    let result = persistence.create_plan(TENANT, &creation, test_now());

    assert!(matches!(result, Err(PersistenceError::IncompleteWrite(_))));
    let plans = persistence.list_plans(TENANT, None, None).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0], source);
    assert_eq!(persistence.get_tenant_audit_events(TENANT).unwrap().len(), 1);
}

#[test]
fn test_replacing_activities_updates_by_code_and_creates_new_ones() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let current = create_stored_plan(&mut persistence, "Heavy truck plan");
    let update = PlanUpdate {
        header: PlanHeaderPatch {
            name: Some(String::from("Heavy truck plan v2")),
            ..PlanHeaderPatch::default()
        },
        intervals: None,
        activities: Some(vec![
            ActivityDraft {
                code: String::from("OIL"),
                description: String::from("Synthetic oil change"),
                category: Some(String::from("ENGINE")),
                is_active: true,
                applies_to: vec![IntervalRef::Sequence(1)],
            },
            ActivityDraft {
                code: String::from("TIRES"),
                description: String::from("Rotate tires"),
                category: None,
                is_active: true,
                applies_to: vec![IntervalRef::Persisted(interval_id_at(&current, 3))],
            },
        ]),
    };
    let replacement =
        plan_replacement(&current, &update, create_test_actor(), create_test_cause()).unwrap();

    let updated = persistence
        .replace_plan(TENANT, &replacement, test_now())
        .unwrap();

    let oil = updated.activity_by_code("OIL").unwrap();
    assert_eq!(updated.name, "Heavy truck plan v2");
    assert_eq!(oil.activity_id, current.activity_by_code("OIL").unwrap().activity_id);
    assert_eq!(oil.description, "Synthetic oil change");
    assert_eq!(oil.category.as_deref(), Some("ENGINE"));
    assert_eq!(sequences_of(&updated, "OIL"), BTreeSet::from([1]));
    assert_eq!(sequences_of(&updated, "TIRES"), BTreeSet::from([3]));
    // Activities left out of the list are kept without rows.
    assert!(sequences_of(&updated, "FILTER").is_empty());
    assert_eq!(updated.activities.len(), 4);
    // Intervals were not replaced, so their ids are stable.
    assert_eq!(interval_id_at(&updated, 3), interval_id_at(&current, 3));
}

#[test]
fn test_replace_plan_of_other_tenant_is_not_found() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let current = create_stored_plan(&mut persistence, "Heavy truck plan");
    let replacement = plan_replacement(
        &current,
        &PlanUpdate {
            header: PlanHeaderPatch::default(),
            intervals: None,
            activities: None,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let result = persistence.replace_plan(OTHER_TENANT, &replacement, test_now());

    assert_eq!(result, Err(PersistenceError::PlanNotFound(current.plan_id)));
}

#[test]
fn test_duplicate_remaps_every_row_through_sequence_order() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let source = create_stored_plan(&mut persistence, "Heavy truck plan");
    let creation = plan_duplicate(&source, None, create_test_actor(), create_test_cause()).unwrap();

    let copy = persistence.create_plan(TENANT, &creation, test_now()).unwrap();

    assert_ne!(copy.plan_id, source.plan_id);
    assert_eq!(copy.name, "Heavy truck plan (copy)");
    assert!(!copy.is_active);
    assert_eq!(copy.intervals.len(), source.intervals.len());
    assert_eq!(copy.activities.len(), source.activities.len());
    assert_eq!(copy.matrix_rows().len(), source.matrix_rows().len());
    assert_eq!(copy.matrix_by_sequence(), source.matrix_by_sequence());
    for interval in &copy.intervals {
        assert!(source.interval(interval.interval_id).is_none());
    }
    assert!(copy.validate_matrix().is_ok());
}

#[test]
fn test_activation_leaves_other_plans_untouched() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let first = create_stored_plan(&mut persistence, "First");
    let second = create_stored_plan(&mut persistence, "Second");

    let event = plan_activation(&first, false, create_test_actor(), create_test_cause());
    let updated = persistence
        .set_plan_active(TENANT, first.plan_id, false, &event, test_now())
        .unwrap();

    assert!(!updated.is_active);
    assert!(persistence.get_plan(TENANT, second.plan_id).unwrap().unwrap().is_active);
    let timeline = persistence
        .get_entity_timeline(TENANT, EntityKind::Plan, first.plan_id)
        .unwrap();
    assert_eq!(timeline.last().unwrap().action.name, "DeactivatePlan");
}

#[test]
fn test_delete_plan_cascades_catalog_rows_and_clears_vehicle_override() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let plan = create_stored_plan(&mut persistence, "Heavy truck plan");
    let vehicle_id = persistence
        .register_vehicle(
            TENANT,
            "ABC-123",
            "TRUCK",
            UsageCounters::default(),
            Some(plan.plan_id),
        )
        .unwrap();
    let event = plan_activation(&plan, false, create_test_actor(), create_test_cause());
    let inactive = persistence
        .set_plan_active(TENANT, plan.plan_id, false, &event, test_now())
        .unwrap();

    let deletion = plan_deletion(&inactive, create_test_actor(), create_test_cause()).unwrap();
    persistence
        .delete_plan(TENANT, plan.plan_id, &deletion, test_now())
        .unwrap();

    assert!(persistence.get_plan(TENANT, plan.plan_id).unwrap().is_none());
    let vehicle = persistence.get_vehicle(TENANT, vehicle_id).unwrap().unwrap();
    assert_eq!(vehicle.plan_id, None);

    let conn = &mut persistence.conn;
    let intervals: i64 = maintenance_intervals::table.count().get_result(conn).unwrap();
    let activities: i64 = maintenance_activities::table.count().get_result(conn).unwrap();
    let rows: i64 = activity_interval_matrix::table.count().get_result(conn).unwrap();
    assert_eq!((intervals, activities, rows), (0, 0, 0));
}

#[test]
fn test_matrix_rejects_rows_joining_two_plans() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let first = create_stored_plan(&mut persistence, "First");
    let second = create_stored_plan(&mut persistence, "Second");

    let result = diesel::insert_into(activity_interval_matrix::table)
        .values((
            activity_interval_matrix::plan_id.eq(first.plan_id),
            activity_interval_matrix::activity_id.eq(first.activities[0].activity_id),
            activity_interval_matrix::interval_id.eq(second.intervals[0].interval_id),
        ))
        .execute(&mut persistence.conn);

    assert!(result.is_err());
}
