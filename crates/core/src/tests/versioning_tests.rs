// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::tests::helpers::{create_test_actor, create_test_cause, create_test_plan};
use crate::{
    ActivityChange, CoreError, PlanHeaderPatch, PlanReplacement, PlanUpdate, plan_activation,
    plan_deletion, plan_duplicate, plan_replacement,
};
use fleet_maint_domain::{
    ActivityDraft, DomainError, IntervalDraft, IntervalRef, MaintenanceActivity,
    MaintenanceInterval, MaintenancePlan,
};

fn seqs(orders: &[u32]) -> BTreeSet<u32> {
    orders.iter().copied().collect()
}

fn interval_draft(sequence_order: Option<u32>, hours: f64, kilometers: f64) -> IntervalDraft {
    IntervalDraft {
        draft_key: None,
        sequence_order,
        hours,
        kilometers,
        name: None,
    }
}

fn activity_draft(code: &str, applies_to: Vec<IntervalRef>) -> ActivityDraft {
    ActivityDraft {
        code: code.to_string(),
        description: format!("Updated {code}"),
        category: None,
        is_active: true,
        applies_to,
    }
}

fn replace(update: &PlanUpdate) -> Result<PlanReplacement, CoreError> {
    plan_replacement(
        &create_test_plan(),
        update,
        create_test_actor(),
        create_test_cause(),
    )
}

#[test]
fn test_header_patch_can_clear_nullable_fields() {
    let update = PlanUpdate {
        header: PlanHeaderPatch {
            vehicle_type: Some(None),
            ..PlanHeaderPatch::default()
        },
        ..PlanUpdate::default()
    };

    let replacement = replace(&update).unwrap();

    assert!(replacement.header.vehicle_type.is_none());
    assert_eq!(
        replacement.header.description.as_deref(),
        Some("Standard service schedule")
    );
}

#[test]
fn test_header_only_update_keeps_catalog() {
    let update = PlanUpdate {
        header: PlanHeaderPatch {
            name: Some(String::from(" Renamed ")),
            is_active: Some(false),
            ..PlanHeaderPatch::default()
        },
        ..PlanUpdate::default()
    };

    let replacement = replace(&update).unwrap();

    assert_eq!(replacement.header.name, "Renamed");
    assert!(!replacement.header.is_active);
    assert_eq!(
        replacement.header.vehicle_type.as_deref(),
        Some("TRUCK")
    );
    assert!(replacement.intervals.is_none());
    assert!(replacement.activity_changes.is_empty());
    assert_eq!(replacement.matrix["OIL"], seqs(&[1, 2, 3]));
    assert_eq!(replacement.audit_event.action.name, "UpdatePlan");
}

#[test]
fn test_interval_replace_carries_rows_by_sequence_order() {
    let update = PlanUpdate {
        intervals: Some(vec![
            interval_draft(None, 300.0, 12_000.0),
            interval_draft(None, 600.0, 24_000.0),
        ]),
        ..PlanUpdate::default()
    };

    let replacement = replace(&update).unwrap();

    let intervals = replacement.intervals.unwrap();
    assert_eq!(intervals.len(), 2);
    assert_eq!(replacement.matrix["OIL"], seqs(&[1, 2]));
    assert_eq!(replacement.matrix["FILTER"], seqs(&[2]));
    assert_eq!(replacement.matrix["BELTS"], seqs(&[]));
}

#[test]
fn test_activity_list_matches_by_code() {
    let update = PlanUpdate {
        activities: Some(vec![
            activity_draft("OIL", vec![IntervalRef::Sequence(1)]),
            activity_draft("COOLANT", vec![IntervalRef::Persisted(102)]),
        ]),
        ..PlanUpdate::default()
    };

    let replacement = replace(&update).unwrap();

    assert!(matches!(
        &replacement.activity_changes[0],
        ActivityChange::Update { activity_id: 200, definition } if definition.description == "Updated OIL"
    ));
    assert!(matches!(
        &replacement.activity_changes[1],
        ActivityChange::Create(definition) if definition.code == "COOLANT"
    ));
    assert_eq!(replacement.matrix["OIL"], seqs(&[1]));
    assert_eq!(replacement.matrix["COOLANT"], seqs(&[3]));
    // Activities left out of the list keep existing but lose their rows.
    assert!(!replacement.matrix.contains_key("FILTER"));
}

#[test]
fn test_combined_replace_resolves_persisted_refs_through_old_sequence() {
    let update = PlanUpdate {
        intervals: Some(vec![interval_draft(Some(2), 550.0, 22_000.0)]),
        activities: Some(vec![activity_draft(
            "OIL",
            vec![IntervalRef::Persisted(100), IntervalRef::Persisted(101)],
        )]),
        ..PlanUpdate::default()
    };

    let replacement = replace(&update).unwrap();

    assert_eq!(replacement.matrix["OIL"], seqs(&[2]));
}

#[test]
fn test_replace_rejects_bad_input() {
    let empty_intervals = PlanUpdate {
        intervals: Some(Vec::new()),
        ..PlanUpdate::default()
    };
    let foreign_interval = PlanUpdate {
        activities: Some(vec![activity_draft("OIL", vec![IntervalRef::Persisted(999)])]),
        ..PlanUpdate::default()
    };
    let unknown_sequence = PlanUpdate {
        activities: Some(vec![activity_draft("OIL", vec![IntervalRef::Sequence(9)])]),
        ..PlanUpdate::default()
    };

    assert_eq!(
        replace(&empty_intervals),
        Err(CoreError::DomainViolation(DomainError::EmptyIntervals))
    );
    assert_eq!(
        replace(&foreign_interval),
        Err(CoreError::DomainViolation(DomainError::UnknownIntervalId(999)))
    );
    assert!(matches!(
        replace(&unknown_sequence),
        Err(CoreError::DomainViolation(
            DomainError::UnknownIntervalSequence { sequence_order: 9, .. }
        ))
    ));
}

#[test]
fn test_duplicate_is_inactive_copy() {
    let source = create_test_plan();

    let creation = plan_duplicate(&source, None, create_test_actor(), create_test_cause()).unwrap();

    assert_eq!(creation.plan.header.name, "Heavy truck plan (copy)");
    assert!(!creation.plan.header.is_active);
    assert_eq!(creation.plan.intervals.len(), 3);
    assert_eq!(creation.plan.activities[0].sequence_orders, seqs(&[1, 2, 3]));
    assert_eq!(creation.plan.matrix_row_count(), source.matrix_rows().len());
    assert_eq!(creation.audit_event.action.name, "DuplicatePlan");
}

#[test]
fn test_duplicate_with_explicit_name() {
    let source = create_test_plan();

    let creation = plan_duplicate(
        &source,
        Some("Truck plan v2"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(creation.plan.header.name, "Truck plan v2");
    assert!(matches!(
        plan_duplicate(&source, Some(""), create_test_actor(), create_test_cause()),
        Err(CoreError::DomainViolation(DomainError::InvalidPlanName(_)))
    ));
}

#[test]
fn test_active_plan_cannot_be_deleted() {
    let mut plan = create_test_plan();

    assert_eq!(
        plan_deletion(&plan, create_test_actor(), create_test_cause()),
        Err(CoreError::DomainViolation(DomainError::PlanActive(1)))
    );

    plan.is_active = false;
    let event = plan_deletion(&plan, create_test_actor(), create_test_cause()).unwrap();
    assert_eq!(event.action.name, "DeletePlan");
}

#[test]
fn test_activation_event() {
    let plan = create_test_plan();

    let event = plan_activation(&plan, false, create_test_actor(), create_test_cause());

    assert_eq!(event.action.name, "DeactivatePlan");
    assert!(event.before.data.contains("active=true"));
    assert!(event.after.data.contains("active=false"));
}

fn arbitrary_plan() -> impl Strategy<Value = MaintenancePlan> {
    (1usize..6, 1usize..6)
        .prop_flat_map(|(interval_count, activity_count)| {
            (
                Just(interval_count),
                proptest::collection::vec(
                    proptest::collection::vec(any::<bool>(), interval_count),
                    activity_count,
                ),
            )
        })
        .prop_map(|(interval_count, applies)| {
            let mut plan = create_test_plan();
            // Storage ids deliberately unrelated to sequence order.
            plan.intervals = (0..interval_count)
                .map(|n| MaintenanceInterval {
                    interval_id: 900 - i64::try_from(n).unwrap() * 7,
                    plan_id: 1,
                    sequence_order: u32::try_from(interval_count - n).unwrap(),
                    hours: 100.0 * f64::from(u32::try_from(n + 1).unwrap()),
                    kilometers: 5_000.0 * f64::from(u32::try_from(n + 1).unwrap()),
                    name: None,
                })
                .collect();
            plan.activities = applies
                .iter()
                .enumerate()
                .map(|(a, row)| MaintenanceActivity {
                    activity_id: 300 + i64::try_from(a).unwrap(),
                    plan_id: 1,
                    code: format!("ACT{a}"),
                    description: format!("Activity {a}"),
                    category: None,
                    is_active: true,
                    interval_ids: row
                        .iter()
                        .enumerate()
                        .filter(|(_, applies)| **applies)
                        .map(|(n, _)| 900 - i64::try_from(n).unwrap() * 7)
                        .collect(),
                })
                .collect();
            plan
        })
}

proptest! {
    #[test]
    fn test_duplicate_preserves_cardinality_and_rows(source in arbitrary_plan()) {
        let creation =
            plan_duplicate(&source, None, create_test_actor(), create_test_cause()).unwrap();
        let copy = creation.plan;

        prop_assert_eq!(copy.intervals.len(), source.intervals.len());
        prop_assert_eq!(copy.activities.len(), source.activities.len());
        prop_assert_eq!(copy.matrix_row_count(), source.matrix_rows().len());

        for row in source.matrix_rows() {
            let activity = source
                .activities
                .iter()
                .find(|a| a.activity_id == row.activity_id)
                .unwrap();
            let order = source.interval(row.interval_id).unwrap().sequence_order;
            let copied = copy.activities.iter().filter(|a| a.code == activity.code).count();
            prop_assert_eq!(copied, 1);
            let definition = copy.activities.iter().find(|a| a.code == activity.code).unwrap();
            prop_assert!(definition.sequence_orders.contains(&order));
            prop_assert!(copy.intervals.iter().any(|i| i.sequence_order == order));
        }
    }
}
