// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plan catalog writes: create, full replace, duplicate, activation and deletion.
//!
//! Interval storage identifiers do not survive a replace or a duplicate, so
//! every write below expresses matrix rows as `code -> {sequence_order}`
//! and leaves the identifier mapping to the persistence layer.

use crate::error::CoreError;
use fleet_maint_audit::{Action, Actor, AuditEvent, AuditScope, Cause, EntityKind, StateSnapshot};
use fleet_maint_domain::{
    ActivityDefinition, ActivityDraft, DomainError, IntervalDefinition, IntervalDraft,
    MaintenancePlan, PlanDraft, PlanHeader, ResolvedPlan, resolve_activities, resolve_intervals,
    resolve_plan_draft, validate_plan_name,
};
use std::collections::{BTreeMap, BTreeSet};

/// Optional header changes for a plan update.
///
/// `None` keeps the stored value. For the nullable fields `Some(None)`
/// clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanHeaderPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New vehicle type filter.
    pub vehicle_type: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// A full-replace plan update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanUpdate {
    /// Header changes.
    pub header: PlanHeaderPatch,
    /// Replacement interval list. Replaces every interval when present.
    pub intervals: Option<Vec<IntervalDraft>>,
    /// Activity list. Matched by code against existing activities.
    pub activities: Option<Vec<ActivityDraft>>,
}

/// What happens to one activity during a replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityChange {
    /// An existing activity with the same code is updated in place.
    Update {
        /// The existing activity.
        activity_id: i64,
        /// Its new fields.
        definition: ActivityDefinition,
    },
    /// No activity has this code yet.
    Create(ActivityDefinition),
}

/// The writes a plan update translates into.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanReplacement {
    /// The plan being replaced.
    pub plan_id: i64,
    /// Header after the update.
    pub header: PlanHeader,
    /// Replacement intervals. When present, every interval and matrix row is deleted first.
    pub intervals: Option<Vec<IntervalDefinition>>,
    /// Activity writes.
    pub activity_changes: Vec<ActivityChange>,
    /// The complete matrix after the update, keyed by activity code.
    ///
    /// Activities without an entry have no rows.
    pub matrix: BTreeMap<String, BTreeSet<u32>>,
    /// The audit event recording the update.
    pub audit_event: AuditEvent,
}

/// A plan ready to be inserted, with its audit event.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCreation {
    /// The validated plan.
    pub plan: ResolvedPlan,
    /// The audit event. Its entity id is bound once the plan is stored.
    pub audit_event: AuditEvent,
}

fn plan_scope(tenant_id: i64, plan_id: Option<i64>) -> AuditScope {
    AuditScope::new(tenant_id, EntityKind::Plan, plan_id)
}

/// Converts a plan to a snapshot for audit purposes.
#[must_use]
pub fn plan_snapshot(plan: &MaintenancePlan) -> StateSnapshot {
    StateSnapshot::new(format!(
        "name={},active={},intervals={},activities={},rows={}",
        plan.name,
        plan.is_active,
        plan.intervals.len(),
        plan.activities.len(),
        plan.matrix_rows().len()
    ))
}

fn resolved_snapshot(plan: &ResolvedPlan) -> StateSnapshot {
    StateSnapshot::new(format!(
        "name={},active={},intervals={},activities={},rows={}",
        plan.header.name,
        plan.header.is_active,
        plan.intervals.len(),
        plan.activities.len(),
        plan.matrix_row_count()
    ))
}

fn current_interval_definitions(plan: &MaintenancePlan) -> Vec<IntervalDefinition> {
    let mut definitions: Vec<IntervalDefinition> = plan
        .intervals
        .iter()
        .map(|i| IntervalDefinition {
            sequence_order: i.sequence_order,
            hours: i.hours,
            kilometers: i.kilometers,
            name: i.name.clone(),
        })
        .collect();
    definitions.sort_by_key(|s| s.sequence_order);
    definitions
}

fn patched_header(
    plan: &MaintenancePlan,
    patch: &PlanHeaderPatch,
) -> Result<PlanHeader, DomainError> {
    let name: String = match patch.name.as_deref() {
        Some(name) => {
            validate_plan_name(name)?;
            name.trim().to_string()
        }
        None => plan.name.clone(),
    };
    Ok(PlanHeader {
        name,
        description: patch
            .description
            .clone()
            .unwrap_or_else(|| plan.description.clone()),
        vehicle_type: patch
            .vehicle_type
            .clone()
            .unwrap_or_else(|| plan.vehicle_type.clone()),
        is_active: patch.is_active.unwrap_or(plan.is_active),
    })
}

/// Validates a new plan.
///
/// # Errors
///
/// Returns an error if the draft violates any plan catalog rule.
pub fn plan_creation(
    tenant_id: i64,
    draft: &PlanDraft,
    actor: Actor,
    cause: Cause,
) -> Result<PlanCreation, CoreError> {
    let plan: ResolvedPlan = resolve_plan_draft(draft)?;
    let audit_event: AuditEvent = AuditEvent::new(
        plan_scope(tenant_id, None),
        actor,
        cause,
        Action::new(
            String::from("CreatePlan"),
            Some(format!("created plan '{}'", plan.header.name)),
        ),
        StateSnapshot::absent(),
        resolved_snapshot(&plan),
    );
    Ok(PlanCreation { plan, audit_event })
}

/// Plans a full-replace update of a plan.
///
/// # Arguments
///
/// * `current` - The plan as stored, with its intervals, activities and matrix
/// * `update` - The requested changes
/// * `actor` - The actor performing the update
/// * `cause` - The cause of the update
///
/// When intervals are replaced without an activity list, matrix rows are
/// carried over by sequence order; rows whose sequence order is gone are
/// dropped. Activities missing from a supplied activity list are kept and
/// lose their matrix rows.
///
/// # Errors
///
/// Returns an error if:
/// - A new name is empty
/// - A supplied interval or activity list is empty or invalid
/// - An activity references an unknown sequence order or a foreign interval
pub fn plan_replacement(
    current: &MaintenancePlan,
    update: &PlanUpdate,
    actor: Actor,
    cause: Cause,
) -> Result<PlanReplacement, CoreError> {
    let header: PlanHeader = patched_header(current, &update.header)?;

    let interval_drafts: &[IntervalDraft] = update.intervals.as_deref().unwrap_or(&[]);
    let new_intervals: Option<Vec<IntervalDefinition>> = match update.intervals.as_deref() {
        Some([]) => return Err(CoreError::DomainViolation(DomainError::EmptyIntervals)),
        Some(drafts) => Some(resolve_intervals(drafts)?),
        None => None,
    };
    let resulting: Vec<IntervalDefinition> = new_intervals
        .clone()
        .unwrap_or_else(|| current_interval_definitions(current));
    let available: BTreeSet<u32> = resulting.iter().map(|i| i.sequence_order).collect();

    let mut activity_changes: Vec<ActivityChange> = Vec::new();
    let matrix: BTreeMap<String, BTreeSet<u32>> = match update.activities.as_deref() {
        Some([]) => return Err(CoreError::DomainViolation(DomainError::EmptyActivities)),
        Some(drafts) => {
            let definitions: Vec<ActivityDefinition> =
                resolve_activities(drafts, interval_drafts, &resulting, &current.intervals)?;
            let mut matrix: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
            for definition in definitions {
                matrix.insert(definition.code.clone(), definition.sequence_orders.clone());
                match current.activity_by_code(&definition.code) {
                    Some(existing) => activity_changes.push(ActivityChange::Update {
                        activity_id: existing.activity_id,
                        definition,
                    }),
                    None => activity_changes.push(ActivityChange::Create(definition)),
                }
            }
            matrix
        }
        None => current
            .matrix_by_sequence()
            .into_iter()
            .map(|(code, orders)| {
                let kept: BTreeSet<u32> = orders.intersection(&available).copied().collect();
                (code, kept)
            })
            .collect(),
    };

    let row_count: usize = matrix.values().map(BTreeSet::len).sum();
    let after: StateSnapshot = StateSnapshot::new(format!(
        "name={},active={},intervals={},activities={},rows={}",
        header.name,
        header.is_active,
        resulting.len(),
        current.activities.len()
            + activity_changes
                .iter()
                .filter(|c| matches!(c, ActivityChange::Create(_)))
                .count(),
        row_count
    ));
    let audit_event: AuditEvent = AuditEvent::new(
        plan_scope(current.tenant_id, Some(current.plan_id)),
        actor,
        cause,
        Action::new(
            String::from("UpdatePlan"),
            Some(format!(
                "intervals {}, activities {}",
                if new_intervals.is_some() { "replaced" } else { "kept" },
                if update.activities.is_some() { "replaced" } else { "kept" }
            )),
        ),
        plan_snapshot(current),
        after,
    );

    Ok(PlanReplacement {
        plan_id: current.plan_id,
        header,
        intervals: new_intervals,
        activity_changes,
        matrix,
        audit_event,
    })
}

/// Plans a duplicate of a plan.
///
/// The copy is always inactive. Intervals are cloned one-to-one by sequence
/// order and every matrix row is remapped through its interval's sequence
/// order.
///
/// # Arguments
///
/// * `source` - The plan to copy
/// * `name` - Name of the copy. Defaults to `"<name> (copy)"`.
/// * `actor` - The actor requesting the copy
/// * `cause` - The cause of the copy
///
/// # Errors
///
/// Returns an error if an explicit name is empty.
pub fn plan_duplicate(
    source: &MaintenancePlan,
    name: Option<&str>,
    actor: Actor,
    cause: Cause,
) -> Result<PlanCreation, CoreError> {
    let name: String = match name {
        Some(name) => {
            validate_plan_name(name)?;
            name.trim().to_string()
        }
        None => format!("{} (copy)", source.name),
    };

    let activities: Vec<ActivityDefinition> = source
        .activities
        .iter()
        .map(|a| ActivityDefinition {
            code: a.code.clone(),
            description: a.description.clone(),
            category: a.category.clone(),
            is_active: a.is_active,
            sequence_orders: source.sequence_orders_for(a),
        })
        .collect();

    let plan: ResolvedPlan = ResolvedPlan {
        header: PlanHeader {
            name,
            description: source.description.clone(),
            vehicle_type: source.vehicle_type.clone(),
            is_active: false,
        },
        intervals: current_interval_definitions(source),
        activities,
    };

    let audit_event: AuditEvent = AuditEvent::new(
        plan_scope(source.tenant_id, None),
        actor,
        cause,
        Action::new(
            String::from("DuplicatePlan"),
            Some(format!("copied from plan {}", source.plan_id)),
        ),
        StateSnapshot::absent(),
        resolved_snapshot(&plan),
    );
    Ok(PlanCreation { plan, audit_event })
}

/// Records an activation change. Other plans are never touched.
#[must_use]
pub fn plan_activation(
    plan: &MaintenancePlan,
    is_active: bool,
    actor: Actor,
    cause: Cause,
) -> AuditEvent {
    let mut after: MaintenancePlan = plan.clone();
    after.is_active = is_active;
    let name: &str = if is_active {
        "ActivatePlan"
    } else {
        "DeactivatePlan"
    };
    AuditEvent::new(
        plan_scope(plan.tenant_id, Some(plan.plan_id)),
        actor,
        cause,
        Action::new(String::from(name), None),
        plan_snapshot(plan),
        plan_snapshot(&after),
    )
}

/// Checks that a plan may be deleted and records the deletion.
///
/// # Errors
///
/// Returns `DomainError::PlanActive` when the plan is active.
pub fn plan_deletion(
    plan: &MaintenancePlan,
    actor: Actor,
    cause: Cause,
) -> Result<AuditEvent, CoreError> {
    if plan.is_active {
        return Err(CoreError::DomainViolation(DomainError::PlanActive(
            plan.plan_id,
        )));
    }
    Ok(AuditEvent::new(
        plan_scope(plan.tenant_id, Some(plan.plan_id)),
        actor,
        cause,
        Action::new(
            String::from("DeletePlan"),
            Some(format!("deleted plan '{}'", plan.name)),
        ),
        plan_snapshot(plan),
        StateSnapshot::absent(),
    ))
}
