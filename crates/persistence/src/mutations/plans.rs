// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plan catalog mutations.
//!
//! Matrix rows arrive keyed by sequence order. They are mapped onto real
//! interval identifiers only after the intervals have been written.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_maint::{ActivityChange, PlanReplacement};
use fleet_maint_domain::{ActivityDefinition, IntervalDefinition, PlanHeader, ResolvedPlan};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{flag, format_timestamp, sequence_from_column, sequence_to_column};
use crate::diesel_schema::{
    activity_interval_matrix, maintenance_activities, maintenance_intervals, maintenance_plans,
};
use crate::error::PersistenceError;

fn insert_intervals(
    conn: &mut SqliteConnection,
    plan_id: i64,
    intervals: &[IntervalDefinition],
) -> Result<(), PersistenceError> {
    for interval in intervals {
        diesel::insert_into(maintenance_intervals::table)
            .values((
                maintenance_intervals::plan_id.eq(plan_id),
                maintenance_intervals::sequence_order
                    .eq(sequence_to_column(interval.sequence_order)?),
                maintenance_intervals::hours.eq(interval.hours),
                maintenance_intervals::kilometers.eq(interval.kilometers),
                maintenance_intervals::name.eq(interval.name.as_deref()),
            ))
            .execute(conn)?;
    }
    Ok(())
}

fn insert_activity(
    conn: &mut SqliteConnection,
    plan_id: i64,
    activity: &ActivityDefinition,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(maintenance_activities::table)
        .values((
            maintenance_activities::plan_id.eq(plan_id),
            maintenance_activities::code.eq(activity.code.as_str()),
            maintenance_activities::description.eq(activity.description.as_str()),
            maintenance_activities::category.eq(activity.category.as_deref()),
            maintenance_activities::is_active.eq(flag(activity.is_active)),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Maps the plan's sequence orders to the interval ids currently stored.
fn interval_ids_by_sequence(
    conn: &mut SqliteConnection,
    plan_id: i64,
) -> Result<HashMap<u32, i64>, PersistenceError> {
    let rows: Vec<(i32, i64)> = maintenance_intervals::table
        .filter(maintenance_intervals::plan_id.eq(plan_id))
        .select((
            maintenance_intervals::sequence_order,
            maintenance_intervals::interval_id,
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(sequence_order, interval_id)| {
            Ok((sequence_from_column(sequence_order)?, interval_id))
        })
        .collect()
}

/// Writes matrix rows for one activity.
fn insert_matrix_rows(
    conn: &mut SqliteConnection,
    plan_id: i64,
    activity_id: i64,
    sequence_orders: &BTreeSet<u32>,
    intervals: &HashMap<u32, i64>,
) -> Result<usize, PersistenceError> {
    for sequence_order in sequence_orders {
        let interval_id: i64 = *intervals.get(sequence_order).ok_or_else(|| {
            PersistenceError::IncompleteWrite(format!(
                "plan {plan_id} has no interval with sequence order {sequence_order}"
            ))
        })?;
        diesel::insert_into(activity_interval_matrix::table)
            .values((
                activity_interval_matrix::plan_id.eq(plan_id),
                activity_interval_matrix::activity_id.eq(activity_id),
                activity_interval_matrix::interval_id.eq(interval_id),
            ))
            .execute(conn)?;
    }
    Ok(sequence_orders.len())
}

/// Inserts a validated plan with its intervals, activities and matrix.
///
/// Must run inside a transaction.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `tenant_id` - The owning tenant
/// * `plan` - The validated plan
/// * `created_at` - Creation time
///
/// # Returns
///
/// The plan ID assigned by the database.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn insert_plan(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    plan: &ResolvedPlan,
    created_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(maintenance_plans::table)
        .values((
            maintenance_plans::tenant_id.eq(tenant_id),
            maintenance_plans::name.eq(plan.header.name.as_str()),
            maintenance_plans::description.eq(plan.header.description.as_deref()),
            maintenance_plans::vehicle_type.eq(plan.header.vehicle_type.as_deref()),
            maintenance_plans::is_active.eq(flag(plan.header.is_active)),
            maintenance_plans::created_at.eq(format_timestamp(created_at)?),
        ))
        .execute(conn)?;
    let plan_id: i64 = get_last_insert_rowid(conn)?;

    insert_intervals(conn, plan_id, &plan.intervals)?;
    let intervals: HashMap<u32, i64> = interval_ids_by_sequence(conn, plan_id)?;

    let mut rows: usize = 0;
    for activity in &plan.activities {
        let activity_id: i64 = insert_activity(conn, plan_id, activity)?;
        rows += insert_matrix_rows(
            conn,
            plan_id,
            activity_id,
            &activity.sequence_orders,
            &intervals,
        )?;
    }

    debug!(
        plan_id,
        tenant_id,
        intervals = plan.intervals.len(),
        activities = plan.activities.len(),
        rows,
        "Inserted plan"
    );
    Ok(plan_id)
}

fn update_header(
    conn: &mut SqliteConnection,
    plan_id: i64,
    header: &PlanHeader,
    updated_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    diesel::update(maintenance_plans::table.find(plan_id))
        .set((
            maintenance_plans::name.eq(header.name.as_str()),
            maintenance_plans::description.eq(header.description.as_deref()),
            maintenance_plans::vehicle_type.eq(header.vehicle_type.as_deref()),
            maintenance_plans::is_active.eq(flag(header.is_active)),
            maintenance_plans::updated_at.eq(Some(format_timestamp(updated_at)?)),
        ))
        .execute(conn)?;
    Ok(())
}

/// Applies a full plan replacement.
///
/// Every matrix row of the plan is deleted and recreated from
/// `replacement.matrix`. When new intervals are supplied, the old ones are
/// deleted first. Must run inside a transaction.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn replace_plan(
    conn: &mut SqliteConnection,
    replacement: &PlanReplacement,
    updated_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let plan_id: i64 = replacement.plan_id;

    update_header(conn, plan_id, &replacement.header, updated_at)?;

    diesel::delete(
        activity_interval_matrix::table.filter(activity_interval_matrix::plan_id.eq(plan_id)),
    )
    .execute(conn)?;

    if let Some(intervals) = &replacement.intervals {
        diesel::delete(
            maintenance_intervals::table.filter(maintenance_intervals::plan_id.eq(plan_id)),
        )
        .execute(conn)?;
        insert_intervals(conn, plan_id, intervals)?;
    }

    for change in &replacement.activity_changes {
        match change {
            ActivityChange::Update { activity_id, definition } => {
                diesel::update(
                    maintenance_activities::table
                        .find(*activity_id)
                        .filter(maintenance_activities::plan_id.eq(plan_id)),
                )
                .set((
                    maintenance_activities::description.eq(definition.description.as_str()),
                    maintenance_activities::category.eq(definition.category.as_deref()),
                    maintenance_activities::is_active.eq(flag(definition.is_active)),
                ))
                .execute(conn)?;
            }
            ActivityChange::Create(definition) => {
                insert_activity(conn, plan_id, definition)?;
            }
        }
    }

    let intervals: HashMap<u32, i64> = interval_ids_by_sequence(conn, plan_id)?;
    let activities: BTreeMap<String, i64> = maintenance_activities::table
        .filter(maintenance_activities::plan_id.eq(plan_id))
        .select((maintenance_activities::code, maintenance_activities::activity_id))
        .load::<(String, i64)>(conn)?
        .into_iter()
        .collect();

    let mut rows: usize = 0;
    for (code, sequence_orders) in &replacement.matrix {
        let activity_id: i64 = *activities.get(code).ok_or_else(|| {
            PersistenceError::IncompleteWrite(format!(
                "plan {plan_id} has no activity with code '{code}'"
            ))
        })?;
        rows += insert_matrix_rows(conn, plan_id, activity_id, sequence_orders, &intervals)?;
    }

    debug!(
        plan_id,
        intervals_replaced = replacement.intervals.is_some(),
        activity_changes = replacement.activity_changes.len(),
        rows,
        "Replaced plan"
    );
    Ok(())
}

/// Sets the active flag of a plan.
///
/// # Returns
///
/// The number of rows updated (0 when the plan is not in the tenant).
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_plan_active(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    plan_id: i64,
    is_active: bool,
    updated_at: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        maintenance_plans::table
            .find(plan_id)
            .filter(maintenance_plans::tenant_id.eq(tenant_id)),
    )
    .set((
        maintenance_plans::is_active.eq(flag(is_active)),
        maintenance_plans::updated_at.eq(Some(format_timestamp(updated_at)?)),
    ))
    .execute(conn)?)
}

/// Deletes a plan. Intervals, activities and matrix rows cascade.
///
/// # Returns
///
/// The number of plans deleted.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_plan(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    plan_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(diesel::delete(
        maintenance_plans::table
            .find(plan_id)
            .filter(maintenance_plans::tenant_id.eq(tenant_id)),
    )
    .execute(conn)?)
}
