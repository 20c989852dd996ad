// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plan catalog queries.
//!
//! A plan is assembled from four tables: the plan header, its intervals,
//! its activities, and the matrix rows linking the latter two.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_maint_domain::{MaintenanceActivity, MaintenanceInterval, MaintenancePlan};
use std::collections::HashSet;
use tracing::debug;

use crate::data_models::{parse_timestamp, sequence_from_column};
use crate::diesel_schema::{
    activity_interval_matrix, maintenance_activities, maintenance_intervals, maintenance_plans,
};
use crate::error::PersistenceError;

/// Diesel Queryable struct for plan headers.
#[derive(Queryable, Selectable)]
#[diesel(table_name = maintenance_plans)]
struct PlanRow {
    plan_id: i64,
    tenant_id: i64,
    name: String,
    description: Option<String>,
    vehicle_type: Option<String>,
    is_active: i32,
    created_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = maintenance_intervals)]
struct IntervalRow {
    interval_id: i64,
    plan_id: i64,
    sequence_order: i32,
    hours: f64,
    kilometers: f64,
    name: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = maintenance_activities)]
struct ActivityRow {
    activity_id: i64,
    plan_id: i64,
    code: String,
    description: String,
    category: Option<String>,
    is_active: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = activity_interval_matrix)]
struct MatrixLinkRow {
    activity_id: i64,
    interval_id: i64,
}

fn load_intervals(
    conn: &mut SqliteConnection,
    plan_id: i64,
) -> Result<Vec<MaintenanceInterval>, PersistenceError> {
    let rows: Vec<IntervalRow> = maintenance_intervals::table
        .filter(maintenance_intervals::plan_id.eq(plan_id))
        .order(maintenance_intervals::sequence_order.asc())
        .select(IntervalRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(MaintenanceInterval {
                interval_id: row.interval_id,
                plan_id: row.plan_id,
                sequence_order: sequence_from_column(row.sequence_order)?,
                hours: row.hours,
                kilometers: row.kilometers,
                name: row.name,
            })
        })
        .collect()
}

fn assemble_plan(
    conn: &mut SqliteConnection,
    row: PlanRow,
) -> Result<MaintenancePlan, PersistenceError> {
    let intervals: Vec<MaintenanceInterval> = load_intervals(conn, row.plan_id)?;

    let activity_rows: Vec<ActivityRow> = maintenance_activities::table
        .filter(maintenance_activities::plan_id.eq(row.plan_id))
        .order(maintenance_activities::activity_id.asc())
        .select(ActivityRow::as_select())
        .load(conn)?;

    let links: HashSet<(i64, i64)> = activity_interval_matrix::table
        .filter(activity_interval_matrix::plan_id.eq(row.plan_id))
        .select(MatrixLinkRow::as_select())
        .load::<MatrixLinkRow>(conn)?
        .into_iter()
        .map(|link| (link.activity_id, link.interval_id))
        .collect();

    let activities: Vec<MaintenanceActivity> = activity_rows
        .into_iter()
        .map(|a| {
            // Interval ids follow the plan's sequence order.
            let interval_ids: Vec<i64> = intervals
                .iter()
                .filter(|i| links.contains(&(a.activity_id, i.interval_id)))
                .map(|i| i.interval_id)
                .collect();
            MaintenanceActivity {
                activity_id: a.activity_id,
                plan_id: a.plan_id,
                code: a.code,
                description: a.description,
                category: a.category,
                is_active: a.is_active != 0,
                interval_ids,
            }
        })
        .collect();

    Ok(MaintenancePlan {
        plan_id: row.plan_id,
        tenant_id: row.tenant_id,
        name: row.name,
        description: row.description,
        vehicle_type: row.vehicle_type,
        is_active: row.is_active != 0,
        created_at: parse_timestamp("maintenance_plans", &row.created_at)?,
        intervals,
        activities,
    })
}

/// Loads a plan with its intervals, activities and matrix.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `tenant_id` - The tenant the plan must belong to
/// * `plan_id` - The plan to load
///
/// # Returns
///
/// `None` when the plan does not exist in the tenant.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn find_plan(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    plan_id: i64,
) -> Result<Option<MaintenancePlan>, PersistenceError> {
    let result = maintenance_plans::table
        .filter(maintenance_plans::plan_id.eq(plan_id))
        .filter(maintenance_plans::tenant_id.eq(tenant_id))
        .select(PlanRow::as_select())
        .first::<PlanRow>(conn);

    match result {
        Ok(row) => assemble_plan(conn, row).map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists the plans of a tenant, oldest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `tenant_id` - The tenant
/// * `vehicle_type` - Only plans targeting this vehicle type (case-insensitive)
/// * `is_active` - Only plans with this active flag
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn list_plans(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    vehicle_type: Option<&str>,
    is_active: Option<bool>,
) -> Result<Vec<MaintenancePlan>, PersistenceError> {
    let mut query = maintenance_plans::table
        .filter(maintenance_plans::tenant_id.eq(tenant_id))
        .order(maintenance_plans::plan_id.asc())
        .select(PlanRow::as_select())
        .into_boxed();
    if let Some(active) = is_active {
        query = query.filter(maintenance_plans::is_active.eq(i32::from(active)));
    }
    let rows: Vec<PlanRow> = query.load(conn)?;

    let mut plans: Vec<MaintenancePlan> = Vec::with_capacity(rows.len());
    for row in rows {
        let plan: MaintenancePlan = assemble_plan(conn, row)?;
        if vehicle_type.is_none_or(|t| plan.matches_vehicle_type(t)) {
            plans.push(plan);
        }
    }

    debug!(tenant_id, count = plans.len(), "Listed plans");
    Ok(plans)
}
