// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet registration and vehicle usage write-back.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_maint::VehicleUsageUpdate;
use fleet_maint_domain::{UsageCounters, UserRole};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{flag, format_timestamp};
use crate::diesel_schema::{users, vehicles, workshops};
use crate::error::PersistenceError;

/// Registers a vehicle.
///
/// # Returns
///
/// The vehicle ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the plate is already registered in the tenant or
/// the insert fails.
pub fn insert_vehicle(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    plate: &str,
    vehicle_type: &str,
    counters: UsageCounters,
    plan_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(vehicles::table)
        .values((
            vehicles::tenant_id.eq(tenant_id),
            vehicles::plate.eq(plate),
            vehicles::vehicle_type.eq(vehicle_type),
            vehicles::odometer.eq(counters.odometer),
            vehicles::hourmeter.eq(counters.hourmeter),
            vehicles::plan_id.eq(plan_id),
        ))
        .execute(conn)?;
    let vehicle_id: i64 = get_last_insert_rowid(conn)?;
    info!(vehicle_id, tenant_id, plate, "Registered vehicle");
    Ok(vehicle_id)
}

/// Registers a workshop.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_workshop(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    name: &str,
    is_active: bool,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(workshops::table)
        .values((
            workshops::tenant_id.eq(tenant_id),
            workshops::name.eq(name),
            workshops::is_active.eq(flag(is_active)),
        ))
        .execute(conn)?;
    let workshop_id: i64 = get_last_insert_rowid(conn)?;
    info!(workshop_id, tenant_id, "Registered workshop");
    Ok(workshop_id)
}

/// Registers a user.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_user(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    display_name: &str,
    role: UserRole,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(users::table)
        .values((
            users::tenant_id.eq(tenant_id),
            users::display_name.eq(display_name),
            users::role.eq(role.as_str()),
        ))
        .execute(conn)?;
    let user_id: i64 = get_last_insert_rowid(conn)?;
    info!(user_id, tenant_id, role = %role, "Registered user");
    Ok(user_id)
}

/// Points a vehicle at a plan directly, or clears the override.
///
/// # Returns
///
/// The number of vehicles updated.
///
/// # Errors
///
/// Returns an error if the plan does not exist or the update fails.
pub fn set_vehicle_plan(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    vehicle_id: i64,
    plan_id: Option<i64>,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        vehicles::table
            .find(vehicle_id)
            .filter(vehicles::tenant_id.eq(tenant_id)),
    )
    .set(vehicles::plan_id.eq(plan_id))
    .execute(conn)?)
}

/// Writes back the usage snapshot of a closed work order.
///
/// Counters only move forward: a recorded start counter below the stored
/// reading leaves the reading untouched.
///
/// # Errors
///
/// Returns an error if the vehicle is missing or the update fails.
pub fn apply_vehicle_usage(
    conn: &mut SqliteConnection,
    update: &VehicleUsageUpdate,
) -> Result<(), PersistenceError> {
    let (current_odometer, current_hourmeter): (f64, f64) = vehicles::table
        .find(update.vehicle_id)
        .select((vehicles::odometer, vehicles::hourmeter))
        .first(conn)?;
    let odometer: f64 = update
        .odometer
        .map_or(current_odometer, |v| v.max(current_odometer));
    let hourmeter: f64 = update
        .hourmeter
        .map_or(current_hourmeter, |v| v.max(current_hourmeter));
    let last_maintenance_at: String = format_timestamp(update.last_maintenance_at)?;

    diesel::update(vehicles::table.find(update.vehicle_id))
        .set((
            vehicles::odometer.eq(odometer),
            vehicles::hourmeter.eq(hourmeter),
            vehicles::last_maintenance_at.eq(Some(last_maintenance_at)),
        ))
        .execute(conn)?;

    debug!(
        vehicle_id = update.vehicle_id,
        odometer,
        hourmeter,
        "Applied vehicle usage snapshot"
    );
    Ok(())
}
