// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lookups of externally owned fleet entities.
//!
//! Every lookup is scoped by tenant: an entity of another tenant is
//! indistinguishable from a missing one.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_maint_domain::{FleetUser, UserRole, Vehicle, Workshop};

use crate::data_models::{parse_column, parse_optional_timestamp};
use crate::diesel_schema::{users, vehicles, workshops};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = vehicles)]
struct VehicleRow {
    vehicle_id: i64,
    tenant_id: i64,
    plate: String,
    vehicle_type: String,
    odometer: f64,
    hourmeter: f64,
    plan_id: Option<i64>,
    last_maintenance_at: Option<String>,
}

impl VehicleRow {
    fn into_vehicle(self) -> Result<Vehicle, PersistenceError> {
        Ok(Vehicle {
            vehicle_id: self.vehicle_id,
            tenant_id: self.tenant_id,
            plate: self.plate,
            vehicle_type: self.vehicle_type,
            odometer: self.odometer,
            hourmeter: self.hourmeter,
            plan_id: self.plan_id,
            last_maintenance_at: parse_optional_timestamp(
                "vehicles",
                self.last_maintenance_at.as_deref(),
            )?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = workshops)]
struct WorkshopRow {
    workshop_id: i64,
    tenant_id: i64,
    name: String,
    is_active: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct UserRow {
    user_id: i64,
    tenant_id: i64,
    display_name: String,
    role: String,
}

/// Looks up a vehicle by id within a tenant.
///
/// # Errors
///
/// Returns an error if the query fails or the row is corrupt.
pub fn find_vehicle(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    vehicle_id: i64,
) -> Result<Option<Vehicle>, PersistenceError> {
    let result = vehicles::table
        .filter(vehicles::vehicle_id.eq(vehicle_id))
        .filter(vehicles::tenant_id.eq(tenant_id))
        .select(VehicleRow::as_select())
        .first::<VehicleRow>(conn);

    match result {
        Ok(row) => row.into_vehicle().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists the vehicles of a tenant.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_vehicles(
    conn: &mut SqliteConnection,
    tenant_id: i64,
) -> Result<Vec<Vehicle>, PersistenceError> {
    vehicles::table
        .filter(vehicles::tenant_id.eq(tenant_id))
        .order(vehicles::vehicle_id.asc())
        .select(VehicleRow::as_select())
        .load::<VehicleRow>(conn)?
        .into_iter()
        .map(VehicleRow::into_vehicle)
        .collect()
}

/// Looks up an active workshop by id within a tenant.
///
/// Inactive workshops are reported as absent.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_active_workshop(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    workshop_id: i64,
) -> Result<Option<Workshop>, PersistenceError> {
    let result = workshops::table
        .filter(workshops::workshop_id.eq(workshop_id))
        .filter(workshops::tenant_id.eq(tenant_id))
        .filter(workshops::is_active.eq(1))
        .select(WorkshopRow::as_select())
        .first::<WorkshopRow>(conn);

    match result {
        Ok(row) => Ok(Some(Workshop {
            workshop_id: row.workshop_id,
            tenant_id: row.tenant_id,
            name: row.name,
            is_active: row.is_active != 0,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Looks up a user by id within a tenant.
///
/// # Errors
///
/// Returns an error if the query fails or the stored role is unknown.
pub fn find_user(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    user_id: i64,
) -> Result<Option<FleetUser>, PersistenceError> {
    let result = users::table
        .filter(users::user_id.eq(user_id))
        .filter(users::tenant_id.eq(tenant_id))
        .select(UserRow::as_select())
        .first::<UserRow>(conn);

    match result {
        Ok(row) => Ok(Some(FleetUser {
            user_id: row.user_id,
            tenant_id: row.tenant_id,
            display_name: row.display_name,
            role: parse_column::<UserRole>("users", &row.role)?,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
