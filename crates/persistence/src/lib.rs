// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the fleet maintenance engine.
//!
//! This crate stores the plan catalog, work orders, fleet reference
//! entities and the audit trail in `SQLite` through Diesel.
//!
//! ## Transactions
//!
//! Every operation that writes more than one row runs in a single
//! transaction, so a failure leaves nothing behind. Work order creation
//! uses an `IMMEDIATE` transaction: the write lock is taken before the
//! tenant's number is read, which serializes concurrent creators.
//!
//! ## Testing
//!
//! Tests run against shared in-memory databases created with
//! [`Persistence::new_in_memory`]. Each call gets its own database.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::prelude::*;
use diesel::SqliteConnection;
use fleet_maint::{
    PlanCreation, PlanReplacement, TransitionResult, WorkOrderCreation, WorkOrderState,
};
use fleet_maint_audit::{AuditEvent, EntityKind};
use fleet_maint_domain::{
    FleetUser, MaintenancePlan, UsageCounters, UserRole, Vehicle, WorkOrder, WorkOrderStatus,
    Workshop,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Type alias kept for call sites that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_fleet_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Plan Catalog
    // ========================================================================

    /// Stores a new plan and its audit event.
    ///
    /// # Arguments
    ///
    /// * `tenant_id` - The owning tenant
    /// * `creation` - The validated plan and its audit event
    /// * `now` - Creation time
    ///
    /// # Returns
    ///
    /// The stored plan as read back from the database.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails. Nothing is stored in that case.
    pub fn create_plan(
        &mut self,
        tenant_id: i64,
        creation: &PlanCreation,
        now: OffsetDateTime,
    ) -> Result<MaintenancePlan, PersistenceError> {
        let plan: MaintenancePlan = self.conn.transaction::<_, PersistenceError, _>(|conn| {
            let plan_id: i64 = mutations::plans::insert_plan(conn, tenant_id, &creation.plan, now)?;
            let event: AuditEvent = creation.audit_event.clone().with_entity_id(plan_id);
            mutations::audit::persist_audit_event(conn, &event, now)?;
            queries::plans::find_plan(conn, tenant_id, plan_id)?
                .ok_or(PersistenceError::PlanNotFound(plan_id))
        })?;

        info!(
            plan_id = plan.plan_id,
            tenant_id,
            action = %creation.audit_event.action.name,
            "Created plan"
        );
        Ok(plan)
    }

    /// Loads a plan of a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_plan(
        &mut self,
        tenant_id: i64,
        plan_id: i64,
    ) -> Result<Option<MaintenancePlan>, PersistenceError> {
        queries::plans::find_plan(&mut self.conn, tenant_id, plan_id)
    }

    /// Lists the plans of a tenant, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_plans(
        &mut self,
        tenant_id: i64,
        vehicle_type: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Vec<MaintenancePlan>, PersistenceError> {
        queries::plans::list_plans(&mut self.conn, tenant_id, vehicle_type, is_active)
    }

    /// Applies a full plan replacement and its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is not in the tenant or any write fails.
    pub fn replace_plan(
        &mut self,
        tenant_id: i64,
        replacement: &PlanReplacement,
        now: OffsetDateTime,
    ) -> Result<MaintenancePlan, PersistenceError> {
        let plan_id: i64 = replacement.plan_id;
        let plan: MaintenancePlan = self.conn.transaction::<_, PersistenceError, _>(|conn| {
            if queries::plans::find_plan(conn, tenant_id, plan_id)?.is_none() {
                return Err(PersistenceError::PlanNotFound(plan_id));
            }
            mutations::plans::replace_plan(conn, replacement, now)?;
            mutations::audit::persist_audit_event(conn, &replacement.audit_event, now)?;
            queries::plans::find_plan(conn, tenant_id, plan_id)?
                .ok_or(PersistenceError::PlanNotFound(plan_id))
        })?;

        info!(plan_id, tenant_id, "Replaced plan");
        Ok(plan)
    }

    /// Sets the active flag of a plan and records the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is not in the tenant or a write fails.
    pub fn set_plan_active(
        &mut self,
        tenant_id: i64,
        plan_id: i64,
        is_active: bool,
        event: &AuditEvent,
        now: OffsetDateTime,
    ) -> Result<MaintenancePlan, PersistenceError> {
        let plan: MaintenancePlan = self.conn.transaction::<_, PersistenceError, _>(|conn| {
            let updated: usize =
                mutations::plans::set_plan_active(conn, tenant_id, plan_id, is_active, now)?;
            if updated == 0 {
                return Err(PersistenceError::PlanNotFound(plan_id));
            }
            mutations::audit::persist_audit_event(conn, event, now)?;
            queries::plans::find_plan(conn, tenant_id, plan_id)?
                .ok_or(PersistenceError::PlanNotFound(plan_id))
        })?;

        info!(plan_id, tenant_id, is_active, "Changed plan activation");
        Ok(plan)
    }

    /// Deletes a plan and records the deletion.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is not in the tenant or a write fails.
    pub fn delete_plan(
        &mut self,
        tenant_id: i64,
        plan_id: i64,
        event: &AuditEvent,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        self.conn.transaction::<_, PersistenceError, _>(|conn| {
            let deleted: usize = mutations::plans::delete_plan(conn, tenant_id, plan_id)?;
            if deleted == 0 {
                return Err(PersistenceError::PlanNotFound(plan_id));
            }
            mutations::audit::persist_audit_event(conn, event, now)?;
            Ok(())
        })?;

        info!(plan_id, tenant_id, "Deleted plan");
        Ok(())
    }

    // ========================================================================
    // Fleet
    // ========================================================================

    /// Registers a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the plate is taken in the tenant or the insert fails.
    pub fn register_vehicle(
        &mut self,
        tenant_id: i64,
        plate: &str,
        vehicle_type: &str,
        counters: UsageCounters,
        plan_id: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        mutations::fleet::insert_vehicle(
            &mut self.conn,
            tenant_id,
            plate,
            vehicle_type,
            counters,
            plan_id,
        )
    }

    /// Registers a workshop.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn register_workshop(
        &mut self,
        tenant_id: i64,
        name: &str,
        is_active: bool,
    ) -> Result<i64, PersistenceError> {
        mutations::fleet::insert_workshop(&mut self.conn, tenant_id, name, is_active)
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn register_user(
        &mut self,
        tenant_id: i64,
        display_name: &str,
        role: UserRole,
    ) -> Result<i64, PersistenceError> {
        mutations::fleet::insert_user(&mut self.conn, tenant_id, display_name, role)
    }

    /// Sets or clears a vehicle's direct plan reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle is not in the tenant or the update fails.
    pub fn assign_vehicle_plan(
        &mut self,
        tenant_id: i64,
        vehicle_id: i64,
        plan_id: Option<i64>,
    ) -> Result<(), PersistenceError> {
        let updated: usize =
            mutations::fleet::set_vehicle_plan(&mut self.conn, tenant_id, vehicle_id, plan_id)?;
        if updated == 0 {
            return Err(PersistenceError::VehicleNotFound(vehicle_id));
        }
        Ok(())
    }

    /// Looks up a vehicle of a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_vehicle(
        &mut self,
        tenant_id: i64,
        vehicle_id: i64,
    ) -> Result<Option<Vehicle>, PersistenceError> {
        queries::fleet::find_vehicle(&mut self.conn, tenant_id, vehicle_id)
    }

    /// Lists the vehicles of a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_vehicles(&mut self, tenant_id: i64) -> Result<Vec<Vehicle>, PersistenceError> {
        queries::fleet::list_vehicles(&mut self.conn, tenant_id)
    }

    /// Looks up an active workshop of a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_active_workshop(
        &mut self,
        tenant_id: i64,
        workshop_id: i64,
    ) -> Result<Option<Workshop>, PersistenceError> {
        queries::fleet::find_active_workshop(&mut self.conn, tenant_id, workshop_id)
    }

    /// Looks up a user of a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user(
        &mut self,
        tenant_id: i64,
        user_id: i64,
    ) -> Result<Option<FleetUser>, PersistenceError> {
        queries::fleet::find_user(&mut self.conn, tenant_id, user_id)
    }

    // ========================================================================
    // Work Orders
    // ========================================================================

    /// Stores a planned work order under the tenant's next number.
    ///
    /// Runs in an immediate transaction so numbering is serialized.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails. No number is consumed in that case.
    pub fn create_work_order(
        &mut self,
        creation: &WorkOrderCreation,
    ) -> Result<WorkOrderState, PersistenceError> {
        let tenant_id: i64 = creation.order.tenant_id;
        let now: OffsetDateTime = creation.order.created_at;

        let state: WorkOrderState = self.conn.immediate_transaction::<_, PersistenceError, _>(
            |conn| {
                let number: i64 = mutations::work_orders::next_work_order_number(conn, tenant_id)?;
                let work_order_id: i64 = mutations::work_orders::insert_work_order(
                    conn,
                    number,
                    &creation.order,
                    &creation.items,
                )?;
                let event: AuditEvent = creation.audit_event.clone().with_entity_id(work_order_id);
                mutations::audit::persist_audit_event(conn, &event, now)?;
                queries::work_orders::find_work_order(conn, tenant_id, work_order_id)?
                    .ok_or(PersistenceError::WorkOrderNotFound(work_order_id))
            },
        )?;

        info!(
            work_order_id = state.order.work_order_id,
            number = state.order.number,
            tenant_id,
            items = state.items.len(),
            "Created work order"
        );
        Ok(state)
    }

    /// Loads a work order with its items and signatures.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_work_order(
        &mut self,
        tenant_id: i64,
        work_order_id: i64,
    ) -> Result<Option<WorkOrderState>, PersistenceError> {
        queries::work_orders::find_work_order(&mut self.conn, tenant_id, work_order_id)
    }

    /// Loads the last completed work order of a vehicle, with items.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_last_completed_work_order(
        &mut self,
        tenant_id: i64,
        vehicle_id: i64,
    ) -> Result<Option<WorkOrderState>, PersistenceError> {
        queries::work_orders::find_last_completed_work_order(&mut self.conn, tenant_id, vehicle_id)
    }

    /// Lists work order headers of a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_work_orders(
        &mut self,
        tenant_id: i64,
        vehicle_id: Option<i64>,
        status: Option<WorkOrderStatus>,
    ) -> Result<Vec<WorkOrder>, PersistenceError> {
        queries::work_orders::list_work_orders(&mut self.conn, tenant_id, vehicle_id, status)
    }

    /// Persists a work order transition.
    ///
    /// Writes the order and item changes, the signature, the vehicle usage
    /// snapshot and the audit event in one transaction. A no-op transition
    /// writes nothing.
    ///
    /// # Returns
    ///
    /// The work order as read back from the database.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
        now: OffsetDateTime,
    ) -> Result<WorkOrderState, PersistenceError> {
        let tenant_id: i64 = result.new_state.order.tenant_id;
        let work_order_id: i64 = result.new_state.order.work_order_id;

        if result.is_noop() {
            return Ok(result.new_state.clone());
        }

        let state: WorkOrderState = self.conn.transaction::<_, PersistenceError, _>(|conn| {
            mutations::work_orders::persist_work_order_transition(conn, result)?;
            if let Some(update) = &result.vehicle_update {
                mutations::fleet::apply_vehicle_usage(conn, update)?;
            }
            if let Some(event) = &result.audit_event {
                mutations::audit::persist_audit_event(conn, event, now)?;
            }
            queries::work_orders::find_work_order(conn, tenant_id, work_order_id)?
                .ok_or(PersistenceError::WorkOrderNotFound(work_order_id))
        })?;

        info!(
            work_order_id,
            tenant_id,
            status = %state.order.status,
            "Persisted work order transition"
        );
        Ok(state)
    }

    /// Deletes a work order with its signatures and items, and records it.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails.
    pub fn delete_work_order(
        &mut self,
        tenant_id: i64,
        work_order_id: i64,
        event: &AuditEvent,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        self.conn.transaction::<_, PersistenceError, _>(|conn| {
            if queries::work_orders::find_work_order(conn, tenant_id, work_order_id)?.is_none() {
                return Err(PersistenceError::WorkOrderNotFound(work_order_id));
            }
            mutations::work_orders::delete_work_order(conn, work_order_id)?;
            mutations::audit::persist_audit_event(conn, event, now)?;
            Ok(())
        })?;

        info!(work_order_id, tenant_id, "Deleted work order");
        Ok(())
    }

    // ========================================================================
    // Audit Trail
    // ========================================================================

    /// Retrieves the audit trail of one entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or an event cannot be deserialized.
    pub fn get_entity_timeline(
        &mut self,
        tenant_id: i64,
        entity_kind: EntityKind,
        entity_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_entity_timeline(&mut self.conn, tenant_id, entity_kind, entity_id)
    }

    /// Retrieves every audit event of a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or an event cannot be deserialized.
    pub fn get_tenant_audit_events(
        &mut self,
        tenant_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_tenant_audit_events(&mut self.conn, tenant_id)
    }
}
