// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work order queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_maint::WorkOrderState;
use fleet_maint_domain::{
    SignatureType, UserRole, WorkOrder, WorkOrderItem, WorkOrderItemStatus, WorkOrderSignature,
    WorkOrderStatus, WorkOrderType,
};

use crate::data_models::{
    parse_column, parse_decimal, parse_optional_timestamp, parse_timestamp,
};
use crate::diesel_schema::{work_order_items, work_order_signatures, work_orders};
use crate::error::PersistenceError;

const ORDERS: &str = "work_orders";
const ITEMS: &str = "work_order_items";
const SIGNATURES: &str = "work_order_signatures";

/// Diesel Queryable struct for work order headers.
#[derive(Queryable, Selectable)]
#[diesel(table_name = work_orders)]
struct WorkOrderRow {
    work_order_id: i64,
    tenant_id: i64,
    vehicle_id: i64,
    number: i64,
    order_type: String,
    status: String,
    plan_id: Option<i64>,
    odometer_at_start: Option<f64>,
    hourmeter_at_start: Option<f64>,
    operator_id: Option<i64>,
    supervisor_id: Option<i64>,
    is_internal: i32,
    workshop_id: Option<i64>,
    total_cost: String,
    notes: Option<String>,
    created_by: Option<i64>,
    created_at: String,
    started_at: Option<String>,
    completed_at: Option<String>,
}

impl WorkOrderRow {
    fn into_work_order(self) -> Result<WorkOrder, PersistenceError> {
        Ok(WorkOrder {
            work_order_id: self.work_order_id,
            tenant_id: self.tenant_id,
            vehicle_id: self.vehicle_id,
            number: self.number,
            order_type: parse_column::<WorkOrderType>(ORDERS, &self.order_type)?,
            status: parse_column::<WorkOrderStatus>(ORDERS, &self.status)?,
            plan_id: self.plan_id,
            odometer_at_start: self.odometer_at_start,
            hourmeter_at_start: self.hourmeter_at_start,
            operator_id: self.operator_id,
            supervisor_id: self.supervisor_id,
            is_internal: self.is_internal != 0,
            workshop_id: self.workshop_id,
            total_cost: parse_decimal(ORDERS, &self.total_cost)?,
            notes: self.notes,
            created_by: self.created_by,
            created_at: parse_timestamp(ORDERS, &self.created_at)?,
            started_at: parse_optional_timestamp(ORDERS, self.started_at.as_deref())?,
            completed_at: parse_optional_timestamp(ORDERS, self.completed_at.as_deref())?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = work_order_items)]
struct ItemRow {
    item_id: i64,
    work_order_id: i64,
    activity_id: Option<i64>,
    description: String,
    status: String,
    observations: Option<String>,
    parts_used: Option<String>,
    labor_hours: Option<f64>,
    cost: Option<String>,
    completed_at: Option<String>,
}

impl ItemRow {
    fn into_item(self) -> Result<WorkOrderItem, PersistenceError> {
        Ok(WorkOrderItem {
            item_id: self.item_id,
            work_order_id: self.work_order_id,
            activity_id: self.activity_id,
            description: self.description,
            status: parse_column::<WorkOrderItemStatus>(ITEMS, &self.status)?,
            observations: self.observations,
            parts_used: self.parts_used,
            labor_hours: self.labor_hours,
            cost: self
                .cost
                .as_deref()
                .map(|c| parse_decimal(ITEMS, c))
                .transpose()?,
            completed_at: parse_optional_timestamp(ITEMS, self.completed_at.as_deref())?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = work_order_signatures)]
struct SignatureRow {
    signature_id: i64,
    work_order_id: i64,
    user_id: i64,
    role: String,
    signature_type: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    signed_at: String,
}

impl SignatureRow {
    fn into_signature(self) -> Result<WorkOrderSignature, PersistenceError> {
        Ok(WorkOrderSignature {
            signature_id: self.signature_id,
            work_order_id: self.work_order_id,
            user_id: self.user_id,
            role: parse_column::<UserRole>(SIGNATURES, &self.role)?,
            signature_type: parse_column::<SignatureType>(SIGNATURES, &self.signature_type)?,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            signed_at: parse_timestamp(SIGNATURES, &self.signed_at)?,
        })
    }
}

fn load_state(
    conn: &mut SqliteConnection,
    row: WorkOrderRow,
) -> Result<WorkOrderState, PersistenceError> {
    let order: WorkOrder = row.into_work_order()?;

    let items: Vec<WorkOrderItem> = work_order_items::table
        .filter(work_order_items::work_order_id.eq(order.work_order_id))
        .order(work_order_items::item_id.asc())
        .select(ItemRow::as_select())
        .load::<ItemRow>(conn)?
        .into_iter()
        .map(ItemRow::into_item)
        .collect::<Result<_, _>>()?;

    let signatures: Vec<WorkOrderSignature> = work_order_signatures::table
        .filter(work_order_signatures::work_order_id.eq(order.work_order_id))
        .order(work_order_signatures::signature_id.asc())
        .select(SignatureRow::as_select())
        .load::<SignatureRow>(conn)?
        .into_iter()
        .map(SignatureRow::into_signature)
        .collect::<Result<_, _>>()?;

    Ok(WorkOrderState::new(order, items, signatures))
}

/// Loads a work order with its items and signatures.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `tenant_id` - The tenant the order must belong to
/// * `work_order_id` - The order to load
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn find_work_order(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    work_order_id: i64,
) -> Result<Option<WorkOrderState>, PersistenceError> {
    let result = work_orders::table
        .filter(work_orders::work_order_id.eq(work_order_id))
        .filter(work_orders::tenant_id.eq(tenant_id))
        .select(WorkOrderRow::as_select())
        .first::<WorkOrderRow>(conn);

    match result {
        Ok(row) => load_state(conn, row).map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Loads the most recently completed work order of a vehicle, with items.
///
/// Ties on completion time go to the newer order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn find_last_completed_work_order(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    vehicle_id: i64,
) -> Result<Option<WorkOrderState>, PersistenceError> {
    let result = work_orders::table
        .filter(work_orders::tenant_id.eq(tenant_id))
        .filter(work_orders::vehicle_id.eq(vehicle_id))
        .filter(work_orders::status.eq(WorkOrderStatus::Completed.as_str()))
        .order((
            work_orders::completed_at.desc(),
            work_orders::work_order_id.desc(),
        ))
        .select(WorkOrderRow::as_select())
        .first::<WorkOrderRow>(conn);

    match result {
        Ok(row) => load_state(conn, row).map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists work order headers of a tenant, newest number first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `tenant_id` - The tenant
/// * `vehicle_id` - Only orders of this vehicle
/// * `status` - Only orders in this status
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn list_work_orders(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    vehicle_id: Option<i64>,
    status: Option<WorkOrderStatus>,
) -> Result<Vec<WorkOrder>, PersistenceError> {
    let mut query = work_orders::table
        .filter(work_orders::tenant_id.eq(tenant_id))
        .order(work_orders::number.desc())
        .select(WorkOrderRow::as_select())
        .into_boxed();
    if let Some(vehicle_id) = vehicle_id {
        query = query.filter(work_orders::vehicle_id.eq(vehicle_id));
    }
    if let Some(status) = status {
        query = query.filter(work_orders::status.eq(status.as_str()));
    }

    query
        .load::<WorkOrderRow>(conn)?
        .into_iter()
        .map(WorkOrderRow::into_work_order)
        .collect()
}

/// Counts the work orders of a tenant.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_work_orders(
    conn: &mut SqliteConnection,
    tenant_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(work_orders::table
        .filter(work_orders::tenant_id.eq(tenant_id))
        .count()
        .get_result(conn)?)
}
