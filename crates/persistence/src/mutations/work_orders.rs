// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work order mutations.

use diesel::SqliteConnection;
use diesel::dsl::max;
use diesel::prelude::*;
use fleet_maint::{NewSignature, NewWorkOrder, NewWorkOrderItem, TransitionResult};
use fleet_maint_domain::{WorkOrder, WorkOrderItem, WorkOrderItemStatus, WorkOrderStatus};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{flag, format_optional_timestamp, format_timestamp};
use crate::diesel_schema::{
    work_order_items, work_order_sequences, work_order_signatures, work_orders,
};
use crate::error::PersistenceError;
use crate::queries::work_orders::count_work_orders;

/// Reserves the next work order number of a tenant.
///
/// Must run inside an immediate transaction so that concurrent creators
/// are serialized on the sequence row. Numbers are never reused, even
/// after orders are deleted. A tenant without a sequence row starts after
/// its existing orders.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn next_work_order_number(
    conn: &mut SqliteConnection,
    tenant_id: i64,
) -> Result<i64, PersistenceError> {
    let last: Option<i64> = work_order_sequences::table
        .find(tenant_id)
        .select(work_order_sequences::last_number)
        .first::<i64>(conn)
        .optional()?;

    let next: i64 = match last {
        Some(last) => {
            let next: i64 = last + 1;
            diesel::update(work_order_sequences::table.find(tenant_id))
                .set(work_order_sequences::last_number.eq(next))
                .execute(conn)?;
            next
        }
        None => {
            let existing: i64 = count_work_orders(conn, tenant_id)?;
            let highest: Option<i64> = work_orders::table
                .filter(work_orders::tenant_id.eq(tenant_id))
                .select(max(work_orders::number))
                .first(conn)?;
            let next: i64 = existing.max(highest.unwrap_or(0)) + 1;
            diesel::insert_into(work_order_sequences::table)
                .values((
                    work_order_sequences::tenant_id.eq(tenant_id),
                    work_order_sequences::last_number.eq(next),
                ))
                .execute(conn)?;
            next
        }
    };

    debug!(tenant_id, number = next, "Reserved work order number");
    Ok(next)
}

/// Inserts a work order and its items.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `number` - The reserved tenant-scoped number
/// * `order` - The planned order
/// * `items` - The planned items, inserted as `Pending`
///
/// # Returns
///
/// The work order ID assigned by the database.
///
/// # Errors
///
/// Returns an error if any insert fails.
pub fn insert_work_order(
    conn: &mut SqliteConnection,
    number: i64,
    order: &NewWorkOrder,
    items: &[NewWorkOrderItem],
) -> Result<i64, PersistenceError> {
    diesel::insert_into(work_orders::table)
        .values((
            work_orders::tenant_id.eq(order.tenant_id),
            work_orders::vehicle_id.eq(order.vehicle_id),
            work_orders::number.eq(number),
            work_orders::order_type.eq(order.order_type.as_str()),
            work_orders::status.eq(WorkOrderStatus::Pending.as_str()),
            work_orders::plan_id.eq(order.plan_id),
            work_orders::odometer_at_start.eq(order.odometer_at_start),
            work_orders::hourmeter_at_start.eq(order.hourmeter_at_start),
            work_orders::operator_id.eq(order.operator_id),
            work_orders::supervisor_id.eq(order.supervisor_id),
            work_orders::is_internal.eq(flag(order.is_internal)),
            work_orders::workshop_id.eq(order.workshop_id),
            work_orders::notes.eq(order.notes.as_deref()),
            work_orders::created_by.eq(order.created_by),
            work_orders::created_at.eq(format_timestamp(order.created_at)?),
        ))
        .execute(conn)?;
    let work_order_id: i64 = get_last_insert_rowid(conn)?;

    for item in items {
        diesel::insert_into(work_order_items::table)
            .values((
                work_order_items::work_order_id.eq(work_order_id),
                work_order_items::activity_id.eq(item.activity_id),
                work_order_items::description.eq(item.description.as_str()),
                work_order_items::status.eq(WorkOrderItemStatus::Pending.as_str()),
            ))
            .execute(conn)?;
    }

    debug!(
        work_order_id,
        number,
        items = items.len(),
        "Inserted work order"
    );
    Ok(work_order_id)
}

fn update_header(conn: &mut SqliteConnection, order: &WorkOrder) -> Result<(), PersistenceError> {
    diesel::update(work_orders::table.find(order.work_order_id))
        .set((
            work_orders::status.eq(order.status.as_str()),
            work_orders::operator_id.eq(order.operator_id),
            work_orders::total_cost.eq(order.total_cost.to_string()),
            work_orders::notes.eq(order.notes.as_deref()),
            work_orders::started_at.eq(format_optional_timestamp(order.started_at)?),
            work_orders::completed_at.eq(format_optional_timestamp(order.completed_at)?),
        ))
        .execute(conn)?;
    Ok(())
}

fn update_item(conn: &mut SqliteConnection, item: &WorkOrderItem) -> Result<(), PersistenceError> {
    diesel::update(work_order_items::table.find(item.item_id))
        .set((
            work_order_items::status.eq(item.status.as_str()),
            work_order_items::observations.eq(item.observations.as_deref()),
            work_order_items::parts_used.eq(item.parts_used.as_deref()),
            work_order_items::labor_hours.eq(item.labor_hours),
            work_order_items::cost.eq(item.cost.map(|c| c.to_string())),
            work_order_items::completed_at.eq(format_optional_timestamp(item.completed_at)?),
        ))
        .execute(conn)?;
    Ok(())
}

fn insert_signature(
    conn: &mut SqliteConnection,
    work_order_id: i64,
    signature: &NewSignature,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(work_order_signatures::table)
        .values((
            work_order_signatures::work_order_id.eq(work_order_id),
            work_order_signatures::user_id.eq(signature.user_id),
            work_order_signatures::role.eq(signature.role.as_str()),
            work_order_signatures::signature_type.eq(signature.signature_type.as_str()),
            work_order_signatures::ip_address.eq(signature.ip_address.as_deref()),
            work_order_signatures::user_agent.eq(signature.user_agent.as_deref()),
            work_order_signatures::signed_at.eq(format_timestamp(signature.signed_at)?),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Writes the order and item changes of a transition, plus its signature.
///
/// The vehicle write-back and the audit event are persisted by the caller
/// in the same transaction.
///
/// # Errors
///
/// Returns an error if a write fails, or `NotFound` if the changed item no
/// longer belongs to the order.
pub fn persist_work_order_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<(), PersistenceError> {
    let order: &WorkOrder = &result.new_state.order;
    update_header(conn, order)?;

    if let Some(item_id) = result.changed_item_id {
        let item: &WorkOrderItem = result
            .new_state
            .items
            .iter()
            .find(|i| i.item_id == item_id)
            .ok_or_else(|| {
                PersistenceError::NotFound(format!(
                    "item {item_id} of work order {}",
                    order.work_order_id
                ))
            })?;
        update_item(conn, item)?;
    }

    if let Some(signature) = &result.signature {
        let signature_id: i64 = insert_signature(conn, order.work_order_id, signature)?;
        debug!(
            signature_id,
            work_order_id = order.work_order_id,
            signature_type = %signature.signature_type,
            "Appended signature"
        );
    }

    Ok(())
}

/// Deletes a work order with its signatures and items.
///
/// Must run inside a transaction.
///
/// # Returns
///
/// The number of orders deleted.
///
/// # Errors
///
/// Returns an error if a delete fails.
pub fn delete_work_order(
    conn: &mut SqliteConnection,
    work_order_id: i64,
) -> Result<usize, PersistenceError> {
    let signatures: usize = diesel::delete(
        work_order_signatures::table
            .filter(work_order_signatures::work_order_id.eq(work_order_id)),
    )
    .execute(conn)?;
    let items: usize = diesel::delete(
        work_order_items::table.filter(work_order_items::work_order_id.eq(work_order_id)),
    )
    .execute(conn)?;
    let orders: usize = diesel::delete(work_orders::table.find(work_order_id)).execute(conn)?;

    debug!(work_order_id, signatures, items, "Deleted work order");
    Ok(orders)
}
