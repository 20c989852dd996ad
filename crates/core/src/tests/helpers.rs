// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::WorkOrderState;
use fleet_maint_audit::{Actor, Cause};
use fleet_maint_domain::{
    MaintenanceActivity, MaintenanceInterval, MaintenancePlan, Vehicle, WorkOrder, WorkOrderItem,
    WorkOrderItemStatus, WorkOrderStatus, WorkOrderType, Workshop,
};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_actor() -> Actor {
    Actor::user(42)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Mechanic request"))
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-02 14:30 UTC)
}

pub fn create_test_vehicle() -> Vehicle {
    Vehicle {
        vehicle_id: 5,
        tenant_id: 10,
        plate: String::from("ABC-123"),
        vehicle_type: String::from("TRUCK"),
        odometer: 20_500.0,
        hourmeter: 480.0,
        plan_id: None,
        last_maintenance_at: None,
    }
}

pub fn create_test_workshop(is_active: bool) -> Workshop {
    Workshop {
        workshop_id: 3,
        tenant_id: 10,
        name: String::from("Diesel Bros"),
        is_active,
    }
}

pub fn create_test_order(status: WorkOrderStatus) -> WorkOrder {
    WorkOrder {
        work_order_id: 77,
        tenant_id: 10,
        vehicle_id: 5,
        number: 12,
        order_type: WorkOrderType::Preventive,
        status,
        plan_id: Some(1),
        odometer_at_start: Some(20_500.0),
        hourmeter_at_start: Some(480.0),
        operator_id: None,
        supervisor_id: None,
        is_internal: true,
        workshop_id: None,
        total_cost: Decimal::ZERO,
        notes: None,
        created_by: Some(42),
        created_at: datetime!(2026-03-01 08:00 UTC),
        started_at: None,
        completed_at: None,
    }
}

pub fn create_test_item(
    item_id: i64,
    status: WorkOrderItemStatus,
    cost: Option<Decimal>,
) -> WorkOrderItem {
    WorkOrderItem {
        item_id,
        work_order_id: 77,
        activity_id: Some(200 + item_id),
        description: format!("Item {item_id}"),
        status,
        observations: None,
        parts_used: None,
        labor_hours: None,
        cost,
        completed_at: None,
    }
}

pub fn create_test_state(status: WorkOrderStatus, items: Vec<WorkOrderItem>) -> WorkOrderState {
    WorkOrderState::new(create_test_order(status), items, Vec::new())
}

pub fn create_test_plan() -> MaintenancePlan {
    let interval = |interval_id: i64, sequence_order: u32, hours: f64, kilometers: f64| {
        MaintenanceInterval {
            interval_id,
            plan_id: 1,
            sequence_order,
            hours,
            kilometers,
            name: None,
        }
    };
    let activity = |activity_id: i64, code: &str, interval_ids: Vec<i64>| MaintenanceActivity {
        activity_id,
        plan_id: 1,
        code: code.to_string(),
        description: format!("Activity {code}"),
        category: None,
        is_active: true,
        interval_ids,
    };

    MaintenancePlan {
        plan_id: 1,
        tenant_id: 10,
        name: String::from("Heavy truck plan"),
        description: Some(String::from("Standard service schedule")),
        vehicle_type: Some(String::from("TRUCK")),
        is_active: true,
        created_at: datetime!(2026-01-01 00:00 UTC),
        intervals: vec![
            interval(100, 1, 250.0, 10_000.0),
            interval(101, 2, 500.0, 20_000.0),
            interval(102, 3, 1_000.0, 40_000.0),
        ],
        activities: vec![
            activity(200, "OIL", vec![100, 101, 102]),
            activity(201, "FILTER", vec![101]),
            activity(202, "BELTS", vec![102]),
        ],
    }
}
