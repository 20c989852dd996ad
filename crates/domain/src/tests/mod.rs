// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod resolver;

use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    MaintenanceActivity, MaintenanceInterval, MaintenancePlan, Vehicle, WorkOrder, WorkOrderStatus,
    WorkOrderType,
};
use rust_decimal::Decimal;

pub fn test_time() -> OffsetDateTime {
    datetime!(2026-03-01 08:00 UTC)
}

pub fn create_test_interval(
    interval_id: i64,
    sequence_order: u32,
    hours: f64,
    kilometers: f64,
) -> MaintenanceInterval {
    MaintenanceInterval {
        interval_id,
        plan_id: 1,
        sequence_order,
        hours,
        kilometers,
        name: None,
    }
}

pub fn create_test_activity(
    activity_id: i64,
    code: &str,
    interval_ids: &[i64],
) -> MaintenanceActivity {
    MaintenanceActivity {
        activity_id,
        plan_id: 1,
        code: code.to_string(),
        description: format!("Activity {code}"),
        category: None,
        is_active: true,
        interval_ids: interval_ids.to_vec(),
    }
}

pub fn create_test_plan(
    intervals: Vec<MaintenanceInterval>,
    activities: Vec<MaintenanceActivity>,
) -> MaintenancePlan {
    MaintenancePlan {
        plan_id: 1,
        tenant_id: 10,
        name: String::from("Heavy truck plan"),
        description: None,
        vehicle_type: Some(String::from("TRUCK")),
        is_active: true,
        created_at: test_time(),
        intervals,
        activities,
    }
}

/// The single-interval plan used by the documented prediction scenarios.
pub fn create_scenario_plan() -> MaintenancePlan {
    create_test_plan(
        vec![create_test_interval(100, 1, 500.0, 20_000.0)],
        vec![
            create_test_activity(200, "OIL", &[100]),
            create_test_activity(201, "FILTER", &[100]),
        ],
    )
}

pub fn create_test_vehicle(odometer: f64, hourmeter: f64) -> Vehicle {
    Vehicle {
        vehicle_id: 5,
        tenant_id: 10,
        plate: String::from("ABC-123"),
        vehicle_type: String::from("TRUCK"),
        odometer,
        hourmeter,
        plan_id: None,
        last_maintenance_at: None,
    }
}

pub fn create_test_order(status: WorkOrderStatus) -> WorkOrder {
    WorkOrder {
        work_order_id: 1,
        tenant_id: 10,
        vehicle_id: 5,
        number: 1,
        order_type: WorkOrderType::Preventive,
        status,
        plan_id: Some(1),
        odometer_at_start: None,
        hourmeter_at_start: None,
        operator_id: None,
        supervisor_id: None,
        is_internal: true,
        workshop_id: None,
        total_cost: Decimal::ZERO,
        notes: None,
        created_by: None,
        created_at: test_time(),
        started_at: None,
        completed_at: None,
    }
}
