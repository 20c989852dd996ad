// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    activity_interval_matrix (activity_id, interval_id) {
        plan_id -> BigInt,
        activity_id -> BigInt,
        interval_id -> BigInt,
    }
}

diesel::table! {
    audit_events (event_id) {
        event_id -> BigInt,
        tenant_id -> BigInt,
        entity_kind -> Text,
        entity_id -> Nullable<BigInt>,
        actor_json -> Text,
        cause_json -> Text,
        action_json -> Text,
        before_snapshot_json -> Text,
        after_snapshot_json -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    maintenance_activities (activity_id) {
        activity_id -> BigInt,
        plan_id -> BigInt,
        code -> Text,
        description -> Text,
        category -> Nullable<Text>,
        is_active -> Integer,
    }
}

diesel::table! {
    maintenance_intervals (interval_id) {
        interval_id -> BigInt,
        plan_id -> BigInt,
        sequence_order -> Integer,
        hours -> Double,
        kilometers -> Double,
        name -> Nullable<Text>,
    }
}

diesel::table! {
    maintenance_plans (plan_id) {
        plan_id -> BigInt,
        tenant_id -> BigInt,
        name -> Text,
        description -> Nullable<Text>,
        vehicle_type -> Nullable<Text>,
        is_active -> Integer,
        created_at -> Text,
        updated_at -> Nullable<Text>,
    }
}

diesel::table! {
    users (user_id) {
        user_id -> BigInt,
        tenant_id -> BigInt,
        display_name -> Text,
        role -> Text,
    }
}

diesel::table! {
    vehicles (vehicle_id) {
        vehicle_id -> BigInt,
        tenant_id -> BigInt,
        plate -> Text,
        vehicle_type -> Text,
        odometer -> Double,
        hourmeter -> Double,
        plan_id -> Nullable<BigInt>,
        last_maintenance_at -> Nullable<Text>,
    }
}

diesel::table! {
    work_order_items (item_id) {
        item_id -> BigInt,
        work_order_id -> BigInt,
        activity_id -> Nullable<BigInt>,
        description -> Text,
        status -> Text,
        observations -> Nullable<Text>,
        parts_used -> Nullable<Text>,
        labor_hours -> Nullable<Double>,
        cost -> Nullable<Text>,
        completed_at -> Nullable<Text>,
    }
}

diesel::table! {
    work_order_sequences (tenant_id) {
        tenant_id -> BigInt,
        last_number -> BigInt,
    }
}

diesel::table! {
    work_order_signatures (signature_id) {
        signature_id -> BigInt,
        work_order_id -> BigInt,
        user_id -> BigInt,
        role -> Text,
        signature_type -> Text,
        ip_address -> Nullable<Text>,
        user_agent -> Nullable<Text>,
        signed_at -> Text,
    }
}

diesel::table! {
    work_orders (work_order_id) {
        work_order_id -> BigInt,
        tenant_id -> BigInt,
        vehicle_id -> BigInt,
        number -> BigInt,
        order_type -> Text,
        status -> Text,
        plan_id -> Nullable<BigInt>,
        odometer_at_start -> Nullable<Double>,
        hourmeter_at_start -> Nullable<Double>,
        operator_id -> Nullable<BigInt>,
        supervisor_id -> Nullable<BigInt>,
        is_internal -> Integer,
        workshop_id -> Nullable<BigInt>,
        total_cost -> Text,
        notes -> Nullable<Text>,
        created_by -> Nullable<BigInt>,
        created_at -> Text,
        started_at -> Nullable<Text>,
        completed_at -> Nullable<Text>,
    }
}

diesel::table! {
    workshops (workshop_id) {
        workshop_id -> BigInt,
        tenant_id -> BigInt,
        name -> Text,
        is_active -> Integer,
    }
}

diesel::joinable!(activity_interval_matrix -> maintenance_activities (activity_id));
diesel::joinable!(activity_interval_matrix -> maintenance_intervals (interval_id));
diesel::joinable!(maintenance_activities -> maintenance_plans (plan_id));
diesel::joinable!(maintenance_intervals -> maintenance_plans (plan_id));
diesel::joinable!(work_order_items -> work_orders (work_order_id));
diesel::joinable!(work_order_signatures -> work_orders (work_order_id));
diesel::joinable!(work_orders -> vehicles (vehicle_id));

diesel::allow_tables_to_appear_in_same_query!(
    activity_interval_matrix,
    audit_events,
    maintenance_activities,
    maintenance_intervals,
    maintenance_plans,
    users,
    vehicles,
    work_order_items,
    work_order_sequences,
    work_order_signatures,
    work_orders,
    workshops,
);
