// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operation surface of the fleet maintenance engine.
//!
//! Plain synchronous functions over a [`SqlitePersistence`]. Transport,
//! authentication and authorization belong to the caller, which passes the
//! authenticated identity as an [`AuthenticatedActor`].
//!
//! [`SqlitePersistence`]: fleet_maint_persistence::SqlitePersistence

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

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::AuthenticatedActor;
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    activate_plan, cancel_work_order, close_work_order, create_plan, create_work_order,
    deactivate_plan, delete_plan, delete_work_order, duplicate_plan, get_plan, get_work_order,
    list_plans, list_work_orders, predict_next_maintenance, start_work_order, update_plan,
    update_work_order_item,
};
pub use request_response::{
    AdHocItemRequest, CancelWorkOrderRequest, CloseWorkOrderRequest, CreatePlanRequest,
    CreateWorkOrderRequest, DeletePlanResponse, DeleteWorkOrderResponse, DuplicatePlanRequest,
    ListPlansRequest, ListPlansResponse, ListWorkOrdersRequest, ListWorkOrdersResponse, PlanInfo,
    PlanResponse, PredictionResponse, StartWorkOrderRequest, UpdatePlanRequest,
    UpdateWorkOrderItemRequest, WorkOrderResponse,
};
