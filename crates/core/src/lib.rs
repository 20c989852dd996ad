// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod apply;
mod command;
mod creation;
mod error;
mod state;
mod versioning;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, apply_deletion, total_cost};
pub use command::{Closer, Command, ItemUpdate};
pub use creation::{
    AdHocItem, CreateWorkOrder, NewWorkOrder, NewWorkOrderItem, WorkOrderCreation,
    plan_work_order,
};
pub use error::CoreError;
pub use state::{NewSignature, TransitionResult, VehicleUsageUpdate, WorkOrderState};
pub use versioning::{
    ActivityChange, PlanCreation, PlanHeaderPatch, PlanReplacement, PlanUpdate, plan_activation,
    plan_creation, plan_deletion, plan_duplicate, plan_replacement, plan_snapshot,
};
