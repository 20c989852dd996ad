// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `audit`: Audit trail queries
//! - `fleet`: Vehicle, workshop and user lookups
//! - `plans`: Plan catalog queries
//! - `work_orders`: Work order, item and signature queries

pub mod audit;
pub mod fleet;
pub mod plans;
pub mod work_orders;
