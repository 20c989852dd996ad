// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Functions here perform single writes or write groups and never open
//! transactions themselves; the `Persistence` adapter in `lib.rs` wraps
//! them so every operation commits or rolls back as a unit.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event persistence
//! - `fleet`: Fleet registration and vehicle usage write-back
//! - `plans`: Plan insert, replace, activation and delete
//! - `work_orders`: Numbering, insert, transitions and delete

pub mod audit;
pub mod fleet;
pub mod plans;
pub mod work_orders;
