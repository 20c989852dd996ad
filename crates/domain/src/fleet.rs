// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet entities owned by external collaborators.
//!
//! Vehicles, workshops and users are registered elsewhere; the maintenance
//! engine only reads them (and writes back the usage snapshot of a vehicle
//! when a work order closes).

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// A pair of usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageCounters {
    /// Kilometers.
    pub odometer: f64,
    /// Engine hours.
    pub hourmeter: f64,
}

impl UsageCounters {
    /// Creates a new counter pair.
    #[must_use]
    pub const fn new(odometer: f64, hourmeter: f64) -> Self {
        Self {
            odometer,
            hourmeter,
        }
    }
}

/// A vehicle as seen by the maintenance engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// The canonical numeric identifier assigned by the database.
    pub vehicle_id: i64,
    /// The owning tenant.
    pub tenant_id: i64,
    /// License plate or other human-readable tag.
    pub plate: String,
    /// Vehicle type used for plan matching.
    pub vehicle_type: String,
    /// Current odometer reading.
    pub odometer: f64,
    /// Current hourmeter reading.
    pub hourmeter: f64,
    /// Direct plan override.
    pub plan_id: Option<i64>,
    /// When the vehicle last came out of a completed work order.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_maintenance_at: Option<OffsetDateTime>,
}

impl Vehicle {
    /// Returns the vehicle's current counters.
    #[must_use]
    pub const fn counters(&self) -> UsageCounters {
        UsageCounters::new(self.odometer, self.hourmeter)
    }
}

/// A workshop that can execute external work orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    /// The canonical numeric identifier assigned by the database.
    pub workshop_id: i64,
    /// The owning tenant.
    pub tenant_id: i64,
    /// Display name.
    pub name: String,
    /// Inactive workshops cannot receive new work orders.
    pub is_active: bool,
}

/// Role of a fleet user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Tenant administrator.
    Admin,
    /// Maintenance supervisor.
    Supervisor,
    /// Vehicle operator or mechanic.
    Operator,
}

impl UserRole {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Supervisor => "SUPERVISOR",
            Self::Operator => "OPERATOR",
        }
    }

    /// Returns whether this role signs work orders with supervisor authority.
    ///
    /// Administrators are treated as supervisor-equivalent.
    #[must_use]
    pub const fn is_supervisor_equivalent(&self) -> bool {
        matches!(self, Self::Admin | Self::Supervisor)
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "SUPERVISOR" => Ok(Self::Supervisor),
            "OPERATOR" => Ok(Self::Operator),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user of the fleet system, referenced for signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetUser {
    /// The canonical numeric identifier assigned by the database.
    pub user_id: i64,
    /// The owning tenant.
    pub tenant_id: i64,
    /// Display name.
    pub display_name: String,
    /// The user's role.
    pub role: UserRole,
}
