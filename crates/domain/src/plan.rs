// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance plan catalog.
//!
//! A plan owns an ordered list of intervals, a list of activities, and the
//! applicability matrix between them. Storage identifiers of intervals are
//! reissued on every replace or duplicate; `sequence_order` is the only
//! identity that survives those operations.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use time::OffsetDateTime;

/// A usage threshold at which maintenance is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceInterval {
    /// The canonical numeric identifier assigned by the database.
    pub interval_id: i64,
    /// The owning plan.
    pub plan_id: i64,
    /// Stable position of the interval within its plan.
    pub sequence_order: u32,
    /// Engine-hour threshold.
    pub hours: f64,
    /// Kilometer threshold.
    pub kilometers: f64,
    /// Optional display name (e.g. "10k service").
    pub name: Option<String>,
}

/// A discrete maintenance task cataloged within a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceActivity {
    /// The canonical numeric identifier assigned by the database.
    pub activity_id: i64,
    /// The owning plan.
    pub plan_id: i64,
    /// Code, unique within the plan.
    pub code: String,
    /// Free-text description.
    pub description: String,
    /// Optional category label.
    pub category: Option<String>,
    /// Soft-enable flag.
    pub is_active: bool,
    /// Intervals this activity applies to (its matrix rows).
    pub interval_ids: Vec<i64>,
}

/// One `applies = true` row of the activity × interval matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatrixRow {
    /// The activity side.
    pub activity_id: i64,
    /// The interval side.
    pub interval_id: i64,
}

/// A maintenance plan with its intervals, activities and matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePlan {
    /// The canonical numeric identifier assigned by the database.
    pub plan_id: i64,
    /// The owning tenant.
    pub tenant_id: i64,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Vehicle type this plan targets. `None` targets no particular type.
    pub vehicle_type: Option<String>,
    /// Whether the plan participates in plan resolution.
    pub is_active: bool,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Intervals ordered by `sequence_order`.
    pub intervals: Vec<MaintenanceInterval>,
    /// Activities with their matrix rows.
    pub activities: Vec<MaintenanceActivity>,
}

impl MaintenancePlan {
    /// Returns whether `activity_id` applies at `interval_id`.
    #[must_use]
    pub fn applies(&self, activity_id: i64, interval_id: i64) -> bool {
        self.activities
            .iter()
            .find(|a| a.activity_id == activity_id)
            .is_some_and(|a| a.interval_ids.contains(&interval_id))
    }

    /// Returns every `applies = true` row, sorted.
    #[must_use]
    pub fn matrix_rows(&self) -> Vec<MatrixRow> {
        let rows: BTreeSet<MatrixRow> = self
            .activities
            .iter()
            .flat_map(|a| {
                a.interval_ids.iter().map(|&interval_id| MatrixRow {
                    activity_id: a.activity_id,
                    interval_id,
                })
            })
            .collect();
        rows.into_iter().collect()
    }

    /// Looks up an interval by its storage identifier.
    #[must_use]
    pub fn interval(&self, interval_id: i64) -> Option<&MaintenanceInterval> {
        self.intervals.iter().find(|i| i.interval_id == interval_id)
    }

    /// Looks up an interval by its sequence order.
    #[must_use]
    pub fn interval_by_sequence(&self, sequence_order: u32) -> Option<&MaintenanceInterval> {
        self.intervals
            .iter()
            .find(|i| i.sequence_order == sequence_order)
    }

    /// Looks up an activity by code.
    #[must_use]
    pub fn activity_by_code(&self, code: &str) -> Option<&MaintenanceActivity> {
        self.activities.iter().find(|a| a.code == code)
    }

    /// Translates an activity's matrix rows into sequence orders.
    ///
    /// Rows pointing at intervals outside this plan are skipped.
    #[must_use]
    pub fn sequence_orders_for(&self, activity: &MaintenanceActivity) -> BTreeSet<u32> {
        activity
            .interval_ids
            .iter()
            .filter_map(|&id| self.interval(id).map(|i| i.sequence_order))
            .collect()
    }

    /// Returns the matrix keyed by activity code and sequence order.
    #[must_use]
    pub fn matrix_by_sequence(&self) -> BTreeMap<String, BTreeSet<u32>> {
        self.activities
            .iter()
            .map(|a| (a.code.clone(), self.sequence_orders_for(a)))
            .collect()
    }

    /// Returns whether this plan targets the given vehicle type.
    #[must_use]
    pub fn matches_vehicle_type(&self, vehicle_type: &str) -> bool {
        self.vehicle_type
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(vehicle_type.trim()))
    }

    /// Sorts intervals by sequence order.
    pub fn sort_intervals(&mut self) {
        self.intervals.sort_by_key(|i| i.sequence_order);
    }

    /// Checks that every matrix row joins an activity and an interval of this plan.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MatrixPlanMismatch` for the first row that
    /// references an interval from elsewhere.
    pub fn validate_matrix(&self) -> Result<(), DomainError> {
        let interval_ids: HashSet<i64> = self
            .intervals
            .iter()
            .filter(|i| i.plan_id == self.plan_id)
            .map(|i| i.interval_id)
            .collect();

        for activity in &self.activities {
            for &interval_id in &activity.interval_ids {
                if activity.plan_id != self.plan_id || !interval_ids.contains(&interval_id) {
                    return Err(DomainError::MatrixPlanMismatch {
                        activity_id: activity.activity_id,
                        interval_id,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Plan-level fields, independent of intervals and activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanHeader {
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Vehicle type filter.
    pub vehicle_type: Option<String>,
    /// Active flag.
    pub is_active: bool,
}

/// A validated interval that has not been given a storage identifier yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalDefinition {
    /// Stable position within the plan.
    pub sequence_order: u32,
    /// Engine-hour threshold.
    pub hours: f64,
    /// Kilometer threshold.
    pub kilometers: f64,
    /// Optional display name.
    pub name: Option<String>,
}

/// A validated activity whose matrix rows are keyed by sequence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDefinition {
    /// Code, unique within the plan.
    pub code: String,
    /// Free-text description.
    pub description: String,
    /// Optional category label.
    pub category: Option<String>,
    /// Soft-enable flag.
    pub is_active: bool,
    /// Sequence orders of the intervals this activity applies to.
    pub sequence_orders: BTreeSet<u32>,
}

/// A fully validated plan ready to be written.
///
/// Matrix rows reference intervals by sequence order; the persistence layer
/// maps them onto freshly issued interval identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlan {
    /// Plan-level fields.
    pub header: PlanHeader,
    /// Intervals ordered by sequence order.
    pub intervals: Vec<IntervalDefinition>,
    /// Activities in submission order.
    pub activities: Vec<ActivityDefinition>,
}

impl ResolvedPlan {
    /// Counts the `applies = true` rows across all activities.
    #[must_use]
    pub fn matrix_row_count(&self) -> usize {
        self.activities.iter().map(|a| a.sequence_orders.len()).sum()
    }
}
