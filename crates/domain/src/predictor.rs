// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Next-maintenance prediction.
//!
//! Given a vehicle's current counters, a resolved plan, and the start
//! counters of the vehicle's last completed work order, computes which
//! intervals are due or upcoming and which activities apply. The function
//! is pure: identical inputs always produce identical output.

use crate::fleet::{UsageCounters, Vehicle};
use crate::plan::{MaintenanceActivity, MaintenanceInterval, MaintenancePlan};
use crate::work_order::WorkOrder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fraction of a threshold within which an interval counts as upcoming.
pub const UPCOMING_THRESHOLD_RATIO: f64 = 0.10;

/// Maximum number of due/upcoming intervals reported.
pub const MAX_FORECAST_INTERVALS: usize = 3;

/// Whether an interval has been reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalStatus {
    /// Threshold reached or passed on at least one axis.
    Due,
    /// Within `UPCOMING_THRESHOLD_RATIO` of the threshold on at least one axis.
    Upcoming,
}

/// Forecast for one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalForecast {
    /// Interval storage identifier.
    pub interval_id: i64,
    /// Interval sequence order.
    pub sequence_order: u32,
    /// Engine-hour threshold.
    pub hours: f64,
    /// Kilometer threshold.
    pub kilometers: f64,
    /// Kilometers left before the threshold. Zero or negative when reached.
    pub km_until_next: f64,
    /// Hours left before the threshold. Zero or negative when reached.
    pub hours_until_next: f64,
    /// Due or upcoming.
    pub status: IntervalStatus,
}

/// Result of a prediction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePrediction {
    /// Counters the distances were measured from.
    pub baseline: UsageCounters,
    /// First due or upcoming intervals in sequence order.
    pub due_or_upcoming: Vec<IntervalForecast>,
    /// Activities mapped to any due interval, deduplicated.
    pub applicable_activities: Vec<MaintenanceActivity>,
}

impl MaintenancePrediction {
    /// Returns whether any reported interval is due.
    #[must_use]
    pub fn has_due(&self) -> bool {
        self.due_or_upcoming
            .iter()
            .any(|f| f.status == IntervalStatus::Due)
    }
}

/// Resolves the baseline counters from the last completed work order.
///
/// Missing orders and missing readings count as zero.
#[must_use]
pub fn baseline_from(last_completed: Option<&WorkOrder>) -> UsageCounters {
    last_completed.map_or_else(UsageCounters::default, WorkOrder::start_counters)
}

fn classify(
    interval: &MaintenanceInterval,
    km_until_next: f64,
    hours_until_next: f64,
) -> Option<IntervalStatus> {
    // Either axis alone makes the whole interval due ("whichever comes first").
    if km_until_next <= 0.0 || hours_until_next <= 0.0 {
        return Some(IntervalStatus::Due);
    }
    if km_until_next <= UPCOMING_THRESHOLD_RATIO * interval.kilometers
        || hours_until_next <= UPCOMING_THRESHOLD_RATIO * interval.hours
    {
        return Some(IntervalStatus::Upcoming);
    }
    None
}

/// Predicts the next maintenance for a vehicle under a plan.
///
/// # Arguments
///
/// * `vehicle` - The vehicle, providing its current counters
/// * `plan` - The plan resolved for the vehicle
/// * `last_completed` - The vehicle's last completed work order, if any
///
/// # Returns
///
/// At most `MAX_FORECAST_INTERVALS` due/upcoming intervals in sequence
/// order, plus every active activity mapped to any due interval. Activities
/// are collected from all due intervals, including those beyond the
/// reported window.
#[must_use]
pub fn predict_maintenance(
    vehicle: &Vehicle,
    plan: &MaintenancePlan,
    last_completed: Option<&WorkOrder>,
) -> MaintenancePrediction {
    let baseline: UsageCounters = baseline_from(last_completed);
    let km_since: f64 = vehicle.odometer - baseline.odometer;
    let hours_since: f64 = vehicle.hourmeter - baseline.hourmeter;

    let mut intervals: Vec<&MaintenanceInterval> = plan.intervals.iter().collect();
    intervals.sort_by_key(|i| i.sequence_order);

    let mut forecasts: Vec<IntervalForecast> = Vec::new();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut applicable: Vec<MaintenanceActivity> = Vec::new();

    for interval in intervals {
        let km_until_next: f64 = interval.kilometers - km_since;
        let hours_until_next: f64 = interval.hours - hours_since;

        let Some(status) = classify(interval, km_until_next, hours_until_next) else {
            continue;
        };

        if status == IntervalStatus::Due {
            for activity in &plan.activities {
                if activity.is_active
                    && activity.interval_ids.contains(&interval.interval_id)
                    && seen.insert(activity.activity_id)
                {
                    applicable.push(activity.clone());
                }
            }
        }

        forecasts.push(IntervalForecast {
            interval_id: interval.interval_id,
            sequence_order: interval.sequence_order,
            hours: interval.hours,
            kilometers: interval.kilometers,
            km_until_next,
            hours_until_next,
            status,
        });
    }

    forecasts.truncate(MAX_FORECAST_INTERVALS);

    MaintenancePrediction {
        baseline,
        due_or_upcoming: forecasts,
        applicable_activities: applicable,
    }
}
