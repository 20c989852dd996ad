// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client-submitted plan drafts and their resolution.
//!
//! Clients build plans before anything is persisted, so activities point at
//! intervals through references that are not storage identifiers: a
//! sequence order, a client-generated draft key, or (when editing) the
//! identifier of an interval that already exists. Resolution turns every
//! reference into a sequence order. Draft keys are never persisted.

use crate::error::DomainError;
use crate::plan::{
    ActivityDefinition, IntervalDefinition, MaintenanceInterval, PlanHeader, ResolvedPlan,
};
use crate::validation::{validate_activity_code, validate_plan_name, validate_threshold};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A reference from an activity to an interval of the same plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IntervalRef {
    /// Sequence order of an interval in the submitted list.
    Sequence(u32),
    /// Client-generated placeholder key of an interval in the submitted list.
    Draft(String),
    /// Identifier of an interval already persisted for the plan.
    Persisted(i64),
}

/// An interval as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalDraft {
    /// Client-side placeholder key used by activity references.
    #[serde(default)]
    pub draft_key: Option<String>,
    /// Explicit sequence order. Defaults to list position + 1.
    #[serde(default)]
    pub sequence_order: Option<u32>,
    /// Engine-hour threshold.
    pub hours: f64,
    /// Kilometer threshold.
    pub kilometers: f64,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// An activity as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDraft {
    /// Code, unique within the plan.
    pub code: String,
    /// Free-text description.
    pub description: String,
    /// Optional category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Soft-enable flag.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Intervals this activity applies to.
    #[serde(default)]
    pub applies_to: Vec<IntervalRef>,
}

/// A complete plan as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDraft {
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Vehicle type filter.
    #[serde(default)]
    pub vehicle_type: Option<String>,
    /// Active flag.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Intervals.
    pub intervals: Vec<IntervalDraft>,
    /// Activities.
    pub activities: Vec<ActivityDraft>,
}

const fn default_true() -> bool {
    true
}

/// Returns the effective sequence order of each draft, in submission order.
fn effective_sequence_orders(drafts: &[IntervalDraft]) -> Result<Vec<u32>, DomainError> {
    drafts
        .iter()
        .enumerate()
        .map(|(position, draft)| match draft.sequence_order {
            Some(0) => Err(DomainError::InvalidSequenceOrder { position }),
            Some(order) => Ok(order),
            None => u32::try_from(position + 1)
                .map_err(|_| DomainError::InvalidSequenceOrder { position }),
        })
        .collect()
}

/// Validates interval drafts and assigns sequence orders.
///
/// # Returns
///
/// The intervals ordered by sequence order.
///
/// # Errors
///
/// Returns an error if:
/// - A threshold is negative or not finite
/// - A sequence order is zero
/// - Two intervals share a sequence order
pub fn resolve_intervals(drafts: &[IntervalDraft]) -> Result<Vec<IntervalDefinition>, DomainError> {
    let orders: Vec<u32> = effective_sequence_orders(drafts)?;

    let mut seen: HashSet<u32> = HashSet::new();
    let mut definitions: Vec<IntervalDefinition> = Vec::with_capacity(drafts.len());
    for (draft, order) in drafts.iter().zip(orders) {
        validate_threshold("hours", draft.hours)?;
        validate_threshold("kilometers", draft.kilometers)?;
        if !seen.insert(order) {
            return Err(DomainError::DuplicateSequenceOrder(order));
        }
        definitions.push(IntervalDefinition {
            sequence_order: order,
            hours: draft.hours,
            kilometers: draft.kilometers,
            name: draft.name.clone(),
        });
    }

    definitions.sort_by_key(|s| s.sequence_order);
    Ok(definitions)
}

/// Validates activity drafts and resolves their interval references.
///
/// # Arguments
///
/// * `drafts` - The submitted activities
/// * `interval_drafts` - The submitted intervals, used to resolve draft keys.
///   Empty when the interval list is not being replaced.
/// * `intervals` - The intervals the plan will have after the write
/// * `persisted` - The intervals the plan has before the write
///
/// Draft keys that match no submitted interval are dropped. Persisted
/// references whose interval is not part of the resulting interval set are
/// dropped as well.
///
/// # Errors
///
/// Returns an error if:
/// - A code is empty or used twice
/// - A description is empty
/// - A sequence reference matches no resulting interval
/// - A persisted reference is not an interval of the plan
pub fn resolve_activities(
    drafts: &[ActivityDraft],
    interval_drafts: &[IntervalDraft],
    intervals: &[IntervalDefinition],
    persisted: &[MaintenanceInterval],
) -> Result<Vec<ActivityDefinition>, DomainError> {
    let orders: Vec<u32> = effective_sequence_orders(interval_drafts)?;
    let draft_keys: HashMap<&str, u32> = interval_drafts
        .iter()
        .zip(orders)
        .filter_map(|(draft, order)| draft.draft_key.as_deref().map(|key| (key, order)))
        .collect();
    let available: HashSet<u32> = intervals.iter().map(|i| i.sequence_order).collect();

    let mut codes: HashSet<String> = HashSet::new();
    let mut definitions: Vec<ActivityDefinition> = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let code: String = draft.code.trim().to_string();
        validate_activity_code(&code)?;
        if draft.description.trim().is_empty() {
            return Err(DomainError::InvalidActivityDescription { code });
        }
        if !codes.insert(code.clone()) {
            return Err(DomainError::DuplicateActivityCode(code));
        }

        let mut sequence_orders: BTreeSet<u32> = BTreeSet::new();
        for reference in &draft.applies_to {
            match reference {
                IntervalRef::Sequence(order) => {
                    if !available.contains(order) {
                        return Err(DomainError::UnknownIntervalSequence {
                            code,
                            sequence_order: *order,
                        });
                    }
                    sequence_orders.insert(*order);
                }
                IntervalRef::Draft(key) => {
                    if let Some(order) = draft_keys.get(key.as_str()) {
                        sequence_orders.insert(*order);
                    }
                }
                IntervalRef::Persisted(interval_id) => {
                    let interval: &MaintenanceInterval = persisted
                        .iter()
                        .find(|i| i.interval_id == *interval_id)
                        .ok_or(DomainError::UnknownIntervalId(*interval_id))?;
                    if available.contains(&interval.sequence_order) {
                        sequence_orders.insert(interval.sequence_order);
                    }
                }
            }
        }

        definitions.push(ActivityDefinition {
            code,
            description: draft.description.trim().to_string(),
            category: draft.category.clone(),
            is_active: draft.is_active,
            sequence_orders,
        });
    }

    Ok(definitions)
}

/// Validates a new plan draft.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - There are no intervals or no activities
/// - Any interval or activity fails validation
pub fn resolve_plan_draft(draft: &PlanDraft) -> Result<ResolvedPlan, DomainError> {
    validate_plan_name(&draft.name)?;
    if draft.intervals.is_empty() {
        return Err(DomainError::EmptyIntervals);
    }
    if draft.activities.is_empty() {
        return Err(DomainError::EmptyActivities);
    }

    let intervals: Vec<IntervalDefinition> = resolve_intervals(&draft.intervals)?;
    let activities: Vec<ActivityDefinition> =
        resolve_activities(&draft.activities, &draft.intervals, &intervals, &[])?;

    Ok(ResolvedPlan {
        header: PlanHeader {
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            vehicle_type: draft.vehicle_type.clone(),
            is_active: draft.is_active,
        },
        intervals,
        activities,
    })
}
