// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use rust_decimal::Decimal;

/// Validates a plan name.
///
/// # Errors
///
/// Returns an error if the name is empty after trimming.
pub fn validate_plan_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidPlanName(String::from(
            "Plan name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates an interval threshold.
///
/// # Arguments
///
/// * `field` - `hours` or `kilometers`
/// * `value` - The threshold value
///
/// # Errors
///
/// Returns an error if the value is negative, NaN, or infinite.
pub fn validate_threshold(field: &'static str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::InvalidThreshold {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validates an activity code.
///
/// # Errors
///
/// Returns an error if the code is empty after trimming.
pub fn validate_activity_code(code: &str) -> Result<(), DomainError> {
    if code.trim().is_empty() {
        return Err(DomainError::InvalidActivityCode(String::from(
            "Activity code cannot be empty",
        )));
    }
    Ok(())
}

/// Validates an item cost.
///
/// # Errors
///
/// Returns an error if the cost is negative.
pub fn validate_cost(cost: Decimal) -> Result<(), DomainError> {
    if cost.is_sign_negative() && !cost.is_zero() {
        return Err(DomainError::InvalidCost(cost.to_string()));
    }
    Ok(())
}

/// Validates reported labor hours.
///
/// # Errors
///
/// Returns an error if the value is negative, NaN, or infinite.
pub fn validate_labor_hours(hours: f64) -> Result<(), DomainError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(DomainError::InvalidLaborHours(hours.to_string()));
    }
    Ok(())
}

/// Validates a usage counter reading.
///
/// # Errors
///
/// Returns an error if the value is negative, NaN, or infinite.
pub fn validate_counter(field: &'static str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::InvalidCounter {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
