//! Check recorder - non-fatal assertion recording for a single attempt

use std::fmt::Debug;

use thiserror::Error;
use tracing::debug;

use super::{CheckResult, CheckValue};

/// Raised when a check cannot meaningfully compare its operands.
///
/// This is never a recorded failure: it escapes the test body and the
/// attempt is classified as an error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckError {
    #[error("Check '{check}' requires a numeric operand, got {type_name} '{value}'")]
    NonNumeric {
        check: String,
        value: String,
        type_name: &'static str,
    },

    #[error("Check '{check}' requires a finite operand, got {value}")]
    NonFinite { check: String, value: f64 },

    #[error("Check '{check}' has invalid bounds: {message}")]
    InvalidBounds { check: String, message: String },
}

/// Appends check results to the current attempt without transferring control
#[derive(Debug, Default)]
pub struct CheckRecorder {
    results: Vec<CheckResult>,
}

impl CheckRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a passing check
    pub fn record_pass(&mut self, description: impl Into<String>) {
        let result = CheckResult::passed(self.results.len(), description);
        debug!(check = %result, "Check recorded");
        self.results.push(result);
    }

    /// Record a failing check; execution of the test body continues
    pub fn record_fail(
        &mut self,
        description: impl Into<String>,
        expected: Option<String>,
        actual: Option<String>,
    ) {
        let result = CheckResult::failed(self.results.len(), description, expected, actual);
        debug!(check = %result, "Check recorded");
        self.results.push(result);
    }

    /// Record a value for the report without judging it
    pub fn record_logged_value(&mut self, description: impl Into<String>, value: impl Into<CheckValue>) {
        let result = CheckResult::logged(self.results.len(), description, value.into());
        debug!(check = %result, "Check recorded");
        self.results.push(result);
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<CheckResult> {
        self.results
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(CheckResult::is_fail)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    // Assertion helpers. Each classifies its own condition and returns
    // whether the check passed.

    pub fn check_passes(&mut self, description: impl Into<String>) -> bool {
        self.record_pass(description);
        true
    }

    pub fn check_fails(&mut self, description: impl Into<String>) -> bool {
        self.record_fail(description, None, None);
        false
    }

    pub fn log_value(&mut self, description: impl Into<String>, value: impl Into<CheckValue>) {
        self.record_logged_value(description, value);
    }

    pub fn check_true(&mut self, description: impl Into<String>, condition: bool) -> bool {
        self.check_equal(description, condition, true)
    }

    pub fn check_false(&mut self, description: impl Into<String>, condition: bool) -> bool {
        self.check_equal(description, condition, false)
    }

    pub fn check_equal<T: PartialEq + Debug>(
        &mut self,
        description: impl Into<String>,
        actual: T,
        expected: T,
    ) -> bool {
        if actual == expected {
            self.record_pass(description);
            true
        } else {
            self.record_fail(
                description,
                Some(format!("{:?}", expected)),
                Some(format!("{:?}", actual)),
            );
            false
        }
    }

    pub fn check_in_set<T: PartialEq + Debug>(
        &mut self,
        description: impl Into<String>,
        actual: T,
        allowed: &[T],
    ) -> bool {
        if allowed.contains(&actual) {
            self.record_pass(description);
            true
        } else {
            self.record_fail(
                description,
                Some(format!("one of {:?}", allowed)),
                Some(format!("{:?}", actual)),
            );
            false
        }
    }

    /// Inclusive range check
    pub fn check_in_range(
        &mut self,
        description: impl Into<String>,
        value: impl Into<CheckValue>,
        min: f64,
        max: f64,
    ) -> Result<bool, CheckError> {
        let description = description.into();
        if min.is_nan() || max.is_nan() || min > max {
            return Err(CheckError::InvalidBounds {
                check: description,
                message: format!("min {} and max {} do not form a range", min, max),
            });
        }
        let actual = numeric_operand(&description, value.into())?;

        Ok(self.judge(
            description,
            (min..=max).contains(&actual),
            format!("{} <= x <= {}", min, max),
            actual,
        ))
    }

    /// Passes when `value` lies within `tolerance_percent` of `nominal`
    pub fn check_in_tolerance(
        &mut self,
        description: impl Into<String>,
        value: impl Into<CheckValue>,
        nominal: f64,
        tolerance_percent: f64,
    ) -> Result<bool, CheckError> {
        let description = description.into();
        if !tolerance_percent.is_finite() || tolerance_percent < 0.0 {
            return Err(CheckError::InvalidBounds {
                check: description,
                message: format!("tolerance {}% is not a finite non-negative number", tolerance_percent),
            });
        }
        if !nominal.is_finite() {
            return Err(CheckError::InvalidBounds {
                check: description,
                message: format!("nominal {} is not finite", nominal),
            });
        }
        let actual = numeric_operand(&description, value.into())?;
        let spread = (nominal * tolerance_percent / 100.0).abs();

        Ok(self.judge(
            description,
            (actual - nominal).abs() <= spread,
            format!("{} +/- {}%", nominal, tolerance_percent),
            actual,
        ))
    }

    pub fn check_greater(
        &mut self,
        description: impl Into<String>,
        value: impl Into<CheckValue>,
        threshold: f64,
    ) -> Result<bool, CheckError> {
        let description = description.into();
        reject_nan(&description, "threshold", threshold)?;
        let actual = numeric_operand(&description, value.into())?;

        Ok(self.judge(description, actual > threshold, format!("> {}", threshold), actual))
    }

    pub fn check_smaller(
        &mut self,
        description: impl Into<String>,
        value: impl Into<CheckValue>,
        threshold: f64,
    ) -> Result<bool, CheckError> {
        let description = description.into();
        reject_nan(&description, "threshold", threshold)?;
        let actual = numeric_operand(&description, value.into())?;

        Ok(self.judge(description, actual < threshold, format!("< {}", threshold), actual))
    }

    fn judge(&mut self, description: String, passed: bool, expected: String, actual: f64) -> bool {
        if passed {
            self.record_pass(description);
        } else {
            self.record_fail(description, Some(expected), Some(actual.to_string()));
        }
        passed
    }
}

fn numeric_operand(check: &str, value: CheckValue) -> Result<f64, CheckError> {
    let number = value.as_number().ok_or_else(|| CheckError::NonNumeric {
        check: check.to_string(),
        value: value.to_string(),
        type_name: value.type_name(),
    })?;

    if !number.is_finite() {
        return Err(CheckError::NonFinite {
            check: check.to_string(),
            value: number,
        });
    }
    Ok(number)
}

fn reject_nan(check: &str, name: &str, bound: f64) -> Result<(), CheckError> {
    if bound.is_nan() {
        return Err(CheckError::InvalidBounds {
            check: check.to_string(),
            message: format!("{} is NaN", name),
        });
    }
    Ok(())
}
