//! Field rules shared by the create and update payloads.
//!
//! Rules collect every violation instead of stopping at the first one, so a
//! single 400 response lists everything wrong with the payload.

use crate::error::ApiError;
use crate::models::Difficulty;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const CUISINE_MAX_CHARS: usize = 50;
pub const COOKING_TIME_MINUTES: (i32, i32) = (1, 1440);
pub const SERVINGS: (i32, i32) = (1, 100);

#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required text: must contain something other than whitespace.
    pub fn required(&mut self, field: &str, value: &str, max_chars: Option<usize>) {
        if value.trim().is_empty() {
            self.0.push(format!("{} must not be empty", field));
        } else if let Some(max) = max_chars {
            self.max_chars(field, value, max);
        }
    }

    pub fn max_chars(&mut self, field: &str, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.0.push(format!(
                "{} must be at most {} characters (got {})",
                field, max, len
            ));
        }
    }

    pub fn range(&mut self, field: &str, value: i32, (min, max): (i32, i32)) {
        if !(min..=max).contains(&value) {
            self.0.push(format!(
                "{} must be between {} and {} (got {})",
                field, min, max, value
            ));
        }
    }

    /// Returns the canonical spelling when `value` names a difficulty.
    pub fn difficulty(&mut self, field: &str, value: &str) -> Option<String> {
        match value.parse::<Difficulty>() {
            Ok(d) => Some(d.as_str().to_string()),
            Err(()) => {
                let allowed: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
                self.0.push(format!(
                    "{} must be one of {} (got {:?})",
                    field,
                    allowed.join(", "),
                    value
                ));
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// `Ok(value)` when nothing was violated, otherwise an InvalidInput error
    /// listing every violation.
    pub fn finish<T>(self, value: T) -> Result<T, ApiError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(ApiError::InvalidInput(self.0.join("; ")))
        }
    }
}

/// Optional text where an empty string means "no value".
pub fn blank_to_none(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
