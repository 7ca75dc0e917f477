use crate::core::value::{Draft, Value};
use regex::Regex;
use std::collections::HashMap;

pub type ValidationError = String;
pub type Validator = Box<dyn Fn(&str) -> Result<(), ValidationError> + Send + Sync>;
pub type StepValidator = Box<dyn Fn(&StepContext) -> Option<StepIssue> + Send + Sync>;

/// Run a list of validators against `value`, returning the first error.
pub fn run_validators(validators: &[Validator], value: &str) -> Result<(), String> {
    for validator in validators {
        validator(value)?;
    }
    Ok(())
}

pub fn required(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.trim().is_empty() {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

pub fn min_length(min_len: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.chars().count() < min_len {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

pub fn max_length(max_len: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.chars().count() > max_len {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

/// Empty values pass; pair with [`required`] when the field is mandatory.
pub fn pattern(regex: Regex, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        let value = value.trim();
        if value.is_empty() || regex.is_match(value) {
            Ok(())
        } else {
            Err(message.clone())
        }
    })
}

pub fn digits(count: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        let value = value.trim();
        if value.is_empty()
            || (value.chars().count() == count && value.chars().all(|c| c.is_ascii_digit()))
        {
            Ok(())
        } else {
            Err(message.clone())
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepIssue {
    pub field: Option<String>,
    pub message: String,
    pub severity: IssueSeverity,
}

impl StepIssue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
            severity: IssueSeverity::Error,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
            severity: IssueSeverity::Warning,
        }
    }

    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}

/// Read-only view over the values a step is validated against.
pub struct StepContext<'a> {
    values: &'a Draft,
}

impl<'a> StepContext<'a> {
    pub fn new(values: &'a Draft) -> Self {
        Self { values }
    }

    pub fn get(&self, id: &str) -> Option<&'a Value> {
        self.values.get(id)
    }

    pub fn text(&self, id: &str) -> String {
        self.values.get(id).map(Value::to_text).unwrap_or_default()
    }

    pub fn is_empty(&self, id: &str) -> bool {
        self.values.get(id).is_none_or(Value::is_empty)
    }
}

#[derive(Debug, Clone)]
pub struct ValidationEntry {
    pub error: String,
    pub revealed: bool,
}

/// Per-field errors for the step on screen. Errors found while typing stay
/// hidden until the user tries to leave the step.
#[derive(Debug, Default, Clone)]
pub struct ValidationState {
    entries: HashMap<String, ValidationEntry>,
    step_errors: Vec<String>,
}

impl ValidationState {
    pub fn set_error(&mut self, id: impl Into<String>, error: impl Into<String>, revealed: bool) {
        self.entries.insert(
            id.into(),
            ValidationEntry {
                error: error.into(),
                revealed,
            },
        );
    }

    pub fn clear_error(&mut self, id: &str) {
        self.entries.remove(id);
    }

    pub fn visible_error(&self, id: &str) -> Option<&str> {
        self.entries
            .get(id)
            .and_then(|entry| entry.revealed.then_some(entry.error.as_str()))
    }

    pub fn reveal_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.revealed = true;
        }
    }

    pub fn set_step_errors(&mut self, errors: Vec<String>) {
        self.step_errors = errors;
    }

    pub fn step_errors(&self) -> &[String] {
        &self.step_errors
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.step_errors.clear();
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty() || !self.step_errors.is_empty()
    }
}
