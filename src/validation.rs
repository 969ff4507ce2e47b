//! Required-field checks on form submission.

use crate::config::FormConfig;
use crate::confirm::Prompt;

/// A form control flagged `required`
pub trait RequiredField {
    fn value(&self) -> String;
    fn set_border_color(&self, color: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Proceed,
    /// Prevent the default submit
    Cancel,
}

/// Outcome of checking a set of required fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormVerdict {
    /// Indices of the fields that are empty after trimming
    pub invalid: Vec<usize>,
}

impl FormVerdict {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate<F: RequiredField>(fields: &[F]) -> FormVerdict {
    FormVerdict {
        invalid: fields
            .iter()
            .enumerate()
            .filter(|(_, f)| is_blank(&f.value()))
            .map(|(i, _)| i)
            .collect(),
    }
}

pub struct FormValidator {
    config: FormConfig,
}

impl FormValidator {
    pub fn new(config: FormConfig) -> Self {
        Self { config }
    }

    /// Check every required field, mark each one, and block the submission
    /// if any is empty.
    pub fn on_submit<F: RequiredField>(&self, fields: &[F], prompt: &dyn Prompt) -> Submission {
        let verdict = validate(fields);

        for (i, field) in fields.iter().enumerate() {
            let color = if verdict.invalid.contains(&i) {
                &self.config.invalid_border
            } else {
                &self.config.valid_border
            };
            field.set_border_color(color);
        }

        if verdict.is_valid() {
            Submission::Proceed
        } else {
            tracing::debug!(
                "Blocking submit: {} of {} required field(s) empty",
                verdict.invalid.len(),
                fields.len()
            );
            prompt.alert(&self.config.message);
            Submission::Cancel
        }
    }
}
