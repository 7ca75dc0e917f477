use crate::core::validation::{
    StepContext, StepIssue, StepValidator, Validator, run_validators,
};
use crate::core::value::Draft;

pub struct Field {
    pub id: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub masked: bool,
    pub validators: Vec<Validator>,
}

impl Field {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            placeholder: None,
            masked: false,
            validators: Vec::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn validate(&self, value: &str) -> Result<(), String> {
        run_validators(&self.validators, value)
    }
}

/// One page of a multi-step form.
pub struct Step {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub validators: Vec<StepValidator>,
}

impl Step {
    pub fn builder(id: impl Into<String>, title: impl Into<String>) -> StepBuilder {
        StepBuilder::new(id, title)
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.id.as_str())
    }

    /// Field validators first, then step-level checks. Field issues carry the
    /// field id.
    pub fn validate(&self, values: &Draft) -> Vec<StepIssue> {
        let ctx = StepContext::new(values);
        let mut issues: Vec<StepIssue> = self
            .fields
            .iter()
            .filter_map(|field| {
                field
                    .validate(&ctx.text(&field.id))
                    .err()
                    .map(|err| StepIssue::error(err).for_field(field.id.clone()))
            })
            .collect();

        issues.extend(self.validators.iter().filter_map(|validator| validator(&ctx)));
        issues
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("fields", &self.field_ids().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

pub struct StepBuilder {
    id: String,
    title: String,
    description: Option<String>,
    fields: Vec<Field>,
    validators: Vec<StepValidator>,
}

impl StepBuilder {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            fields: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn validate(
        mut self,
        f: impl Fn(&StepContext) -> Option<StepIssue> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(Box::new(f));
        self
    }

    pub fn build(self) -> Step {
        Step {
            id: self.id,
            title: self.title,
            description: self.description,
            fields: self.fields,
            validators: self.validators,
        }
    }
}
