use crate::core::error::SequencerError;
use crate::core::step::Step;
use crate::core::validation::ValidationState;
use crate::core::value::{Draft, Value};
use crate::flows::personal_info::{
    BackOutcome, NextOutcome, PersonalInfoSession, SessionOptions, StepHeader, Submitter,
    Substep, SummaryRow,
};
use crate::navigation::NavCommand;
use crate::store::DraftStore;
use crate::terminal::KeyEvent;
use crate::widgets::{FieldInput, TextAction};
use chrono::NaiveDate;
use std::sync::mpsc::{self, Receiver};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    Submitted,
    Left(NavCommand),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// Everything the personal-info screen needs between key presses.
pub struct FormState {
    session: PersonalInfoSession,
    store: Box<dyn DraftStore>,
    submitter: Box<dyn Submitter>,
    completions: Receiver<()>,
    pending_submit: bool,
    inputs: Vec<FieldInput>,
    focus: usize,
    validation: ValidationState,
    status: Option<Status>,
    exit: Option<ExitReason>,
}

impl FormState {
    pub fn new(
        store: Box<dyn DraftStore>,
        submitter: Box<dyn Submitter>,
        bank_account_id: u64,
        today: NaiveDate,
        options: SessionOptions,
    ) -> Result<Self, SequencerError> {
        let (tx, completions) = mpsc::channel();
        let session = PersonalInfoSession::start(
            &*store,
            bank_account_id,
            today,
            options,
            move || {
                let _ = tx.send(());
            },
        )?;

        let mut state = Self {
            session,
            store,
            submitter,
            completions,
            pending_submit: false,
            inputs: Vec::new(),
            focus: 0,
            validation: ValidationState::default(),
            status: None,
            exit: None,
        };
        state.rebuild_inputs();
        Ok(state)
    }

    pub fn step(&self) -> &Step {
        self.session.current_step()
    }

    pub fn substep(&self) -> Substep {
        self.session.substep()
    }

    pub fn header(&self) -> StepHeader {
        self.session.header()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_editing()
    }

    pub fn inputs(&self) -> &[FieldInput] {
        &self.inputs
    }

    pub fn focus(&self) -> Option<usize> {
        (!self.inputs.is_empty()).then_some(self.focus)
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn summary(&self) -> Vec<SummaryRow> {
        self.session.summary(&*self.store)
    }

    pub fn exit_reason(&self) -> Option<&ExitReason> {
        self.exit.as_ref()
    }

    pub fn should_exit(&self) -> bool {
        self.exit.is_some()
    }

    pub fn request_exit(&mut self, reason: ExitReason) {
        self.exit = Some(reason);
    }

    pub fn values(&self) -> Draft {
        self.inputs
            .iter()
            .map(|input| (input.id.clone(), Value::text(input.value().trim())))
            .collect()
    }

    fn rebuild_inputs(&mut self) {
        let store = &*self.store;
        self.inputs = self
            .session
            .current_step()
            .fields
            .iter()
            .map(|field| {
                let value = store.get(&field.id).map(Value::to_text).unwrap_or_default();
                FieldInput::from_field(field, value)
            })
            .collect();
        self.focus = 0;
        self.validation.clear();
    }

    pub fn focus_next(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + 1) % self.inputs.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + self.inputs.len() - 1) % self.inputs.len();
        }
    }

    pub fn dispatch_key_to_focused(&mut self, key: KeyEvent) -> bool {
        let Some(input) = self.inputs.get_mut(self.focus) else {
            return false;
        };
        if !input.on_key(key) {
            return false;
        }
        self.revalidate_focused();
        true
    }

    pub fn dispatch_text_action_to_focused(&mut self, action: TextAction) -> bool {
        let Some(input) = self.inputs.get_mut(self.focus) else {
            return false;
        };
        if !input.on_text_action(action) {
            return false;
        }
        self.revalidate_focused();
        true
    }

    /// Errors found while typing stay hidden until the next submit.
    fn revalidate_focused(&mut self) {
        let Some(input) = self.inputs.get(self.focus) else {
            return;
        };
        let result = self
            .session
            .current_step()
            .fields
            .iter()
            .find(|field| field.id == input.id)
            .map(|field| field.validate(input.value()));
        match result {
            Some(Err(err)) => {
                let revealed = self.validation.visible_error(&input.id).is_some();
                self.validation.set_error(input.id.clone(), err, revealed);
            }
            _ => self.validation.clear_error(&input.id),
        }
        self.validation.set_step_errors(Vec::new());
        self.status = None;
    }

    pub fn submit_step(&mut self) {
        let values = self.values();
        match self.session.on_next(&mut *self.store, values) {
            Ok(NextOutcome::Blocked(issues)) => {
                self.validation.clear();
                let mut step_errors = Vec::new();
                for issue in issues {
                    match issue.field {
                        Some(field) => self.validation.set_error(field, issue.message, true),
                        None => step_errors.push(issue.message),
                    }
                }
                self.validation.set_step_errors(step_errors);
                if let Some(index) = self
                    .inputs
                    .iter()
                    .position(|input| self.validation.visible_error(&input.id).is_some())
                {
                    self.focus = index;
                }
            }
            Ok(NextOutcome::Moved(_)) => {
                self.status = None;
                self.rebuild_inputs();
            }
            Ok(NextOutcome::Completed) => {
                self.drain_completions();
            }
            Ok(NextOutcome::AlreadyCompleted) if self.pending_submit => self.send_submission(),
            Ok(NextOutcome::AlreadyCompleted) => {
                self.status = Some(Status::Info("Already submitted.".to_string()));
            }
            Err(err) => {
                warn!(error = %err, "failed to save draft");
                self.status = Some(Status::Error(err.to_string()));
            }
        }
    }

    /// Hands a fresh completion to the submitter. Returns whether anything
    /// was drained.
    pub fn drain_completions(&mut self) -> bool {
        let mut drained = false;
        while self.completions.try_recv().is_ok() {
            drained = true;
        }
        if drained {
            self.pending_submit = true;
            self.send_submission();
        }
        drained
    }

    /// A failed submission stays pending so the next submit retries it.
    fn send_submission(&mut self) {
        let submission = self.session.submission(&*self.store);
        match self.submitter.submit(&submission) {
            Ok(()) => {
                info!(bank_account_id = submission.bank_account_id, "flow submitted");
                self.pending_submit = false;
                self.status = Some(Status::Info("Personal information submitted.".to_string()));
                self.exit = Some(ExitReason::Submitted);
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                self.status = Some(Status::Error(format!("{err}. Press Enter to retry.")));
            }
        }
    }

    pub fn step_back(&mut self) -> Option<NavCommand> {
        match self.session.on_back() {
            BackOutcome::Moved(_) => {
                self.status = None;
                self.rebuild_inputs();
                None
            }
            BackOutcome::Leave(command) => Some(command),
        }
    }

    /// Only steps already reached can be jumped to.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if !self.header().selectable(index) {
            return false;
        }
        if let Err(err) = self.session.on_move(index) {
            warn!(error = %err, "jump rejected");
            return false;
        }
        self.status = None;
        self.rebuild_inputs();
        true
    }
}
