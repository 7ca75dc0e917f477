//! Personal information for a bank account being set up: five substeps driven
//! by a [`StepSequencer`], resumed from whatever the draft already holds.

use crate::core::error::{SequencerError, StoreError, SubmitError};
use crate::core::sequencer::{Advance, Retreat, RetreatFloor, StepSequencer};
use crate::core::step::{Field, Step};
use crate::core::validation::{StepIssue, digits, max_length, pattern, required};
use crate::core::value::{Draft, Value};
use crate::navigation::{NavCommand, Route};
use crate::store::DraftStore;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, info};

pub mod keys {
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const DOB: &str = "dob";
    pub const SSN_LAST_4: &str = "ssn_last4";
    pub const STREET: &str = "requestor_address_street";
    pub const CITY: &str = "requestor_address_city";
    pub const STATE: &str = "requestor_address_state";
    pub const ZIP_CODE: &str = "requestor_address_zip_code";
}

pub const STEP_NAMES: [&str; 5] = ["1", "2", "3", "4", "5"];

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substep {
    FullName,
    DateOfBirth,
    SocialSecurityNumber,
    Address,
    Confirmation,
}

impl Substep {
    pub const ALL: [Self; 5] = [
        Self::FullName,
        Self::DateOfBirth,
        Self::SocialSecurityNumber,
        Self::Address,
        Self::Confirmation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::FullName => &[keys::FIRST_NAME, keys::LAST_NAME],
            Self::DateOfBirth => &[keys::DOB],
            Self::SocialSecurityNumber => &[keys::SSN_LAST_4],
            Self::Address => &[keys::STREET, keys::CITY, keys::STATE, keys::ZIP_CODE],
            Self::Confirmation => &[],
        }
    }

    /// Builds the form page. `today` anchors the age check on the birth date.
    pub fn step(self, today: NaiveDate) -> Step {
        match self {
            Self::FullName => Step::builder("full_name", "Enter your legal first and last name.")
                .field(
                    Field::new(keys::FIRST_NAME, "Legal first name")
                        .with_validator(required("Please enter a valid first name."))
                        .with_validator(max_length(50, "First name is too long.")),
                )
                .field(
                    Field::new(keys::LAST_NAME, "Legal last name")
                        .with_validator(required("Please enter a valid last name."))
                        .with_validator(max_length(50, "Last name is too long.")),
                )
                .build(),
            Self::DateOfBirth => Step::builder("date_of_birth", "Enter your date of birth.")
                .field(
                    Field::new(keys::DOB, "Date of birth")
                        .with_placeholder("YYYY-MM-DD")
                        .with_validator(required("Please enter a valid date of birth."))
                        .with_validator(Box::new(move |value: &str| {
                            validate_age(value.trim(), today)
                        })),
                )
                .build(),
            Self::SocialSecurityNumber => Step::builder(
                "social_security_number",
                "Enter the last 4 of your Social Security Number.",
            )
            .description("Don't worry, we don't do any personal credit checks!")
            .field(
                Field::new(keys::SSN_LAST_4, "Last 4 of SSN")
                    .masked()
                    .with_validator(required("Please enter the last 4 digits of your SSN."))
                    .with_validator(digits(4, "Please enter the last 4 digits of your SSN.")),
            )
            .build(),
            Self::Address => {
                let po_box = po_box();
                Step::builder("address", "Enter your personal address.")
                    .description("P.O. boxes and mail drop addresses are not allowed.")
                    .field(
                        Field::new(keys::STREET, "Street address")
                            .with_validator(required("Please enter a valid street address."))
                            .with_validator(Box::new(move |value: &str| {
                                if po_box.is_match(value) {
                                    Err("P.O. boxes are not allowed.".to_string())
                                } else {
                                    Ok(())
                                }
                            })),
                    )
                    .field(
                        Field::new(keys::CITY, "City")
                            .with_validator(required("Please enter a valid city.")),
                    )
                    .field(
                        Field::new(keys::STATE, "State")
                            .with_placeholder("NY")
                            .with_validator(required("Please select a state."))
                            .with_validator(pattern(
                                builtin(r"^[A-Za-z]{2}$"),
                                "Use the two-letter state code.",
                            )),
                    )
                    .field(
                        Field::new(keys::ZIP_CODE, "Zip code")
                            .with_validator(required("Please enter a valid zip code."))
                            .with_validator(pattern(
                                builtin(r"^\d{5}(-?\d{4})?$"),
                                "Please enter a valid zip code using the format: 12345, 12345-1234, 123451234.",
                            )),
                    )
                    .build()
            }
            Self::Confirmation => Step::builder("confirmation", "Let's make sure everything looks right.")
                .validate(|ctx| {
                    let missing = Substep::ALL
                        .iter()
                        .flat_map(|substep| substep.fields())
                        .any(|id| ctx.is_empty(id));
                    missing.then(|| StepIssue::error("Some details are still missing."))
                })
                .build(),
        }
    }
}

fn builtin(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid regex pattern")
}

fn po_box() -> Regex {
    builtin(r"(?i)\bp\.?\s*o\.?\s*box\b")
}

fn validate_age(value: &str, today: NaiveDate) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    let dob = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "Please enter a date in the format YYYY-MM-DD.".to_string())?;
    let age = today
        .years_since(dob)
        .ok_or_else(|| "Date of birth cannot be in the future.".to_string())?;
    if age < MIN_AGE {
        return Err(format!("You must be at least {MIN_AGE} years old."));
    }
    if age > MAX_AGE {
        return Err("Please enter a valid date of birth.".to_string());
    }
    Ok(())
}

/// Index of the first substep with a missing answer; the confirmation step
/// when everything is filled in.
pub fn initial_substep(draft: &Draft) -> usize {
    Substep::ALL
        .iter()
        .find(|substep| {
            substep
                .fields()
                .iter()
                .any(|id| draft.get(*id).is_none_or(Value::is_empty))
        })
        .copied()
        .unwrap_or(Substep::Confirmation)
        .index()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalInfoSubmission {
    #[serde(rename = "bankAccountID")]
    pub bank_account_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub ssn_last4: String,
    pub requestor_address_street: String,
    pub requestor_address_city: String,
    pub requestor_address_state: String,
    pub requestor_address_zip_code: String,
}

/// Missing answers are sent as empty strings.
pub fn build_submission(bank_account_id: u64, draft: &Draft) -> PersonalInfoSubmission {
    let text = |key: &str| draft.get(key).map(Value::to_text).unwrap_or_default();
    PersonalInfoSubmission {
        bank_account_id,
        first_name: text(keys::FIRST_NAME),
        last_name: text(keys::LAST_NAME),
        dob: text(keys::DOB),
        ssn_last4: text(keys::SSN_LAST_4),
        requestor_address_street: text(keys::STREET),
        requestor_address_city: text(keys::CITY),
        requestor_address_state: text(keys::STATE).to_uppercase(),
        requestor_address_zip_code: text(keys::ZIP_CODE),
    }
}

/// Receives the completed payload. Whatever happens upstream is the
/// submitter's business.
pub trait Submitter {
    fn submit(&mut self, submission: &PersonalInfoSubmission) -> Result<(), SubmitError>;
}

pub struct JsonSubmitter<W: Write> {
    writer: W,
}

impl<W: Write> JsonSubmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Submitter for JsonSubmitter<W> {
    fn submit(&mut self, submission: &PersonalInfoSubmission) -> Result<(), SubmitError> {
        serde_json::to_writer_pretty(&mut self.writer, submission)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        info!(
            bank_account_id = submission.bank_account_id,
            "personal information submitted"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Done,
    Active,
    Pending,
}

/// Numbered step strip shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepHeader {
    pub names: Vec<String>,
    pub current: usize,
    pub highest: usize,
}

impl StepHeader {
    pub fn state(&self, index: usize) -> StepState {
        if index == self.current {
            StepState::Active
        } else if index <= self.highest {
            StepState::Done
        } else {
            StepState::Pending
        }
    }

    pub fn selectable(&self, index: usize) -> bool {
        index < self.names.len() && index <= self.highest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
    pub substep: Substep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    Blocked(Vec<StepIssue>),
    Moved(usize),
    Completed,
    AlreadyCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackOutcome {
    Moved(usize),
    Leave(NavCommand),
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub return_after_edit: bool,
    pub retreat_floor: RetreatFloor,
}

/// Back walks all the way to the first substep, even when the session
/// resumed further in.
impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            return_after_edit: false,
            retreat_floor: RetreatFloor::First,
        }
    }
}

pub struct PersonalInfoSession {
    sequencer: StepSequencer<Step>,
    bank_account_id: u64,
}

impl PersonalInfoSession {
    /// Resumes at the first substep the draft has not answered yet.
    pub fn start(
        store: &dyn DraftStore,
        bank_account_id: u64,
        today: NaiveDate,
        options: SessionOptions,
        on_complete: impl FnMut() + Send + 'static,
    ) -> Result<Self, SequencerError> {
        let start = initial_substep(&store.snapshot());
        let steps = Substep::ALL.iter().map(|substep| substep.step(today)).collect();
        let sequencer = StepSequencer::new(steps, start, on_complete)?
            .with_return_after_edit(options.return_after_edit)
            .with_retreat_floor(options.retreat_floor);
        debug!(start, bank_account_id, "personal info session started");

        Ok(Self {
            sequencer,
            bank_account_id,
        })
    }

    pub fn bank_account_id(&self) -> u64 {
        self.bank_account_id
    }

    pub fn sequencer(&self) -> &StepSequencer<Step> {
        &self.sequencer
    }

    pub fn current_step(&self) -> &Step {
        self.sequencer.current_step()
    }

    pub fn substep(&self) -> Substep {
        Substep::from_index(self.sequencer.current_index()).unwrap_or(Substep::Confirmation)
    }

    pub fn is_editing(&self) -> bool {
        self.sequencer.is_editing()
    }

    /// Validates `values` for the current substep on top of the stored
    /// draft, saves them, then moves on.
    pub fn on_next(
        &mut self,
        store: &mut dyn DraftStore,
        values: Draft,
    ) -> Result<NextOutcome, StoreError> {
        let mut merged = store.snapshot();
        merged.extend(values.clone());

        let issues: Vec<StepIssue> = self
            .current_step()
            .validate(&merged)
            .into_iter()
            .filter(StepIssue::is_blocking)
            .collect();
        if !issues.is_empty() {
            debug!(step = %self.current_step().id, issues = issues.len(), "step blocked");
            return Ok(NextOutcome::Blocked(issues));
        }

        store.merge(values)?;

        Ok(match self.sequencer.advance() {
            Advance::Moved(index) => NextOutcome::Moved(index),
            Advance::Completed => NextOutcome::Completed,
            Advance::AlreadyCompleted => NextOutcome::AlreadyCompleted,
        })
    }

    /// Back out of the flow entirely once there is nothing left to retreat to.
    pub fn on_back(&mut self) -> BackOutcome {
        match self.sequencer.retreat() {
            Retreat::Moved(index) => BackOutcome::Moved(index),
            Retreat::AtBoundary => BackOutcome::Leave(NavCommand::GoBack(Some(Route::Home))),
        }
    }

    pub fn on_move(&mut self, index: usize) -> Result<(), SequencerError> {
        self.sequencer.jump_to(index)
    }

    pub fn header(&self) -> StepHeader {
        StepHeader {
            names: STEP_NAMES.iter().map(|name| name.to_string()).collect(),
            current: self.sequencer.current_index(),
            highest: self.sequencer.highest_reached(),
        }
    }

    pub fn submission(&self, store: &dyn DraftStore) -> PersonalInfoSubmission {
        build_submission(self.bank_account_id, &store.snapshot())
    }

    /// Rows for the confirmation page, each pointing back at the substep that
    /// edits it.
    pub fn summary(&self, store: &dyn DraftStore) -> Vec<SummaryRow> {
        let draft = store.snapshot();
        let text = |key: &str| draft.get(key).map(Value::to_text).unwrap_or_default();
        let address = [keys::STREET, keys::CITY, keys::STATE, keys::ZIP_CODE]
            .iter()
            .map(|key| text(key))
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            SummaryRow {
                label: "Legal name".to_string(),
                value: format!("{} {}", text(keys::FIRST_NAME), text(keys::LAST_NAME))
                    .trim()
                    .to_string(),
                substep: Substep::FullName,
            },
            SummaryRow {
                label: "Date of birth".to_string(),
                value: text(keys::DOB),
                substep: Substep::DateOfBirth,
            },
            SummaryRow {
                label: "Last 4 of SSN".to_string(),
                value: text(keys::SSN_LAST_4),
                substep: Substep::SocialSecurityNumber,
            },
            SummaryRow {
                label: "Address".to_string(),
                value: address,
                substep: Substep::Address,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BackOutcome, JsonSubmitter, NextOutcome, PersonalInfoSession, SessionOptions,
        StepState, Submitter, Substep, build_submission, initial_substep, keys,
    };
    use crate::core::value::{Draft, Value};
    use crate::navigation::{NavCommand, Route};
    use crate::store::{DraftStore, MemoryStore};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("date")
    }

    fn draft(pairs: &[(&str, &str)]) -> Draft {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::text(*v)))
            .collect()
    }

    fn full_draft() -> Draft {
        draft(&[
            (keys::FIRST_NAME, "Ada"),
            (keys::LAST_NAME, "Lovelace"),
            (keys::DOB, "1990-12-10"),
            (keys::SSN_LAST_4, "1234"),
            (keys::STREET, "12 Main St"),
            (keys::CITY, "Austin"),
            (keys::STATE, "tx"),
            (keys::ZIP_CODE, "78701"),
        ])
    }

    fn session(store: &MemoryStore) -> (PersonalInfoSession, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let session = PersonalInfoSession::start(
            store,
            99,
            today(),
            SessionOptions::default(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )
        .expect("session");
        (session, calls)
    }

    #[test]
    fn initial_substep_follows_missing_answers() {
        assert_eq!(initial_substep(&Draft::new()), 0);
        assert_eq!(
            initial_substep(&draft(&[(keys::FIRST_NAME, "Ada"), (keys::LAST_NAME, "L")])),
            Substep::DateOfBirth.index()
        );
        assert_eq!(
            initial_substep(&draft(&[(keys::FIRST_NAME, "Ada"), (keys::LAST_NAME, " ")])),
            0
        );
        assert_eq!(initial_substep(&full_draft()), Substep::Confirmation.index());
    }

    #[test]
    fn submission_defaults_missing_fields_to_empty() {
        let payload = build_submission(7, &draft(&[(keys::FIRST_NAME, "Ada")]));
        assert_eq!(payload.bank_account_id, 7);
        assert_eq!(payload.first_name, "Ada");
        assert_eq!(payload.last_name, "");
        assert_eq!(payload.requestor_address_zip_code, "");

        let json = serde_json::to_value(&payload).expect("json");
        assert_eq!(json["bankAccountID"], 7);
        assert_eq!(json["ssn_last4"], "");
    }

    #[test]
    fn invalid_step_blocks_and_saves_nothing() {
        let mut store = MemoryStore::new();
        let (mut session, _) = session(&store);

        let outcome = session
            .on_next(&mut store, draft(&[(keys::FIRST_NAME, "Ada")]))
            .expect("store");
        let NextOutcome::Blocked(issues) = outcome else {
            panic!("expected blocked, got {outcome:?}");
        };
        assert_eq!(issues[0].field.as_deref(), Some(keys::LAST_NAME));
        assert!(store.is_empty());
        assert_eq!(session.substep(), Substep::FullName);
    }

    #[test]
    fn walking_the_flow_completes_once() {
        let mut store = MemoryStore::new();
        let (mut session, calls) = session(&store);
        let answers = full_draft();

        for substep in &Substep::ALL[..4] {
            let values: Draft = substep
                .fields()
                .iter()
                .map(|id| (id.to_string(), answers[*id].clone()))
                .collect();
            let outcome = session.on_next(&mut store, values).expect("store");
            assert_eq!(outcome, NextOutcome::Moved(substep.index() + 1));
        }

        assert_eq!(session.substep(), Substep::Confirmation);
        assert_eq!(
            session.on_next(&mut store, Draft::new()).expect("store"),
            NextOutcome::Completed
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.submission(&store).requestor_address_state, "TX");
    }

    #[test]
    fn underage_and_malformed_birth_dates_are_rejected() {
        let step = Substep::DateOfBirth.step(today());
        for bad in ["2010-01-01", "1990/01/01", "2030-01-01", "1800-01-01"] {
            let issues = step.validate(&draft(&[(keys::DOB, bad)]));
            assert_eq!(issues.len(), 1, "{bad} should be rejected");
        }
        assert!(step.validate(&draft(&[(keys::DOB, "2006-06-01")])).is_empty());
    }

    #[test]
    fn address_rejects_po_boxes_and_bad_zip() {
        let step = Substep::Address.step(today());
        let mut values = full_draft();
        values.insert(keys::STREET.to_string(), Value::text("PO Box 12"));
        values.insert(keys::ZIP_CODE.to_string(), Value::text("1234"));
        let issues = step.validate(&values);
        let fields: Vec<_> = issues.iter().filter_map(|i| i.field.as_deref()).collect();
        assert_eq!(fields, vec![keys::STREET, keys::ZIP_CODE]);

        values.insert(keys::STREET.to_string(), Value::text("1 Boxwood Rd"));
        values.insert(keys::ZIP_CODE.to_string(), Value::text("78701-1234"));
        assert!(step.validate(&values).is_empty());
    }

    #[test]
    fn back_at_first_substep_leaves_the_flow() {
        let store = MemoryStore::new();
        let (mut session, _) = session(&store);
        assert_eq!(
            session.on_back(),
            BackOutcome::Leave(NavCommand::GoBack(Some(Route::Home)))
        );
    }

    #[test]
    fn back_from_resumed_confirmation_walks_to_address() {
        let store = MemoryStore::from_draft(full_draft());
        let (mut session, _) = session(&store);
        assert_eq!(session.substep(), Substep::Confirmation);

        assert_eq!(session.on_back(), BackOutcome::Moved(Substep::Address.index()));
        session.on_move(Substep::FullName.index()).expect("in range");
        assert_eq!(
            session.on_back(),
            BackOutcome::Leave(NavCommand::GoBack(Some(Route::Home)))
        );
    }

    #[test]
    fn resumed_session_edits_from_confirmation() {
        let mut store = MemoryStore::from_draft(full_draft());
        let (mut session, calls) = session(&store);
        assert_eq!(session.substep(), Substep::Confirmation);

        session.on_move(Substep::DateOfBirth.index()).expect("in range");
        assert!(session.is_editing());
        let header = session.header();
        assert_eq!(header.state(1), StepState::Active);
        assert_eq!(header.state(4), StepState::Done);
        assert!(header.selectable(4));

        let outcome = session
            .on_next(&mut store, draft(&[(keys::DOB, "1985-03-04")]))
            .expect("store");
        assert_eq!(outcome, NextOutcome::Moved(2));
        assert!(!session.is_editing());
        assert_eq!(store.get(keys::DOB), Some(&Value::text("1985-03-04")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn summary_rows_point_at_their_substeps() {
        let store = MemoryStore::from_draft(full_draft());
        let (session, _) = session(&store);
        let rows = session.summary(&store);
        assert_eq!(rows[0].value, "Ada Lovelace");
        assert_eq!(rows[3].value, "12 Main St, Austin, tx, 78701");
        assert_eq!(rows[3].substep, Substep::Address);
    }

    #[test]
    fn json_submitter_writes_payload() {
        let mut submitter = JsonSubmitter::new(Vec::new());
        submitter
            .submit(&build_submission(3, &full_draft()))
            .expect("submit");
        let written = String::from_utf8(submitter.into_inner()).expect("utf8");
        assert!(written.contains("\"first_name\": \"Ada\""));
        assert!(written.ends_with("}\n"));
    }
}
