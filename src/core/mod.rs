pub mod error;
pub mod sequencer;
pub mod step;
pub mod validation;
pub mod value;

pub use error::{ConfigError, SequencerError, StoreError, SubmitError};
pub use sequencer::{Advance, Retreat, RetreatFloor, StepSequencer};
pub use step::{Field, Step, StepBuilder};
pub use value::{Draft, Value};
