pub mod command;
pub mod effect;
pub mod key_bindings;
pub mod reducer;
pub mod runner;
pub mod state;

pub use command::Command;
pub use effect::Effect;
pub use key_bindings::{KeyBinding, KeyBindings};
pub use reducer::Reducer;
pub use runner::Runtime;
pub use state::{ExitReason, FormState, Status};
