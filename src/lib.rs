pub mod config;
pub mod core;
pub mod flows;
pub mod navigation;
pub mod runtime;
pub mod store;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use crate::core::sequencer;
pub use crate::core::step;
pub use crate::core::validation;
pub use crate::core::value;
