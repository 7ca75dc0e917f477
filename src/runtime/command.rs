use crate::terminal::KeyEvent;
use crate::widgets::TextAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Back,
    Submit,
    NextFocus,
    PrevFocus,
    JumpTo(usize),
    InputKey(KeyEvent),
    TextAction(TextAction),
    Tick,
    Noop,
}
