use crate::navigation::NavCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestRender,
    Navigate(NavCommand),
}
