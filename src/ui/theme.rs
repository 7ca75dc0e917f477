use crate::ui::style::{Color, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub prompt: Style,
    pub hint: Style,
    pub error: Style,
    pub placeholder: Style,
    pub focused: Style,
    pub step_done: Style,
    pub step_active: Style,
    pub step_pending: Style,
    pub success: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::new().color(Color::Cyan).bold(),
            prompt: Style::new().bold(),
            hint: Style::new().color(Color::DarkGrey),
            error: Style::new().color(Color::Red).bold(),
            placeholder: Style::new().color(Color::DarkGrey),
            focused: Style::new().color(Color::Cyan).bold(),
            step_done: Style::new().color(Color::Green),
            step_active: Style::new().color(Color::Cyan).bold(),
            step_pending: Style::new().color(Color::DarkGrey),
            success: Style::new().color(Color::Green).bold(),
        }
    }
}
