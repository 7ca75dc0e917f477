use crate::flows::personal_info::{StepState, Substep};
use crate::runtime::state::{FormState, Status};
use crate::terminal::CursorPos;
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::widgets::FieldInput;
use unicode_width::UnicodeWidthStr;

const TITLE: &str = "Personal information";
const FOCUS_MARKER: &str = "› ";
const BLANK_MARKER: &str = "  ";

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

#[derive(Debug, Default, Clone)]
pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(&self, state: &FormState) -> RenderFrame {
        let mut frame = RenderFrame::default();
        let theme = &self.theme;

        let mut title = vec![Span::styled(TITLE, theme.title)];
        if state.is_editing() {
            title.push(Span::styled("  (editing)", theme.hint));
        }
        frame.lines.push(title);
        frame.lines.push(self.header_line(state));
        frame.lines.push(SpanLine::new());

        let step = state.step();
        frame
            .lines
            .push(vec![Span::styled(step.title.clone(), theme.prompt)]);
        if let Some(description) = &step.description {
            frame
                .lines
                .push(vec![Span::styled(description.clone(), theme.hint)]);
        }
        frame.lines.push(SpanLine::new());

        for (index, input) in state.inputs().iter().enumerate() {
            let focused = state.focus() == Some(index);
            self.push_input(&mut frame, input, focused);
            if let Some(error) = state.validation().visible_error(&input.id) {
                frame
                    .lines
                    .push(vec![Span::styled(format!("    ! {error}"), theme.error)]);
            }
        }

        if state.substep() == Substep::Confirmation {
            self.push_summary(&mut frame, state);
        }

        for error in state.validation().step_errors() {
            frame
                .lines
                .push(vec![Span::styled(format!("! {error}"), theme.error)]);
        }

        match state.status() {
            Some(Status::Info(message)) => frame
                .lines
                .push(vec![Span::styled(message.clone(), theme.success)]),
            Some(Status::Error(message)) => frame
                .lines
                .push(vec![Span::styled(message.clone(), theme.error)]),
            None => {}
        }

        frame.lines.push(SpanLine::new());
        frame.lines.push(vec![Span::styled(
            "Enter next · Esc back · Tab switch field · Alt+N jump · Ctrl+C quit",
            theme.hint,
        )]);
        frame
    }

    fn header_line(&self, state: &FormState) -> SpanLine {
        let header = state.header();
        let mut line = SpanLine::new();
        for (index, name) in header.names.iter().enumerate() {
            if index > 0 {
                line.push(Span::styled(" ─ ", self.theme.step_pending));
            }
            let (text, style) = match header.state(index) {
                StepState::Done => (format!("✓{name}"), self.theme.step_done),
                StepState::Active => (format!("[{name}]"), self.theme.step_active),
                StepState::Pending => (name.clone(), self.theme.step_pending),
            };
            line.push(Span::styled(text, style));
        }
        line
    }

    fn push_input(&self, frame: &mut RenderFrame, input: &FieldInput, focused: bool) {
        let theme = &self.theme;
        let (marker, label_style) = if focused {
            (FOCUS_MARKER, theme.focused)
        } else {
            (BLANK_MARKER, theme.prompt)
        };
        let label = format!("{}: ", input.label);
        let mut line = vec![
            Span::styled(marker, label_style),
            Span::styled(label.clone(), label_style),
        ];

        let display = input.display_value();
        match (&input.placeholder, display.is_empty()) {
            (Some(placeholder), true) => {
                line.push(Span::styled(placeholder.clone(), theme.placeholder));
            }
            _ => line.push(Span::new(display.clone())),
        }

        if focused {
            let before_cursor: String = display.chars().take(input.cursor()).collect();
            let col = marker.width() + label.width() + before_cursor.width();
            frame.cursor = Some(CursorPos {
                col: col as u16,
                row: frame.lines.len() as u16,
            });
        }
        frame.lines.push(line);
    }

    fn push_summary(&self, frame: &mut RenderFrame, state: &FormState) {
        for row in state.summary() {
            frame.lines.push(vec![
                Span::styled(format!("{}: ", row.label), self.theme.prompt),
                Span::new(row.value),
                Span::styled(
                    format!("  (Alt+{} to edit)", row.substep.index() + 1),
                    self.theme.hint,
                ),
            ]);
        }
    }
}
