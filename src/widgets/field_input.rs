use crate::core::step::Field;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::widgets::text_edit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAction {
    DeleteWordLeft,
    DeleteWordRight,
}

/// Single-line editor bound to one field of the step on screen.
#[derive(Debug, Clone)]
pub struct FieldInput {
    pub id: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub masked: bool,
    value: String,
    cursor: usize,
}

impl FieldInput {
    pub fn from_field(field: &Field, value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = text_edit::char_count(&value);
        Self {
            id: field.id.clone(),
            label: field.label.clone(),
            placeholder: field.placeholder.clone(),
            masked: field.masked,
            value,
            cursor,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(text_edit::char_count(&self.value))
        } else {
            self.value.clone()
        }
    }

    /// Returns whether the key changed the value or the cursor.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => {
                text_edit::insert_char(&mut self.value, &mut self.cursor, ch);
                true
            }
            KeyCode::Backspace => text_edit::backspace_char(&mut self.value, &mut self.cursor),
            KeyCode::Delete => text_edit::delete_char(&mut self.value, &mut self.cursor),
            KeyCode::Left => text_edit::move_left(&mut self.cursor, &self.value),
            KeyCode::Right => text_edit::move_right(&mut self.cursor, &self.value),
            KeyCode::Home => {
                let moved = self.cursor != 0;
                self.cursor = 0;
                moved
            }
            KeyCode::End => {
                let end = text_edit::char_count(&self.value);
                let moved = self.cursor != end;
                self.cursor = end;
                moved
            }
            _ => false,
        }
    }

    pub fn on_text_action(&mut self, action: TextAction) -> bool {
        match action {
            TextAction::DeleteWordLeft => {
                text_edit::delete_word_left(&mut self.value, &mut self.cursor)
            }
            TextAction::DeleteWordRight => {
                text_edit::delete_word_right(&mut self.value, &mut self.cursor)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldInput, TextAction};
    use crate::core::step::Field;
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn typing_appends_at_cursor() {
        let mut input = FieldInput::from_field(&Field::new("city", "City"), "Austn");
        assert!(input.on_key(KeyEvent::plain(KeyCode::Left)));
        assert!(input.on_key(KeyEvent::plain(KeyCode::Char('i'))));
        assert_eq!(input.value(), "Austin");
        assert!(input.on_key(KeyEvent::plain(KeyCode::Home)));
        assert!(!input.on_key(KeyEvent::plain(KeyCode::Home)));
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn control_chords_are_not_text() {
        let mut input = FieldInput::from_field(&Field::new("a", "A"), "");
        assert!(!input.on_key(KeyEvent::with(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn masked_fields_hide_digits() {
        let mut input = FieldInput::from_field(&Field::new("ssn", "SSN").masked(), "12");
        assert_eq!(input.display_value(), "••");
        input.on_text_action(TextAction::DeleteWordLeft);
        assert_eq!(input.value(), "");
    }
}
