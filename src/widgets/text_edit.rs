pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

pub fn clamp_cursor(cursor: usize, value: &str) -> usize {
    cursor.min(char_count(value))
}

pub fn insert_char(value: &mut String, cursor: &mut usize, ch: char) {
    let pos = clamp_cursor(*cursor, value);
    let byte_pos = byte_index_at_char(value, pos);
    value.insert(byte_pos, ch);
    *cursor = pos + 1;
}

pub fn backspace_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos - 1);
    value.remove(byte_pos);
    *cursor = pos - 1;
    true
}

pub fn delete_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos >= char_count(value) {
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos);
    value.remove(byte_pos);
    *cursor = pos;
    true
}

pub fn move_left(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    *cursor = pos - 1;
    true
}

pub fn move_right(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos >= char_count(value) {
        return false;
    }
    *cursor = pos + 1;
    true
}

/// Removes the word before the cursor together with any separators between
/// it and the cursor.
pub fn delete_word_left(value: &mut String, cursor: &mut usize) -> bool {
    let chars: Vec<char> = value.chars().collect();
    let pos = (*cursor).min(chars.len());
    let before = &chars[..pos];
    let trailing = before.iter().rev().take_while(|ch| is_separator(**ch)).count();
    let word = before[..pos - trailing]
        .iter()
        .rev()
        .take_while(|ch| !is_separator(**ch))
        .count();
    let start = pos - trailing - word;
    *cursor = start;
    remove_chars(value, start, pos)
}

pub fn delete_word_right(value: &mut String, cursor: &mut usize) -> bool {
    let chars: Vec<char> = value.chars().collect();
    let pos = (*cursor).min(chars.len());
    let after = &chars[pos..];
    let leading = after.iter().take_while(|ch| is_separator(**ch)).count();
    let word = after[leading..]
        .iter()
        .take_while(|ch| !is_separator(**ch))
        .count();
    *cursor = pos;
    remove_chars(value, pos, pos + leading + word)
}

fn remove_chars(value: &mut String, start: usize, end: usize) -> bool {
    if start == end {
        return false;
    }
    let from = byte_index_at_char(value, start);
    let to = byte_index_at_char(value, end);
    value.replace_range(from..to, "");
    true
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, ',' | '-' | '.' | '/' | '#')
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::{backspace_char, delete_char, delete_word_left, delete_word_right, insert_char};

    #[test]
    fn edits_respect_multibyte_chars() {
        let mut value = "Zoë".to_string();
        let mut cursor = 3;
        assert!(backspace_char(&mut value, &mut cursor));
        assert_eq!((value.as_str(), cursor), ("Zo", 2));
        insert_char(&mut value, &mut cursor, 'é');
        assert_eq!((value.as_str(), cursor), ("Zoé", 3));
        cursor = 0;
        assert!(delete_char(&mut value, &mut cursor));
        assert_eq!(value, "oé");
    }

    #[test]
    fn word_deletion_stops_at_separators() {
        let mut value = "12 Main St".to_string();
        let mut cursor = 10;
        assert!(delete_word_left(&mut value, &mut cursor));
        assert_eq!((value.as_str(), cursor), ("12 Main ", 8));

        cursor = 0;
        assert!(delete_word_right(&mut value, &mut cursor));
        assert_eq!(value, " Main ");
    }
}
