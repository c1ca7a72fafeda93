use crate::layout::LABEL_MAX_CHARS;
use crate::CellValue;

/// Derive the matching label for a cell value.
///
/// Returns `None` for empty cells. Otherwise the value is coerced to text, stripped of
/// parentheses and whitespace (newlines included), and truncated to
/// [`LABEL_MAX_CHARS`] characters. Distinct values that clean to the same label are
/// indistinguishable afterwards.
pub fn label(value: &CellValue) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    Some(clean_label(&value.to_text()))
}

/// Label cleaning on raw text.
pub fn clean_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '(' | ')') && !is_space(*c))
        .take(LABEL_MAX_CHARS)
        .collect()
}

/// The untruncated base name of a primary child value: whitespace removed, nothing else.
///
/// Unlike [`label`], parentheses survive and no length limit applies.
pub fn child_base(value: &CellValue) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    Some(
        value
            .to_text()
            .chars()
            .filter(|c| !is_space(*c))
            .collect(),
    )
}

/// Whitespace as labels see it: Unicode white space plus the ASCII separators
/// `\x1c`..=`\x1f`.
pub(crate) fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}
