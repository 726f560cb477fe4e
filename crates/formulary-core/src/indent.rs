//! Indent level detection for editor lines.

/// Columns per indent level.
pub const INDENT_WIDTH: usize = 2;

/// Deepest level that gets a guide.
pub const MAX_INDENT_LEVEL: u8 = 8;

/// Attribute the guide CSS targets on each editor line.
pub const INDENT_LEVEL_ATTR: &str = "data-indent-level";

/// Compute the indent level of a line from its leading whitespace.
///
/// Spaces and non-breaking spaces count as one column, a tab as one full
/// level. Returns 0 when the line carries no guide.
pub fn indent_level(line: &str) -> u8 {
    let mut columns = 0usize;
    for c in line.chars() {
        match c {
            ' ' | '\u{a0}' => columns += 1,
            '\t' => columns += INDENT_WIDTH,
            _ => break,
        }
    }
    (columns / INDENT_WIDTH).min(MAX_INDENT_LEVEL as usize) as u8
}

/// Attribute value for a line, or `None` when the marker should be absent.
pub fn indent_marker(line: &str) -> Option<String> {
    match indent_level(line) {
        0 => None,
        level => Some(level.to_string()),
    }
}
