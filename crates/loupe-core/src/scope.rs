//! Structural scope detection over plain text.
//!
//! Everything here operates on a snapshot of document lines plus a cursor
//! position; no widget or selection types leak in. Detectors are total:
//! "no scope" is `None`, never a panic.

/// Inclusive line range denoting a structural region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeRange {
    pub start: usize,
    pub end: usize,
}

impl ScopeRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// A range collapsing to a single line carries nothing worth drawing.
    pub fn is_trivial(&self) -> bool {
        self.start == self.end
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Cursor location as (line, byte column within the line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Indentation of a single line, in 4-space-equivalent units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentLevel {
    /// Whole indentation levels (`units / 4`, truncated).
    pub level: usize,
    /// Raw whitespace units: each space counts 1, each tab counts 4.
    pub units: usize,
}

const UNITS_PER_LEVEL: usize = 4;

/// Measures the leading whitespace of `line`.
pub fn indent_level_of(line: &str) -> IndentLevel {
    let mut units = 0usize;
    for ch in line.chars() {
        match ch {
            ' ' => units += 1,
            '\t' => units += UNITS_PER_LEVEL,
            _ => break,
        }
    }
    IndentLevel {
        level: units / UNITS_PER_LEVEL,
        units,
    }
}

/// Contiguous run of lines at or below the cursor line sharing (or exceeding)
/// its indentation level.
///
/// Blank lines never terminate the scan; the range ends before the first
/// non-blank line indented strictly less than the base line, or at the end
/// of the buffer.
pub fn indent_scope<S: AsRef<str>>(lines: &[S], cursor_line: usize) -> Option<ScopeRange> {
    let base = lines.get(cursor_line)?.as_ref();
    let base_level = indent_level_of(base).level;

    let mut end = cursor_line;
    for (offset, line) in lines[cursor_line + 1..].iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        if indent_level_of(line).level < base_level {
            break;
        }
        end = cursor_line + 1 + offset;
    }

    Some(ScopeRange::new(cursor_line, end))
}

/// Nearest enclosing `{`..`}` pair containing `cursor`.
///
/// Scans backward from the cursor for an unmatched opening brace, then
/// forward from it tracking nesting depth until the matching close. Returns
/// `None` when the cursor sits outside every pair or the open brace is never
/// closed.
pub fn brace_scope<S: AsRef<str>>(lines: &[S], cursor: Position) -> Option<ScopeRange> {
    let open = unmatched_open_before(lines, cursor)?;
    let close = matching_close_after(lines, open)?;
    Some(ScopeRange::new(open.line, close.line))
}

fn unmatched_open_before<S: AsRef<str>>(lines: &[S], cursor: Position) -> Option<Position> {
    if cursor.line >= lines.len() {
        return None;
    }

    let mut depth = 0usize;
    for line_index in (0..=cursor.line).rev() {
        let line = lines[line_index].as_ref();
        let upto = if line_index == cursor.line {
            clamp_to_char_boundary(line, cursor.column)
        } else {
            line.len()
        };
        for (byte, ch) in line[..upto].char_indices().rev() {
            match ch {
                '}' => depth += 1,
                '{' => {
                    if depth == 0 {
                        return Some(Position::new(line_index, byte));
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    }
    None
}

/// Walks a byte column back to the nearest character boundary so callers may
/// pass any column without panicking on multibyte text.
fn clamp_to_char_boundary(line: &str, column: usize) -> usize {
    let mut column = column.min(line.len());
    while column > 0 && !line.is_char_boundary(column) {
        column -= 1;
    }
    column
}

fn matching_close_after<S: AsRef<str>>(lines: &[S], open: Position) -> Option<Position> {
    let mut depth = 0usize;
    for line_index in open.line..lines.len() {
        let line = lines[line_index].as_ref();
        let from = if line_index == open.line { open.column } else { 0 };
        for (byte, ch) in line[from..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(Position::new(line_index, from + byte));
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// True when the trimmed line opens an if/else construct.
pub fn is_if_else_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("if ")
        || trimmed.starts_with("if(")
        || trimmed.starts_with("else if")
        || trimmed.starts_with("else")
}

fn is_else_line(line: &str) -> bool {
    line.trim_start().starts_with("else")
}

/// Full extent of the if/else chain the cursor line belongs to.
///
/// Walks to the first `if` of the chain, then unions the brace scope of each
/// chain header. A header only counts as linked when its body brace opens on
/// the header line itself; single-statement branches end the walk rather than
/// pulling in an enclosing scope.
pub fn if_else_chain_scope<S: AsRef<str>>(lines: &[S], cursor_line: usize) -> Option<ScopeRange> {
    let line = lines.get(cursor_line)?.as_ref();
    if !is_if_else_line(line) {
        return None;
    }

    let mut first = cursor_line;
    while is_else_line(lines[first].as_ref()) {
        match header_above(lines, first) {
            Some(header) => first = header,
            None => break,
        }
    }

    let mut range: Option<ScopeRange> = None;
    let mut header = first;
    loop {
        let Some(body) = header_body(lines, header) else {
            break;
        };
        range = Some(match range {
            Some(range) => range.union(body),
            None => body,
        });
        match next_else_header(lines, body.end) {
            Some(next) => header = next,
            None => break,
        }
    }

    range.filter(|range| range.contains_line(cursor_line))
}

/// Brace scope of the body opened on `header` itself, if any.
fn header_body<S: AsRef<str>>(lines: &[S], header: usize) -> Option<ScopeRange> {
    let line = lines.get(header)?.as_ref();
    let open_column = line.rfind('{')?;
    let close = matching_close_after(lines, Position::new(header, open_column))?;
    Some(ScopeRange::new(header, close.line))
}

/// Chain header whose body closes immediately above `below`, if the line
/// above is a closing brace belonging to an if/else header.
fn header_above<S: AsRef<str>>(lines: &[S], below: usize) -> Option<usize> {
    let prev = (0..below)
        .rev()
        .find(|&index| !lines[index].as_ref().trim().is_empty())?;
    let close_column = lines[prev].as_ref().rfind('}')?;
    let open = unmatched_open_before(lines, Position::new(prev, close_column))?;
    is_if_else_line(lines[open.line].as_ref()).then_some(open.line)
}

/// The `else` header directly following a body that closed on `close_line`.
fn next_else_header<S: AsRef<str>>(lines: &[S], close_line: usize) -> Option<usize> {
    let next = (close_line + 1..lines.len())
        .find(|&index| !lines[index].as_ref().trim().is_empty())?;
    is_else_line(lines[next].as_ref()).then_some(next)
}

/// Best structural range to outline for the cursor: a non-trivial if/else
/// chain first, the enclosing brace pair second.
pub fn unified_scope<S: AsRef<str>>(lines: &[S], cursor: Position) -> Option<ScopeRange> {
    if let Some(chain) = if_else_chain_scope(lines, cursor.line) {
        if !chain.is_trivial() {
            return Some(chain);
        }
    }
    brace_scope(lines, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }

    #[test]
    fn indent_level_counts_spaces_and_tabs() {
        assert_eq!(indent_level_of("code"), IndentLevel { level: 0, units: 0 });
        assert_eq!(indent_level_of("    code"), IndentLevel { level: 1, units: 4 });
        assert_eq!(indent_level_of("\tcode"), IndentLevel { level: 1, units: 4 });
        assert_eq!(indent_level_of("\t  code"), IndentLevel { level: 1, units: 6 });
        assert_eq!(indent_level_of("\t\tcode"), IndentLevel { level: 2, units: 8 });
        assert_eq!(indent_level_of("   code"), IndentLevel { level: 0, units: 3 });
    }

    #[test]
    fn indent_level_is_monotonic_in_leading_whitespace() {
        let mut previous = 0;
        for count in 0..16 {
            let line = format!("{}x", " ".repeat(count));
            let level = indent_level_of(&line).level;
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn indent_scope_covers_equal_or_deeper_lines() {
        let buffer = lines("    a\n    b\nc");
        assert_eq!(indent_scope(&buffer, 0), Some(ScopeRange::new(0, 1)));
    }

    #[test]
    fn indent_scope_skips_blank_lines() {
        let buffer = lines("    a\n\n    b\nc");
        assert_eq!(indent_scope(&buffer, 0), Some(ScopeRange::new(0, 2)));
    }

    #[test]
    fn indent_scope_at_level_zero_scans_forward() {
        let buffer = lines("fn main() {\n    a\n    b\n}");
        assert_eq!(indent_scope(&buffer, 0), Some(ScopeRange::new(0, 3)));
    }

    #[test]
    fn indent_scope_out_of_bounds_is_none() {
        let buffer = lines("a");
        assert_eq!(indent_scope(&buffer, 5), None);
    }

    #[test]
    fn brace_scope_brackets_the_cursor() {
        let buffer = lines("fn f() {\n    body();\n}");
        let scope = brace_scope(&buffer, Position::new(1, 2)).unwrap();
        assert_eq!(scope, ScopeRange::new(0, 2));
        assert!(scope.contains_line(1));
    }

    #[test]
    fn brace_scope_picks_nearest_enclosing_pair() {
        let buffer = lines("outer {\n    inner {\n        x\n    }\n}");
        let scope = brace_scope(&buffer, Position::new(2, 4)).unwrap();
        assert_eq!(scope, ScopeRange::new(1, 3));
    }

    #[test]
    fn brace_scope_tolerates_mid_character_columns() {
        // Column 3 falls inside the two-byte 'é'.
        let buffer = lines("{ é }");
        let scope = brace_scope(&buffer, Position::new(0, 3)).unwrap();
        assert_eq!(scope, ScopeRange::new(0, 0));
    }

    #[test]
    fn brace_scope_outside_any_pair_is_none() {
        let buffer = lines("plain text\nno braces");
        assert_eq!(brace_scope(&buffer, Position::new(1, 0)), None);
    }

    #[test]
    fn brace_scope_unmatched_open_is_none() {
        let buffer = lines("start {\n    body");
        assert_eq!(brace_scope(&buffer, Position::new(1, 2)), None);
    }

    #[test]
    fn if_else_line_detection() {
        assert!(is_if_else_line("if (x) {"));
        assert!(is_if_else_line("  if(x) {"));
        assert!(is_if_else_line("else {"));
        assert!(is_if_else_line("\telse if (y) {"));
        assert!(!is_if_else_line("ifx"));
        assert!(!is_if_else_line("while (x) {"));
    }

    #[test]
    fn chain_scope_spans_if_and_else_bodies() {
        let buffer = lines("if (x) {\n  foo();\n}\nelse {\n  bar();\n}");
        assert_eq!(
            if_else_chain_scope(&buffer, 0),
            Some(ScopeRange::new(0, 5))
        );
    }

    #[test]
    fn chain_scope_from_the_else_header() {
        let buffer = lines("if (x) {\n  foo();\n}\nelse {\n  bar();\n}");
        assert_eq!(
            if_else_chain_scope(&buffer, 3),
            Some(ScopeRange::new(0, 5))
        );
    }

    #[test]
    fn chain_scope_walks_else_if_links() {
        let buffer = lines(
            "if (a) {\n  one();\n}\nelse if (b) {\n  two();\n}\nelse {\n  three();\n}",
        );
        for header in [0, 3, 6] {
            assert_eq!(
                if_else_chain_scope(&buffer, header),
                Some(ScopeRange::new(0, 8)),
                "header line {header}"
            );
        }
    }

    #[test]
    fn chain_scope_on_plain_line_is_none() {
        let buffer = lines("if (x) {\n  foo();\n}\nelse {\n  bar();\n}");
        assert_eq!(if_else_chain_scope(&buffer, 1), None);
    }

    #[test]
    fn chain_scope_without_bodies_is_none() {
        let buffer = lines("if (x)\n    foo();");
        assert_eq!(if_else_chain_scope(&buffer, 0), None);
    }

    #[test]
    fn unified_scope_prefers_the_chain() {
        let buffer = lines("if (x) {\n  foo();\n}\nelse {\n  bar();\n}");
        assert_eq!(
            unified_scope(&buffer, Position::new(0, 3)),
            Some(ScopeRange::new(0, 5))
        );
    }

    #[test]
    fn unified_scope_falls_back_to_braces() {
        let buffer = lines("fn f() {\n    body();\n}");
        assert_eq!(
            unified_scope(&buffer, Position::new(1, 2)),
            Some(ScopeRange::new(0, 2))
        );
    }

    #[test]
    fn unified_scope_without_structure_is_none() {
        let buffer = lines("just\nwords");
        assert_eq!(unified_scope(&buffer, Position::new(0, 0)), None);
    }
}
