//! Plain-text find/replace over a line snapshot.

use crate::scope::Position;

/// One occurrence of the search needle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub line: usize,
    /// Byte column of the match start within its line.
    pub column: usize,
    pub len: usize,
}

/// Collects every occurrence of `needle`, top to bottom, left to right.
/// Case-insensitive mode folds ASCII only.
pub fn find_all<S: AsRef<str>>(lines: &[S], needle: &str, case_sensitive: bool) -> Vec<SearchMatch> {
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for (line_index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let mut from = 0;
        while let Some(column) = find_in(&line[from..], needle, case_sensitive) {
            let column = from + column;
            matches.push(SearchMatch {
                line: line_index,
                column,
                len: needle.len(),
            });
            from = column + needle.len().max(1);
            if from >= line.len() {
                break;
            }
        }
    }
    matches
}

fn find_in(haystack: &str, needle: &str, case_sensitive: bool) -> Option<usize> {
    if case_sensitive {
        return haystack.find(needle);
    }
    let haystack_bytes = haystack.as_bytes();
    let needle_bytes = needle.as_bytes();
    if needle_bytes.len() > haystack_bytes.len() {
        return None;
    }
    (0..=haystack_bytes.len() - needle_bytes.len())
        .filter(|&start| haystack.is_char_boundary(start))
        .find(|&start| {
            haystack_bytes[start..start + needle_bytes.len()].eq_ignore_ascii_case(needle_bytes)
        })
}

/// Index of the first match strictly after `cursor`, wrapping to the start.
pub fn next_match(matches: &[SearchMatch], cursor: Position) -> Option<usize> {
    if matches.is_empty() {
        return None;
    }
    let after = matches.iter().position(|m| {
        m.line > cursor.line || (m.line == cursor.line && m.column > cursor.column)
    });
    Some(after.unwrap_or(0))
}

/// Index of the last match strictly before `cursor`, wrapping to the end.
pub fn prev_match(matches: &[SearchMatch], cursor: Position) -> Option<usize> {
    if matches.is_empty() {
        return None;
    }
    let before = matches
        .iter()
        .rposition(|m| m.line < cursor.line || (m.line == cursor.line && m.column < cursor.column));
    Some(before.unwrap_or(matches.len() - 1))
}

/// Rewrites the matched line with `replacement` spliced over the match.
/// Returns `None` when the match no longer fits the line.
pub fn replace_match<S: AsRef<str>>(
    lines: &[S],
    m: SearchMatch,
    replacement: &str,
) -> Option<String> {
    let line = lines.get(m.line)?.as_ref();
    let end = m.column.checked_add(m.len)?;
    if end > line.len() || !line.is_char_boundary(m.column) || !line.is_char_boundary(end) {
        return None;
    }
    Some(format!("{}{}{}", &line[..m.column], replacement, &line[end..]))
}

/// Replaces every occurrence in `text`, returning the new text and how many
/// replacements were made.
pub fn replace_all(
    text: &str,
    needle: &str,
    replacement: &str,
    case_sensitive: bool,
) -> (String, usize) {
    if needle.is_empty() {
        return (text.to_string(), 0);
    }

    let mut result = String::with_capacity(text.len());
    let mut count = 0;
    let mut rest = text;
    while let Some(at) = find_in(rest, needle, case_sensitive) {
        result.push_str(&rest[..at]);
        result.push_str(replacement);
        rest = &rest[at + needle.len()..];
        count += 1;
    }
    result.push_str(rest);
    (result, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }

    #[test]
    fn finds_matches_in_document_order() {
        let buffer = lines("alpha beta\nbeta alpha beta");
        let matches = find_all(&buffer, "beta", true);
        assert_eq!(
            matches,
            vec![
                SearchMatch { line: 0, column: 6, len: 4 },
                SearchMatch { line: 1, column: 0, len: 4 },
                SearchMatch { line: 1, column: 11, len: 4 },
            ]
        );
    }

    #[test]
    fn empty_needle_finds_nothing() {
        let buffer = lines("anything");
        assert!(find_all(&buffer, "", true).is_empty());
    }

    #[test]
    fn case_insensitive_matching() {
        let buffer = lines("Alpha ALPHA alpha");
        assert_eq!(find_all(&buffer, "alpha", false).len(), 3);
        assert_eq!(find_all(&buffer, "alpha", true).len(), 1);
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let buffer = lines("x\nx\nx");
        let matches = find_all(&buffer, "x", true);
        assert_eq!(next_match(&matches, Position::new(0, 0)), Some(1));
        assert_eq!(next_match(&matches, Position::new(2, 0)), Some(0));
        assert_eq!(prev_match(&matches, Position::new(1, 0)), Some(0));
        assert_eq!(prev_match(&matches, Position::new(0, 0)), Some(2));
    }

    #[test]
    fn replace_match_splices_one_occurrence() {
        let buffer = lines("one two two");
        let matches = find_all(&buffer, "two", true);
        assert_eq!(
            replace_match(&buffer, matches[0], "2").as_deref(),
            Some("one 2 two")
        );
    }

    #[test]
    fn replace_match_rejects_stale_positions() {
        let buffer = lines("short");
        let stale = SearchMatch { line: 0, column: 3, len: 10 };
        assert_eq!(replace_match(&buffer, stale, "x"), None);
        let wrong_line = SearchMatch { line: 5, column: 0, len: 1 };
        assert_eq!(replace_match(&buffer, wrong_line, "x"), None);
    }

    #[test]
    fn replace_all_counts_replacements() {
        let (text, count) = replace_all("one two two", "two", "2", true);
        assert_eq!(text, "one 2 2");
        assert_eq!(count, 2);
    }

    #[test]
    fn replace_all_without_matches_is_identity() {
        let (text, count) = replace_all("nothing here", "xyz", "-", true);
        assert_eq!(text, "nothing here");
        assert_eq!(count, 0);
    }
}
