use crate::rules::{rules, TokenKind};
use std::ops::Range;

/// Carry-over state between consecutive lines. The only construct that
/// spans lines is the `/* ... */` block comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Default,
    InComment,
}

/// One highlighted byte range of a line. Spans are non-overlapping, sorted,
/// and cover the whole line including `Text` gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub range: Range<usize>,
    pub kind: TokenKind,
}

/// Highlights a single line given the block state left by the previous
/// line. Returns the styled spans and the state to feed into the next line.
pub fn highlight_line(text: &str, prev: BlockState) -> (Vec<StyledSpan>, BlockState) {
    let mut kinds = vec![TokenKind::Text; text.len()];

    for rule in rules() {
        for captures in rule.pattern.captures_iter(text) {
            let Some(group) = captures.get(rule.capture) else {
                continue;
            };
            paint(&mut kinds, group.range(), rule.kind);
        }
    }

    let next = overlay_block_comments(text, prev, &mut kinds);

    (coalesce(text, &kinds), next)
}

/// Splits `text` into `(slice, kind)` fragments from a span list produced
/// by [`highlight_line`].
pub fn fragments<'a>(
    text: &'a str,
    spans: &'a [StyledSpan],
) -> impl Iterator<Item = (&'a str, TokenKind)> + 'a {
    spans
        .iter()
        .map(move |span| (&text[span.range.clone()], span.kind))
}

fn paint(kinds: &mut [TokenKind], range: Range<usize>, kind: TokenKind) {
    for slot in &mut kinds[range] {
        *slot = kind;
    }
}

/// Applies `/* ... */` regions on top of everything the rules painted.
/// The scan is literal and does not know about string contents.
fn overlay_block_comments(
    text: &str,
    prev: BlockState,
    kinds: &mut [TokenKind],
) -> BlockState {
    let bytes = text.as_bytes();
    let mut cursor = 0;
    let mut state = prev;

    loop {
        match state {
            BlockState::InComment => {
                match find_from(bytes, cursor, b"*/") {
                    Some(end) => {
                        paint(kinds, cursor..end + 2, TokenKind::Comment);
                        cursor = end + 2;
                        state = BlockState::Default;
                    }
                    None => {
                        paint(kinds, cursor..bytes.len(), TokenKind::Comment);
                        return BlockState::InComment;
                    }
                }
            }
            BlockState::Default => match find_from(bytes, cursor, b"/*") {
                Some(start) => {
                    cursor = start;
                    state = BlockState::InComment;
                }
                None => return BlockState::Default,
            },
        }
    }
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

/// Merges the per-byte kind array into contiguous spans, splitting only on
/// kind changes. Span boundaries always fall on character boundaries
/// because every rule matches whole characters.
fn coalesce(text: &str, kinds: &[TokenKind]) -> Vec<StyledSpan> {
    let mut spans = Vec::new();
    if text.is_empty() {
        return spans;
    }

    let mut start = 0;
    let mut current = kinds[0];
    for (index, kind) in kinds.iter().enumerate().skip(1) {
        if *kind != current {
            spans.push(StyledSpan {
                range: start..index,
                kind: current,
            });
            start = index;
            current = *kind;
        }
    }
    spans.push(StyledSpan {
        range: start..text.len(),
        kind: current,
    });
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_at(spans: &[StyledSpan], offset: usize) -> TokenKind {
        spans
            .iter()
            .find(|span| span.range.contains(&offset))
            .map(|span| span.kind)
            .unwrap()
    }

    #[test]
    fn empty_line_yields_no_spans() {
        let (spans, next) = highlight_line("", BlockState::Default);
        assert!(spans.is_empty());
        assert_eq!(next, BlockState::Default);
    }

    #[test]
    fn spans_cover_the_whole_line() {
        let line = "int count = 42; // note";
        let (spans, _) = highlight_line(line, BlockState::Default);
        assert_eq!(spans.first().unwrap().range.start, 0);
        assert_eq!(spans.last().unwrap().range.end, line.len());
        for pair in spans.windows(2) {
            assert_eq!(pair[0].range.end, pair[1].range.start);
        }
    }

    #[test]
    fn keywords_numbers_and_strings() {
        let line = r#"return "hi" + 42;"#;
        let (spans, _) = highlight_line(line, BlockState::Default);
        assert_eq!(kind_at(&spans, 0), TokenKind::Keyword);
        assert_eq!(kind_at(&spans, line.find('"').unwrap()), TokenKind::String);
        assert_eq!(kind_at(&spans, line.find("42").unwrap()), TokenKind::Number);
    }

    #[test]
    fn variable_rule_paints_only_the_name() {
        let line = "int counter = 0;";
        let (spans, _) = highlight_line(line, BlockState::Default);
        assert_eq!(kind_at(&spans, 0), TokenKind::Keyword);
        assert_eq!(kind_at(&spans, 4), TokenKind::Variable);
    }

    #[test]
    fn method_rule_paints_the_callee() {
        let line = "total = compute(a, b);";
        let (spans, _) = highlight_line(line, BlockState::Default);
        let at = line.find("compute").unwrap();
        assert_eq!(kind_at(&spans, at), TokenKind::Method);
        // The trailing parenthesis itself stays unstyled text.
        assert_eq!(kind_at(&spans, line.find('(').unwrap()), TokenKind::Text);
    }

    #[test]
    fn later_rules_overpaint_earlier_ones() {
        // The parameter rule runs last and repaints what falls inside
        // the parentheses, numbers included.
        let line = "draw(12)";
        let (spans, _) = highlight_line(line, BlockState::Default);
        assert_eq!(kind_at(&spans, line.find("12").unwrap()), TokenKind::Parameter);
    }

    #[test]
    fn line_comment_runs_to_end_of_line() {
        let line = "x = 1; // trailing note";
        let (spans, _) = highlight_line(line, BlockState::Default);
        let at = line.find("//").unwrap();
        for offset in at..line.len() {
            assert_eq!(kind_at(&spans, offset), TokenKind::Comment);
        }
    }

    #[test]
    fn block_comment_carries_state_across_lines() {
        let (spans, state) = highlight_line("before /* opening", BlockState::Default);
        assert_eq!(state, BlockState::InComment);
        assert_eq!(kind_at(&spans, 0), TokenKind::Text);
        assert_eq!(kind_at(&spans, 7), TokenKind::Comment);

        let (spans, state) = highlight_line("still inside int x = 1;", state);
        assert_eq!(state, BlockState::InComment);
        assert!(spans.iter().all(|span| span.kind == TokenKind::Comment));

        let (spans, state) = highlight_line("done */ int x = 1;", state);
        assert_eq!(state, BlockState::Default);
        assert_eq!(kind_at(&spans, 0), TokenKind::Comment);
        assert_eq!(kind_at(&spans, 8), TokenKind::Keyword);
    }

    #[test]
    fn block_comment_within_one_line() {
        let line = "a /* b */ int c = 1;";
        let (spans, state) = highlight_line(line, BlockState::Default);
        assert_eq!(state, BlockState::Default);
        assert_eq!(kind_at(&spans, line.find("/*").unwrap()), TokenKind::Comment);
        assert_eq!(kind_at(&spans, line.find("int").unwrap()), TokenKind::Keyword);
    }

    #[test]
    fn fragments_reassemble_the_line() {
        let line = "if (ready) { go(); }";
        let (spans, _) = highlight_line(line, BlockState::Default);
        let rebuilt: String = fragments(line, &spans).map(|(slice, _)| slice).collect();
        assert_eq!(rebuilt, line);
    }
}
