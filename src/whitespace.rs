//! Standalone-line whitespace elision: the pass that decides which `Newline`/`Text`
//! tokens produced by the lexer must be hidden from the rendered output because they sit
//! on a line whose only non-blank content is a single structural tag.

use crate::token::{Token, TokenKind};

/// Walk `tokens` once, grouping by source line, and flip qualifying `Newline`/`Text`
/// tokens to [`TokenKind::Skip`] in place. Must run before list expansion or partial
/// inlining so the classification reflects the template author's original layout.
pub fn analyze_whitespace(tokens: &mut [Token]) {
    let mut line_start = 0usize;
    let mut index = 0usize;
    while index < tokens.len() {
        let line = tokens[index].line;
        let mut line_end = index;
        while line_end < tokens.len() && tokens[line_end].line == line {
            line_end += 1;
        }
        classify_line(tokens, line_start, line_end);
        line_start = line_end;
        index = line_end;
    }
}

/// Return the `[start, end)` token range sharing `tokens[index]`'s source line. Shared by
/// the partial inliner to decide whether a `Partial` token is standalone.
pub(crate) fn line_bounds(tokens: &[Token], index: usize) -> (usize, usize) {
    let line = tokens[index].line;
    let mut start = index;
    while start > 0 && tokens[start - 1].line == line {
        start -= 1;
    }
    let mut end = index + 1;
    while end < tokens.len() && tokens[end].line == line {
        end += 1;
    }
    (start, end)
}

fn classify_line(tokens: &mut [Token], start: usize, end: usize) {
    let line_tokens = &tokens[start..end];
    let has_interpolation = line_tokens.iter().any(|t| t.kind.is_interpolation());
    let has_partial = line_tokens
        .iter()
        .any(|t| t.kind == TokenKind::Partial);
    let structural_count = line_tokens.iter().filter(|t| t.kind.is_structural()).count();
    let all_blank = line_tokens
        .iter()
        .all(|t| t.kind != TokenKind::Text || t.is_blank_text());

    let newline_eligible =
        line_tokens.len() > 1 && all_blank && !has_interpolation && structural_count >= 1;
    let text_eligible =
        all_blank && !has_interpolation && !has_partial && structural_count == 1;

    for token in &mut tokens[start..end] {
        match token.kind {
            TokenKind::Newline if newline_eligible => token.kind = TokenKind::Skip,
            TokenKind::Text if text_eligible && token.is_blank_text() => {
                token.kind = TokenKind::Skip
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimiters::Delimiters;
    use crate::lexer::Lexer;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input, Delimiters::default()).lex().unwrap()
    }

    #[test]
    fn standalone_comment_line_is_fully_elided() {
        let mut tokens = lex("A\n{{! comment }}\nB\n");
        analyze_whitespace(&mut tokens);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        // line 2's leading Text("") / Comment / trailing Newline should all be Skip-eligible
        // except the Comment token itself, which carries no output regardless of kind.
        assert!(kinds.contains(&TokenKind::Skip));
    }

    #[test]
    fn interpolation_tag_on_a_line_prevents_elision() {
        let mut tokens = lex("{{name}}\n");
        analyze_whitespace(&mut tokens);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Skip));
    }

    #[test]
    fn purely_blank_line_with_no_tag_is_preserved() {
        let mut tokens = lex("a\n   \nb\n");
        analyze_whitespace(&mut tokens);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Skip));
    }

    #[test]
    fn section_open_and_close_on_their_own_lines_are_elided() {
        let mut tokens = lex("{{#xs}}\nx\n{{/xs}}\n");
        analyze_whitespace(&mut tokens);
        let newline_count_skipped = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Skip)
            .count();
        assert!(newline_count_skipped >= 2);
    }
}
