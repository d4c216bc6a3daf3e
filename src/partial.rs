//! Partial inlining: splicing a named sub-template's tokens into the host stream at the
//! point a `{{>name}}` tag is reached, propagating the host's indentation when the tag is
//! standalone on its own line.

use std::collections::HashMap;

use crate::delimiters::Delimiters;
use crate::error::RenderResult;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::whitespace::line_bounds;

/// Splice the tokens of the partial named by `tokens[index]` into `tokens` immediately
/// after it. A missing partial name is a no-op (nothing is emitted; a diagnostic is
/// logged), matching the degrade-to-empty behavior the interpreter applies to every other
/// resolution miss.
pub fn inline_partial(
    tokens: &mut Vec<Token>,
    index: usize,
    partials: &HashMap<String, String>,
    delimiters: &Delimiters,
) -> RenderResult<usize> {
    let name = tokens[index].value.clone();
    let Some(body) = partials.get(&name) else {
        log::warn!("partial '{name}' was not found in the supplied partial set; rendering as empty");
        return Ok(0);
    };

    let indent = standalone_indent(tokens, index);
    let mut partial_tokens = Lexer::new(body, delimiters.clone()).lex()?;
    partial_tokens.pop(); // the partial's own EOF marker is not needed once spliced in

    if let Some(prefix) = &indent {
        reindent(&mut partial_tokens, prefix);
    }

    let inserted = partial_tokens.len();
    let insert_at = index + 1;
    for (offset, token) in partial_tokens.into_iter().enumerate() {
        tokens.insert(insert_at + offset, token);
    }
    Ok(inserted)
}

/// A `Partial` is standalone under the same conditions as a structural tag (§4.2), with
/// itself counted toward the line's structural-tag tally. When standalone and immediately
/// preceded by blank text on the same line, that blank text is the indent to propagate.
fn standalone_indent(tokens: &[Token], index: usize) -> Option<String> {
    let (start, end) = line_bounds(tokens, index);
    let line = &tokens[start..end];

    let has_interpolation = line.iter().any(|t| t.kind.is_interpolation());
    let structural_count = line
        .iter()
        .filter(|t| t.kind.is_structural() || t.kind == TokenKind::Partial)
        .count();
    let all_blank = line
        .iter()
        .all(|t| t.kind != TokenKind::Text || t.is_blank_text());

    if has_interpolation || !all_blank || structural_count != 1 {
        return None;
    }

    if index > start {
        let prev = &tokens[index - 1];
        if prev.kind == TokenKind::Text && prev.is_blank_text() && !prev.value.is_empty() {
            return Some(prev.value.clone());
        }
    }
    None
}

/// Insert a copy of `prefix` at the start of every line inside `tokens` except the first.
fn reindent(tokens: &mut Vec<Token>, prefix: &str) {
    if tokens.is_empty() {
        return;
    }
    let mut result = Vec::with_capacity(tokens.len() + 4);
    let mut at_line_start = false;
    for token in tokens.drain(..) {
        if at_line_start {
            let line = token.line;
            result.push(Token::new(
                TokenKind::Text,
                prefix.to_string(),
                line,
                0,
                prefix.len() as u32,
            ));
            at_line_start = false;
        }
        let is_newline = token.kind == TokenKind::Newline;
        result.push(token);
        if is_newline {
            at_line_start = true;
        }
    }
    *tokens = result;
}
