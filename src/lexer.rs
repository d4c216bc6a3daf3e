//! The Mustache tag lexer.
//!
//! Scans a template once, left to right, producing a flat token sequence. Six tag sigils
//! share one dispatch loop; encountering `{{=...=}}` mutates the active [`Delimiters`] in
//! place so the remainder of the scan uses the new sigils (see [`Lexer::consume_set_delimiter`]).

use crate::delimiters::Delimiters;
use crate::error::{RenderError, RenderResult};
use crate::token::{Token, TokenKind};

/// A saved lexer position, restored by [`Lexer::rewind`] when a speculative scan
/// (currently only the set-delimiter interior) turns out not to match what was expected.
struct LexerCheckpoint {
    position: usize,
    line: u32,
    line_start: usize,
}

pub struct Lexer<'a> {
    text: &'a str,
    position: usize,
    line: u32,
    line_start: usize,
    delimiters: Delimiters,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, delimiters: Delimiters) -> Self {
        Self {
            text,
            position: 0,
            line: 1,
            line_start: 0,
            delimiters,
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.text.len()
    }

    fn current_column(&self) -> u32 {
        (self.position - self.line_start) as u32
    }

    fn current_byte(&self) -> u8 {
        self.text.as_bytes()[self.position]
    }

    fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    fn checkpoint(&self) -> LexerCheckpoint {
        LexerCheckpoint {
            position: self.position,
            line: self.line,
            line_start: self.line_start,
        }
    }

    fn rewind(&mut self, checkpoint: LexerCheckpoint) {
        self.position = checkpoint.position;
        self.line = checkpoint.line;
        self.line_start = checkpoint.line_start;
    }

    fn advance_by(&mut self, n: usize) {
        self.position += n;
    }

    /// Consume plain text up to (but not including) the next byte that could possibly
    /// start a newline or a tag, scanning with `memchr` rather than a byte-at-a-time loop.
    fn consume_plain_text_span(&self) -> usize {
        let open_byte = self.delimiters.open.as_bytes()[0];
        match memchr::memchr2(b'\n', open_byte, self.rest().as_bytes()) {
            Some(0) => 1,
            Some(n) => n,
            None => self.rest().len(),
        }
    }

    /// Try to match one of the tag-opening sigils at the current position. Order matters:
    /// the triple-open sigil must be tried before the plain double-open, since the latter
    /// is a prefix of the former.
    fn match_open(&self) -> Option<TokenKind> {
        let d = &self.delimiters;
        if self.peek_str(&d.open_triple()) {
            Some(TokenKind::TagLiteralTriple)
        } else if self.peek_str(&d.section_open()) {
            Some(TokenKind::SectionOpen)
        } else if self.peek_str(&d.section_close()) {
            Some(TokenKind::SectionClose)
        } else if self.peek_str(&d.inverted()) {
            Some(TokenKind::SectionOpenInverted)
        } else if self.peek_str(&d.ampersand()) {
            Some(TokenKind::TagLiteral)
        } else if self.peek_str(&d.comment()) {
            Some(TokenKind::Comment)
        } else if self.peek_str(&d.partial()) {
            Some(TokenKind::Partial)
        } else if self.peek_str(&d.set_delimiter_open()) {
            Some(TokenKind::SetDelimiter)
        } else if self.peek_str(&d.open) {
            Some(TokenKind::Tag)
        } else {
            None
        }
    }

    fn peek_str(&self, sigil: &str) -> bool {
        self.rest().starts_with(sigil)
    }

    fn open_sigil_len(&self, kind: TokenKind) -> usize {
        let d = &self.delimiters;
        match kind {
            TokenKind::TagLiteralTriple => d.open_triple().len(),
            TokenKind::SectionOpen => d.section_open().len(),
            TokenKind::SectionClose => d.section_close().len(),
            TokenKind::SectionOpenInverted => d.inverted().len(),
            TokenKind::TagLiteral => d.ampersand().len(),
            TokenKind::Comment => d.comment().len(),
            TokenKind::Partial => d.partial().len(),
            TokenKind::SetDelimiter => d.set_delimiter_open().len(),
            TokenKind::Tag => d.open.len(),
            _ => unreachable!("only tag-opening kinds reach open_sigil_len"),
        }
    }

    fn close_sigil(&self, kind: TokenKind) -> String {
        match kind {
            TokenKind::TagLiteralTriple => self.delimiters.close_triple(),
            TokenKind::SetDelimiter => self.delimiters.set_delimiter_close(),
            _ => self.delimiters.close.clone(),
        }
    }

    /// Scan and consume the entire template, returning the flat token sequence.
    pub fn lex(mut self) -> RenderResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut open_kind = TokenKind::Text;
        let mut token_start = 0usize;
        let mut token_start_line = self.line;
        let mut token_start_column = self.current_column();

        while !self.is_eof() {
            if open_kind != TokenKind::Comment && self.current_byte() == b'\n' {
                self.flush_text_or_tag(
                    &mut tokens,
                    open_kind,
                    token_start,
                    token_start_line,
                    token_start_column,
                )?;
                let line = self.line;
                let column = self.current_column();
                tokens.push(Token::new(
                    TokenKind::Newline,
                    "\n".to_string(),
                    line,
                    column,
                    column + 1,
                ));
                self.advance_by(1);
                self.line += 1;
                self.line_start = self.position;
                open_kind = TokenKind::Text;
                token_start = self.position;
                token_start_line = self.line;
                token_start_column = self.current_column();
                continue;
            }

            if open_kind == TokenKind::Text {
                if let Some(kind) = self.match_open() {
                    if self.position > token_start {
                        tokens.push(Token::new(
                            TokenKind::Text,
                            self.text[token_start..self.position].to_string(),
                            token_start_line,
                            token_start_column,
                            self.current_column(),
                        ));
                    }
                    self.advance_by(self.open_sigil_len(kind));
                    open_kind = kind;
                    token_start = self.position;
                    token_start_line = self.line;
                    token_start_column = self.current_column();
                    continue;
                }
                let span = self.consume_plain_text_span();
                self.advance_by(span);
                continue;
            }

            // Inside a tag: look for its matching close sigil.
            let close = self.close_sigil(open_kind);
            if self.peek_str(&close) {
                let raw = &self.text[token_start..self.position];
                if open_kind == TokenKind::SetDelimiter {
                    self.apply_set_delimiter(raw, token_start_line, token_start_column)?;
                    self.advance_by(close.len());
                    tokens.push(Token::new(
                        TokenKind::SetDelimiter,
                        raw.trim().to_string(),
                        token_start_line,
                        token_start_column,
                        self.current_column(),
                    ));
                } else {
                    let value: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
                    self.advance_by(close.len());
                    tokens.push(Token::new(
                        open_kind,
                        value,
                        token_start_line,
                        token_start_column,
                        self.current_column(),
                    ));
                }
                open_kind = TokenKind::Text;
                token_start = self.position;
                token_start_line = self.line;
                token_start_column = self.current_column();
                continue;
            }

            // A raw newline inside a still-open Comment does not end the token (comments
            // may span lines), but line/column bookkeeping must still advance past it.
            if self.current_byte() == b'\n' {
                self.advance_by(1);
                self.line += 1;
                self.line_start = self.position;
            } else {
                self.advance_by(1);
            }
        }

        if open_kind != TokenKind::Text {
            return Err(RenderError::UnbalancedTags {
                line: token_start_line,
                column: token_start_column,
            });
        }
        if self.position > token_start {
            tokens.push(Token::new(
                TokenKind::Text,
                self.text[token_start..self.position].to_string(),
                token_start_line,
                token_start_column,
                self.current_column(),
            ));
        }
        tokens.push(Token::new(
            TokenKind::Eof,
            String::new(),
            self.line,
            self.current_column(),
            self.current_column(),
        ));

        validate_section_balance(&tokens)?;
        Ok(tokens)
    }

    fn flush_text_or_tag(
        &self,
        tokens: &mut Vec<Token>,
        open_kind: TokenKind,
        token_start: usize,
        line: u32,
        column: u32,
    ) -> RenderResult<()> {
        if open_kind != TokenKind::Text {
            return Err(RenderError::UnbalancedTags { line, column });
        }
        if self.position > token_start {
            tokens.push(Token::new(
                TokenKind::Text,
                self.text[token_start..self.position].to_string(),
                line,
                column,
                self.current_column(),
            ));
        }
        Ok(())
    }

    /// Parse and apply a `{{=NEW OPEN NEW CLOSE=}}` retarget. Speculative: if the interior
    /// does not split into exactly two non-whitespace parts, the checkpoint lets the caller
    /// report a precise error location without having mutated lexer state.
    fn apply_set_delimiter(&mut self, raw: &str, line: u32, column: u32) -> RenderResult<()> {
        let checkpoint = self.checkpoint();
        let mut parts = raw.split_ascii_whitespace();
        let (Some(open), Some(close), None) = (parts.next(), parts.next(), parts.next()) else {
            self.rewind(checkpoint);
            return Err(RenderError::MalformedSetDelimiter { line, column });
        };
        if open.is_empty() || close.is_empty() {
            self.rewind(checkpoint);
            return Err(RenderError::MalformedSetDelimiter { line, column });
        }
        self.delimiters = Delimiters::new(open, close);
        Ok(())
    }
}

/// Verify every section open has a matching, correctly-named close, in lex order.
fn validate_section_balance(tokens: &[Token]) -> RenderResult<()> {
    let mut stack: Vec<(&str, u32)> = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::SectionOpen | TokenKind::SectionOpenInverted => {
                stack.push((token.value.as_str(), token.line));
            }
            TokenKind::SectionClose => match stack.pop() {
                Some((name, _)) if name == token.value => {}
                Some((name, line)) => {
                    let _ = name;
                    return Err(RenderError::MismatchedSectionClose {
                        name: token.value.clone(),
                        line,
                    });
                }
                None => {
                    return Err(RenderError::MismatchedSectionClose {
                        name: token.value.clone(),
                        line: token.line,
                    })
                }
            },
            _ => {}
        }
    }
    if let Some((name, line)) = stack.pop() {
        return Err(RenderError::UnclosedSection {
            name: name.to_string(),
            line,
        });
    }
    Ok(())
}
