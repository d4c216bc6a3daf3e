//! The context-stack interpreter: walks the (whitespace-analyzed) token sequence,
//! resolving names against a stack of data frames, replaying section bodies in place for
//! list iteration, and inlining partials as they're reached.

use std::collections::HashMap;

use crate::context::{ContextFrame, ContextStack};
use crate::delimiters::Delimiters;
use crate::error::{RenderError, RenderResult};
use crate::partial;
use crate::token::{Token, TokenKind};
use crate::value::{DataAccess, DataType};

/// Frame-push ceiling used as the safety guard against cyclic or pathologically large
/// input (§3/§5/§9 of the design notes): a render that would push more context frames
/// than this is aborted rather than left to run away.
pub const DEFAULT_MAX_DEPTH: usize = 100_000;

pub struct Interpreter<V> {
    tokens: Vec<Token>,
    cursor: usize,
    stack: ContextStack<V>,
    partials: HashMap<String, String>,
    delimiters: Delimiters,
    depth_limit: usize,
    frame_pushes: usize,
}

impl<V: DataAccess + Clone> Interpreter<V> {
    /// `delimiters` is the table active at the *start* of the token stream — i.e. whatever
    /// `Template` was parsed with — so that a `{{>partial}}` reached before any in-template
    /// `{{=...=}}` retarget still lexes with the caller's starting sigils rather than the
    /// hardcoded `{{ }}` default.
    pub fn new(
        tokens: Vec<Token>,
        root: V,
        partials: HashMap<String, String>,
        delimiters: Delimiters,
        depth_limit: usize,
    ) -> Self {
        Self {
            tokens,
            cursor: 0,
            stack: ContextStack::new(root),
            partials,
            delimiters,
            depth_limit,
            frame_pushes: 0,
        }
    }

    #[cfg(feature = "debug-tracing")]
    fn trace_step(&self) {
        log::trace!(
            "cursor={} kind={:?} stack_depth={} frame_pushes={}",
            self.cursor,
            self.tokens[self.cursor].kind,
            self.stack.depth(),
            self.frame_pushes
        );
    }

    pub fn run(mut self) -> RenderResult<String> {
        let mut out = String::with_capacity(self.tokens.len() * 8);
        loop {
            if self.cursor >= self.tokens.len() {
                break;
            }
            #[cfg(feature = "debug-tracing")]
            self.trace_step();
            match self.tokens[self.cursor].kind {
                TokenKind::Eof => break,
                TokenKind::Skip | TokenKind::Comment => {
                    self.cursor += 1;
                }
                TokenKind::SetDelimiter => {
                    self.apply_set_delimiter();
                    self.cursor += 1;
                }
                TokenKind::Text | TokenKind::Newline => {
                    if self.stack.top_is_truthy() {
                        out.push_str(&self.tokens[self.cursor].value);
                    }
                    self.cursor += 1;
                }
                TokenKind::Tag | TokenKind::TagLiteral | TokenKind::TagLiteralTriple => {
                    self.emit_interpolation(&mut out);
                    self.cursor += 1;
                }
                TokenKind::SectionOpen | TokenKind::SectionOpenInverted => {
                    self.open_section()?;
                    self.cursor += 1;
                }
                TokenKind::SectionClose => {
                    self.close_section();
                }
                TokenKind::Partial => {
                    self.do_partial()?;
                    self.cursor += 1;
                }
            }
        }
        Ok(out)
    }

    fn apply_set_delimiter(&mut self) {
        let raw = self.tokens[self.cursor].value.clone();
        let mut parts = raw.split_ascii_whitespace();
        if let (Some(open), Some(close)) = (parts.next(), parts.next()) {
            self.delimiters = Delimiters::new(open, close);
        }
    }

    fn emit_interpolation(&mut self, out: &mut String) {
        if !self.stack.top_is_truthy() {
            return;
        }
        let kind = self.tokens[self.cursor].kind;
        let name = self.tokens[self.cursor].value.clone();
        match self.stack.resolve(&name) {
            Some(value) => {
                let rendered = value.to_render_string();
                if kind == TokenKind::Tag {
                    push_escaped(out, &rendered);
                } else {
                    out.push_str(&rendered);
                }
            }
            None => {
                log::debug!(
                    "name '{name}' did not resolve against the current context stack (innermost: {})",
                    self.stack.top().label
                );
            }
        }
    }

    fn find_matching_close(&self, open_index: usize) -> usize {
        let mut depth = 0usize;
        let mut i = open_index + 1;
        loop {
            match self.tokens[i].kind {
                TokenKind::SectionOpen | TokenKind::SectionOpenInverted => depth += 1,
                TokenKind::SectionClose => {
                    if depth == 0 {
                        return i;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            i += 1;
        }
    }

    fn push_frame(&mut self, data: V, label: String) -> RenderResult<()> {
        self.frame_pushes += 1;
        if self.frame_pushes > self.depth_limit {
            return Err(RenderError::MaxDepthExceeded {
                limit: self.depth_limit,
            });
        }
        self.stack.push(ContextFrame::new(data, label));
        Ok(())
    }

    fn open_section(&mut self) -> RenderResult<()> {
        let kind = self.tokens[self.cursor].kind;
        let name = self.tokens[self.cursor].value.clone();
        let open_index = self.cursor;
        let close_index = self.find_matching_close(open_index);
        let resolved = self.stack.resolve(&name);

        if kind == TokenKind::SectionOpenInverted {
            let truthy = resolved.as_ref().map(|v| v.is_truthy()).unwrap_or(false);
            self.push_frame(V::bool_value(!truthy), format!("^{name}"))?;
            return Ok(());
        }

        let data_type = resolved
            .as_ref()
            .map(|v| v.type_of())
            .unwrap_or(DataType::Nil);

        match data_type {
            DataType::Nil => {
                log::debug!("section '{name}' did not resolve; rendering its body as falsey");
                self.push_frame(V::bool_value(false), name)?;
            }
            DataType::List => {
                let list = resolved.expect("List type implies a resolved value");
                let len = list.length_of();
                if len == 0 {
                    self.tokens.drain(open_index + 1..close_index);
                    self.tokens[open_index + 1].kind = TokenKind::Skip;
                } else {
                    self.tokens[close_index].iters = len - 1;
                    self.tokens[close_index].replay_to = open_index + 1;
                    for i in (0..len).rev() {
                        let element = list
                            .index_at(i)
                            .expect("index within bounds of a List of this length");
                        self.push_frame(element, format!("{name}[{i}]"))?;
                    }
                }
            }
            DataType::Map | DataType::Struct | DataType::Value => {
                let value = resolved.expect("non-Nil type implies a resolved value");
                self.push_frame(value, name)?;
            }
        }
        Ok(())
    }

    fn close_section(&mut self) {
        self.stack.pop();
        let token = &mut self.tokens[self.cursor];
        if token.iters > 0 {
            token.iters -= 1;
            self.cursor = token.replay_to;
        } else {
            self.cursor += 1;
        }
    }

    /// Inline the partial named at the cursor, then flip the `Partial` token itself to
    /// `Skip`. Without this, a partial inside a replayed list-section body would be
    /// re-spliced on every iteration: the cursor revisits the same token index each time
    /// `close_section` rewinds, but unlike plain text/tag tokens a `Partial` mutates the
    /// token stream as a side effect of being visited, so it must become inert after its
    /// one-time expansion. Leaving it `Partial` would duplicate the spliced body once per
    /// remaining iteration and interleave stale copies from earlier iterations.
    fn do_partial(&mut self) -> RenderResult<()> {
        partial::inline_partial(&mut self.tokens, self.cursor, &self.partials, &self.delimiters)?;
        self.tokens[self.cursor].kind = TokenKind::Skip;
        Ok(())
    }
}

/// HTML-escape exactly the four characters Mustache's default `{{tag}}` interpolation
/// escapes: `&` first, so a literal `&amp;` in the source is never doubled.
fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}
