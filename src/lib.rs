pub use context::{ContextFrame, ContextStack};
pub use delimiters::Delimiters;
pub use error::{RenderError, RenderResult};
pub use interpreter::DEFAULT_MAX_DEPTH;
pub use token::{Token, TokenKind};
pub use value::{DataAccess, DataType, JsonValue};

mod context;
mod delimiters;
mod error;
mod interpreter;
mod lexer;
mod partial;
mod token;
mod value;
mod whitespace;

use std::collections::HashMap;

use interpreter::Interpreter;
use lexer::Lexer;
use whitespace::analyze_whitespace;

/// A lexed and whitespace-analyzed template, ready to render against any number of
/// contexts. Parsing and standalone-line elision (§4.1, §4.2) happen once in
/// [`Template::parse`]; list-section expansion and partial inlining are per-render, since
/// they depend on the data supplied to that render and mutate the token sequence in place.
pub struct Template {
    tokens: Vec<Token>,
    delimiters: Delimiters,
    partials: HashMap<String, String>,
    depth_limit: usize,
}

impl Template {
    /// Lex `source` with the default `{{ }}` delimiter table and run the whitespace
    /// analyzer over the result.
    pub fn parse(source: &str) -> RenderResult<Self> {
        Self::parse_with_delimiters(source, Delimiters::default())
    }

    /// Lex `source` with a caller-supplied starting delimiter table. A `{{=...=}}` tag
    /// inside the template still retargets scanning from that point forward (§9); this only
    /// changes the table the lexer starts with.
    pub fn parse_with_delimiters(source: &str, delimiters: Delimiters) -> RenderResult<Self> {
        let mut tokens = Lexer::new(source, delimiters.clone()).lex()?;
        analyze_whitespace(&mut tokens);
        Ok(Self {
            tokens,
            delimiters,
            partials: HashMap::new(),
            depth_limit: DEFAULT_MAX_DEPTH,
        })
    }

    /// Attach the named partials this template may `{{>...}}` during rendering.
    pub fn with_partials(mut self, partials: HashMap<String, String>) -> Self {
        self.partials = partials;
        self
    }

    /// Attach a single named partial, in addition to any already set.
    pub fn with_partial(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.partials.insert(name.into(), body.into());
        self
    }

    /// Override the frame-push ceiling (§3, §9) guarding against runaway list iteration or
    /// recursive partials. Defaults to [`DEFAULT_MAX_DEPTH`].
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.depth_limit = limit;
        self
    }

    /// Render this template against `data`. The parsed token sequence is cloned per call:
    /// list expansion and partial inlining mutate it in place (§3), and a `Template` must
    /// remain reusable across renders with different data.
    pub fn render<V: DataAccess + Clone>(&self, data: &V) -> RenderResult<String> {
        Interpreter::new(
            self.tokens.clone(),
            data.clone(),
            self.partials.clone(),
            self.delimiters.clone(),
            self.depth_limit,
        )
        .run()
    }
}

/// Parse and render `template` once against `data` and `partials`, generic over any
/// `DataAccess` implementation. Prefer [`Template::parse`] directly when rendering the same
/// template repeatedly, to avoid re-lexing and re-analyzing whitespace on every call.
pub fn render<V: DataAccess + Clone>(
    template: &str,
    data: &V,
    partials: &HashMap<String, String>,
) -> RenderResult<String> {
    Template::parse(template)?
        .with_partials(partials.clone())
        .render(data)
}

/// Convenience entry point for the common case of rendering against `serde_json::Value`
/// data, wrapping it in [`JsonValue`].
pub fn render_json(
    template: &str,
    data: &serde_json::Value,
    partials: &HashMap<String, String>,
) -> RenderResult<String> {
    render(template, &JsonValue(data.clone()), partials)
}
