/// The kind of content a [`Token`] carries.
///
/// `SetDelimiter` and `Skip` never reach a consumer looking for renderable content: the
/// former is resolved away by the lexer as soon as it retargets the delimiter table, and
/// the latter is produced by the whitespace analyzer as a no-op marker over a token that
/// was originally `Text` or `Newline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Newline,
    Tag,
    TagLiteral,
    TagLiteralTriple,
    SectionOpen,
    SectionOpenInverted,
    SectionClose,
    Comment,
    Partial,
    SetDelimiter,
    Skip,
    Eof,
}

impl TokenKind {
    pub fn is_interpolation(self) -> bool {
        matches!(
            self,
            TokenKind::Tag | TokenKind::TagLiteral | TokenKind::TagLiteralTriple
        )
    }

    pub fn is_structural(self) -> bool {
        matches!(
            self,
            TokenKind::SectionOpen
                | TokenKind::SectionOpenInverted
                | TokenKind::SectionClose
                | TokenKind::Comment
                | TokenKind::SetDelimiter
        )
    }
}

/// A single lexed unit of a template.
///
/// `iters` and `replay_to` are only ever meaningful on a `SectionClose` token that closes
/// a list section: they are mutated in place by the interpreter as it replays the section
/// body once per list element, rather than the interpreter copying the body per iteration.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: u32,
    pub start_column: u32,
    pub end_column: u32,
    pub iters: usize,
    pub replay_to: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: String, line: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            kind,
            value,
            line,
            start_column,
            end_column,
            iters: 0,
            replay_to: 0,
        }
    }

    pub fn is_blank_text(&self) -> bool {
        self.kind == TokenKind::Text
            && self
                .value
                .bytes()
                .all(|b| b == b' ' || b == b'\t' || b == b'\r')
    }
}
