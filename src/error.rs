use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unbalanced tags: a tag opened at line {line}, column {column} was never closed")]
    UnbalancedTags { line: u32, column: u32 },
    #[error("malformed set-delimiter tag at line {line}, column {column}: expected exactly two whitespace-separated delimiters")]
    MalformedSetDelimiter { line: u32, column: u32 },
    #[error("section '{name}' opened at line {line} has no matching closing tag")]
    UnclosedSection { name: String, line: u32 },
    #[error("closing tag '{name}' at line {line} does not match the currently open section")]
    MismatchedSectionClose { name: String, line: u32 },
    #[error("render exceeded the maximum context-frame depth of {limit}")]
    MaxDepthExceeded { limit: usize },
}

pub type RenderResult<T> = Result<T, RenderError>;
