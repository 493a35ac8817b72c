use std::fmt;

/// What went wrong while turning DSL text into a tree: the grammar
/// rejected the text, or a tag reference failed to resolve against the
/// dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Syntax,
    UnknownTag,
}

/// Errors produced when parsing condition DSL input.
#[derive(Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
    message: String,
}

impl ParseError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::Syntax,
            message: message.into(),
        }
    }

    pub(crate) fn unknown_tag(token: &str) -> Self {
        Self {
            kind: ParseErrorKind::UnknownTag,
            message: format!("unknown tag '{token}'"),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}
