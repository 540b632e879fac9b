//! Tokens of the object-literal subset accepted in catalogues.

use crate::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token<'a> {
    Identifier(&'a str),
    /// String contents with escapes already resolved.
    StringLiteral(String),
    NumberLiteral(f64),

    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Comma,
    Semicolon,
    Equals,

    Whitespace,
    LineComment(&'a str),
    BlockComment(&'a str),
}

impl Token<'_> {
    /// Whitespace and comments, which the parser never sees.
    pub(crate) fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::LineComment(_) | Token::BlockComment(_)
        )
    }

    /// A short human-readable name for error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Identifier(name) => format!("identifier `{name}`"),
            Token::StringLiteral(_) => "string".to_string(),
            Token::NumberLiteral(_) => "number".to_string(),
            Token::LeftBrace => "`{`".to_string(),
            Token::RightBrace => "`}`".to_string(),
            Token::LeftBracket => "`[`".to_string(),
            Token::RightBracket => "`]`".to_string(),
            Token::Colon => "`:`".to_string(),
            Token::Comma => "`,`".to_string(),
            Token::Semicolon => "`;`".to_string(),
            Token::Equals => "`=`".to_string(),
            Token::Whitespace => "whitespace".to_string(),
            Token::LineComment(_) | Token::BlockComment(_) => "comment".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PositionedToken<'a> {
    pub token: Token<'a>,
    pub span: Span,
}

impl<'a> PositionedToken<'a> {
    pub(crate) fn new(token: Token<'a>, span: Span) -> Self {
        Self { token, span }
    }
}
