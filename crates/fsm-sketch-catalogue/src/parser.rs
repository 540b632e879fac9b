//! Parser for the catalogue literal.
//!
//! Finds `export const <binding> =` in the source and parses the object
//! literal that follows into an untyped [`Value`] tree. Tokens are pulled
//! from the [`Lexer`] on demand, so parsing stops right after the literal.

use log::{debug, trace};

use crate::{
    error::{Diagnostic, ErrorCode},
    lexer::Lexer,
    parser_types::{Value, ValueKind},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Locate the declaration named `binding` and parse its initializer.
pub(crate) fn parse_declaration(source: &str, binding: &str) -> Result<Value, Diagnostic> {
    let Some(value_offset) = find_declaration(source, binding) else {
        return Err(Diagnostic::error(format!(
            "could not find `export const {binding} = ...` in the catalogue source"
        ))
        .with_code(ErrorCode::E102)
        .with_label(Span::new(0..0), ErrorCode::E102.description())
        .with_help(format!(
            "the catalogue must contain `export const {binding} = {{ ... }};`"
        )));
    };
    debug!(binding, offset = value_offset; "Found catalogue declaration");

    let mut parser = Parser::new(source, value_offset);
    let value = parser.value()?;
    trace!(value:?; "Parsed catalogue literal");

    Ok(value)
}

/// Return the byte offset right after the `=` of the declaration, if present.
fn find_declaration(source: &str, binding: &str) -> Option<usize> {
    source
        .match_indices("export")
        .filter(|(offset, _)| {
            !source[..*offset]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        })
        .find_map(|(offset, _)| declaration_at(source, offset, binding))
}

/// Match `export const|let|var <binding> [: Type] =` starting at `offset`.
fn declaration_at(source: &str, offset: usize, binding: &str) -> Option<usize> {
    let mut lexer = Lexer::new(source, offset);

    let mut next_identifier = || match lexer.next_token() {
        Ok(Some(PositionedToken {
            token: Token::Identifier(name),
            span,
        })) => Some((name, span)),
        _ => None,
    };

    let (export, _) = next_identifier()?;
    let (keyword, _) = next_identifier()?;
    let (name, name_span) = next_identifier()?;
    if export != "export" || !matches!(keyword, "const" | "let" | "var") || name != binding {
        return None;
    }

    // Skip an optional type annotation without lexing it.
    let rest = &source[name_span.end()..];
    let eq = rest.char_indices().find_map(|(i, c)| {
        let next = rest[i + c.len_utf8()..].chars().next();
        (c == '=' && !matches!(next, Some('>' | '='))).then_some(i)
    })?;
    let between = rest[..eq].trim();
    if !between.is_empty() && !between.starts_with(':') {
        return None;
    }

    Some(name_span.end() + eq + 1)
}

/// Recursive-descent parser pulling tokens from the lexer as it goes.
struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, offset: usize) -> Self {
        Self {
            lexer: Lexer::new(source, offset),
        }
    }

    /// Next token, or E101 if the input is exhausted.
    fn expect_token(&mut self, expected: &str) -> Result<PositionedToken<'a>, Diagnostic> {
        match self.lexer.next_token()? {
            Some(token) => Ok(token),
            None => {
                let end = self.lexer.offset();
                Err(Diagnostic::error(format!(
                    "unexpected end of input, expected {expected}"
                ))
                .with_code(ErrorCode::E101)
                .with_label(Span::new(end..end), ErrorCode::E101.description())
                .with_help("the catalogue literal is not closed"))
            }
        }
    }

    fn value(&mut self) -> Result<Value, Diagnostic> {
        let token = self.expect_token("a value")?;
        self.value_from(token)
    }

    fn object(&mut self, open: Span) -> Result<Value, Diagnostic> {
        let mut entries = Vec::new();

        loop {
            let token = self.expect_token("a key or `}`")?;
            let key = match token.token {
                Token::RightBrace => {
                    return Ok(Value::new(ValueKind::Object(entries), open.union(token.span)));
                }
                Token::Identifier(name) => Spanned::new(name.to_string(), token.span),
                Token::StringLiteral(s) => Spanned::new(s, token.span),
                Token::NumberLiteral(n) => Spanned::new(n.to_string(), token.span),
                _ => return Err(unexpected(&token, "a key or `}`")),
            };

            let colon = self.expect_token("`:`")?;
            if colon.token != Token::Colon {
                return Err(unexpected(&colon, "`:`"));
            }

            let value = self.value()?;
            entries.push((key, value));

            let separator = self.expect_token("`,` or `}`")?;
            match separator.token {
                Token::Comma => {}
                Token::RightBrace => {
                    return Ok(Value::new(
                        ValueKind::Object(entries),
                        open.union(separator.span),
                    ));
                }
                _ => return Err(unexpected(&separator, "`,` or `}`")),
            }
        }
    }

    fn array(&mut self, open: Span) -> Result<Value, Diagnostic> {
        let mut items = Vec::new();

        loop {
            // `]` may follow `[` or a trailing comma.
            let token = self.expect_token("a value or `]`")?;
            if token.token == Token::RightBracket {
                return Ok(Value::new(ValueKind::Array(items), open.union(token.span)));
            }
            items.push(self.value_from(token)?);

            let separator = self.expect_token("`,` or `]`")?;
            match separator.token {
                Token::Comma => {}
                Token::RightBracket => {
                    return Ok(Value::new(
                        ValueKind::Array(items),
                        open.union(separator.span),
                    ));
                }
                _ => return Err(unexpected(&separator, "`,` or `]`")),
            }
        }
    }

    /// Parse a value whose first token has already been read.
    fn value_from(&mut self, token: PositionedToken<'a>) -> Result<Value, Diagnostic> {
        let span = token.span;
        let kind = match token.token {
            Token::LeftBrace => return self.object(span),
            Token::LeftBracket => return self.array(span),
            Token::StringLiteral(s) => ValueKind::String(s),
            Token::NumberLiteral(n) => ValueKind::Number(n),
            Token::Identifier("true") => ValueKind::Bool(true),
            Token::Identifier("false") => ValueKind::Bool(false),
            Token::Identifier("null" | "undefined") => ValueKind::Null,
            _ => return Err(unexpected(&token, "a value")),
        };
        Ok(Value::new(kind, span))
    }
}

fn unexpected(token: &PositionedToken<'_>, expected: &str) -> Diagnostic {
    Diagnostic::error(format!(
        "unexpected {}, expected {expected}",
        token.token.describe()
    ))
    .with_code(ErrorCode::E100)
    .with_label(token.span, format!("expected {expected}"))
}
