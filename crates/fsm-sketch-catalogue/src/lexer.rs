//! Lexical analyzer for catalogue source text.
//!
//! The lexer is pulled one token at a time by the parser, so only the
//! catalogue literal itself is ever lexed. Whatever TypeScript surrounds it
//! (imports, types, template strings) never reaches these rules.

use std::char;

use winnow::{
    Parser as _,
    ascii::{float, multispace1},
    combinator::{alt, cut_err, delimited, not, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Parse the part of a unicode escape after the backslash: `u{X..}` or `uXXXX`.
fn string_escape_unicode(input: &mut Input<'_>, escape_start: usize) -> IResult<char> {
    preceded(
        'u',
        cut_err(
            alt((
                delimited('{', take_while(1..=6, |c: char| c.is_ascii_hexdigit()), '}'),
                take_while(4..=4, |c: char| c.is_ascii_hexdigit()),
            ))
            .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
            .context(LexerDiagnostic {
                code: ErrorCode::E004,
                message: "invalid unicode escape",
                help: Some("use `\\uXXXX` or `\\u{X}` with at most 6 hex digits and a valid codepoint"),
                start: escape_start,
            }),
        ),
    )
    .parse_next(input)
}

/// Parse a standard escape character after the backslash.
fn string_escape_char(input: &mut Input<'_>) -> IResult<char> {
    one_of(['n', 'r', 't', 'b', 'f', '\\', '/', '\'', '"', '0'])
        .map(|c| match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            '0' => '\0',
            other => other,
        })
        .parse_next(input)
}

/// Parse an escape sequence starting with a backslash.
fn string_escape(input: &mut Input<'_>) -> IResult<char> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    match string_escape_unicode(input, escape_start) {
        Ok(ch) => return Ok(ch),
        Err(ErrMode::Backtrack(_)) => {}
        Err(e) => return Err(e),
    }

    if let Ok(ch) = string_escape_char(input) {
        return Ok(ch);
    }

    Err(ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        LexerDiagnostic {
            code: ErrorCode::E003,
            message: "invalid escape sequence",
            help: Some(
                "valid escapes: `\\n`, `\\r`, `\\t`, `\\b`, `\\f`, `\\\\`, `\\/`, `\\'`, `\\\"`, `\\0`, `\\uXXXX`, `\\u{X}`",
            ),
            start: escape_start,
        },
    )))
}

/// Parse a single- or double-quoted string literal.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start_pos = input.current_token_start();

    let quote = one_of(['"', '\'']).parse_next(input)?;

    let string_char = none_of(move |c: char| c == quote || c == '\\' || c == '\n' || c == '\r');
    let string_content =
        repeat(0.., alt((string_escape, string_char))).fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        });

    cut_err(terminated(string_content, quote))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("close the string with the same quote it was opened with"),
            start: start_pos,
        })
        .parse_next(input)
        .map(Token::StringLiteral)
}

/// Parse a number, rejecting ones glued to identifier characters.
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (float, peek(not(one_of(is_ident_continue))))
        .map(|(value, ()): (f64, ())| Token::NumberLiteral(value))
        .parse_next(input)
}

fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (one_of(is_ident_start), take_while(0.., is_ident_continue))
        .take()
        .map(Token::Identifier)
        .parse_next(input)
}

fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

fn block_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start_pos = input.current_token_start();

    literal("/*").parse_next(input)?;

    cut_err(terminated(take_until(0.., "*/"), "*/"))
        .context(LexerDiagnostic {
            code: ErrorCode::E005,
            message: "unterminated block comment",
            help: Some("close the comment with `*/`"),
            start: start_pos,
        })
        .map(Token::BlockComment)
        .parse_next(input)
}

fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        ':'.value(Token::Colon),
        ','.value(Token::Comma),
        ';'.value(Token::Semicolon),
        '='.value(Token::Equals),
    ))
    .parse_next(input)
}

fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    multispace1.value(Token::Whitespace).parse_next(input)
}

/// Parse a single token with position tracking.
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,   // Must come before any other `/` use
        block_comment,  // Must come before any other `/` use
        string_literal, // Must come before punctuation
        identifier,     // Must come before numbers so `inf`/`nan` stay identifiers
        number_literal,
        punctuation,
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();

    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Convert a winnow error at `error_pos` into a [`Diagnostic`].
///
/// Falls back to E002 (unexpected character) when no context is attached.
fn convert_err_mode(err: ErrMode<ContextError<LexerDiagnostic>>, error_pos: usize) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    if let Some(LexerDiagnostic {
        code,
        message,
        help,
        start,
    }) = context_error.context().next()
    {
        let mut diag = Diagnostic::error(*message)
            .with_code(*code)
            .with_label(Span::new(*start..error_pos), code.description());
        if let Some(h) = help {
            diag = diag.with_help(*h);
        }
        return diag;
    }

    Diagnostic::error("unexpected character")
        .with_code(ErrorCode::E002)
        .with_label(
            Span::new(error_pos..error_pos.saturating_add(1)),
            ErrorCode::E002.description(),
        )
}

/// A pull lexer over the catalogue source that skips whitespace and comments.
pub(crate) struct Lexer<'a> {
    input: Input<'a>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at byte `offset` of `source`.
    ///
    /// Spans stay relative to the start of `source`. `offset` must lie on a
    /// char boundary.
    pub(crate) fn new(source: &'a str, offset: usize) -> Self {
        let mut input = LocatingSlice::new(source);
        let _ = input.next_slice(offset.min(source.len()));
        Self { input }
    }

    /// Byte offset of the next unread character.
    pub(crate) fn offset(&self) -> usize {
        self.input.current_token_start()
    }

    /// Return the next significant token, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns the first lexical error as a [`Diagnostic`]; the lexer does not
    /// attempt to recover.
    pub(crate) fn next_token(&mut self) -> Result<Option<PositionedToken<'a>>, Diagnostic> {
        while !self.input.is_empty() {
            match positioned_token(&mut self.input) {
                Ok(token) if token.token.is_trivia() => {}
                Ok(token) => return Ok(Some(token)),
                Err(err) => {
                    let error_pos = self.input.current_token_start();
                    return Err(convert_err_mode(err, error_pos));
                }
            }
        }
        Ok(None)
    }
}
