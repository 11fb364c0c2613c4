use chumsky::prelude::*;
use chumsky::stream::Stream;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::{Span, SrcId};

pub type SpannedToken = (Token, Span);

type CharError = Simple<char, Span>;

/// What the lexer does with characters outside the token grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LexMode {
    /// Drop them and keep going
    #[default]
    Permissive,
    /// Fail on the first one
    ///
    /// Quote marks, and a `%` that survived comment removal, are still
    /// dropped: they belong to strings the grammar has no token for.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Run of ASCII letters, digits and underscores: names, variables and numbers
    Ident(String),
    Operator(String),
    /// `:-`
    Neck,
    LParen,
    RParen,
    Comma,
    Dot,
}

impl Token {
    pub fn is_operator(&self) -> bool {
        match self {
            Token::Operator(_) => true,
            Token::Ident(text) => text == "is",
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(text) => write!(f, "{}", text),
            Token::Operator(text) => write!(f, "{}", text),
            Token::Neck => write!(f, ":-"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
        }
    }
}

/// A character the strict lexer refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl From<CharError> for LexError {
    fn from(error: CharError) -> Self {
        let message = match error.found() {
            Some(c) => format!("unexpected character {:?}", c),
            None => "unexpected end of input".to_string(),
        };
        LexError {
            message,
            span: error.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Token(Token),
    Stray(char),
}

/// Characters that survive comment and newline removal, with their original offsets
///
/// A `%` starts a comment unless it follows a backslash or sits inside a
/// double-quoted string. Quote state is tracked per line, and an escaped
/// `\"` does not open or close a string.
pub fn significant_chars(text: &str) -> Vec<(usize, char)> {
    let mut kept = Vec::with_capacity(text.len());
    let mut in_string = false;
    let mut in_comment = false;
    let mut previous = None;

    for (offset, c) in text.chars().enumerate() {
        if c == '\n' {
            in_string = false;
            in_comment = false;
            previous = None;
            continue;
        }
        if in_comment {
            continue;
        }
        match c {
            '"' if previous != Some('\\') => in_string = !in_string,
            '%' if !in_string && previous != Some('\\') => {
                in_comment = true;
                continue;
            }
            _ => {}
        }
        kept.push((offset, c));
        previous = Some(c);
    }

    kept
}

fn identifier() -> impl Parser<char, Token, Error = CharError> + Clone {
    filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(Token::Ident)
        .labelled("identifier")
}

fn operator() -> impl Parser<char, Token, Error = CharError> + Clone {
    // Longest symbols first so `\==` is not split into `\=` and `=`.
    choice((
        just("\\=="),
        just("\\="),
        just("\\"),
        just("=="),
        just("=<"),
        just("="),
        just("<="),
        just("<"),
        just(">="),
        just(">"),
        just("//"),
        just("/"),
        just("+"),
        just("-"),
        just("*"),
    ))
    .map(|op: &str| Token::Operator(op.to_string()))
    .labelled("operator")
}

fn punctuation() -> impl Parser<char, Token, Error = CharError> + Clone {
    choice((
        just(":-").to(Token::Neck),
        just('.').to(Token::Dot),
        just(',').to(Token::Comma),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
    ))
}

fn lexer(mode: LexMode) -> impl Parser<char, Vec<(Lexeme, Span)>, Error = CharError> + Clone {
    let permissive = mode == LexMode::Permissive;

    let token = choice((identifier(), punctuation(), operator())).map(Lexeme::Token);
    let stray = filter(move |c: &char| {
        matches!(c, '"' | '%') || (permissive && !c.is_whitespace())
    })
    .map(Lexeme::Stray);

    let lexeme = token
        .or(stray)
        .map_with_span(|lexeme, span| (lexeme, span))
        .then_ignore(text::whitespace());

    text::whitespace()
        .ignore_then(lexeme.repeated())
        .then_ignore(end())
}

/// Split source text into spanned tokens
///
/// Comments and newlines are removed first, so a name broken across a line
/// break lexes as one identifier.
pub fn tokenize(text: &str, src: SrcId, mode: LexMode) -> Result<Vec<SpannedToken>, LexError> {
    let len = text.chars().count();
    let chars = significant_chars(text)
        .into_iter()
        .map(|(offset, c)| (c, Span::new(src, offset..offset + 1)));
    let stream = Stream::from_iter(Span::point(src, len), chars);

    let lexemes = lexer(mode).parse(stream).map_err(|errors| {
        errors
            .into_iter()
            .next()
            .map(LexError::from)
            .unwrap_or_else(|| LexError {
                message: "unreadable input".to_string(),
                span: Span::point(src, len),
            })
    })?;

    let mut tokens = Vec::with_capacity(lexemes.len());
    for (lexeme, span) in lexemes {
        match lexeme {
            Lexeme::Token(token) => tokens.push((token, span)),
            Lexeme::Stray(c) => debug!(character = ?c, span = ?span, "dropping unrecognised character"),
        }
    }
    Ok(tokens)
}
