//! Parser implementation for Datalog.
//!
//! Supports parsing:
//! - Facts: `parent(john, mary).`
//! - Rules: `ancestor(X, Y) :- parent(X, Y).`
//! - Operator terms: `X is Y + 3`, `X \= Y`
//! - Parenthesised terms: `(X + Y) * Z`
//!
//! Operators bind greedily with no precedence table: the operand on the left
//! is a single primary term and everything after the operator is parsed as
//! the right operand. `X + Y * Z` is `+(X, *(Y, Z))` and `X - Y - Z` is
//! `-(X, -(Y, Z))`.

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::*;
use crate::token::{tokenize, LexError, LexMode, SpannedToken, Token};
use crate::{Span, SrcId};

/// The parser met a token the grammar does not allow at that point
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {}", describe(.found))]
pub struct SyntaxError {
    pub expected: String,
    /// `None` when the input ended early
    pub found: Option<Token>,
    pub span: Span,
}

fn describe(found: &Option<Token>) -> String {
    match found {
        Some(token) => format!("'{}'", token),
        None => "end of input".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    MalformedConstant(#[from] MalformedConstant),
}

impl ParseError {
    /// Where in the source the error was detected, if known
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Lex(error) => Some(error.span),
            ParseError::Syntax(error) => Some(error.span),
            ParseError::MalformedConstant(_) => None,
        }
    }
}

/// Parser configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub lex_mode: LexMode,
}

impl ParseOptions {
    /// Reject characters outside the token grammar instead of dropping them
    pub fn strict() -> Self {
        ParseOptions {
            lex_mode: LexMode::Strict,
        }
    }
}

fn is_variable_name(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_uppercase() || c == '_')
}

fn is_atom_name(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_lowercase())
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Cursor over a lexed token sequence
struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
    eoi: Span,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [SpannedToken], eoi: Span) -> Self {
        Parser {
            tokens,
            pos: 0,
            eoi,
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    /// Span of the next token, or the end of input
    fn span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| *span)
            .unwrap_or(self.eoi)
    }

    fn advance(&mut self) -> Option<&'a SpannedToken> {
        let next = self.tokens.get(self.pos);
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn error(&self, expected: &str) -> SyntaxError {
        SyntaxError {
            expected: expected.to_string(),
            found: self.peek().cloned(),
            span: self.span(),
        }
    }

    fn expect(&mut self, token: &Token, expected: &str) -> Result<Span, SyntaxError> {
        match self.tokens.get(self.pos) {
            Some((found, span)) if found == token => {
                self.pos += 1;
                Ok(*span)
            }
            _ => Err(self.error(expected)),
        }
    }

    fn parse_clauses(&mut self) -> Result<Vec<Clause>, ParseError> {
        let mut clauses = Vec::new();
        while !self.is_at_end() {
            clauses.push(self.parse_rule()?);
        }
        Ok(clauses)
    }

    /// `head.` or `head :- goal, ..., goal.`
    fn parse_rule(&mut self) -> Result<Clause, ParseError> {
        let start = self.span();
        let (name, arguments) = self.parse_head()?;

        let clause = match self.peek() {
            Some(Token::Dot) => {
                self.advance();
                Clause::Fact(Fact::new(name, arguments))
            }
            Some(Token::Neck) => {
                self.advance();
                let body = self.parse_body()?;
                Clause::Rule(Rule::new(name, arguments, body))
            }
            _ => return Err(self.error("'.' or ':-' after the clause head").into()),
        };

        let end = self.tokens[self.pos - 1].1;
        trace!(span = ?start.union(end), clause = %clause, "parsed clause");
        Ok(clause)
    }

    /// Goals separated by `,`, consuming the closing `.`
    fn parse_body(&mut self) -> Result<Vec<Term>, ParseError> {
        let mut body = Vec::new();
        while self.peek() != Some(&Token::Dot) {
            body.push(self.parse_term()?);
            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                Some(Token::Dot) => {}
                _ => return Err(self.error("',' or '.' after a goal").into()),
            }
        }
        self.advance();
        Ok(body)
    }

    /// `name(` followed by an argument list
    fn parse_head(&mut self) -> Result<(String, Vec<Term>), ParseError> {
        let name = match self.peek() {
            Some(Token::Ident(name)) | Some(Token::Operator(name)) => name.clone(),
            _ => return Err(self.error("a clause name").into()),
        };
        self.advance();
        self.expect(&Token::LParen, "'(' after the clause name")?;
        let arguments = self.parse_args()?;
        Ok((name, arguments))
    }

    /// Terms separated by `,`, consuming the closing `)`
    fn parse_args(&mut self) -> Result<Vec<Term>, ParseError> {
        let mut args = Vec::new();
        while self.peek() != Some(&Token::RParen) {
            args.push(self.parse_term()?);
            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                Some(Token::RParen) => {}
                _ => return Err(self.error("',' or ')' after an argument").into()),
            }
        }
        self.advance();
        Ok(args)
    }

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        let left = self.parse_primary()?;

        match self.peek() {
            Some(token) if token.is_operator() => {
                let op = token.to_string();
                self.advance();
                let right = self.parse_term()?;
                Ok(Term::compound(op, vec![left, right]))
            }
            _ => Ok(left),
        }
    }

    fn parse_primary(&mut self) -> Result<Term, ParseError> {
        let Some((token, span)) = self.advance() else {
            return Err(self.error("a term").into());
        };

        match token {
            Token::LParen => {
                let inner = self.parse_term()?;
                self.expect(&Token::RParen, "')' to close the parenthesised term")?;
                Ok(inner)
            }
            Token::Ident(text) if is_variable_name(text) => Ok(Term::variable(text.as_str())?),
            Token::Ident(text) if is_number(text) => Ok(Term::number(text.as_str())?),
            Token::Ident(text) if is_atom_name(text) && self.peek() != Some(&Token::LParen) => {
                Ok(Term::atom(text.as_str())?)
            }
            Token::Ident(name) | Token::Operator(name) => {
                self.expect(&Token::LParen, &format!("'(' after functor '{}'", name))?;
                let args = self.parse_args()?;
                Ok(Term::compound(name.as_str(), args))
            }
            _ => Err(SyntaxError {
                expected: "a term".to_string(),
                found: Some(token.clone()),
                span: *span,
            }
            .into()),
        }
    }
}

fn end_of(input: &str, src: SrcId) -> Span {
    Span::point(src, input.chars().count())
}

/// Parse a Datalog program from text
pub fn parse_program(input: &str, src: SrcId) -> Result<Program, ParseError> {
    parse_program_with(input, src, ParseOptions::default())
}

/// Parse a Datalog program from text with explicit options
pub fn parse_program_with(
    input: &str,
    src: SrcId,
    options: ParseOptions,
) -> Result<Program, ParseError> {
    let tokens = tokenize(input, src, options.lex_mode)?;
    let clauses = Parser::new(&tokens, end_of(input, src)).parse_clauses()?;
    debug!(src = %src, clauses = clauses.len(), "parsed program");
    Ok(Program { clauses })
}

/// Parse a goal list terminated by `.`, such as `parent(X, mary), X \= tom.`
pub fn parse_query(input: &str, src: SrcId) -> Result<Vec<Term>, ParseError> {
    let tokens = tokenize(input, src, LexMode::default())?;
    let mut parser = Parser::new(&tokens, end_of(input, src));
    let goals = parser.parse_body()?;
    if !parser.is_at_end() {
        return Err(parser.error("end of input after the query").into());
    }
    Ok(goals)
}
