//! Parser for Datalog programs
//!
//! Turns source text into a [`Program`] of facts and rules built from
//! [`Term`]s. Lexing uses the Chumsky library over a character stream that
//! keeps original offsets; the grammar itself is a hand-written recursive
//! descent over the token vector.
//!
//! # Supported Syntax
//!
//! - **Facts**: `parent(john, mary).`
//! - **Rules**: `ancestor(X, Z) :- parent(X, Y), ancestor(Y, Z).`
//! - **Operators**: `X is Y + 1`, `X \= Y`, `A >= B` (no precedence, right-nested)
//! - **Comments**: `% to end of line`, ignored inside double quotes
//!
//! # Example
//!
//! ```ignore
//! use datalog_parser::{parse_program, SrcId};
//!
//! let program_text = "parent(john, mary). ancestor(X, Z) :- parent(X, Z).";
//! let program = parse_program(program_text, SrcId::empty()).expect("Parse error");
//! ```

mod ast;
mod parser;
mod span;
mod src;
mod token;

#[cfg(test)]
mod round_trip;

pub use ast::{
    Clause, ConstantKind, Fact, Functor, MalformedConstant, Program, Rule, Symbol, Term,
    INFIX_OPERATORS,
};
pub use parser::{
    parse_program, parse_program_with, parse_query, ParseError, ParseOptions, SyntaxError,
};
pub use span::Span;
pub use src::SrcId;
pub use token::{significant_chars, tokenize, LexError, LexMode, SpannedToken, Token};
