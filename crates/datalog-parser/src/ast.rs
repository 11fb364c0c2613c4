//! Abstract Syntax Tree (AST) definitions for Datalog
//!
//! This module defines the term model produced by the parser and consumed by
//! the unifier.
//!
//! # Key Components
//!
//! - **Program**: The ordered clauses of a source file
//! - **Clause**: Either a fact or a rule
//! - **Term**: Atoms, numbers, variables and compound terms
//! - **Functor**: The `name/arity` shape of an atom or compound
//!
//! # Syntax Examples
//!
//! - **Facts**: `parent(john, mary).`
//! - **Rules**: `ancestor(X, Z) :- parent(X, Y), ancestor(Y, Z).`
//! - **Operators**: `X is Y + 3` is `is(X, +(Y, 3))`

use internment::Intern;
use std::fmt;
use thiserror::Error;

/// Interned string for efficient storage and comparison
pub type Symbol = Intern<String>;

/// Functor names rendered in infix position when they have two arguments
pub const INFIX_OPERATORS: &[&str] = &[
    "=", "\\=", "==", "\\==", "<", ">", "=<", ">=", "is", "+", "-", "*", "/", "//",
];

pub(crate) fn symbol(name: impl Into<String>) -> Symbol {
    Intern::new(name.into())
}

/// Which constant constructor rejected its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    Atom,
    Number,
    Variable,
}

impl ConstantKind {
    fn requirement(&self) -> &'static str {
        match self {
            ConstantKind::Atom => "atom name should start with a lowercase letter",
            ConstantKind::Number => "number value should only contain decimal digits",
            ConstantKind::Variable => {
                "variable name should start with an uppercase letter or an underscore"
            }
        }
    }
}

/// A constant was built from text that violates its naming rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}, got: '{text}'", kind.requirement())]
pub struct MalformedConstant {
    pub kind: ConstantKind,
    pub text: String,
}

/// A term can be an atom, a number, a variable, or a compound term
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Constant identifier starting with a lowercase letter (tom, john)
    Atom(Symbol),
    /// Digit string exactly as written in the source (1, 42, 007)
    Number(Symbol),
    /// Uppercase or underscore-prefixed name (X, Y, _tmp, _)
    Variable(Symbol),
    /// Functor with arguments (parent(X, Y), +(X, 1))
    Compound(Symbol, Vec<Term>),
}

/// The name and arity identifying the shape of an atom or compound
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Functor {
    pub name: Symbol,
    pub arity: usize,
}

impl Functor {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Functor {
            name: symbol(name),
            arity,
        }
    }
}

impl fmt::Debug for Functor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Functor")
            .field("name", &self.name.as_str())
            .field("arity", &self.arity)
            .finish()
    }
}

impl fmt::Display for Functor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

impl Term {
    /// Build an atom, checking that the name starts with a lowercase letter
    pub fn atom(name: impl Into<String>) -> Result<Self, MalformedConstant> {
        let name = name.into();
        match name.chars().next() {
            Some(first) if first.is_lowercase() => Ok(Term::Atom(symbol(name))),
            _ => Err(MalformedConstant {
                kind: ConstantKind::Atom,
                text: name,
            }),
        }
    }

    /// Build a number from its digit string
    pub fn number(value: impl Into<String>) -> Result<Self, MalformedConstant> {
        let value = value.into();
        if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
            Ok(Term::Number(symbol(value)))
        } else {
            Err(MalformedConstant {
                kind: ConstantKind::Number,
                text: value,
            })
        }
    }

    /// Build a variable, checking that the name starts with an uppercase letter or `_`
    pub fn variable(name: impl Into<String>) -> Result<Self, MalformedConstant> {
        let name = name.into();
        match name.chars().next() {
            Some(first) if first.is_uppercase() || first == '_' => {
                Ok(Term::Variable(symbol(name)))
            }
            _ => Err(MalformedConstant {
                kind: ConstantKind::Variable,
                text: name,
            }),
        }
    }

    /// The anonymous variable `_`
    pub fn anonymous() -> Self {
        Term::Variable(symbol("_"))
    }

    pub fn compound(name: impl Into<String>, arguments: Vec<Term>) -> Self {
        Term::Compound(symbol(name), arguments)
    }

    /// `(name, 0)` for atoms, `(name, arity)` for compounds, nothing otherwise
    pub fn functor(&self) -> Option<Functor> {
        match self {
            Term::Atom(name) => Some(Functor {
                name: *name,
                arity: 0,
            }),
            Term::Compound(name, args) => Some(Functor {
                name: *name,
                arity: args.len(),
            }),
            Term::Number(_) | Term::Variable(_) => None,
        }
    }

    pub fn arguments(&self) -> &[Term] {
        match self {
            Term::Compound(_, args) => args,
            _ => &[],
        }
    }

    /// Check if this term is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Check if this term is the anonymous variable `_`
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Term::Variable(name) if name.as_str() == "_")
    }

    /// Check if this term is ground (contains no variables)
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Atom(_) | Term::Number(_) => true,
            Term::Compound(_, args) => args.iter().all(|t| t.is_ground()),
        }
    }

    /// Distinct variable names in order of first occurrence
    pub fn variables(&self) -> Vec<Symbol> {
        let mut found = Vec::new();
        self.collect_variables(&mut found);
        found
    }

    fn collect_variables(&self, found: &mut Vec<Symbol>) {
        match self {
            Term::Variable(name) => {
                if !found.contains(name) {
                    found.push(*name);
                }
            }
            Term::Compound(_, args) => {
                for arg in args {
                    arg.collect_variables(found);
                }
            }
            Term::Atom(_) | Term::Number(_) => {}
        }
    }
}

// `Intern`'s own Debug output includes the pointer, so render names directly.
impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => f.debug_tuple("Atom").field(&name.as_str()).finish(),
            Term::Number(value) => f.debug_tuple("Number").field(&value.as_str()).finish(),
            Term::Variable(name) => f.debug_tuple("Variable").field(&name.as_str()).finish(),
            Term::Compound(name, args) => f
                .debug_tuple("Compound")
                .field(&name.as_str())
                .field(args)
                .finish(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) | Term::Number(name) | Term::Variable(name) => {
                write!(f, "{}", name)
            }
            Term::Compound(name, args)
                if args.len() == 2 && INFIX_OPERATORS.contains(&name.as_str()) =>
            {
                write!(f, "({} {} {})", args[0], name, args[1])
            }
            Term::Compound(name, args) => {
                write!(f, "{}(", name)?;
                write_separated(f, args)?;
                write!(f, ")")
            }
        }
    }
}

fn write_separated(f: &mut fmt::Formatter<'_>, terms: &[Term]) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", term)?;
    }
    Ok(())
}

/// A rule has a head and a conjunctive body: `ancestor(X, Y) :- parent(X, Y).`
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub name: Symbol,
    pub arguments: Vec<Term>,
    pub body: Vec<Term>,
}

/// A fact is a head whose body is always true: `parent(john, mary).`
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fact {
    pub name: Symbol,
    pub arguments: Vec<Term>,
}

impl Rule {
    pub fn new(name: impl Into<String>, arguments: Vec<Term>, body: Vec<Term>) -> Self {
        Rule {
            name: symbol(name),
            arguments,
            body,
        }
    }

    pub fn functor(&self) -> Functor {
        Functor {
            name: self.name,
            arity: self.arguments.len(),
        }
    }
}

impl Fact {
    pub fn new(name: impl Into<String>, arguments: Vec<Term>) -> Self {
        Fact {
            name: symbol(name),
            arguments,
        }
    }

    pub fn functor(&self) -> Functor {
        Functor {
            name: self.name,
            arity: self.arguments.len(),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rule")
            .field(&self.name.as_str())
            .field(&self.arguments)
            .field(&self.body)
            .finish()
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fact")
            .field(&self.name.as_str())
            .field(&self.arguments)
            .finish()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_separated(f, &self.arguments)?;
        write!(f, ") :- ")?;
        write_separated(f, &self.body)?;
        write!(f, ".")
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_separated(f, &self.arguments)?;
        write!(f, ").")
    }
}

/// Top-level clauses in a Datalog program
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Clause {
    /// A unit clause: `parent(john, mary).`
    Fact(Fact),
    /// A clause with a body: `ancestor(X, Y) :- parent(X, Y).`
    Rule(Rule),
}

impl Clause {
    pub fn name(&self) -> Symbol {
        match self {
            Clause::Fact(fact) => fact.name,
            Clause::Rule(rule) => rule.name,
        }
    }

    pub fn arguments(&self) -> &[Term] {
        match self {
            Clause::Fact(fact) => &fact.arguments,
            Clause::Rule(rule) => &rule.arguments,
        }
    }

    /// Goals of the body; empty for facts
    pub fn body(&self) -> &[Term] {
        match self {
            Clause::Fact(_) => &[],
            Clause::Rule(rule) => &rule.body,
        }
    }

    pub fn functor(&self) -> Functor {
        Functor {
            name: self.name(),
            arity: self.arguments().len(),
        }
    }

    /// The head as a compound term, ready to be unified against a goal
    pub fn head(&self) -> Term {
        Term::Compound(self.name(), self.arguments().to_vec())
    }

    pub fn is_fact(&self) -> bool {
        matches!(self, Clause::Fact(_))
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Fact(fact) => fmt::Debug::fmt(fact, f),
            Clause::Rule(rule) => fmt::Debug::fmt(rule, f),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Fact(fact) => fmt::Display::fmt(fact, f),
            Clause::Rule(rule) => fmt::Display::fmt(rule, f),
        }
    }
}

impl From<Fact> for Clause {
    fn from(fact: Fact) -> Self {
        Clause::Fact(fact)
    }
}

impl From<Rule> for Clause {
    fn from(rule: Rule) -> Self {
        Clause::Rule(rule)
    }
}

/// The clauses of a source file, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub clauses: Vec<Clause>,
}

impl Program {
    /// Create a new empty program
    pub fn new() -> Self {
        Program {
            clauses: Vec::new(),
        }
    }

    /// Get all facts from the program
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.clauses.iter().filter_map(|c| match c {
            Clause::Fact(f) => Some(f),
            _ => None,
        })
    }

    /// Get all rules from the program
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.clauses.iter().filter_map(|c| match c {
            Clause::Rule(r) => Some(r),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for clause in &self.clauses {
            writeln!(f, "{}", clause)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn atom(name: &str) -> Term {
        Term::atom(name).unwrap()
    }

    fn var(name: &str) -> Term {
        Term::variable(name).unwrap()
    }

    fn num(value: &str) -> Term {
        Term::number(value).unwrap()
    }

    #[test]
    fn test_atom_requires_lowercase() {
        assert!(Term::atom("tom").is_ok());
        let err = Term::atom("Tom").unwrap_err();
        assert_eq!(err.kind, ConstantKind::Atom);
        assert_eq!(err.text, "Tom");
        assert!(Term::atom("").is_err());
        assert!(Term::atom("_x").is_err());
    }

    #[test]
    fn test_number_requires_digits() {
        assert!(Term::number("42").is_ok());
        assert!(Term::number("007").is_ok());
        assert_eq!(Term::number("4a").unwrap_err().kind, ConstantKind::Number);
        assert!(Term::number("").is_err());
        assert!(Term::number("-1").is_err());
    }

    #[test]
    fn test_variable_requires_uppercase_or_underscore() {
        assert!(Term::variable("X").is_ok());
        assert!(Term::variable("_").is_ok());
        assert!(Term::variable("_tmp").is_ok());
        assert_eq!(
            Term::variable("x").unwrap_err().kind,
            ConstantKind::Variable
        );
    }

    #[test]
    fn test_malformed_constant_message() {
        let err = Term::atom("Tom").unwrap_err();
        assert_eq!(
            err.to_string(),
            "atom name should start with a lowercase letter, got: 'Tom'"
        );
    }

    #[test]
    fn test_number_equality_is_textual() {
        assert_eq!(num("7"), num("7"));
        assert_ne!(num("007"), num("7"));
    }

    #[test]
    fn test_functor() {
        assert_eq!(atom("tom").functor(), Some(Functor::new("tom", 0)));
        let parent = Term::compound("parent", vec![var("X"), var("Y")]);
        assert_eq!(parent.functor(), Some(Functor::new("parent", 2)));
        assert_eq!(num("3").functor(), None);
        assert_eq!(var("X").functor(), None);
    }

    #[test]
    fn test_zero_arity_compound_is_not_an_atom() {
        let compound = Term::compound("done", vec![]);
        assert_ne!(compound, atom("done"));
        assert_eq!(compound.functor(), atom("done").functor());
        assert_eq!(compound.to_string(), "done()");
    }

    #[test]
    fn test_compound_equality_checks_arity() {
        let f1 = Term::compound("f", vec![atom("a")]);
        let f2 = Term::compound("f", vec![atom("a"), atom("b")]);
        assert_ne!(f1, f2);
    }

    #[test]
    fn test_display_infix_operator() {
        let term = Term::compound(
            "is",
            vec![var("X"), Term::compound("+", vec![var("Y"), num("3")])],
        );
        assert_eq!(term.to_string(), "(X is (Y + 3))");
    }

    #[test]
    fn test_display_operator_with_other_arity_is_prefix() {
        let term = Term::compound("-", vec![num("1")]);
        assert_eq!(term.to_string(), "-(1)");
    }

    #[test]
    fn test_display_clauses() {
        let fact = Fact::new("parent", vec![atom("tom"), atom("john")]);
        assert_eq!(fact.to_string(), "parent(tom, john).");

        let rule = Rule::new(
            "ancestor",
            vec![var("X"), var("Y")],
            vec![
                Term::compound("parent", vec![var("X"), var("Z")]),
                Term::compound("ancestor", vec![var("Z"), var("Y")]),
            ],
        );
        assert_eq!(
            rule.to_string(),
            "ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y)."
        );
    }

    #[test]
    fn test_debug_mirrors_constructors() {
        let term = Term::compound("father", vec![atom("john"), var("X")]);
        assert_eq!(
            format!("{:?}", term),
            "Compound(\"father\", [Atom(\"john\"), Variable(\"X\")])"
        );
    }

    #[test]
    fn test_debug_clause() {
        let clause: Clause = Fact::new("parent", vec![atom("tom"), num("3")]).into();
        assert_eq!(
            format!("{:?}", clause),
            "Fact(\"parent\", [Atom(\"tom\"), Number(\"3\")])"
        );
    }

    #[test]
    fn test_clause_head_and_body() {
        let clause: Clause = Rule::new(
            "ancestor",
            vec![var("X"), var("Y")],
            vec![Term::compound("parent", vec![var("X"), var("Y")])],
        )
        .into();
        assert_eq!(clause.functor(), Functor::new("ancestor", 2));
        assert_eq!(
            clause.head(),
            Term::compound("ancestor", vec![var("X"), var("Y")])
        );
        assert_eq!(clause.body().len(), 1);

        let fact: Clause = Fact::new("parent", vec![atom("tom")]).into();
        assert!(fact.is_fact());
        assert!(fact.body().is_empty());
    }

    #[test]
    fn test_term_is_ground() {
        let ground = Term::compound("f", vec![atom("a"), num("1")]);
        let open = Term::compound("f", vec![atom("a"), var("X")]);

        assert!(ground.is_ground());
        assert!(!open.is_ground());
    }

    #[test]
    fn test_variables_in_first_occurrence_order() {
        let term = Term::compound(
            "f",
            vec![var("Y"), Term::compound("g", vec![var("X"), var("Y")])],
        );
        let vars = term.variables();
        let names: Vec<&str> = vars.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["Y", "X"]);
    }

    #[test]
    fn test_anonymous() {
        assert!(Term::anonymous().is_anonymous());
        assert!(!var("X").is_anonymous());
        assert!(!atom("x").is_anonymous());
    }
}
