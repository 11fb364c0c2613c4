//! Unification algorithm (Robinson's unification)
//!
//! This module implements first-order unification, which finds substitutions
//! that make two terms equal. This is a core operation in logic programming.
//!
//! # Algorithm
//!
//! Atoms, numbers and variables are compared first; a variable on either
//! side is bound, or its existing binding is unified instead. Compound terms
//! must agree on functor and then unify argument by argument, left to right.
//!
//! There is no occurs check: `X` unifies with `f(X)`. [`Substitution::apply`]
//! stops expanding a variable it is already inside, so such bindings can
//! still be resolved.
//!
//! # Example
//!
//! ```ignore
//! // Unify f(X, 3) with f(2, Y)
//! // Result: X=2, Y=3
//! let subst = unify_terms(&left, &right)?;
//! ```

use datalog_parser::{Clause, Functor, Symbol, Term};
use indexmap::IndexMap;
use internment::Intern;
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// A substitution maps variables to terms
///
/// Bindings keep the order in which they were made. The anonymous variable
/// `_` is never a key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: IndexMap<Symbol, Term>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution {
            bindings: IndexMap::new(),
        }
    }

    fn with(mut self, var: Symbol, term: Term) -> Self {
        self.bindings.insert(var, term);
        self
    }

    /// Get the binding for a variable
    pub fn get(&self, var: &Symbol) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Get the binding for a variable by name
    pub fn lookup(&self, name: &str) -> Option<&Term> {
        self.bindings.get(&Intern::new(name.to_string()))
    }

    /// Check if a variable is bound
    pub fn contains(&self, var: &Symbol) -> bool {
        self.bindings.contains_key(var)
    }

    /// Get the number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if substitution is empty
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over bindings in the order they were made
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Term)> {
        self.bindings.iter()
    }

    /// Apply substitution to a term
    ///
    /// Bindings are followed recursively. A variable met again while its own
    /// binding is being expanded is left as is, which keeps cyclic bindings
    /// like `X = f(X)` finite.
    pub fn apply(&self, term: &Term) -> Term {
        self.apply_guarded(term, &mut Vec::new())
    }

    fn apply_guarded(&self, term: &Term, expanding: &mut Vec<Symbol>) -> Term {
        match term {
            Term::Variable(var) => match self.bindings.get(var) {
                Some(bound) if !expanding.contains(var) => {
                    expanding.push(*var);
                    let resolved = self.apply_guarded(bound, expanding);
                    expanding.pop();
                    resolved
                }
                _ => term.clone(),
            },
            Term::Atom(_) | Term::Number(_) => term.clone(),
            Term::Compound(name, args) => Term::Compound(
                *name,
                args.iter()
                    .map(|arg| self.apply_guarded(arg, expanding))
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.bindings.iter().map(|(var, term)| (var.as_str(), term)))
            .finish()
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", var, term)?;
        }
        write!(f, "}}")
    }
}

/// Why two terms do not unify
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    /// Two different constants, or a constant against a compound
    #[error("cannot unify {left} with {right}")]
    Clash { left: Term, right: Term },
    #[error("functor {left} does not match {right}")]
    FunctorMismatch { left: Functor, right: Functor },
}

/// Unify two terms, extending `subst`
///
/// On failure the caller's substitution is untouched; on success the
/// returned substitution holds the old bindings plus any new ones.
pub fn unify(t1: &Term, t2: &Term, subst: &Substitution) -> Result<Substitution, UnifyError> {
    unify_in(t1, t2, subst.clone())
}

/// Unify two terms starting from an empty substitution
pub fn unify_terms(t1: &Term, t2: &Term) -> Result<Substitution, UnifyError> {
    unify_in(t1, t2, Substitution::new())
}

/// Bind `var` to `term`, respecting any bindings already in `subst`
pub fn unify_variable(
    var: &Symbol,
    term: &Term,
    subst: &Substitution,
) -> Result<Substitution, UnifyError> {
    bind_in(*var, term, subst.clone())
}

/// Unify the head of `clause` with `goal`
pub fn unify_clause(
    clause: &Clause,
    goal: &Term,
    subst: &Substitution,
) -> Result<Substitution, UnifyError> {
    unify(&clause.head(), goal, subst)
}

fn unify_in(t1: &Term, t2: &Term, subst: Substitution) -> Result<Substitution, UnifyError> {
    match (t1, t2) {
        (Term::Compound(name1, args1), Term::Compound(name2, args2)) => {
            if name1 != name2 || args1.len() != args2.len() {
                let error = UnifyError::FunctorMismatch {
                    left: Functor {
                        name: *name1,
                        arity: args1.len(),
                    },
                    right: Functor {
                        name: *name2,
                        arity: args2.len(),
                    },
                };
                trace!(%error, "unification failed");
                return Err(error);
            }
            args1
                .iter()
                .zip(args2)
                .try_fold(subst, |subst, (arg1, arg2)| unify_in(arg1, arg2, subst))
        }

        _ if t1 == t2 => Ok(subst),

        // Prefer `_` as the variable so it never ends up as a bound value
        (_, Term::Variable(var)) if t2.is_anonymous() => bind_in(*var, t1, subst),
        (Term::Variable(var), _) => bind_in(*var, t2, subst),
        (_, Term::Variable(var)) => bind_in(*var, t1, subst),

        _ => {
            let error = UnifyError::Clash {
                left: t1.clone(),
                right: t2.clone(),
            };
            trace!(%error, "unification failed");
            Err(error)
        }
    }
}

fn bind_in(var: Symbol, term: &Term, subst: Substitution) -> Result<Substitution, UnifyError> {
    if var.as_str() == "_" {
        return Ok(subst);
    }

    if let Some(bound) = subst.get(&var).cloned() {
        return unify_in(&bound, term, subst);
    }

    if let Term::Variable(other) = term {
        if let Some(bound) = subst.get(other).cloned() {
            return unify_in(&Term::Variable(var), &bound, subst);
        }
    }

    trace!(var = %var, term = %term, "binding variable");
    Ok(subst.with(var, term.clone()))
}
