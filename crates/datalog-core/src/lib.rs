//! Term unification for parsed Datalog programs.
//!
//! The unifier is stateless: every call takes the two terms and the caller's
//! substitution and returns either an extended copy or a [`UnifyError`].

pub mod unification;

pub use unification::{
    unify, unify_clause, unify_terms, unify_variable, Substitution, UnifyError,
};
