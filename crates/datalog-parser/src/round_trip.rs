//! Property-based tests: rendering a clause and parsing it back gives the same clause

use crate::{parse_program, Clause, Fact, Rule, SrcId, Term, INFIX_OPERATORS};
use proptest::prelude::*;

fn atom_strategy() -> impl Strategy<Value = Term> {
    "[a-z][a-z0-9_]{0,5}".prop_map(|name| Term::atom(name).unwrap())
}

fn variable_strategy() -> impl Strategy<Value = Term> {
    prop_oneof![
        "[A-Z][a-zA-Z0-9_]{0,5}".prop_map(|name| Term::variable(name).unwrap()),
        Just(Term::anonymous()),
    ]
}

fn number_strategy() -> impl Strategy<Value = Term> {
    "[0-9]{1,4}".prop_map(|digits| Term::number(digits).unwrap())
}

fn functor_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,5}"
}

fn term_strategy() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![atom_strategy(), variable_strategy(), number_strategy()];

    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            (
                functor_name_strategy(),
                prop::collection::vec(inner.clone(), 0..3)
            )
                .prop_map(|(name, args)| Term::compound(name, args)),
            (
                prop::sample::select(INFIX_OPERATORS),
                inner.clone(),
                inner
            )
                .prop_map(|(op, left, right)| Term::compound(op, vec![left, right])),
        ]
    })
}

fn clause_strategy() -> impl Strategy<Value = Clause> {
    prop_oneof![
        (
            functor_name_strategy(),
            prop::collection::vec(term_strategy(), 0..4)
        )
            .prop_map(|(name, args)| Clause::Fact(Fact::new(name, args))),
        (
            functor_name_strategy(),
            prop::collection::vec(term_strategy(), 0..4),
            prop::collection::vec(term_strategy(), 0..3)
        )
            .prop_map(|(name, args, body)| Clause::Rule(Rule::new(name, args, body))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_rendered_clause_parses_back(clause in clause_strategy()) {
        let text = clause.to_string();
        let program = parse_program(&text, SrcId::empty());
        prop_assert!(program.is_ok(), "failed to parse {:?}: {:?}", text, program);
        let program = program.unwrap();
        prop_assert_eq!(program.clauses, vec![clause]);
    }

    #[test]
    fn test_rendered_program_parses_back(
        clauses in prop::collection::vec(clause_strategy(), 0..5)
    ) {
        let program = crate::Program { clauses };
        let reparsed = parse_program(&program.to_string(), SrcId::empty());
        prop_assert_eq!(reparsed, Ok(program));
    }
}
