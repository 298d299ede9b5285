//! Immutable disjunctions of literals.
//!
//! A clause never holds both polarities of a variable. Duplicate literals are
//! collapsed when the clause is built; a literal next to its own negation is a
//! [`ContradictionError`], since that can only come from a broken encoder.

use crate::sat::assignment::Assignment;
use crate::sat::error::ContradictionError;
use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

/// Most clauses produced by puzzle encoders are binary, and rows rarely exceed eight cells.
pub type LiteralStorage = SmallVec<[Literal; 8]>;

/// Outcome of fixing one variable inside a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseUpdate {
    /// The clause does not mention the variable; keep the original.
    Unaffected,
    /// The variable took the required value, so the clause can be dropped.
    Satisfied,
    /// The variable took the other value; this is what remains (possibly empty).
    Shrunk(Clause),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause {
    literals: LiteralStorage,
}

impl Clause {
    /// Builds a clause from literals, keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`ContradictionError`] if a variable appears with both polarities.
    pub fn new<I>(literals: I) -> Result<Self, ContradictionError>
    where
        I: IntoIterator,
        I::Item: Into<Literal>,
    {
        let mut storage = LiteralStorage::new();
        for literal in literals {
            let literal = literal.into();
            match storage
                .iter()
                .find(|existing| existing.variable() == literal.variable())
            {
                Some(existing) if existing.polarity() != literal.polarity() => {
                    return Err(ContradictionError {
                        variable: literal.variable().clone(),
                    });
                }
                Some(_) => {}
                None => storage.push(literal),
            }
        }
        Ok(Self { literals: storage })
    }

    /// Fixes `variable` to `value` and reports what is left of the clause.
    #[must_use]
    pub fn update(&self, variable: &str, value: bool) -> ClauseUpdate {
        let Some(position) = self
            .literals
            .iter()
            .position(|lit| lit.variable().as_ref() == variable)
        else {
            return ClauseUpdate::Unaffected;
        };

        if self.literals[position].polarity() == value {
            return ClauseUpdate::Satisfied;
        }

        let mut literals = self.literals.clone();
        literals.remove(position);
        ClauseUpdate::Shrunk(Self { literals })
    }

    /// A clause can still be satisfied while at least one literal remains.
    #[must_use]
    pub fn solvable(&self) -> bool {
        !self.is_empty()
    }

    /// Paired with [`Clause::len`]; an empty clause is never [`solvable`](Clause::solvable).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// The forced literal, if exactly one remains.
    #[must_use]
    pub fn unit_clause(&self) -> Option<&Literal> {
        match self.literals.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.literals.iter().map(Literal::variable)
    }

    #[must_use]
    pub fn contains(&self, variable: &str) -> bool {
        self.variables().any(|v| v.as_ref() == variable)
    }

    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// True if some literal agrees with the assignment. Unassigned variables satisfy nothing.
    #[must_use]
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.literals
            .iter()
            .any(|lit| assignment.get(lit.variable()) == Some(lit.polarity()))
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Literal;
    type IntoIter = std::slice::Iter<'a, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.literals.iter().join(" or "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(pairs: &[(&str, bool)]) -> Clause {
        Clause::new(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_new() {
        let c = clause(&[("a", true), ("b", false), ("c", true)]);
        assert_eq!(c.len(), 3);
        assert!(c.solvable());
        assert!(!c.is_unit());
    }

    #[test]
    fn test_duplicates_collapse() {
        let c = clause(&[("a", true), ("a", true), ("b", false)]);
        assert_eq!(c.len(), 2);
        assert_eq!(c.to_string(), "a or not b");
    }

    #[test]
    fn test_contradiction() {
        let err = Clause::new([("a", true), ("a", false)]).unwrap_err();
        assert_eq!(err.variable.as_ref(), "a");
    }

    #[test]
    fn test_update_absent_variable() {
        let c = clause(&[("a", true), ("b", true)]);
        assert_eq!(c.update("z", true), ClauseUpdate::Unaffected);
    }

    #[test]
    fn test_update_satisfies() {
        let c = clause(&[("a", true), ("b", false)]);
        assert_eq!(c.update("b", false), ClauseUpdate::Satisfied);
    }

    #[test]
    fn test_update_shrinks() {
        let c = clause(&[("a", true), ("b", false)]);
        let ClauseUpdate::Shrunk(rest) = c.update("a", false) else {
            panic!("expected the clause to shrink");
        };
        assert_eq!(rest.unit_clause(), Some(&Literal::new("b", false)));

        let ClauseUpdate::Shrunk(empty) = rest.update("b", true) else {
            panic!("expected the clause to shrink");
        };
        assert!(!empty.solvable());
        assert!(empty.is_empty());
        assert!(rest.solvable() && !rest.is_empty());
        assert_eq!(empty.unit_clause(), None);
    }

    #[test]
    fn test_variables_and_contains() {
        let c = clause(&[("x", true), ("y", false)]);
        let vars: Vec<&str> = c.variables().map(AsRef::as_ref).collect();
        assert_eq!(vars, vec!["x", "y"]);
        assert!(c.contains("y"));
        assert!(!c.contains("z"));
    }

    #[test]
    fn test_satisfied_by() {
        let c = clause(&[("x", true), ("y", false)]);
        let mut assignment = Assignment::default();
        assert!(!c.is_satisfied_by(&assignment));
        assignment.set("x", false);
        assert!(!c.is_satisfied_by(&assignment));
        assignment.set("y", false);
        assert!(c.is_satisfied_by(&assignment));
    }

    #[test]
    fn test_display_negations() {
        let c = clause(&[("0,1", false), ("1,0", false)]);
        assert_eq!(c.to_string(), "not 0,1 or not 1,0");
    }
}
