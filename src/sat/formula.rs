//! Immutable CNF formulas.
//!
//! A [`Formula`] is an ordered list of clauses plus the branching strategy the
//! search will consult. Fixing a variable never mutates a formula; it produces
//! a new one that shares every untouched clause with its parent.

use crate::sat::assignment::Assignment;
use crate::sat::clause::{Clause, ClauseUpdate};
use crate::sat::error::ContradictionError;
use crate::sat::literal::Literal;
use crate::sat::variable_selection::{LeastReferenced, VariableSelection};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

#[derive(Clone)]
pub struct Formula {
    pub(crate) clauses: Vec<Arc<Clause>>,
    pub(crate) selector: Arc<dyn VariableSelection>,
}

impl Formula {
    /// Wraps already built clauses, branching with [`LeastReferenced`].
    #[must_use]
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self {
            clauses: clauses.into_iter().map(Arc::new).collect(),
            selector: Arc::new(LeastReferenced),
        }
    }

    /// Builds a formula from raw `(variable, value)` pairs, one inner collection per clause.
    ///
    /// An empty inner collection becomes an empty clause, making the formula unsatisfiable.
    ///
    /// # Errors
    ///
    /// Returns [`ContradictionError`] if any clause requires a variable and its negation.
    pub fn build<I, C>(clauses: I) -> Result<Self, ContradictionError>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<Literal>,
    {
        let clauses = clauses
            .into_iter()
            .map(Clause::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(clauses))
    }

    /// Replaces the branching strategy.
    #[must_use]
    pub fn with_selector(self, selector: impl VariableSelection + 'static) -> Self {
        self.with_shared_selector(Arc::new(selector))
    }

    #[must_use]
    pub fn with_shared_selector(mut self, selector: Arc<dyn VariableSelection>) -> Self {
        self.selector = selector;
        self
    }

    /// A snapshot of the current clauses.
    #[must_use]
    pub fn clauses(&self) -> Vec<Arc<Clause>> {
        self.clauses.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// No clauses left to satisfy.
    #[must_use]
    pub fn solved(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Every clause still has a literal that could satisfy it.
    #[must_use]
    pub fn solvable(&self) -> bool {
        self.clauses.iter().all(|c| c.solvable())
    }

    /// Distinct variables still mentioned by some clause.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.clauses
            .iter()
            .flat_map(|c| c.variables())
            .collect::<FxHashSet<_>>()
            .len()
    }

    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(|c| c.len()).sum()
    }

    #[must_use]
    pub fn contains(&self, variable: &str) -> bool {
        self.clauses.iter().any(|c| c.contains(variable))
    }

    /// The first unit clause in list order, if any.
    #[must_use]
    pub fn first_unit(&self) -> Option<&Literal> {
        self.clauses.iter().find_map(|c| c.unit_clause())
    }

    /// The formula left after fixing `variable` to `value`: satisfied clauses
    /// are dropped, falsified literals removed, untouched clauses shared.
    #[must_use]
    pub fn reduce(&self, variable: &str, value: bool) -> Self {
        let clauses = self
            .clauses
            .iter()
            .filter_map(|clause| match clause.update(variable, value) {
                ClauseUpdate::Unaffected => Some(Arc::clone(clause)),
                ClauseUpdate::Satisfied => None,
                ClauseUpdate::Shrunk(rest) => Some(Arc::new(rest)),
            })
            .collect();
        Self {
            clauses,
            selector: Arc::clone(&self.selector),
        }
    }

    /// Checks that every clause has a literal the assignment makes true.
    #[must_use]
    pub fn verify(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|c| c.is_satisfied_by(assignment))
    }
}

impl Debug for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formula")
            .field("clauses", &self.clauses)
            .finish_non_exhaustive()
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SatFormula(")?;
        if !self.clauses.is_empty() {
            writeln!(f, "  {}", self.clauses.iter().join("\n  and "))?;
        }
        write!(f, ")")
    }
}

impl From<Vec<Clause>> for Formula {
    fn from(clauses: Vec<Clause>) -> Self {
        Self::new(clauses)
    }
}
