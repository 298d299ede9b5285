#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Branching strategies.
//!
//! When no unit clause is left, the search asks a [`VariableSelection`] which
//! variable to branch on next. A strategy sees the live clauses and must name a
//! variable that appears in at least one of them; anything else aborts the
//! search with [`SolveError::HeuristicContract`](crate::sat::error::SolveError).

use crate::sat::clause::Clause;
use crate::sat::literal::Variable;
use clap::ValueEnum;
use rustc_hash::{FxHashMap, FxHasher};
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub trait VariableSelection: Send + Sync {
    fn pick(&self, clauses: &[Arc<Clause>]) -> Option<Variable>;
}

impl<F> VariableSelection for F
where
    F: Fn(&[Arc<Clause>]) -> Option<Variable> + Send + Sync,
{
    fn pick(&self, clauses: &[Arc<Clause>]) -> Option<Variable> {
        self(clauses)
    }
}

/// Number of clauses mentioning each variable, in order of first occurrence.
fn reference_counts(clauses: &[Arc<Clause>]) -> Vec<(&Variable, usize)> {
    let mut index: FxHashMap<&Variable, usize> = FxHashMap::default();
    let mut counts: Vec<(&Variable, usize)> = Vec::new();
    for var in clauses.iter().flat_map(|c| c.variables()) {
        match index.get(var) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(var, counts.len());
                counts.push((var, 1));
            }
        }
    }
    counts
}

/// Branches on the variable referenced by the fewest clauses, settling the
/// least constrained part of the formula first. Ties go to the variable seen first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeastReferenced;

impl VariableSelection for LeastReferenced {
    fn pick(&self, clauses: &[Arc<Clause>]) -> Option<Variable> {
        reference_counts(clauses)
            .into_iter()
            .min_by_key(|&(_, count)| count)
            .map(|(var, _)| var.clone())
    }
}

/// Branches on the variable referenced by the most clauses. Ties go to the variable seen first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MostReferenced;

impl VariableSelection for MostReferenced {
    fn pick(&self, clauses: &[Arc<Clause>]) -> Option<Variable> {
        reference_counts(clauses)
            .into_iter()
            .rev()
            .max_by_key(|&(_, count)| count)
            .map(|(var, _)| var.clone())
    }
}

/// Lexicographically smallest variable of the first live clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedOrder;

impl VariableSelection for FixedOrder {
    fn pick(&self, clauses: &[Arc<Clause>]) -> Option<Variable> {
        clauses.first()?.variables().min().cloned()
    }
}

/// Picks a random literal from a random non-empty clause.
///
/// The generator for each pick is seeded from `seed` and the shape of the live
/// clauses, so the strategy holds no state: searching the same formula twice
/// with the same seed branches identically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomOrder {
    seed: u64,
}

impl RandomOrder {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn snapshot_seed(&self, clauses: &[Arc<Clause>]) -> u64 {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        clauses.len().hash(&mut hasher);
        clauses.iter().map(|c| c.len()).sum::<usize>().hash(&mut hasher);
        hasher.finish()
    }
}

impl VariableSelection for RandomOrder {
    fn pick(&self, clauses: &[Arc<Clause>]) -> Option<Variable> {
        let live: Vec<&Arc<Clause>> = clauses.iter().filter(|c| c.solvable()).collect();
        if live.is_empty() {
            return None;
        }
        let mut rng = fastrand::Rng::with_seed(self.snapshot_seed(clauses));
        let clause = live[rng.usize(..live.len())];
        let literal = &clause.literals()[rng.usize(..clause.len())];
        Some(literal.variable().clone())
    }
}

/// Strategy names accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum VariableSelectionType {
    #[default]
    Least,
    Most,
    Fixed,
    Random,
}

impl VariableSelectionType {
    #[must_use]
    pub fn to_impl(self, seed: u64) -> Arc<dyn VariableSelection> {
        match self {
            Self::Least => Arc::new(LeastReferenced),
            Self::Most => Arc::new(MostReferenced),
            Self::Fixed => Arc::new(FixedOrder),
            Self::Random => Arc::new(RandomOrder::new(seed)),
        }
    }
}

impl Display for VariableSelectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Least => write!(f, "least"),
            Self::Most => write!(f, "most"),
            Self::Fixed => write!(f, "fixed"),
            Self::Random => write!(f, "random"),
        }
    }
}
