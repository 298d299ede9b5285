//! DPLL (Davis-Putnam-Logemann-Loveland) search over [`Formula`] snapshots.
//!
//! Each node of the search is an immutable formula:
//! 1.  If some clause is empty the node is a conflict and the branch is abandoned.
//! 2.  If no clauses remain the literals fixed along the path are a model.
//! 3.  Otherwise the first unit clause in list order forces its literal.
//! 4.  With no unit clause left, the formula's [`VariableSelection`] picks a
//!     variable, and the node branches on it, `true` first and then `false`.
//!
//! The search keeps its pending branches on an explicit stack instead of the
//! call stack, so formulas with thousands of variables cannot overflow it.
//!
//! [`VariableSelection`]: crate::sat::variable_selection::VariableSelection

use crate::sat::assignment::Assignment;
use crate::sat::error::SolveError;
use crate::sat::formula::Formula;
use crate::sat::literal::Literal;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Branching decisions taken (each `true` and `false` attempt counts once).
    pub decisions: usize,
    /// Literals forced by unit clauses.
    pub propagations: usize,
    /// Nodes abandoned because a clause became empty.
    pub conflicts: usize,
    /// Deepest path, in fixed literals.
    pub max_depth: usize,
}

/// Verdict and statistics of a finished search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub assignment: Option<Assignment>,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

impl Solution {
    #[must_use]
    pub const fn is_sat(&self) -> bool {
        self.assignment.is_some()
    }
}

/// A node still to be explored: `parent` with `literal` applied, or the root itself.
struct Pending {
    parent: Arc<Formula>,
    literal: Option<Literal>,
    depth: usize,
    decision: bool,
}

impl Formula {
    /// Searches for an assignment satisfying every clause.
    ///
    /// Only variables fixed on the way to the model are present; a variable the
    /// formula no longer needed once it was solved is simply absent. The result
    /// is built fresh for each call.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::HeuristicContract`] if the branching strategy names a
    /// variable that none of the remaining clauses contain.
    pub fn satisfying_assignment(&self) -> Result<Option<Assignment>, SolveError> {
        self.solve().map(|solution| solution.assignment)
    }

    /// Like [`satisfying_assignment`](Self::satisfying_assignment), also reporting search statistics.
    ///
    /// # Errors
    ///
    /// See [`satisfying_assignment`](Self::satisfying_assignment).
    pub fn solve(&self) -> Result<Solution, SolveError> {
        let start = Instant::now();
        debug!(
            clauses = self.len(),
            variables = self.num_vars(),
            "starting DPLL search"
        );

        let mut stats = SearchStats::default();
        let mut path: Vec<Literal> = Vec::new();
        let mut stack = vec![Pending {
            parent: Arc::new(self.clone()),
            literal: None,
            depth: 0,
            decision: false,
        }];

        let assignment = loop {
            let Some(Pending {
                parent,
                literal,
                depth,
                decision,
            }) = stack.pop()
            else {
                break None;
            };

            path.truncate(depth);
            let formula = match literal {
                Some(literal) => {
                    let reduced = parent.reduce(literal.variable(), literal.polarity());
                    if decision {
                        stats.decisions += 1;
                        trace!(%literal, depth, "decision");
                    } else {
                        stats.propagations += 1;
                    }
                    path.push(literal);
                    reduced
                }
                None => Formula::clone(&parent),
            };
            stats.max_depth = stats.max_depth.max(path.len());

            if !formula.solvable() {
                stats.conflicts += 1;
                continue;
            }

            if formula.solved() {
                break Some(path.iter().cloned().collect::<Assignment>());
            }

            let formula = Arc::new(formula);

            if let Some(unit) = formula.first_unit().cloned() {
                stack.push(Pending {
                    parent: formula,
                    literal: Some(unit),
                    depth: path.len(),
                    decision: false,
                });
                continue;
            }

            let picked = formula.selector.pick(&formula.clauses);
            let variable = match picked {
                Some(variable) if formula.contains(&variable) => variable,
                other => return Err(SolveError::HeuristicContract { variable: other }),
            };

            // popped in reverse: `true` is explored before `false`
            for value in [false, true] {
                stack.push(Pending {
                    parent: Arc::clone(&formula),
                    literal: Some(Literal::new(variable.clone(), value)),
                    depth: path.len(),
                    decision: true,
                });
            }
        };

        let elapsed = start.elapsed();
        debug!(
            satisfiable = assignment.is_some(),
            decisions = stats.decisions,
            propagations = stats.propagations,
            conflicts = stats.conflicts,
            max_depth = stats.max_depth,
            ?elapsed,
            "DPLL search finished"
        );

        Ok(Solution {
            assignment,
            stats,
            elapsed,
        })
    }
}
