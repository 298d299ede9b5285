//! This crate provides a small DPLL SAT engine over named variables, and an
//! encoder that solves region-coloured queens puzzles with it.

/// Fixed-size subsets, used to spell out "at most one" constraints.
pub mod combinatorics;

/// A rectangular grid of cells with king-move neighbourhoods.
pub mod grid;

/// The `queens` module turns queens boards into CNF and decodes solutions back onto the board.
pub mod queens;

/// The `sat` module implements the SAT engine: clauses, formulas, branching strategies,
/// the DPLL search and the DIMACS and JSON input formats.
pub mod sat;
