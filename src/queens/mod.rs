//! Region-coloured queens puzzles, solved by encoding them as CNF.
//!
//! An `n x n` board is split into coloured regions. A solution marks cells so
//! that every row, every column and every region holds exactly one mark, and
//! no two marks touch, not even diagonally.

pub mod board;
pub mod error;
pub mod solver;
