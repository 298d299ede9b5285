#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod assignment;
pub mod clause;
pub mod dimacs;
pub mod dpll;
pub mod error;
pub mod formula;
pub mod json;
pub mod literal;
pub mod variable_selection;
