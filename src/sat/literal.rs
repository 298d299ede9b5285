#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Named variables and the literals built from them.

use core::ops::Not;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// An opaque variable identifier.
///
/// Variables are compared by name; cloning one only bumps a reference count.
pub type Variable = Arc<str>;

/// A variable together with the boolean value it is required to take.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    variable: Variable,
    polarity: bool,
}

impl Literal {
    pub fn new(variable: impl Into<Variable>, polarity: bool) -> Self {
        Self {
            variable: variable.into(),
            polarity,
        }
    }

    #[must_use]
    pub const fn variable(&self) -> &Variable {
        &self.variable
    }

    #[must_use]
    pub const fn polarity(&self) -> bool {
        self.polarity
    }

    #[must_use]
    pub const fn is_negated(&self) -> bool {
        !self.polarity
    }

    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            variable: Arc::clone(&self.variable),
            polarity: !self.polarity,
        }
    }

    /// Splits the literal back into its `(variable, value)` pair.
    #[must_use]
    pub fn into_pair(self) -> (Variable, bool) {
        (self.variable, self.polarity)
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Not for &Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl<V: Into<Variable>> From<(V, bool)> for Literal {
    fn from((variable, polarity): (V, bool)) -> Self {
        Self::new(variable, polarity)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.polarity {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "not {}", self.variable)
        }
    }
}
