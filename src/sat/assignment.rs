//! Partial variable assignments returned by a successful search.

use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A partial mapping from variables to values.
///
/// Only variables the search actually pinned appear. Every search hands out a
/// freshly built value, so callers may mutate it freely.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Assignment(FxHashMap<Variable, bool>);

impl Assignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, variable: impl Into<Variable>, value: bool) -> Option<bool> {
        self.0.insert(variable.into(), value)
    }

    pub fn assign(&mut self, literal: Literal) -> Option<bool> {
        let (variable, value) = literal.into_pair();
        self.0.insert(variable, value)
    }

    #[must_use]
    pub fn get(&self, variable: &str) -> Option<bool> {
        self.0.get(variable).copied()
    }

    #[must_use]
    pub fn contains(&self, variable: &str) -> bool {
        self.0.contains_key(variable)
    }

    pub fn remove(&mut self, variable: &str) -> Option<bool> {
        self.0.remove(variable)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, bool)> {
        self.0.iter().map(|(k, &v)| (k, v))
    }

    /// Variables assigned `true`, sorted by name.
    pub fn true_variables(&self) -> impl Iterator<Item = &Variable> {
        self.0
            .iter()
            .filter_map(|(k, &v)| v.then_some(k))
            .sorted()
    }
}

impl FromIterator<Literal> for Assignment {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self(iter.into_iter().map(Literal::into_pair).collect())
    }
}

impl FromIterator<(Variable, bool)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (Variable, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .0
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(k, &v)| Literal::new(k.clone(), v))
            .join(", ");
        write!(f, "{{{rendered}}}")
    }
}
