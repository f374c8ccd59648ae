//! Type-compatibility rules between Pydantic and `LinkML` type names
//!
//! Two declared types are compatible when their names are identical, or when
//! the table lists them as an equivalent pair. Pairs are unordered, so the
//! rule gives the same answer whichever schema is the source.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Type names produced for Pydantic fields paired with their `LinkML` ranges
pub const PYDANTIC_LINKML_PAIRS: &[(&str, &str)] = &[
    ("str", "string"),
    ("int", "integer"),
    ("float", "double"),
    ("float", "decimal"),
    ("Decimal", "decimal"),
    ("bool", "boolean"),
    ("AnyUrl", "uri"),
    ("AnyUrl", "uriorcurie"),
    ("AnyHttpUrl", "uri"),
    ("EmailStr", "string"),
    ("dict", "Any"),
];

/// Set of unordered type-name pairs treated as the same type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>", into = "Vec<(String, String)>")]
pub struct TypeEquivalence {
    pairs: BTreeSet<(String, String)>,
}

impl TypeEquivalence {
    /// Exact matching only
    #[must_use]
    pub fn exact() -> Self {
        Self::default()
    }

    /// Table of the Pydantic to `LinkML` correspondences
    #[must_use]
    pub fn pydantic_linkml() -> Self {
        PYDANTIC_LINKML_PAIRS.iter().copied().collect()
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    /// Declare two type names equivalent
    pub fn insert(&mut self, a: &str, b: &str) {
        if a != b {
            self.pairs.insert(Self::key(a, b));
        }
    }

    /// Add every pair of another table
    pub fn extend(&mut self, other: &Self) {
        self.pairs.extend(other.pairs.iter().cloned());
    }

    /// Whether two declared types count as the same type
    #[must_use]
    pub fn compatible(&self, a: &str, b: &str) -> bool {
        a == b || self.pairs.contains(&Self::key(a, b))
    }

    /// Number of declared pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the table only allows exact matches
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Declared pairs in sorted order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }
}

impl<A: AsRef<str>, B: AsRef<str>> FromIterator<(A, B)> for TypeEquivalence {
    fn from_iter<T: IntoIterator<Item = (A, B)>>(iter: T) -> Self {
        let mut table = Self::default();
        for (a, b) in iter {
            table.insert(a.as_ref(), b.as_ref());
        }
        table
    }
}

impl From<Vec<(String, String)>> for TypeEquivalence {
    fn from(pairs: Vec<(String, String)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<TypeEquivalence> for Vec<(String, String)> {
    fn from(table: TypeEquivalence) -> Self {
        table.pairs.into_iter().collect()
    }
}
