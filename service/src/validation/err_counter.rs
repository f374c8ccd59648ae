//! Counting validation errors by category
//!
//! [`ErrCounter`] is a multiset of errors. [`ValidationErrCounter`] sorts
//! errors into categories with a categorizer function and keeps one
//! [`ErrCounter`] per category. [`validation_err_diff`] compares two such
//! counters category by category.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Multiset of errors with a count per distinct error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrCounter<E: Ord> {
    counts: BTreeMap<E, usize>,
}

impl<E: Ord> Default for ErrCounter<E> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<E: Ord + Clone> ErrCounter<E> {
    /// Create an empty counter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of an error
    pub fn add(&mut self, err: E) {
        self.add_n(err, 1);
    }

    /// Count `n` occurrences of an error
    pub fn add_n(&mut self, err: E, n: usize) {
        if n > 0 {
            *self.counts.entry(err).or_insert(0) += n;
        }
    }

    /// Occurrences of an error
    #[must_use]
    pub fn get(&self, err: &E) -> usize {
        self.counts.get(err).copied().unwrap_or(0)
    }

    /// Total occurrences of all errors
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing has been counted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct errors with their counts, in order
    pub fn iter(&self) -> impl Iterator<Item = (&E, usize)> {
        self.counts.iter().map(|(err, n)| (err, *n))
    }

    /// Occurrences in `self` not matched by occurrences in `other`
    ///
    /// Errors whose count would drop to zero or below are left out.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let counts = self
            .counts
            .iter()
            .filter_map(|(err, n)| {
                let remaining = n.saturating_sub(other.get(err));
                (remaining > 0).then(|| (err.clone(), remaining))
            })
            .collect();
        Self { counts }
    }
}

impl<E: Ord + Clone> FromIterator<E> for ErrCounter<E> {
    fn from_iter<T: IntoIterator<Item = E>>(iter: T) -> Self {
        let mut counter = Self::new();
        for err in iter {
            counter.add(err);
        }
        counter
    }
}

/// Categorizer turning an error into its category
pub type Categorizer<E, C> = Box<dyn Fn(&E) -> C + Send + Sync>;

/// Counter of validation errors grouped by category
pub struct ValidationErrCounter<E: Ord, C: Ord> {
    categorizer: Categorizer<E, C>,
    by_cat: BTreeMap<C, ErrCounter<E>>,
}

impl<E: Ord + fmt::Debug, C: Ord + fmt::Debug> fmt::Debug for ValidationErrCounter<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationErrCounter")
            .field("by_cat", &self.by_cat)
            .finish_non_exhaustive()
    }
}

impl<E: Ord + Clone, C: Ord + Clone> ValidationErrCounter<E, C> {
    /// Create a counter that categorizes errors with `categorizer`
    pub fn new(categorizer: impl Fn(&E) -> C + Send + Sync + 'static) -> Self {
        Self {
            categorizer: Box::new(categorizer),
            by_cat: BTreeMap::new(),
        }
    }

    /// Count errors
    pub fn count(&mut self, errs: impl IntoIterator<Item = E>) {
        for err in errs {
            let cat = (self.categorizer)(&err);
            self.by_cat.entry(cat).or_default().add(err);
        }
    }

    /// Count errors given with their multiplicities
    pub fn count_counter(&mut self, errs: &ErrCounter<E>) {
        for (err, n) in errs.iter() {
            let cat = (self.categorizer)(err);
            self.by_cat.entry(cat).or_default().add_n(err.clone(), n);
        }
    }

    /// Number of errors in each category
    #[must_use]
    pub fn counts_by_cat(&self) -> BTreeMap<C, usize> {
        self.by_cat
            .iter()
            .map(|(cat, counter)| (cat.clone(), counter.total()))
            .collect()
    }

    /// Categories with at least one error
    #[must_use]
    pub fn cats(&self) -> BTreeSet<C> {
        self.by_cat.keys().cloned().collect()
    }

    /// Copy of the errors counted in a category
    #[must_use]
    pub fn get(&self, cat: &C) -> ErrCounter<E> {
        self.by_cat.get(cat).cloned().unwrap_or_default()
    }

    /// Copies of every category's errors, in category order
    #[must_use]
    pub fn items(&self) -> Vec<(C, ErrCounter<E>)> {
        self.by_cat
            .iter()
            .map(|(cat, counter)| (cat.clone(), counter.clone()))
            .collect()
    }
}

/// Errors removed and gained in one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDiff<E: Ord> {
    /// Errors in the first counter beyond those in the second
    pub removed: ErrCounter<E>,
    /// Errors in the second counter beyond those in the first
    pub gained: ErrCounter<E>,
}

/// Per-category differences between two validation error counters
///
/// Categories where the two counters agree are left out.
pub fn validation_err_diff<E, C>(
    c1: &ValidationErrCounter<E, C>,
    c2: &ValidationErrCounter<E, C>,
) -> BTreeMap<C, CategoryDiff<E>>
where
    E: Ord + Clone,
    C: Ord + Clone,
{
    let cats = c1.cats().into_iter().chain(c2.cats());
    let mut diff = BTreeMap::new();
    for cat in cats {
        if diff.contains_key(&cat) {
            continue;
        }
        let first = c1.get(&cat);
        let second = c2.get(&cat);
        let removed = first.difference(&second);
        let gained = second.difference(&first);
        if !removed.is_empty() || !gained.is_empty() {
            diff.insert(cat, CategoryDiff { removed, gained });
        }
    }
    diff
}
