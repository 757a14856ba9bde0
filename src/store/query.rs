//! Deterministic paginated retrieval.
//!
//! The stores iterate in no particular order, so every query sorts the
//! filtered records by primary id before slicing. Page boundaries are then
//! stable across calls for unchanged store contents.

use crate::domain::person::Person;
use crate::domain::relation::{Relation, RelationId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("the page index is negative ({0})")]
    NegativePageIndex(i64),
    #[error("the page size ({size}) is out of bounds ([{min}, {max}])")]
    PageSizeOutOfBounds { size: i64, min: usize, max: usize },
}

/// Allowed page sizes, inclusive. Supplied by the caller's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub min: usize,
    pub max: usize,
}

impl PageBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// Requested page, as received from the caller (not yet validated).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub index: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(index: i64, size: i64) -> Self {
        Self { index, size }
    }

    fn validate(self, bounds: PageBounds) -> Result<(usize, usize), PaginationError> {
        let index =
            usize::try_from(self.index).map_err(|_| PaginationError::NegativePageIndex(self.index))?;
        let size = usize::try_from(self.size)
            .ok()
            .filter(|size| (bounds.min..=bounds.max).contains(size))
            .ok_or(PaginationError::PageSizeOutOfBounds {
                size: self.size,
                min: bounds.min,
                max: bounds.max,
            })?;
        Ok((index, size))
    }
}

/// One page of a sorted, filtered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub index: usize,
    pub size: usize,
    /// Records matching the filter across all pages.
    pub total_count: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index
            .checked_add(1)
            .and_then(|n| n.checked_mul(self.size))
            .is_some_and(|end| end < self.total_count)
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.has_previous().then(|| self.index - 1)
    }

    pub fn next_index(&self) -> Option<usize> {
        self.has_next().then(|| self.index + 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            index: self.index,
            size: self.size,
            total_count: self.total_count,
        }
    }
}

/// A record with a primary id that totally orders its collection.
pub trait Keyed {
    type Key: Ord + ?Sized;

    fn sort_key(&self) -> &Self::Key;
}

impl Keyed for Person {
    type Key = str;

    fn sort_key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Relation {
    type Key = RelationId;

    fn sort_key(&self) -> &RelationId {
        &self.id
    }
}

impl<T: Keyed + ?Sized> Keyed for &T {
    type Key = T::Key;

    fn sort_key(&self) -> &T::Key {
        (**self).sort_key()
    }
}

/// Filters `records`, sorts them by [`Keyed::sort_key`], and returns the
/// requested slice together with the filtered total.
///
/// A page index past the end yields an empty page, not an error.
pub fn paginate<T, I, F>(
    records: I,
    filter: F,
    request: PageRequest,
    bounds: PageBounds,
) -> Result<Page<T>, PaginationError>
where
    T: Keyed,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> bool,
{
    let (index, size) = request.validate(bounds)?;

    let mut sorted: Vec<T> = records.into_iter().filter(|r| filter(r)).collect();
    sorted.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));

    let total_count = sorted.len();
    let first = index.checked_mul(size).unwrap_or(usize::MAX).min(total_count);
    let last = first.saturating_add(size).min(total_count);

    let records = sorted.drain(first..last).collect();
    Ok(Page {
        records,
        index,
        size,
        total_count,
    })
}
