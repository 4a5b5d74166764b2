//! In-place sorting and k-th order selection driven by a three-way comparator
//!
//! Both algorithms pick the pivot as the median of the first, middle and last
//! record and partition around a copy of it, so the pivot value stays valid
//! while records are swapped. The copy lives in one scratch value created by
//! the top-level call and refreshed with `clone_from` at every step.

use std::cmp::Ordering;

/// Boundaries produced by one three-way partition step
///
/// Records in `..less_end` compare less than the pivot, records in
/// `less_end..greater_start` compare equal, and records in `greater_start..`
/// compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// End of the region comparing less than the pivot
    pub less_end: usize,
    /// Start of the region comparing greater than the pivot
    pub greater_start: usize,
}

impl Partition {
    /// Number of records equal to the pivot
    pub const fn equal_len(&self) -> usize {
        self.greater_start - self.less_end
    }
}

fn compare_at<T, F>(records: &[T], a: usize, b: usize, compare: &mut F) -> Ordering
where
    F: FnMut(&T, &T) -> Ordering,
{
    match (records.get(a), records.get(b)) {
        (Some(left), Some(right)) => compare(left, right),
        _ => Ordering::Equal,
    }
}

fn swap_if_greater<T, F>(records: &mut [T], a: usize, b: usize, compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if compare_at(records, a, b, compare) == Ordering::Greater {
        records.swap(a, b);
    }
}

/// Index of the median among the first, middle and last records
///
/// Ties resolve towards the middle record, then the first. Returns 0 for an
/// empty slice.
pub fn median_of_three<T, F>(records: &[T], compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = records.len();
    if len == 0 {
        return 0;
    }
    let (begin, middle, last) = (0, len / 2, len - 1);
    let greater = |compare: &mut F, a: usize, b: usize| {
        compare_at(records, a, b, compare) == Ordering::Greater
    };

    if greater(compare, begin, middle) {
        if greater(compare, middle, last) {
            middle
        } else if greater(compare, begin, last) {
            last
        } else {
            begin
        }
    } else if greater(compare, begin, last) {
        begin
    } else if greater(compare, middle, last) {
        last
    } else {
        middle
    }
}

/// Three-way partition of `records` around `pivot`
///
/// Greater records are swapped to a shrinking tail, lesser records to a
/// growing head, and equal records are left where the scan finds them.
pub fn partition<T, F>(records: &mut [T], pivot: &T, compare: &mut F) -> Partition
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut less_end = 0;
    let mut current = 0;
    let mut greater_start = records.len();

    while current < greater_start {
        let ordering = records
            .get(current)
            .map_or(Ordering::Equal, |record| compare(record, pivot));
        match ordering {
            Ordering::Greater => {
                greater_start -= 1;
                records.swap(current, greater_start);
            }
            Ordering::Less => {
                records.swap(current, less_end);
                current += 1;
                less_end += 1;
            }
            Ordering::Equal => current += 1,
        }
    }

    Partition {
        less_end,
        greater_start: current,
    }
}

/// Copy the median-of-three pivot into `scratch` and partition around it
fn pivot_and_partition<T, F>(records: &mut [T], scratch: &mut T, compare: &mut F) -> Partition
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let pivot_index = median_of_three(records, compare);
    if let Some(pivot) = records.get(pivot_index) {
        scratch.clone_from(pivot);
    }
    partition(records, scratch, compare)
}

/// Sort `records` in place under `compare`
///
/// Quicksort with median-of-three pivots and three-way partitioning; slices of
/// two or three records are finished with compare-swap networks. Average
/// `O(n log n)`, worst case `O(n²)`, not stable. Stack depth stays logarithmic
/// because only the smaller side is recursed into.
pub fn sort_by<T, F>(records: &mut [T], mut compare: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let Some(first) = records.first() else {
        return;
    };
    let mut scratch = first.clone();
    sort_region(records, &mut scratch, &mut compare);
}

/// Sort records that implement [`Ord`]
pub fn sort<T: Ord + Clone>(records: &mut [T]) {
    sort_by(records, T::cmp);
}

fn sort_region<T, F>(mut records: &mut [T], scratch: &mut T, compare: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    loop {
        match records.len() {
            0 | 1 => return,
            2 => {
                swap_if_greater(records, 0, 1, compare);
                return;
            }
            3 => {
                swap_if_greater(records, 0, 1, compare);
                swap_if_greater(records, 1, 2, compare);
                swap_if_greater(records, 0, 1, compare);
                return;
            }
            len => {
                let bounds = pivot_and_partition(records, scratch, compare);
                let greater_len = len - bounds.greater_start;
                let (head, tail) = std::mem::take(&mut records).split_at_mut(bounds.greater_start);
                let less = head.get_mut(..bounds.less_end).unwrap_or_default();

                if bounds.less_end <= greater_len {
                    sort_region(less, scratch, compare);
                    records = tail;
                } else {
                    sort_region(tail, scratch, compare);
                    records = less;
                }
            }
        }
    }
}

/// Position `k` would occupy after sorting, selecting without a full sort
///
/// The returned index points into `records` after they have been partially
/// reordered. Returns `None` when `k` is out of range.
pub fn select_index_by<T, F>(records: &mut [T], k: usize, mut compare: F) -> Option<usize>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    if k >= records.len() {
        return None;
    }
    let mut scratch = records.first()?.clone();
    let mut start = 0;
    let mut end = records.len();
    let mut rank = k;

    loop {
        let region = records.get_mut(start..end)?;
        if region.len() == 1 {
            return Some(start);
        }
        let bounds = pivot_and_partition(region, &mut scratch, &mut compare);

        if rank < bounds.less_end {
            end = start + bounds.less_end;
        } else if rank < bounds.greater_start {
            return Some(start + rank);
        } else {
            rank -= bounds.greater_start;
            start += bounds.greater_start;
        }
    }
}

/// Record that would occupy sorted position `k` (0-indexed)
///
/// Average `O(n)`. Uses the same pivot and partition rules as [`sort_by`], so
/// both produce the same arrangement for the same input on their first step.
pub fn select_by<T, F>(records: &mut [T], k: usize, compare: F) -> Option<&T>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let index = select_index_by(records, k, compare)?;
    records.get(index)
}

/// Select for records that implement [`Ord`]
pub fn select<T: Ord + Clone>(records: &mut [T], k: usize) -> Option<&T> {
    select_by(records, k, T::cmp)
}
