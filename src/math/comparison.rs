//! Float ordering helpers shared by the brightness and recurrence stages

use num_traits::{Float, NumCast};
use std::cmp::Ordering;

/// Three-way comparison of floating point values
///
/// Values that are neither less nor greater than each other (including any
/// comparison involving NaN) compare equal, which keeps the order total for
/// the order-statistics engine.
pub fn compare_floats<T: Float>(a: &T, b: &T) -> Ordering {
    if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Inverse of a recurrence count as stored in the recurrence map
pub fn inverse_frequency<T: Float>(count: u32) -> T {
    <T as NumCast>::from(count).map_or_else(T::zero, T::recip)
}
