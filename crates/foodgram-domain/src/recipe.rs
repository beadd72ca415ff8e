//! Recipe bounds and the rules shared by the write path.

use std::collections::HashSet;
use std::hash::Hash;

/// Inclusive cooking time bounds, in minutes.
pub const COOKING_TIME_MIN: i64 = 1;
pub const COOKING_TIME_MAX: i64 = 240;

/// Inclusive bounds of an ingredient amount inside a recipe.
pub const AMOUNT_MIN: i64 = 1;
pub const AMOUNT_MAX: i64 = 1000;

pub const RECIPE_NAME_MAX_LEN: usize = 256;

pub fn cooking_time_in_range(minutes: i64) -> bool {
    (COOKING_TIME_MIN..=COOKING_TIME_MAX).contains(&minutes)
}

pub fn amount_in_range(amount: i64) -> bool {
    (AMOUNT_MIN..=AMOUNT_MAX).contains(&amount)
}

/// Returns the values that occur more than once, in first-repeat order.
///
/// ```
/// use foodgram_domain::recipe::duplicates;
/// assert_eq!(duplicates([3, 1, 3, 2, 1, 3]), vec![3, 1]);
/// assert!(duplicates([1, 2, 3]).is_empty());
/// ```
pub fn duplicates<T, I>(values: I) -> Vec<T>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for value in values {
        if !seen.insert(value) && !repeated.contains(&value) {
            repeated.push(value);
        }
    }
    repeated
}
