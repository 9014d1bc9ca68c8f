//! Calendar math for month grids.
//!
//! # Responsibility
//! - Size a month (`days_in_month`) for new cards.
//! - Map a flat per-day sequence onto a week grid and back.
//!
//! # Invariants
//! - Months are 0-based (`0 = January`).
//! - `day_index` is the only mapping from grid coordinates to day numbers;
//!   every other grid helper goes through it.

use chrono::Datelike;

/// Number of grid columns per week row.
pub const DAYS_PER_WEEK: usize = 7;

/// Returns the number of days in `month` (0-based) of `year`.
///
/// Months past December roll into the following years, so `days_in_month(12, 2023)`
/// is January 2024.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    let year = year + (month / 12) as i32;
    match month % 12 {
        1 if is_leap_year(year) => 29,
        1 => 28,
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Splits `entries` into consecutive week rows of [`DAYS_PER_WEEK`].
///
/// The last row is shorter when the length is not a multiple of seven.
/// Rows borrow from the input, so concatenating them yields `entries` again.
pub fn chunk_into_weeks<T>(entries: &[T]) -> Vec<&[T]> {
    entries.chunks(DAYS_PER_WEEK).collect()
}

/// Number of week rows needed for `len` days.
pub fn week_count(len: usize) -> usize {
    len.div_ceil(DAYS_PER_WEEK)
}

/// 1-based calendar day shown at grid cell (`week`, `offset`).
pub fn day_index(week: usize, offset: usize) -> usize {
    week * DAYS_PER_WEEK + offset + 1
}

/// 0-based entry slot backing grid cell (`week`, `offset`).
pub fn entry_index(week: usize, offset: usize) -> usize {
    day_index(week, offset) - 1
}

/// Returns whether grid cell (`week`, `offset`) falls on `reference`'s day-of-month.
///
/// Only the day is compared; pair with [`is_same_month`] when the grid may
/// belong to another month.
pub fn is_current_day(week: usize, offset: usize, reference: &impl Datelike) -> bool {
    day_index(week, offset) == reference.day() as usize
}

/// Returns whether both dates fall in the same calendar year and month.
pub fn is_same_month(a: &impl Datelike, b: &impl Datelike) -> bool {
    a.year() == b.year() && a.month0() == b.month0()
}
