//! Gregorian calendar helpers for expanding POSIX TZ rules.
//!
//! The epoch day conversions are based off Cassio Neri and Lorenz
//! Schneider's paper, [Euclidean affine functions and their application
//! to calendar algorithms][eaf-calendar-algorithms], using a cycle shift
//! of 3670 so the Unix epoch sits in the middle of the supported range.
//!
//! [eaf-calendar-algorithms]: https://onlinelibrary.wiley.com/doi/full/10.1002/spe.3172

pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

const EPOCH_COMPUTATIONAL_RATA_DIE: i32 = 719_468;
const DAYS_IN_A_400Y_CYCLE: u32 = 146_097;

const TWO_POWER_THIRTY_NINE: u64 = 549_755_813_888; // 2^39 constant

const SHIFT_CONSTANT: i32 = 3670;
const SHIFT_CONSTANT_EXTENDED: i64 = 5_368_710;

/// Calculate the days since the Unix epoch for a gregorian date.
pub(crate) const fn epoch_days_from_gregorian_date(year: i32, month: u8, day: u8) -> i64 {
    let shift =
        SHIFT_CONSTANT_EXTENDED * DAYS_IN_A_400Y_CYCLE as i64 + EPOCH_COMPUTATIONAL_RATA_DIE as i64;
    let j = (month <= 2) as i64;
    let comp_year = ((year as i64 + 400 * SHIFT_CONSTANT_EXTENDED) - j) as u64;
    let comp_month = month as i64 + 12 * j;
    let comp_day = day as i64 - 1;
    let century = comp_year / 100;
    let y_star = 1461 * comp_year / 4 - century + century / 4;
    let m_star = (979 * comp_month - 2919) / 32;
    (y_star as i64 + m_star + comp_day) - shift
}

/// Returns the gregorian year containing the given epoch day.
pub(crate) const fn year_from_epoch_days(epoch_days: i32) -> i32 {
    let rata_die = (epoch_days
        + EPOCH_COMPUTATIONAL_RATA_DIE
        + DAYS_IN_A_400Y_CYCLE as i32 * SHIFT_CONSTANT) as u32;
    let n_one = 4 * rata_die + 3;
    let century = n_one / DAYS_IN_A_400Y_CYCLE;
    let n_two = (n_one % DAYS_IN_A_400Y_CYCLE) | 3;
    let year_of_century = (376_287_347 * n_two as u64) / TWO_POWER_THIRTY_NINE;
    let day_of_year = (n_two - 1461 * year_of_century as u32) / 4;
    // The computational year starts in March.
    let j = (day_of_year >= 306) as u32;
    (100 * century + year_of_century as u32 + j) as i32 - 400 * SHIFT_CONSTANT
}

/// Returns the gregorian year containing the given epoch seconds.
pub(crate) fn year_from_epoch_seconds(seconds: i64) -> i32 {
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    // Clamp to a range where the rata die stays positive in a u32.
    let days = days.clamp(-100_000_000, 100_000_000) as i32;
    year_from_epoch_days(days)
}

pub(crate) const fn is_leap(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub(crate) const fn iso_days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap(year) => 29,
        _ => 28,
    }
}

/// Days from the start of the year to the start of the zero-indexed `month`.
pub(crate) const fn month_to_day(month: u8, is_leap: bool) -> u16 {
    let days = match month {
        0 => 0,
        1 => 31,
        2 => 59,
        3 => 90,
        4 => 120,
        5 => 151,
        6 => 181,
        7 => 212,
        8 => 243,
        9 => 273,
        10 => 304,
        _ => 334,
    };
    if is_leap && month >= 2 {
        days + 1
    } else {
        days
    }
}

/// Day of the week with Sunday as 0, matching POSIX `Mm.w.d` rules.
pub(crate) const fn epoch_days_to_day_of_week(epoch_days: i64) -> u8 {
    // 1970-01-01 was a Thursday.
    (epoch_days + 4).rem_euclid(7) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gregorian_epoch_days() {
        assert_eq!(epoch_days_from_gregorian_date(1970, 1, 1), 0);
        assert_eq!(epoch_days_from_gregorian_date(2000, 3, 1), 11_017);
        assert_eq!(epoch_days_from_gregorian_date(1969, 12, 31), -1);
        assert_eq!(epoch_days_from_gregorian_date(2028, 3, 26), 21_269);
    }

    #[test]
    fn year_for_epoch_values() {
        assert_eq!(year_from_epoch_days(0), 1970);
        assert_eq!(year_from_epoch_days(-1), 1969);
        assert_eq!(year_from_epoch_days(11_016), 2000);
        assert_eq!(year_from_epoch_seconds(1_837_645_200), 2028);
        assert_eq!(year_from_epoch_seconds(-1), 1969);
    }

    #[test]
    fn leap_years() {
        assert!(is_leap(2000));
        assert!(is_leap(2024));
        assert!(!is_leap(1900));
        assert_eq!(iso_days_in_month(2024, 2), 29);
        assert_eq!(month_to_day(2, true), 60);
        assert_eq!(month_to_day(11, false), 334);
    }

    #[test]
    fn day_of_week() {
        // Thursday
        assert_eq!(epoch_days_to_day_of_week(0), 4);
        // 2028-03-26 is a Sunday
        assert_eq!(epoch_days_to_day_of_week(21_269), 0);
    }
}
