//! Expansion of the POSIX TZ string footer into explicit transitions.
//!
//! Slim TZif files stop listing transitions once the footer rule can
//! describe them, so the rule is unrolled here for a fixed window of
//! years past the last listed transition.

use tzif::data::posix::{PosixTzString, TransitionDate, TransitionDay};

use crate::{provider::RawTransitions, utils};

/// Number of years past the last listed transition to unroll DST rules for.
pub const RULE_EXPANSION_YEARS: i32 = 400;

/// Upper bound on the number of years a DST rule is unrolled for.
pub const MAX_RULE_EXPANSION_YEARS: i32 = 2000;

/// The standard time offset of a POSIX TZ string, in seconds east of UTC.
pub(crate) fn std_offset(posix_tz_string: &PosixTzString) -> i64 {
    // The POSIX tz string stores offsets as negative offsets;
    // i.e. "seconds that must be added to reach UTC"
    -posix_tz_string.std_info.offset.0
}

pub(crate) fn has_dst_rule(posix_tz_string: &PosixTzString) -> bool {
    posix_tz_string.dst_info.is_some()
}

/// Appends the DST transitions of `posix_tz_string` for the years
/// `first_year..=first_year + years` to `transitions`.
///
/// The footer only governs instants after the last listed transition
/// (RFC 8536 §3.3), so rule transitions at or before `after` are skipped.
pub(crate) fn expand_rule(
    posix_tz_string: &PosixTzString,
    first_year: i32,
    years: i32,
    after: i64,
    transitions: &mut RawTransitions,
) {
    let Some(dst_variant) = &posix_tz_string.dst_info else {
        return;
    };
    let std_offset = std_offset(posix_tz_string);
    let dst_offset = -dst_variant.variant_info.offset.0;

    for year in first_year..=first_year.saturating_add(years) {
        let dst_start =
            calculate_transition_seconds_for_year(year, dst_variant.start_date, std_offset);
        let dst_end = calculate_transition_seconds_for_year(year, dst_variant.end_date, dst_offset);
        // Southern hemisphere rules end DST before they start it.
        let ordered = if dst_start <= dst_end {
            [(dst_start, dst_offset), (dst_end, std_offset)]
        } else {
            [(dst_end, std_offset), (dst_start, dst_offset)]
        };
        for (time, offset) in ordered {
            if time > after {
                transitions.push(time, offset);
            }
        }
    }
}

/// Returns the UTC epoch seconds of a rule transition in `year`, where
/// `offset` is the UTC offset in effect right before the transition.
pub(crate) fn calculate_transition_seconds_for_year(
    year: i32,
    transition_date: TransitionDate,
    offset: i64,
) -> i64 {
    let year_epoch_days = utils::epoch_days_from_gregorian_date(year, 1, 1);
    let year_epoch_seconds = year_epoch_days * utils::SECONDS_PER_DAY;
    let is_leap = utils::is_leap(year);

    // Zero-indexed so it can be added to the year's epoch seconds.
    let days = match transition_date.day {
        // Jn: February 29th is never counted.
        TransitionDay::NoLeap(day) if day > 59 => day - 1 + u16::from(is_leap),
        TransitionDay::NoLeap(day) => day.saturating_sub(1),
        // n: already zero-indexed, leap days counted.
        TransitionDay::WithLeap(day) => day,
        TransitionDay::Mwd(month, week, day) => {
            let month = month.clamp(1, 12) as u8;
            let week = week.clamp(1, 5);
            let day = day.min(6);
            let days_to_month = utils::month_to_day(month - 1, is_leap);
            let days_in_month = u16::from(utils::iso_days_in_month(year, month));

            // Day of the week the month starts on.
            let day_offset = u16::from(utils::epoch_days_to_day_of_week(
                year_epoch_days + i64::from(days_to_month),
            ));

            // Zero-indexed day of the month of the `week`th `day`. When the
            // month starts after `day` in the week, the first occurrence
            // falls into the second calendar week.
            let mut day_of_month = (week - u16::from(day_offset <= day)) * 7 + day - day_offset;

            // Week 5 means "last <dayofweek> of the month", which may spill
            // into the next month. Every month has at least four of each
            // weekday, so stepping back once is enough.
            if day_of_month + 1 > days_in_month {
                day_of_month -= 7
            }

            days_to_month + day_of_month
        }
    };

    // The transition time is given in local time, so subtract the UTC
    // offset to get the UTC timestamp.
    year_epoch_seconds + i64::from(days) * utils::SECONDS_PER_DAY + transition_date.time.0 - offset
}
