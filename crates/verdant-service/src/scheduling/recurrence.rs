//! Next-occurrence arithmetic for fixed-recurrence schedules.
//!
//! Pure functions over [`NaiveDate`]. The generator owns the iteration; this
//! module only answers "what is the next candidate on/after this date" and
//! "where does the cursor go after that candidate".

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use verdant_core::types::RecurringFrequency;

/// A recurring schedule's parameters with defaults resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringRule {
    pub frequency: RecurringFrequency,
    pub day_of_week: Weekday,
    /// Nth occurrence within the month, 1-4. Only meaningful for `Monthly`.
    pub week_of_month: u8,
}

impl RecurringRule {
    /// Resolves optional schedule fields: `day_of_week` defaults to the
    /// weekday of `start_date`, `week_of_month` defaults to 1 and is clamped
    /// to the 1-4 range every month can satisfy.
    #[must_use]
    pub fn new(
        frequency: RecurringFrequency,
        day_of_week: Option<Weekday>,
        week_of_month: Option<u8>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            frequency,
            day_of_week: day_of_week.unwrap_or_else(|| start_date.weekday()),
            week_of_month: week_of_month.unwrap_or(1).clamp(1, 4),
        }
    }

    /// ## Summary
    /// Computes the next candidate appointment date for a reference date.
    ///
    /// - `Weekly`: first date on/after `cursor` falling on the target weekday.
    /// - `Biweekly`: the weekly candidate, pushed one week when the whole-week
    ///   distance from the schedule's first aligned occurrence is odd, so only
    ///   even-parity weeks relative to `start_date` are ever chosen.
    /// - `Monthly`: the Nth target weekday of the month after `cursor`'s month.
    /// - `Quarterly`: `cursor` plus three calendar months, no weekday
    ///   semantics.
    ///
    /// Returns `None` only on calendar overflow.
    #[must_use]
    pub fn next_occurrence(&self, start_date: NaiveDate, cursor: NaiveDate) -> Option<NaiveDate> {
        match self.frequency {
            RecurringFrequency::Weekly => weekday_on_or_after(cursor, self.day_of_week),
            RecurringFrequency::Biweekly => {
                let candidate = weekday_on_or_after(cursor, self.day_of_week)?;
                let anchor = weekday_on_or_after(start_date, self.day_of_week)?;
                let weeks = (candidate - anchor).num_days() / 7;
                if weeks.rem_euclid(2) == 1 {
                    candidate.checked_add_days(Days::new(7))
                } else {
                    Some(candidate)
                }
            }
            RecurringFrequency::Monthly => {
                let (year, month) = month_after(cursor);
                nth_weekday_of_month(year, month, self.day_of_week, self.week_of_month)
            }
            RecurringFrequency::Quarterly => cursor.checked_add_months(Months::new(3)),
        }
    }

    /// ## Summary
    /// Where the generator's cursor moves once `candidate` has been handled.
    ///
    /// Weekly and biweekly advance by their fixed step. Monthly and quarterly
    /// move the cursor onto the candidate itself: the next occurrence is
    /// computed from the candidate's month, which keeps the iteration anchored
    /// to the calendar rather than to a day count.
    #[must_use]
    pub fn advance_cursor(&self, candidate: NaiveDate) -> Option<NaiveDate> {
        match self.frequency {
            RecurringFrequency::Weekly => candidate.checked_add_days(Days::new(7)),
            RecurringFrequency::Biweekly => candidate.checked_add_days(Days::new(14)),
            RecurringFrequency::Monthly | RecurringFrequency::Quarterly => Some(candidate),
        }
    }
}

/// First date on/after `date` falling on `weekday`.
fn weekday_on_or_after(date: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let ahead = u64::from(
        (7 + weekday.num_days_from_monday() - date.weekday().num_days_from_monday()) % 7,
    );
    date.checked_add_days(Days::new(ahead))
}

/// The month immediately following `date`'s month.
fn month_after(date: NaiveDate) -> (i32, u32) {
    if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    }
}

/// ## Summary
/// The Nth occurrence of `weekday` within a month.
///
/// Every month holds at least four of each weekday, so `n` in 1-4 always
/// resolves. An out-of-range `n` walks back week by week until the date lands
/// inside the month, i.e. it clamps to the last valid occurrence rather than
/// skipping the month.
fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_match = weekday_on_or_after(first, weekday)?;
    let mut candidate =
        first_match.checked_add_days(Days::new(7 * u64::from(n.saturating_sub(1))))?;
    while candidate.month() != month {
        candidate = candidate.checked_sub_days(Days::new(7))?;
    }
    Some(candidate)
}
