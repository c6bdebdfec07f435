//! Resolution of seasonal periods against concrete dates.

use chrono::{Days, Months, NaiveDate};
use verdant_core::types::{Frequency, SeasonalPeriod};

/// ## Summary
/// The seasonal period governing `date`, if any.
///
/// The data model does not forbid overlapping periods; the first match in
/// declared order wins, so period order is load-bearing.
#[must_use]
pub fn active_period(periods: &[SeasonalPeriod], date: NaiveDate) -> Option<&SeasonalPeriod> {
    periods.iter().find(|period| period.contains_date(date))
}

/// ## Summary
/// Advances a date by one step of the given frequency.
///
/// Fixed frequencies advance by their day count; `Monthly` and `Quarterly`
/// advance by calendar months. Returns `None` only on calendar overflow.
#[must_use]
pub fn seasonal_step(frequency: Frequency, from: NaiveDate) -> Option<NaiveDate> {
    if let Some(days) = frequency.step_days() {
        from.checked_add_days(Days::new(days))
    } else {
        frequency
            .step_months()
            .and_then(|months| from.checked_add_months(Months::new(months)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn period(
        start_month: u32,
        start_day: u32,
        end_month: u32,
        end_day: u32,
        frequency: Frequency,
    ) -> SeasonalPeriod {
        SeasonalPeriod {
            start_month,
            start_day,
            end_month,
            end_day,
            frequency,
        }
    }

    #[test]
    fn test_first_declared_period_wins_on_overlap() {
        let periods = vec![
            period(3, 1, 6, 30, Frequency::Weekly),
            period(5, 1, 9, 30, Frequency::Every5Days),
        ];
        // May is claimed by both; declared order resolves the ambiguity.
        let winner =
            active_period(&periods, date(2026, 5, 15)).expect("a period covers mid-May");
        assert_eq!(winner.frequency, Frequency::Weekly);

        // Past the first period's end, the second one takes over.
        let winner = active_period(&periods, date(2026, 8, 1)).expect("summer is covered");
        assert_eq!(winner.frequency, Frequency::Every5Days);
    }

    #[test]
    fn test_gap_between_periods_resolves_to_none() {
        let periods = vec![
            period(2, 1, 3, 31, Frequency::Weekly),
            period(5, 1, 9, 30, Frequency::Every5Days),
        ];
        assert!(active_period(&periods, date(2026, 4, 10)).is_none());
    }

    #[test]
    fn test_wrapping_period_resolves_across_new_year() {
        let periods = vec![period(12, 1, 1, 31, Frequency::Monthly)];
        assert!(active_period(&periods, date(2025, 12, 15)).is_some());
        assert!(active_period(&periods, date(2026, 1, 15)).is_some());
        assert!(active_period(&periods, date(2026, 2, 15)).is_none());
    }

    #[test]
    fn test_seasonal_step_matches_frequency() {
        let from = date(2026, 4, 1);
        assert_eq!(
            seasonal_step(Frequency::Every5Days, from),
            Some(date(2026, 4, 6))
        );
        assert_eq!(seasonal_step(Frequency::Weekly, from), Some(date(2026, 4, 8)));
        assert_eq!(
            seasonal_step(Frequency::Monthly, from),
            Some(date(2026, 5, 1))
        );
        assert_eq!(
            seasonal_step(Frequency::Quarterly, from),
            Some(date(2026, 7, 1))
        );
    }
}
