//! Scheduling vocabulary shared across the workspace.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{CoreError, CoreResult};

/// Visit frequency, as resolvable from a seasonal period.
///
/// Fixed-step frequencies advance by a whole number of days; `Monthly` and
/// `Quarterly` advance by calendar months and so have no fixed day count.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Frequency {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "every_5_days")]
    Every5Days,
    #[serde(rename = "every_7_days")]
    Every7Days,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "biweekly")]
    Biweekly,
    #[serde(rename = "every_3_weeks")]
    Every3Weeks,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "quarterly")]
    Quarterly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Every5Days => "every_5_days",
            Self::Every7Days => "every_7_days",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Every3Weeks => "every_3_weeks",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }

    /// Day count for fixed-step frequencies, `None` for calendar-month ones.
    #[must_use]
    pub const fn step_days(self) -> Option<u64> {
        match self {
            Self::Daily => Some(1),
            Self::Every5Days => Some(5),
            Self::Every7Days | Self::Weekly => Some(7),
            Self::Biweekly => Some(14),
            Self::Every3Weeks => Some(21),
            Self::Monthly | Self::Quarterly => None,
        }
    }

    /// Month count for calendar-month frequencies, `None` for fixed-step ones.
    #[must_use]
    pub const fn step_months(self) -> Option<u32> {
        match self {
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            _ => None,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "every_5_days" => Ok(Self::Every5Days),
            "every_7_days" => Ok(Self::Every7Days),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "every_3_weeks" => Ok(Self::Every3Weeks),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            other => Err(CoreError::ValidationError(format!(
                "unrecognized frequency: {other}"
            ))),
        }
    }
}

/// The frequency subset legal on a fixed-recurrence schedule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RecurringFrequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
}

impl RecurringFrequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }
}

impl std::fmt::Display for RecurringFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurringFrequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            other => Err(CoreError::ValidationError(format!(
                "unrecognized recurring frequency: {other}"
            ))),
        }
    }
}

/// An annually repeating month/day window carrying an override frequency.
///
/// The year is ignored. A window may wrap the year boundary
/// (`start_month > end_month`), in which case membership is the union of
/// `[start ..= Dec 31]` and `[Jan 1 ..= end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeasonalPeriod {
    pub start_month: u32,
    pub start_day: u32,
    pub end_month: u32,
    pub end_day: u32,
    pub frequency: Frequency,
}

impl SeasonalPeriod {
    /// Whether this window wraps the year boundary.
    #[must_use]
    pub const fn wraps_year(&self) -> bool {
        self.start_month > self.end_month
    }

    /// Month/day membership test, ignoring the year.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        let md = (date.month(), date.day());
        let start = (self.start_month, self.start_day);
        let end = (self.end_month, self.end_day);

        if self.wraps_year() {
            md >= start || md <= end
        } else {
            md >= start && md <= end
        }
    }
}

/// Lifecycle state of a generated appointment.
///
/// The generation core only ever creates appointments at `Scheduled`; every
/// later transition belongs to the administrative surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Skipped,
}

impl AppointmentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a schedule recurs. Exactly one variant governs a schedule, and each
/// variant carries only the fields meaningful to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recurrence {
    /// Single-shot: one appointment on the schedule's start date.
    Manual,
    /// Fixed recurrence at one of the [`RecurringFrequency`] intervals.
    Recurring {
        frequency: RecurringFrequency,
        /// Defaults to the weekday of the schedule's start date.
        day_of_week: Option<Weekday>,
        /// Nth occurrence within the month (1-4), `Monthly` only. Defaults to 1.
        week_of_month: Option<u8>,
    },
    /// Frequency resolved per-date from an ordered set of seasonal periods.
    /// Declared order is also the overlap-resolution order.
    Seasonal { periods: Vec<SeasonalPeriod> },
}

impl Recurrence {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Recurring { .. } => "recurring",
            Self::Seasonal { .. } => "seasonal",
        }
    }
}

/// Inclusive calendar date range for a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// ## Errors
    /// Returns [`CoreError::InvalidDateWindow`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidDateWindow { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Maps a stored weekday index (0 = Sunday .. 6 = Saturday) to [`Weekday`].
#[must_use]
pub const fn weekday_from_sunday_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn winter_period() -> SeasonalPeriod {
        SeasonalPeriod {
            start_month: 12,
            start_day: 1,
            end_month: 1,
            end_day: 31,
            frequency: Frequency::Monthly,
        }
    }

    #[test]
    fn test_wrapping_period_contains_both_sides_of_new_year() {
        let period = winter_period();
        assert!(period.contains_date(date(2025, 12, 1)));
        assert!(period.contains_date(date(2025, 12, 31)));
        assert!(period.contains_date(date(2026, 1, 1)));
        assert!(period.contains_date(date(2026, 1, 31)));
    }

    #[test]
    fn test_wrapping_period_excludes_adjacent_days() {
        let period = winter_period();
        assert!(!period.contains_date(date(2025, 11, 30)));
        assert!(!period.contains_date(date(2026, 2, 1)));
    }

    #[test]
    fn test_non_wrapping_period_bounds_are_inclusive() {
        let period = SeasonalPeriod {
            start_month: 4,
            start_day: 15,
            end_month: 9,
            end_day: 30,
            frequency: Frequency::Weekly,
        };
        assert!(period.contains_date(date(2026, 4, 15)));
        assert!(period.contains_date(date(2026, 9, 30)));
        assert!(period.contains_date(date(2027, 6, 1)));
        assert!(!period.contains_date(date(2026, 4, 14)));
        assert!(!period.contains_date(date(2026, 10, 1)));
    }

    #[test]
    fn test_frequency_step_days() {
        assert_eq!(Frequency::Daily.step_days(), Some(1));
        assert_eq!(Frequency::Every5Days.step_days(), Some(5));
        assert_eq!(Frequency::Every3Weeks.step_days(), Some(21));
        assert_eq!(Frequency::Monthly.step_days(), None);
        assert_eq!(Frequency::Quarterly.step_months(), Some(3));
    }

    #[test]
    fn test_frequency_parses_stored_names() {
        assert_eq!(
            "every_5_days".parse::<Frequency>().expect("parses"),
            Frequency::Every5Days
        );
        assert!("fortnightly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_date_window_rejects_inverted_range() {
        assert!(DateWindow::new(date(2026, 5, 2), date(2026, 5, 1)).is_err());
        let window =
            DateWindow::new(date(2026, 5, 1), date(2026, 5, 31)).expect("valid window");
        assert!(window.contains(date(2026, 5, 1)));
        assert!(window.contains(date(2026, 5, 31)));
        assert!(!window.contains(date(2026, 6, 1)));
    }

    #[test]
    fn test_weekday_index_mapping_is_sunday_based() {
        assert_eq!(weekday_from_sunday_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_sunday_index(1), Some(Weekday::Mon));
        assert_eq!(weekday_from_sunday_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_sunday_index(7), None);
    }
}
