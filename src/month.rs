use std::iter;

use crate::{
    CalendarDate, DAYS_IN_WEEK, DECEMBER, JANUARY, LAST_WEEKDAY_INDEX, MAX_YEAR, MONTH_NAMES,
    ParseError, prelude::*,
    types::{Day, Month, Year, days_in_month},
};

/// A calendar month, the anchor of one rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}", "year.get()", "month.get()")]
pub struct CalendarMonth {
    year:  Year,
    month: Month,
}

impl CalendarMonth {
    pub const fn new(year: Year, month: Month) -> Self {
        Self { year, month }
    }

    /// Creates a month from raw components.
    ///
    /// # Errors
    /// Returns `ParseError` if the year or month is out of range.
    pub fn from_ym(year: u16, month: u8) -> Result<Self, ParseError> {
        Ok(Self::new(Year::new(year)?, Month::new(month)?))
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// English month name, e.g. "February".
    pub const fn name(&self) -> &'static str {
        MONTH_NAMES[self.month.get() as usize]
    }

    /// Grid header, e.g. "February 2024".
    pub fn title(&self) -> String {
        format!("{} {}", self.name(), self.year)
    }

    pub const fn days_in_month(&self) -> u8 {
        days_in_month(self.year.get(), self.month.get())
    }

    pub const fn first_day(&self) -> CalendarDate {
        CalendarDate::from_trusted(self.year, self.month, Day::first())
    }

    pub const fn last_day(&self) -> CalendarDate {
        CalendarDate::from_trusted(self.year, self.month, Day::last_of(self.year, self.month))
    }

    /// Whether `date` falls in this month.
    pub const fn contains(&self, date: &CalendarDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// The following month, rolling December over into January.
    /// Returns `None` past December `MAX_YEAR`.
    pub fn succ(&self) -> Option<Self> {
        if self.month() == DECEMBER {
            if self.year() >= MAX_YEAR {
                return None;
            }
            return Self::from_ym(self.year() + 1, JANUARY).ok();
        }
        Self::from_ym(self.year(), self.month() + 1).ok()
    }

    /// The preceding month, rolling January back into December.
    /// Returns `None` before January of year 1.
    pub fn pred(&self) -> Option<Self> {
        if self.month() == JANUARY {
            return Self::from_ym(self.year().checked_sub(1)?, DECEMBER).ok();
        }
        Self::from_ym(self.year(), self.month() - 1).ok()
    }

    /// Day grid for this month.
    pub const fn grid(&self) -> MonthGrid {
        let leading_blanks = self.first_day().weekday().index();
        let trailing_blanks = LAST_WEEKDAY_INDEX - self.last_day().weekday().index();
        MonthGrid {
            month: *self,
            leading_blanks,
            trailing_blanks,
        }
    }
}

/// The days of one month laid out on a 7-column, Sunday-first grid.
///
/// `leading_blanks` empty cells precede day 1 and `trailing_blanks` follow
/// the last day, so the cell count is always a multiple of seven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthGrid {
    pub month:           CalendarMonth,
    pub leading_blanks:  u8,
    pub trailing_blanks: u8,
}

/// One row of a [`MonthGrid`]; `None` is a blank cell.
pub type Week = [Option<CalendarDate>; DAYS_IN_WEEK as usize];

impl MonthGrid {
    /// Number of dates in the month.
    pub const fn day_count(&self) -> usize {
        self.month.days_in_month() as usize
    }

    /// Every date of the month in order. Each call starts a fresh iterator.
    pub fn days(self) -> impl Iterator<Item = CalendarDate> + Clone {
        iter::successors(Some(self.month.first_day()), CalendarDate::succ)
            .take(self.day_count())
    }

    /// Every grid cell row by row, blanks included.
    pub fn cells(self) -> impl Iterator<Item = Option<CalendarDate>> + Clone {
        iter::repeat_n(None, usize::from(self.leading_blanks))
            .chain(self.days().map(Some))
            .chain(iter::repeat_n(None, usize::from(self.trailing_blanks)))
    }

    pub fn weeks(self) -> Vec<Week> {
        let cells: Vec<_> = self.cells().collect();
        cells
            .chunks_exact(usize::from(DAYS_IN_WEEK))
            .filter_map(|row| Week::try_from(row).ok())
            .collect()
    }

    pub const fn row_count(&self) -> usize {
        (self.leading_blanks as usize + self.day_count() + self.trailing_blanks as usize)
            / DAYS_IN_WEEK as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{cal_month, date};

    #[test]
    fn test_succ_wraps_december() {
        assert_eq!(cal_month(2024, 12).succ(), Some(cal_month(2025, 1)));
        assert_eq!(cal_month(2025, 1).succ(), Some(cal_month(2025, 2)));
        assert_eq!(cal_month(9999, 12).succ(), None);
    }

    #[test]
    fn test_pred_wraps_january() {
        assert_eq!(cal_month(2025, 1).pred(), Some(cal_month(2024, 12)));
        assert_eq!(cal_month(2025, 3).pred(), Some(cal_month(2025, 2)));
        assert_eq!(cal_month(1, 1).pred(), None);
    }

    #[test]
    fn test_first_and_last_day() {
        assert_eq!(cal_month(2024, 2).first_day(), date(2024, 2, 1));
        assert_eq!(cal_month(2024, 2).last_day(), date(2024, 2, 29));
        assert_eq!(cal_month(2025, 2).last_day(), date(2025, 2, 28));
        assert_eq!(cal_month(2025, 4).last_day(), date(2025, 4, 30));
    }

    #[test]
    fn test_display_and_title() {
        let month = cal_month(2024, 2);
        assert_eq!(month.to_string(), "2024-02");
        assert_eq!(month.name(), "February");
        assert_eq!(month.title(), "February 2024");
    }

    #[test]
    fn test_contains() {
        let month = cal_month(2025, 6);
        assert!(month.contains(&date(2025, 6, 30)));
        assert!(!month.contains(&date(2025, 7, 1)));
        assert!(!month.contains(&date(2024, 6, 1)));
    }

    #[test]
    fn test_grid_day_counts() {
        struct TestCase {
            year:  u16,
            month: u8,
            days:  usize,
        }

        let cases = [
            TestCase {
                year:  2024,
                month: 2,
                days:  29,
            },
            TestCase {
                year:  2025,
                month: 2,
                days:  28,
            },
            TestCase {
                year:  2025,
                month: 4,
                days:  30,
            },
            TestCase {
                year:  2025,
                month: 12,
                days:  31,
            },
        ];

        for case in &cases {
            let grid = cal_month(case.year, case.month).grid();
            assert_eq!(grid.days().count(), case.days, "{}-{:02}", case.year, case.month);
            assert_eq!(grid.day_count(), case.days);
        }
    }

    #[test]
    fn test_days_are_consecutive_and_restartable() {
        let grid = cal_month(2024, 2).grid();
        let days: Vec<_> = grid.days().collect();
        assert_eq!(days.first(), Some(&date(2024, 2, 1)));
        assert_eq!(days.last(), Some(&date(2024, 2, 29)));
        assert!(days.windows(2).all(|pair| pair[0].succ() == Some(pair[1])));

        let again: Vec<_> = grid.days().collect();
        assert_eq!(days, again);
    }

    #[test]
    fn test_grid_blanks() {
        // February 2024 starts on a Thursday and ends on a Thursday
        let grid = cal_month(2024, 2).grid();
        assert_eq!(grid.leading_blanks, 4);
        assert_eq!(grid.trailing_blanks, 2);
        assert_eq!(grid.row_count(), 5);

        // February 2015 fills exactly four rows
        let grid = cal_month(2015, 2).grid();
        assert_eq!(grid.leading_blanks, 0);
        assert_eq!(grid.trailing_blanks, 0);
        assert_eq!(grid.row_count(), 4);

        // March 2025 starts on a Saturday and needs six rows
        let grid = cal_month(2025, 3).grid();
        assert_eq!(grid.leading_blanks, 6);
        assert_eq!(grid.trailing_blanks, 5);
        assert_eq!(grid.row_count(), 6);
    }

    #[test]
    fn test_weeks_layout() {
        let weeks = cal_month(2024, 2).grid().weeks();
        assert_eq!(weeks.len(), 5);
        assert!(weeks[0][..4].iter().all(Option::is_none));
        assert_eq!(weeks[0][4], Some(date(2024, 2, 1)));
        assert_eq!(weeks[4][4], Some(date(2024, 2, 29)));
        assert!(weeks[4][5..].iter().all(Option::is_none));
    }

    #[test]
    fn test_cells_length_is_multiple_of_week() {
        for m in 1..=12 {
            let grid = cal_month(2025, m).grid();
            let cells = grid.cells().count();
            assert_eq!(cells % usize::from(DAYS_IN_WEEK), 0, "2025-{m:02}");
            assert_eq!(cells, grid.row_count() * usize::from(DAYS_IN_WEEK));
        }
    }
}
