use crate::CalendarDate;

/// A completed date range (inclusive on both ends).
/// The start date is always less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateRange {
    start: CalendarDate,
    end:   CalendarDate,
}

/// Error type for date range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start date is after end date.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: CalendarDate, end: CalendarDate },
}

impl DateRange {
    /// Creates a new date range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the start date of the range
    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    /// Returns the end date of the range
    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    /// Checks if a date lies strictly between the endpoints
    pub fn contains_exclusive(&self, date: &CalendarDate) -> bool {
        self.start < *date && *date < self.end
    }

    /// Number of nights between the endpoints, e.g. a hotel stay length.
    pub const fn nights(&self) -> u32 {
        // start <= end, so the difference is never negative
        self.start.days_until(&self.end).unsigned_abs() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, range};

    #[test]
    fn test_new_range_cases() {
        struct TestCase {
            start:          (u16, u8, u8),
            end:            (u16, u8, u8),
            should_succeed: bool,
            description:    &'static str,
        }

        let cases = [
            TestCase {
                start:          (2025, 6, 1),
                end:            (2025, 6, 10),
                should_succeed: true,
                description:    "valid range (start < end)",
            },
            TestCase {
                start:          (2025, 6, 10),
                end:            (2025, 6, 1),
                should_succeed: false,
                description:    "invalid range (start > end)",
            },
            TestCase {
                start:          (2025, 6, 1),
                end:            (2025, 6, 1),
                should_succeed: true,
                description:    "equal dates (start == end)",
            },
        ];

        for case in &cases {
            let (sy, sm, sd) = case.start;
            let (ey, em, ed) = case.end;
            let result = DateRange::new(date(sy, sm, sd), date(ey, em, ed));

            if case.should_succeed {
                assert!(result.is_ok(), "Expected success for: {}", case.description);
            } else {
                assert!(result.is_err(), "Expected failure for: {}", case.description);
            }
        }
    }

    #[test]
    fn test_invalid_range_error() {
        let err = DateRange::new(date(2025, 1, 10), date(2025, 1, 5)).unwrap_err();
        assert_eq!(
            err,
            RangeError::InvalidRange {
                start: date(2025, 1, 10),
                end:   date(2025, 1, 5),
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid date range: start (2025-01-10) is after end (2025-01-05)"
        );
    }

    #[test]
    fn test_accessors() {
        let stay = range((2025, 1, 5), (2025, 1, 10));
        assert_eq!(stay.start(), date(2025, 1, 5));
        assert_eq!(stay.end(), date(2025, 1, 10));
    }

    #[test]
    fn test_contains_exclusive() {
        let stay = range((2025, 3, 10), (2025, 3, 20));

        assert!(!stay.contains_exclusive(&date(2025, 3, 9)));
        assert!(!stay.contains_exclusive(&date(2025, 3, 10)));
        assert!(stay.contains_exclusive(&date(2025, 3, 11)));
        assert!(stay.contains_exclusive(&date(2025, 3, 19)));
        assert!(!stay.contains_exclusive(&date(2025, 3, 20)));
        assert!(!stay.contains_exclusive(&date(2025, 3, 21)));

        let one_day = range((2025, 3, 10), (2025, 3, 10));
        assert!(!one_day.contains_exclusive(&date(2025, 3, 10)));
    }

    #[test]
    fn test_nights() {
        assert_eq!(range((2025, 6, 1), (2025, 6, 1)).nights(), 0);
        assert_eq!(range((2025, 6, 1), (2025, 6, 10)).nights(), 9);
        assert_eq!(range((2024, 2, 28), (2024, 3, 1)).nights(), 2);
        assert_eq!(range((2025, 12, 30), (2026, 1, 2)).nights(), 3);
    }

    #[test]
    fn test_ordering() {
        let first = range((2025, 1, 1), (2025, 1, 10));
        let same_start = range((2025, 1, 1), (2025, 1, 20));
        let later = range((2025, 2, 1), (2025, 2, 2));

        assert!(first < same_start);
        assert!(same_start < later);
    }
}
