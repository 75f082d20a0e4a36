//! Builders shared by the unit tests.

use crate::{CalendarDate, CalendarMonth, DateRange, Month, Year};

pub fn year(value: u16) -> Year {
    Year::new(value).expect("test year should be valid")
}

pub fn month(value: u8) -> Month {
    Month::new(value).expect("test month should be valid")
}

pub fn date(y: u16, m: u8, d: u8) -> CalendarDate {
    CalendarDate::new(y, m, d).expect("test date should be valid")
}

pub fn cal_month(y: u16, m: u8) -> CalendarMonth {
    CalendarMonth::from_ym(y, m).expect("test month should be valid")
}

pub fn range(start: (u16, u8, u8), end: (u16, u8, u8)) -> DateRange {
    DateRange::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2))
        .expect("test range should be ordered")
}
