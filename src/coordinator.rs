//! Reconciliation of the two linked date fields on a search form.
//!
//! Flight, hotel and package forms each hold a [`DatePair`]: departure and
//! return, or check-in and check-out. Every edit goes through
//! [`DatePair::reconcile`], so the pair stays ordered no matter which field
//! the user touched last. The pair never reaches into a picker; it builds the
//! [`PickerConfig`] a picker opens with and reads back the events it emits.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CalendarDate, DateRange, PickerConfig, PickerEvent, RangeSelection, prelude::*};

/// Which search form owns the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    #[display(fmt = "flight")]
    Flight,
    #[display(fmt = "hotel")]
    Hotel,
    #[display(fmt = "package")]
    Package,
}

impl SearchKind {
    /// Field labels, first then second.
    pub const fn labels(self) -> (&'static str, &'static str) {
        match self {
            Self::Flight | Self::Package => ("Departure", "Return"),
            Self::Hotel => ("Check-in", "Check-out"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    #[default]
    #[display(fmt = "round trip")]
    RoundTrip,
    #[display(fmt = "one way")]
    OneWay,
}

/// A single user edit to a [`DatePair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairEdit {
    /// A departure / check-in date was committed.
    First(CalendarDate),
    /// A return / check-out date was committed.
    Second(CalendarDate),
    /// A range picker reported both fields at once.
    Range(RangeSelection),
    TripType(TripType),
    ClearFirst,
    ClearSecond,
}

/// Which field of the pair a single-date picker is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairField {
    First,
    Second,
}

/// The linked dates of one search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatePair {
    pub kind:      SearchKind,
    pub first:     Option<CalendarDate>,
    pub second:    Option<CalendarDate>,
    pub trip_type: TripType,
}

impl DatePair {
    pub const fn new(kind: SearchKind) -> Self {
        Self {
            kind,
            first: None,
            second: None,
            trip_type: TripType::RoundTrip,
        }
    }

    /// Applies one edit and returns the reconciled pair.
    ///
    /// - A new first date past the current second date pushes the second
    ///   date to the day after the new first date.
    /// - A second date before the first date swaps the two.
    /// - Going one-way clears the second date; picking a second date on a
    ///   one-way trip makes it a round trip again.
    #[must_use]
    pub fn reconcile(self, edit: PairEdit) -> Self {
        let mut next = self;
        match edit {
            PairEdit::First(date) => {
                next.first = Some(date);
                if let Some(second) = next.second
                    && second < date
                {
                    next.second = date.succ();
                    debug!(kind = %self.kind, %second, adjusted = ?next.second, "second date pushed past first");
                }
            },
            PairEdit::Second(date) => {
                if next.trip_type == TripType::OneWay {
                    next.trip_type = TripType::RoundTrip;
                }
                match next.first {
                    Some(first) if date < first => {
                        next.first = Some(date);
                        next.second = Some(first);
                    },
                    _ => next.second = Some(date),
                }
            },
            PairEdit::Range(RangeSelection { start, end }) => {
                next = match (start, end) {
                    (Some(start), Some(end)) => next.reconcile(PairEdit::First(start)).reconcile(PairEdit::Second(end)),
                    (Some(start), None) => Self {
                        second: None,
                        ..next.reconcile(PairEdit::First(start))
                    },
                    (None, Some(end)) => next.reconcile(PairEdit::Second(end)),
                    (None, None) => Self {
                        first: None,
                        second: None,
                        ..next
                    },
                };
            },
            PairEdit::TripType(trip_type) => {
                next.trip_type = trip_type;
                if trip_type == TripType::OneWay && next.second.take().is_some() {
                    debug!(kind = %self.kind, "one-way trip cleared second date");
                }
            },
            PairEdit::ClearFirst => next.first = None,
            PairEdit::ClearSecond => next.second = None,
        }
        next
    }

    /// Folds a picker notification for `field` into the pair.
    #[must_use]
    pub fn apply_event(self, field: PairField, event: &PickerEvent) -> Self {
        let edit = match (*event, field) {
            (PickerEvent::DateSelected(Some(date)), PairField::First) => PairEdit::First(date),
            (PickerEvent::DateSelected(Some(date)), PairField::Second) => PairEdit::Second(date),
            (PickerEvent::DateSelected(None), PairField::First) => PairEdit::ClearFirst,
            (PickerEvent::DateSelected(None), PairField::Second) => PairEdit::ClearSecond,
            (PickerEvent::RangeSelected(selection), _) => PairEdit::Range(selection),
            (PickerEvent::Closed, _) => return self,
        };
        self.reconcile(edit)
    }

    /// Config for the departure / check-in picker.
    pub fn first_picker_config(&self, today: CalendarDate) -> PickerConfig {
        PickerConfig::single()
            .with_min_date(today)
            .with_initial_start(self.first.filter(|date| *date >= today))
    }

    /// Config for the return / check-out picker: nothing before the first date.
    pub fn second_picker_config(&self, today: CalendarDate) -> PickerConfig {
        let min = self.first.map_or(today, |first| first.max(today));
        PickerConfig::single()
            .with_min_date(min)
            .with_initial_start(self.second.filter(|date| *date >= min))
    }

    /// Config for a form that picks both dates with one range picker.
    pub fn range_picker_config(&self, today: CalendarDate) -> PickerConfig {
        let start = self.first.filter(|date| *date >= today);
        let end = start.and(self.second).filter(|end| start.is_some_and(|start| *end >= start));
        PickerConfig::range()
            .with_min_date(today)
            .with_initial_start(start)
            .with_initial_end(end)
    }

    /// Whether the form has every date it needs to search.
    pub const fn is_complete(&self) -> bool {
        match self.trip_type {
            TripType::OneWay => self.first.is_some(),
            TripType::RoundTrip => self.first.is_some() && self.second.is_some(),
        }
    }

    pub fn as_range(&self) -> Option<DateRange> {
        DateRange::new(self.first?, self.second?).ok()
    }

    /// Length of the stay or trip in nights.
    pub fn nights(&self) -> Option<u32> {
        self.as_range().map(|range| range.nights())
    }
}
