//! The calendar engine behind every date field of the search forms.
//!
//! A [`DatePicker`] owns the state of one picker widget: selection mode,
//! bounds, the month shown on the left of the two-month view, the current
//! selection and the optional price overlay. Every operation runs to
//! completion synchronously. Notifications for the host form are queued in
//! emission order and collected with [`DatePicker::take_events`]; state is
//! always updated before the matching event is queued.

use std::mem;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    CalendarDate, CalendarMonth, ConfigError, DateRange, MonthGrid, PickerConfig, PriceOverlay,
    SelectionMode, prelude::*,
};

/// Which end of a range the next day click sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveEndpoint {
    #[default]
    #[display(fmt = "start")]
    Start,
    #[display(fmt = "end")]
    End,
}

/// A possibly partial range selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeSelection {
    pub start: Option<CalendarDate>,
    pub end:   Option<CalendarDate>,
}

impl RangeSelection {
    pub const fn empty() -> Self {
        Self {
            start: None,
            end:   None,
        }
    }

    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// The selection as a validated range once both endpoints are set.
    pub fn complete(&self) -> Option<DateRange> {
        DateRange::new(self.start?, self.end?).ok()
    }
}

/// Notifications a picker sends to the form that hosts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum PickerEvent {
    /// Single mode: a date was picked, applied, or cleared (`None`).
    DateSelected(Option<CalendarDate>),
    /// Range mode: both endpoints are set, the selection was applied, or it
    /// was cleared (both `None`).
    RangeSelected(RangeSelection),
    /// The picker closed, whether or not anything was applied.
    Closed,
}

/// Everything a renderer needs to draw one day cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCell {
    pub date:        CalendarDate,
    pub disabled:    bool,
    pub selected:    bool,
    pub range_start: bool,
    pub range_end:   bool,
    pub in_range:    bool,
    pub today:       bool,
    pub price:       Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Single(Option<CalendarDate>),
    Range(RangeSelection),
}

impl Selection {
    const fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Range(_) => SelectionMode::Range,
        }
    }

    /// The date the grid opens on.
    const fn anchor(&self) -> Option<CalendarDate> {
        match self {
            Self::Single(date) => *date,
            Self::Range(range) => range.start,
        }
    }

    const fn from_config(config: &PickerConfig) -> Self {
        match config.selection_mode {
            SelectionMode::Single => Self::Single(config.initial_start_date),
            SelectionMode::Range => Self::Range(RangeSelection {
                start: config.initial_start_date,
                end:   config.initial_end_date,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatePicker {
    selection:          Selection,
    active_endpoint:    ActiveEndpoint,
    visible_month:      CalendarMonth,
    min_date:           CalendarDate,
    max_date:           Option<CalendarDate>,
    today:              CalendarDate,
    is_open:            bool,
    show_price_overlay: bool,
    price_overlay:      PriceOverlay,
    events:             Vec<PickerEvent>,
}

impl DatePicker {
    /// Builds a closed picker from a validated configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration contradicts itself; see
    /// [`PickerConfig::validate`].
    pub fn new(config: PickerConfig, today: CalendarDate) -> Result<Self, ConfigError> {
        config.validate(today)?;

        let selection = Selection::from_config(&config);
        let visible_month = selection.anchor().unwrap_or(today).calendar_month();
        debug!(mode = %config.selection_mode, min = %config.min_date_or(today), "date picker created");

        Ok(Self {
            selection,
            active_endpoint: ActiveEndpoint::Start,
            visible_month,
            min_date: config.min_date_or(today),
            max_date: config.max_date,
            today,
            is_open: false,
            show_price_overlay: config.show_price_overlay,
            price_overlay: config.price_overlay,
            events: Vec::new(),
        })
    }

    /// Builds a picker using the local clock for "today".
    ///
    /// # Errors
    /// Returns `ConfigError` if the clock cannot be read or the configuration
    /// is invalid.
    pub fn from_clock(config: PickerConfig) -> Result<Self, ConfigError> {
        let today = CalendarDate::today()?;
        Self::new(config, today)
    }

    /// Replaces mode, bounds, initial values and overlay between two
    /// open/close cycles.
    ///
    /// # Errors
    /// Returns `ConfigError::PickerOpen` while open, or the validation error
    /// for an inconsistent configuration. The picker is unchanged on error.
    pub fn reconfigure(&mut self, config: PickerConfig) -> Result<(), ConfigError> {
        if self.is_open {
            return Err(ConfigError::PickerOpen);
        }
        let mut next = Self::new(config, self.today)?;
        next.events = mem::take(&mut self.events);
        *self = next;
        Ok(())
    }

    pub const fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// Switches between single and range selection while closed. The current
    /// selection carries over: a single date becomes a range start, a range
    /// start becomes the single date.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        if self.is_open {
            warn!(%mode, "selection mode cannot change while the picker is open");
            return;
        }
        self.selection = match (self.selection, mode) {
            (Selection::Single(date), SelectionMode::Range) => Selection::Range(RangeSelection {
                start: date,
                end:   None,
            }),
            (Selection::Range(range), SelectionMode::Single) => Selection::Single(range.start),
            (current, _) => current,
        };
        self.active_endpoint = ActiveEndpoint::Start;
    }

    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    pub const fn today(&self) -> CalendarDate {
        self.today
    }

    pub const fn min_date(&self) -> CalendarDate {
        self.min_date
    }

    pub const fn max_date(&self) -> Option<CalendarDate> {
        self.max_date
    }

    pub fn open(&mut self) {
        self.is_open = true;
        self.visible_month = self.selection.anchor().unwrap_or(self.today).calendar_month();
        self.active_endpoint = ActiveEndpoint::Start;
        debug!(month = %self.visible_month, "date picker opened");
    }

    /// Hides the picker and emits `Closed`. The selection is kept.
    pub fn close(&mut self) {
        self.is_open = false;
        self.active_endpoint = ActiveEndpoint::Start;
        self.emit(PickerEvent::Closed);
    }

    pub const fn visible_month(&self) -> CalendarMonth {
        self.visible_month
    }

    /// The month shown to the right of [`Self::visible_month`].
    pub fn next_visible_month(&self) -> Option<CalendarMonth> {
        self.visible_month.succ()
    }

    /// Grids for the two months on screen, left to right.
    pub fn visible_grids(&self) -> Vec<MonthGrid> {
        std::iter::once(self.visible_month)
            .chain(self.next_visible_month())
            .map(|month| month.grid())
            .collect()
    }

    /// Day layout for any month; see [`CalendarMonth::grid`].
    pub const fn visible_days(&self, month: CalendarMonth) -> MonthGrid {
        month.grid()
    }

    pub fn go_to_previous_month(&mut self) {
        if let Some(prev) = self.visible_month.pred() {
            self.visible_month = prev;
            trace!(month = %prev, "navigated back");
        }
    }

    pub fn go_to_next_month(&mut self) {
        if let Some(next) = self.visible_month.succ() {
            self.visible_month = next;
            trace!(month = %next, "navigated forward");
        }
    }

    /// False when every day of the previous month is before the min date.
    pub fn can_go_to_previous_month(&self) -> bool {
        self.visible_month
            .pred()
            .is_some_and(|prev| prev.last_day() >= self.min_date)
    }

    pub const fn active_endpoint(&self) -> ActiveEndpoint {
        self.active_endpoint
    }

    /// Chooses which range endpoint the next click sets. No-op in single mode.
    pub fn set_active_endpoint(&mut self, endpoint: ActiveEndpoint) {
        if matches!(self.selection, Selection::Range(_)) {
            self.active_endpoint = endpoint;
        }
    }

    pub fn select_day(&mut self, date: CalendarDate) {
        if self.is_date_disabled(date) {
            debug!(%date, "ignoring click on disabled date");
            return;
        }

        let event = match self.selection {
            Selection::Single(ref mut selected) => {
                *selected = Some(date);
                Some(PickerEvent::DateSelected(Some(date)))
            },
            Selection::Range(ref mut range) => match self.active_endpoint {
                ActiveEndpoint::Start => {
                    range.start = Some(date);
                    if range.end.is_some_and(|end| end < date) {
                        range.end = None;
                    }
                    self.active_endpoint = ActiveEndpoint::End;
                    None
                },
                ActiveEndpoint::End => {
                    match range.start {
                        // reversal: the earlier click becomes the end
                        Some(start) if date < start => {
                            range.start = Some(date);
                            range.end = Some(start);
                        },
                        Some(_) => range.end = Some(date),
                        None => range.start = Some(date),
                    }
                    range
                        .is_complete()
                        .then_some(PickerEvent::RangeSelected(*range))
                },
            },
        };

        debug!(%date, endpoint = %self.active_endpoint, "day selected");
        if let Some(event) = event {
            self.emit(event);
        }
    }

    pub fn clear_selection(&mut self) {
        let event = match self.selection {
            Selection::Single(_) => {
                self.selection = Selection::Single(None);
                PickerEvent::DateSelected(None)
            },
            Selection::Range(_) => {
                self.selection = Selection::Range(RangeSelection::empty());
                self.active_endpoint = ActiveEndpoint::Start;
                PickerEvent::RangeSelected(RangeSelection::empty())
            },
        };
        debug!("selection cleared");
        self.emit(event);
    }

    /// Emits the current selection, partial or complete, then closes.
    pub fn apply(&mut self) {
        let event = match self.selection {
            Selection::Single(date) => PickerEvent::DateSelected(date),
            Selection::Range(range) => PickerEvent::RangeSelected(range),
        };
        self.emit(event);
        self.close();
    }

    pub const fn can_apply(&self) -> bool {
        match self.selection {
            Selection::Single(date) => date.is_some(),
            Selection::Range(range) => range.is_complete(),
        }
    }

    pub const fn selected_date(&self) -> Option<CalendarDate> {
        match self.selection {
            Selection::Single(date) => date,
            Selection::Range(_) => None,
        }
    }

    pub const fn range_selection(&self) -> Option<RangeSelection> {
        match self.selection {
            Selection::Single(_) => None,
            Selection::Range(range) => Some(range),
        }
    }

    pub const fn selected_start(&self) -> Option<CalendarDate> {
        match self.selection {
            Selection::Single(_) => None,
            Selection::Range(range) => range.start,
        }
    }

    pub const fn selected_end(&self) -> Option<CalendarDate> {
        match self.selection {
            Selection::Single(_) => None,
            Selection::Range(range) => range.end,
        }
    }

    pub fn is_date_disabled(&self, date: CalendarDate) -> bool {
        date < self.min_date || self.max_date.is_some_and(|max| date > max)
    }

    pub fn is_date_selected(&self, date: CalendarDate) -> bool {
        if self.is_date_disabled(date) {
            return false;
        }
        match self.selection {
            Selection::Single(selected) => selected == Some(date),
            Selection::Range(range) => range.start == Some(date) || range.end == Some(date),
        }
    }

    pub fn is_range_start(&self, date: CalendarDate) -> bool {
        !self.is_date_disabled(date) && self.selected_start() == Some(date)
    }

    pub fn is_range_end(&self, date: CalendarDate) -> bool {
        !self.is_date_disabled(date) && self.selected_end() == Some(date)
    }

    /// Strictly between a complete range's endpoints.
    pub fn is_in_range(&self, date: CalendarDate) -> bool {
        self.range_selection()
            .and_then(|range| range.complete())
            .is_some_and(|range| range.contains_exclusive(&date))
    }

    pub fn price_for(&self, date: CalendarDate) -> Option<f64> {
        if !self.show_price_overlay {
            return None;
        }
        self.price_overlay.get(&date).copied()
    }

    pub fn set_price_overlay(&mut self, overlay: PriceOverlay) {
        self.price_overlay = overlay;
    }

    pub const fn set_show_price_overlay(&mut self, show: bool) {
        self.show_price_overlay = show;
    }

    pub fn day_cell(&self, date: CalendarDate) -> DayCell {
        DayCell {
            date,
            disabled: self.is_date_disabled(date),
            selected: self.is_date_selected(date),
            range_start: self.is_range_start(date),
            range_end: self.is_range_end(date),
            in_range: self.is_in_range(date),
            today: date == self.today,
            price: self.price_for(date),
        }
    }

    /// Drains queued events, oldest first.
    pub fn take_events(&mut self) -> Vec<PickerEvent> {
        mem::take(&mut self.events)
    }

    fn emit(&mut self, event: PickerEvent) {
        trace!(?event, "picker event");
        self.events.push(event);
    }
}
