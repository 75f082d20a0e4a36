use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, ParseError, prelude::*};

/// Per-date price annotations shown under day numbers.
pub type PriceOverlay = BTreeMap<CalendarDate, f64>;

/// Whether the picker captures one date or a start/end pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    #[display(fmt = "single")]
    Single,
    #[display(fmt = "range")]
    Range,
}

/// Inputs a search form supplies when it builds a picker.
///
/// An absent `min_date` means "today" as seen by the picker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub selection_mode:     SelectionMode,
    pub min_date:           Option<CalendarDate>,
    pub max_date:           Option<CalendarDate>,
    pub initial_start_date: Option<CalendarDate>,
    pub initial_end_date:   Option<CalendarDate>,
    pub show_price_overlay: bool,
    pub price_overlay:      PriceOverlay,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max date {max} is before min date {min}")]
    MaxBeforeMin { min: CalendarDate, max: CalendarDate },

    #[error("initial start {start} is after initial end {end}")]
    InitialOrder { start: CalendarDate, end: CalendarDate },

    #[error("initial date {date} is outside the selectable window")]
    InitialOutOfBounds { date: CalendarDate },

    #[error("initial end date {0} given for a single-date picker")]
    EndDateInSingleMode(CalendarDate),

    #[error("picker must be closed before it is reconfigured")]
    PickerOpen,

    #[error("could not determine today's date: {0}")]
    Clock(#[from] ParseError),
}

impl PickerConfig {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn range() -> Self {
        Self {
            selection_mode: SelectionMode::Range,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_min_date(mut self, date: CalendarDate) -> Self {
        self.min_date = Some(date);
        self
    }

    #[must_use]
    pub const fn with_max_date(mut self, date: CalendarDate) -> Self {
        self.max_date = Some(date);
        self
    }

    #[must_use]
    pub const fn with_initial_start(mut self, date: Option<CalendarDate>) -> Self {
        self.initial_start_date = date;
        self
    }

    #[must_use]
    pub const fn with_initial_end(mut self, date: Option<CalendarDate>) -> Self {
        self.initial_end_date = date;
        self
    }

    #[must_use]
    pub fn with_price_overlay(mut self, overlay: PriceOverlay) -> Self {
        self.show_price_overlay = true;
        self.price_overlay = overlay;
        self
    }

    /// The effective lower bound once `today` is known.
    pub fn min_date_or(&self, today: CalendarDate) -> CalendarDate {
        self.min_date.unwrap_or(today)
    }

    /// Checks the configuration for contradictions before a picker is built.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found: inverted bounds, inverted
    /// initial dates, initial dates outside the bounds, or an end date on a
    /// single-date picker.
    pub fn validate(&self, today: CalendarDate) -> Result<(), ConfigError> {
        let min = self.min_date_or(today);

        if let Some(max) = self.max_date
            && max < min
        {
            return Err(ConfigError::MaxBeforeMin { min, max });
        }

        if self.selection_mode == SelectionMode::Single
            && let Some(end) = self.initial_end_date
        {
            return Err(ConfigError::EndDateInSingleMode(end));
        }

        if let (Some(start), Some(end)) = (self.initial_start_date, self.initial_end_date)
            && start > end
        {
            return Err(ConfigError::InitialOrder { start, end });
        }

        let out_of_bounds = |date: &CalendarDate| *date < min || self.max_date.is_some_and(|max| *date > max);
        if let Some(date) = [self.initial_start_date, self.initial_end_date]
            .into_iter()
            .flatten()
            .find(out_of_bounds)
        {
            return Err(ConfigError::InitialOutOfBounds { date });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    fn today() -> CalendarDate {
        date(2025, 1, 1)
    }

    #[test]
    fn test_default_is_single_unbounded() {
        let config = PickerConfig::default();
        assert_eq!(config.selection_mode, SelectionMode::Single);
        assert_eq!(config.min_date, None);
        assert_eq!(config.min_date_or(today()), today());
        assert!(config.validate(today()).is_ok());
    }

    #[test]
    fn test_validate_cases() {
        struct TestCase {
            config:      PickerConfig,
            is_valid:    bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                config:      PickerConfig::range()
                    .with_min_date(date(2025, 1, 1))
                    .with_max_date(date(2025, 12, 31))
                    .with_initial_start(Some(date(2025, 3, 1)))
                    .with_initial_end(Some(date(2025, 3, 5))),
                is_valid:    true,
                description: "consistent range config",
            },
            TestCase {
                config:      PickerConfig::single().with_max_date(date(2024, 12, 31)),
                is_valid:    false,
                description: "max before defaulted min",
            },
            TestCase {
                config:      PickerConfig::single()
                    .with_min_date(date(2025, 2, 1))
                    .with_max_date(date(2025, 2, 1)),
                is_valid:    true,
                description: "single selectable day",
            },
            TestCase {
                config:      PickerConfig::range()
                    .with_initial_start(Some(date(2025, 3, 5)))
                    .with_initial_end(Some(date(2025, 3, 1))),
                is_valid:    false,
                description: "inverted initial dates",
            },
            TestCase {
                config:      PickerConfig::single().with_initial_start(Some(date(2024, 6, 1))),
                is_valid:    false,
                description: "initial date before min",
            },
            TestCase {
                config:      PickerConfig::range()
                    .with_max_date(date(2025, 6, 30))
                    .with_initial_end(Some(date(2025, 7, 1))),
                is_valid:    false,
                description: "initial end after max",
            },
            TestCase {
                config:      PickerConfig::single().with_initial_end(Some(date(2025, 3, 1))),
                is_valid:    false,
                description: "end date on single picker",
            },
        ];

        for case in &cases {
            assert_eq!(
                case.config.validate(today()).is_ok(),
                case.is_valid,
                "{}",
                case.description
            );
        }
    }

    #[test]
    fn test_validate_reports_specific_error() {
        let config = PickerConfig::range()
            .with_min_date(date(2025, 5, 1))
            .with_max_date(date(2025, 4, 1));
        assert_eq!(
            config.validate(today()),
            Err(ConfigError::MaxBeforeMin {
                min: date(2025, 5, 1),
                max: date(2025, 4, 1),
            })
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "selection_mode": "range",
            "min_date": "2025-01-01",
            "initial_start_date": "2025-01-10",
            "price_overlay": { "2025-01-10": 129.5 }
        }"#;
        let config: PickerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.selection_mode, SelectionMode::Range);
        assert_eq!(config.min_date, Some(date(2025, 1, 1)));
        assert_eq!(config.max_date, None);
        assert_eq!(config.initial_start_date, Some(date(2025, 1, 10)));
        assert!(!config.show_price_overlay);
        assert_eq!(config.price_overlay.get(&date(2025, 1, 10)), Some(&129.5));
    }

    #[test]
    fn test_deserialize_rejects_bad_date() {
        let json = r#"{ "min_date": "2025-02-30" }"#;
        let result: Result<PickerConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_selection_mode_display() {
        assert_eq!(SelectionMode::Single.to_string(), "single");
        assert_eq!(SelectionMode::Range.to_string(), "range");
    }
}
