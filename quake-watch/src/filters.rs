//! Filter state: which events to ask the catalog for.
//!
//! The date is a calendar day in the viewer's local timezone. The request
//! window is derived from it and never stored.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Calendar date format used for display, CLI input and the date picker.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Catalog timestamp format. Local clock, no UTC offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Event category understood by the catalog's `eventtype` parameter.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Earthquake,
    Volcano,
    Tsunami,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::Earthquake, EventType::Volcano, EventType::Tsunami];

    /// Value sent as `eventtype`.
    pub fn as_param(&self) -> &'static str {
        match self {
            EventType::Earthquake => "earthquake",
            EventType::Volcano => "volcano",
            EventType::Tsunami => "tsunami",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventType::Earthquake => "Earthquake",
            EventType::Volcano => "Volcano",
            EventType::Tsunami => "Tsunami",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            EventType::Earthquake => 0,
            EventType::Volcano => 1,
            EventType::Tsunami => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// `[start, end]` of one local calendar day, second precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl RequestWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        let end = start + Duration::seconds(SECONDS_PER_DAY - 1);
        Self { start, end }
    }

    pub fn start_param(&self) -> String {
        self.start.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// User-selected filters. Mutated only through reducer actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilterState {
    pub event_type: EventType,
    pub date: NaiveDate,
}

impl FilterState {
    pub fn new(event_type: EventType, date: NaiveDate) -> Self {
        Self { event_type, date }
    }

    /// Earthquakes for the current local calendar day.
    pub fn today() -> Self {
        Self::new(EventType::default(), local_today())
    }

    pub fn window(&self) -> RequestWindow {
        RequestWindow::for_date(self.date)
    }

    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// The filter `days` away from this one, or `None` past chrono's range.
    pub fn shifted(&self, days: i64) -> Option<Self> {
        let date = self.date.checked_add_signed(Duration::try_days(days)?)?;
        Some(Self::new(self.event_type, date))
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::today()
    }
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("date is empty")]
    Empty,
    #[error("`{input}` is not a date, expected YYYY-MM-DD")]
    Invalid { input: String },
}

/// Parse an ISO calendar date, ignoring surrounding whitespace.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Empty);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| DateParseError::Invalid {
        input: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn window_covers_the_whole_local_day() {
        let window = FilterState::new(EventType::Earthquake, date(2024, 1, 1)).window();
        assert_eq!(window.start_param(), "2024-01-01T00:00:00");
        assert_eq!(window.end_param(), "2024-01-01T23:59:59");
        assert_eq!((window.end - window.start).num_seconds(), SECONDS_PER_DAY - 1);
    }

    #[test]
    fn window_on_leap_day_and_year_end() {
        let leap = RequestWindow::for_date(date(2024, 2, 29));
        assert_eq!(leap.start_param(), "2024-02-29T00:00:00");
        assert_eq!(leap.end_param(), "2024-02-29T23:59:59");

        let year_end = RequestWindow::for_date(date(2023, 12, 31));
        assert_eq!(year_end.end_param(), "2023-12-31T23:59:59");
    }

    #[test]
    fn event_type_params_and_cycle() {
        let params: Vec<_> = EventType::ALL.iter().map(EventType::as_param).collect();
        assert_eq!(params, vec!["earthquake", "volcano", "tsunami"]);
        assert_eq!(EventType::Earthquake.next(), EventType::Volcano);
        assert_eq!(EventType::Tsunami.next(), EventType::Earthquake);
        assert_eq!(EventType::from_index(1), Some(EventType::Volcano));
        assert_eq!(EventType::from_index(3), None);
    }

    #[test]
    fn event_type_serializes_as_wire_value() {
        let json = serde_json::to_string(&EventType::Tsunami).expect("serialize");
        assert_eq!(json, "\"tsunami\"");
    }

    #[test]
    fn shifted_keeps_event_type() {
        let filters = FilterState::new(EventType::Volcano, date(2024, 3, 1));
        let prev = filters.shifted(-1).expect("in range");
        assert_eq!(prev, FilterState::new(EventType::Volcano, date(2024, 2, 29)));
        assert_eq!(prev.date_label(), "2024-02-29");
    }

    #[test]
    fn shifted_out_of_range_is_none() {
        let filters = FilterState::new(EventType::Earthquake, date(2024, 1, 1));
        assert_eq!(filters.shifted(i64::MAX), None);
        assert_eq!(filters.shifted(i64::MIN), None);
        assert_eq!(filters.shifted(1_000_000_000), None);
    }

    #[test]
    fn today_uses_local_calendar_day() {
        let filters = FilterState::today();
        assert_eq!(filters.event_type, EventType::Earthquake);
        assert_eq!(filters.date, local_today());
    }

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(parse_date(" 2024-01-01 "), Ok(date(2024, 1, 1)));
        assert_eq!(parse_date(""), Err(DateParseError::Empty));
        assert_eq!(
            parse_date("2024-02-30"),
            Err(DateParseError::Invalid {
                input: "2024-02-30".into()
            })
        );
        assert!(parse_date("01/02/2024").is_err());
    }
}
