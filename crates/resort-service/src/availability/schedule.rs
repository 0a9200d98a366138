//! Wall-clock times and expansion of a service's weekly schedule into slots.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use thiserror::Error;

use resort_core::error::AppError;
use resort_entity::service::{HotelService, Weekday};
use resort_entity::slot::NewTimeSlot;

/// Minutes in a day. `24:00` is accepted as an end-of-day boundary.
const DAY_MINUTES: u32 = 24 * 60;

/// Problems with a stored schedule or a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A time field is not a valid `HH:MM` value.
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    /// Session length is zero or negative.
    #[error("duration must be positive, got {0}")]
    NonPositiveDuration(i32),
    /// Slot interval is zero or negative.
    #[error("slot interval must be positive, got {0}")]
    NonPositiveInterval(i32),
    /// The requested range ends before it starts.
    #[error("date range is inverted: {from} is after {to}")]
    InvertedRange {
        /// Range start.
        from: NaiveDate,
        /// Range end.
        to: NaiveDate,
    },
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvertedRange { .. } => AppError::validation(err.to_string()),
            _ => AppError::configuration(format!("Corrupt service schedule: {err}")),
        }
    }
}

/// A time of day with minute precision, rendered as zero-padded `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Build from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes <= DAY_MINUTES).then_some(Self(minutes))
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// This time plus `minutes`, if still within the day.
    pub fn plus(&self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.0.checked_add(minutes)?)
    }

    /// The local instant at this time on `date`.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(chrono::NaiveTime::MIN) + Duration::minutes(i64::from(self.0))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hours: u32 = h.parse().map_err(|_| invalid())?;
        let minutes: u32 = m.parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }
        Self::from_minutes(hours * 60 + minutes).ok_or_else(invalid)
    }
}

/// The validated daily window of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Window open.
    pub start: ClockTime,
    /// Window close.
    pub end: ClockTime,
    /// Session length in minutes.
    pub duration: u32,
    /// Minutes between consecutive session starts.
    pub interval: u32,
}

impl Schedule {
    /// Parse and check the scheduling fields of a service.
    pub fn of(service: &HotelService) -> Result<Self, ScheduleError> {
        let start: ClockTime = service.start_time.parse()?;
        let end: ClockTime = service.end_time.parse()?;
        if service.duration <= 0 {
            return Err(ScheduleError::NonPositiveDuration(service.duration));
        }
        if service.slot_interval <= 0 {
            return Err(ScheduleError::NonPositiveInterval(service.slot_interval));
        }
        Ok(Self {
            start,
            end,
            duration: service.duration as u32,
            interval: service.slot_interval as u32,
        })
    }

    /// Every `(start, end)` pair that fits entirely inside the window.
    pub fn sessions(&self) -> impl Iterator<Item = (ClockTime, ClockTime)> + '_ {
        let mut cursor = Some(self.start);
        std::iter::from_fn(move || {
            let start = cursor?;
            let end = start.plus(self.duration).filter(|end| *end <= self.end)?;
            cursor = start.plus(self.interval);
            Some((start, end))
        })
    }

    /// Whether a session starts exactly at `time`.
    pub fn starts_at(&self, time: ClockTime) -> bool {
        self.sessions().any(|(start, _)| start == time)
    }
}

/// Expand a service's weekly schedule over the inclusive range `from..=to`.
///
/// Days whose weekday is not offered are skipped. Slots are ordered by
/// date, then start time, and a session that would run past the window
/// close is never emitted.
pub fn expand_schedule(
    service: &HotelService,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<NewTimeSlot>, ScheduleError> {
    if from > to {
        return Err(ScheduleError::InvertedRange { from, to });
    }
    let schedule = Schedule::of(service)?;

    let mut slots = Vec::new();
    for date in from.iter_days().take_while(|d| *d <= to) {
        if !service.offers(Weekday::of(date)) {
            continue;
        }
        slots.extend(schedule.sessions().map(|(start, end)| NewTimeSlot {
            service_id: service.id,
            date,
            start_time: start.to_string(),
            end_time: end.to_string(),
            capacity: service.max_capacity,
        }));
    }
    Ok(slots)
}
