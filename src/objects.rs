// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! The different objects contained in the schedule model.

use crate::serde_utils::*;
use crate::Result;
use anyhow::bail;
use chrono::{Datelike, Weekday};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops;
use std::str::FromStr;
use thiserror::Error;
use typed_index_collection::{Id, Idx};

/// A calendar date.
pub type Date = chrono::NaiveDate;

macro_rules! impl_id {
    ($ty:ty, $gen:ty, $id: ident) => {
        impl Id<$gen> for $ty {
            fn id(&self) -> &str {
                &self.$id
            }

            fn set_id(&mut self, id: String) {
                self.$id = id;
            }
        }
    };
    ($ty:ty) => {
        impl_id!($ty, $ty, id);
    };
}

/// A geographic coordinate (WGS84).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    /// Longitude, in degrees.
    pub lon: f64,
    /// Latitude, in degrees.
    pub lat: f64,
}

impl Coord {
    /// Coordinates are valid when the latitude lies in `[-90;90]` and the
    /// longitude in `[-180;180]`.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// An error for time parsing from string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeError {
    /// The time does not have the `HH:MM:SS` shape
    #[error("time format should be HH:MM:SS")]
    WrongFormat,
    /// Minutes or seconds lie outside the `[0;59]` range
    #[error("minutes and seconds should be in [0;59] range")]
    WrongValue,
}

impl From<std::num::ParseIntError> for TimeError {
    fn from(_error: std::num::ParseIntError) -> Self {
        TimeError::WrongFormat
    }
}

/// A time of day, in seconds since midnight.
///
/// Hours may exceed 24 for trips running over midnight, following the GTFS
/// convention for overnight stop times.
#[derive(
    Serialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(into = "String")]
pub struct Time(u32);

impl Time {
    /// Creates a time from hours, minutes and seconds.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Time {
        Time(hours * 3600 + minutes * 60 + seconds)
    }

    /// Hours part of the time.
    pub fn hours(self) -> u32 {
        self.0 / 3600
    }

    /// Minutes part of the time.
    pub fn minutes(self) -> u32 {
        (self.0 % 3600) / 60
    }

    /// Seconds part of the time.
    pub fn seconds(self) -> u32 {
        self.0 % 60
    }

    /// The time expressed in seconds since midnight.
    pub fn total_seconds(self) -> u32 {
        self.0
    }
}

impl From<u32> for Time {
    fn from(total_seconds: u32) -> Self {
        Time(total_seconds)
    }
}

impl From<chrono::NaiveTime> for Time {
    fn from(time: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        Time(time.num_seconds_from_midnight())
    }
}

impl From<Time> for String {
    fn from(time: Time) -> Self {
        time.to_string()
    }
}

impl ops::Add for Time {
    type Output = Time;
    fn add(self, other: Time) -> Time {
        Time(self.total_seconds() + other.total_seconds())
    }
}

impl ops::Sub for Time {
    type Output = Time;
    fn sub(self, other: Time) -> Time {
        Time(self.total_seconds() - other.total_seconds())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl FromStr for Time {
    type Err = TimeError;
    fn from_str(time: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = time.split(':');
        let hours: u32 = parts.next().ok_or(TimeError::WrongFormat)?.parse()?;
        let minutes: u32 = parts.next().ok_or(TimeError::WrongFormat)?.parse()?;
        let seconds: u32 = parts.next().ok_or(TimeError::WrongFormat)?.parse()?;
        if parts.next().is_some() {
            return Err(TimeError::WrongFormat);
        }
        if minutes > 59 || seconds > 59 {
            return Err(TimeError::WrongValue);
        }
        Ok(Time::new(hours, minutes, seconds))
    }
}

impl<'de> ::serde::Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Time, D::Error>
    where
        D: ::serde::Deserializer<'de>,
    {
        use serde::{de::Error, Deserialize};
        let time = String::deserialize(deserializer)?;
        time.parse().map_err(D::Error::custom)
    }
}

/// An error for `Rgb` parsing from string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RgbError {
    /// Color values must be exactly 6 hexadecimal digits
    #[error("color should have 6 hexadecimal digits")]
    NotHexa,
}

/// A color, encoded as `RRGGBB` hexadecimal digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red
    pub red: u8,
    /// Green
    pub green: u8,
    /// Blue
    pub blue: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for Rgb {
    type Err = RgbError;
    fn from_str(color_hex: &str) -> std::result::Result<Self, Self::Err> {
        if color_hex.len() != 6 || !color_hex.is_ascii() {
            return Err(RgbError::NotHexa);
        }
        let red = u8::from_str_radix(&color_hex[0..2], 16).map_err(|_| RgbError::NotHexa)?;
        let green = u8::from_str_radix(&color_hex[2..4], 16).map_err(|_| RgbError::NotHexa)?;
        let blue = u8::from_str_radix(&color_hex[4..6], 16).map_err(|_| RgbError::NotHexa)?;
        Ok(Rgb { red, green, blue })
    }
}

impl ::serde::Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ::serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> ::serde::Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Rgb, D::Error>
    where
        D: ::serde::Deserializer<'de>,
    {
        use serde::{de::Error, Deserialize};
        let color = String::deserialize(deserializer)?;
        color.parse().map_err(D::Error::custom)
    }
}

/// A physical boarding/alighting location.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Stop {
    /// Identifier of the stop, unique in the schedule.
    #[serde(rename = "stop_id")]
    pub id: String,
    /// Display name of the stop.
    #[serde(rename = "stop_name")]
    pub name: String,
    /// Position of the stop.
    #[serde(flatten)]
    pub coord: Coord,
}
impl_id!(Stop);

/// A public-facing named transit route, grouping the trips that share it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Line {
    /// Identifier of the line, unique in the schedule.
    #[serde(rename = "line_id")]
    pub id: String,
    /// Public short name (e.g. `12`, `A`).
    #[serde(rename = "line_code")]
    pub code: Option<String>,
    /// Public long name.
    #[serde(rename = "line_name")]
    pub name: String,
    /// Display color of the line.
    #[serde(rename = "line_color")]
    pub color: Option<Rgb>,
}
impl_id!(Line);

/// One scheduled vehicle run along a line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Trip {
    /// Identifier of the trip, unique in the schedule.
    #[serde(rename = "trip_id")]
    pub id: String,
    /// Identifier of the line operating the trip.
    pub line_id: String,
    /// Identifier of the service calendar ruling when the trip runs.
    pub service_id: String,
    /// Text displayed to identify the trip's destination to passengers.
    #[serde(rename = "trip_headsign")]
    pub headsign: Option<String>,
    /// The scheduled stop visits, ordered by sequence once the model is built.
    #[serde(skip)]
    pub stop_visits: Vec<StopVisit>,
}
impl_id!(Trip);
impl_id!(Trip, Line, line_id);
impl_id!(Trip, ServiceCalendar, service_id);

impl Trip {
    /// Position of the first visit calling at the given stop, if any.
    pub fn first_visit_of(&self, stop_idx: Idx<Stop>) -> Option<usize> {
        self.stop_visits.iter().position(|v| v.stop_idx == stop_idx)
    }

    pub(crate) fn sort_and_check_stop_visits(&mut self) -> Result<()> {
        self.stop_visits.sort_unstable_by_key(|visit| visit.sequence);
        for window in self.stop_visits.windows(2) {
            if window[0].sequence == window[1].sequence {
                bail!(
                    "duplicated stop sequence '{}' for the trip '{}'",
                    window[0].sequence,
                    self.id
                );
            }
        }
        for visit in &self.stop_visits {
            if visit.departure_time < visit.arrival_time {
                bail!(
                    "incoherent stop times '{}' at time '{}' for the trip '{}'",
                    visit.sequence,
                    visit.arrival_time,
                    self.id
                );
            }
        }
        for window in self.stop_visits.windows(2) {
            if window[1].arrival_time < window[0].departure_time {
                bail!(
                    "incoherent stop times '{}' at time '{}' for the trip '{}'",
                    window[0].sequence,
                    window[0].departure_time,
                    self.id
                );
            }
        }
        Ok(())
    }
}

/// A trip's scheduled call at one stop, with its position in the trip's path.
#[derive(Debug, Clone, PartialEq)]
pub struct StopVisit {
    /// The visited stop.
    pub stop_idx: Idx<Stop>,
    /// Position of the visit along the trip; strictly increasing with time.
    pub sequence: u32,
    /// Scheduled arrival at the stop.
    pub arrival_time: Time,
    /// Scheduled departure from the stop.
    pub departure_time: Time,
}

/// The weekly pattern and date range ruling when a service operates.
#[derive(Serialize, Deserialize, Derivative, Debug, Clone, PartialEq)]
#[derivative(Default)]
pub struct ServiceCalendar {
    /// Identifier of the service, unique in the schedule.
    #[serde(rename = "service_id")]
    pub id: String,
    /// True if the service is active on Mondays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub monday: bool,
    /// True if the service is active on Tuesdays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub tuesday: bool,
    /// True if the service is active on Wednesdays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub wednesday: bool,
    /// True if the service is active on Thursdays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub thursday: bool,
    /// True if the service is active on Fridays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub friday: bool,
    /// True if the service is active on Saturdays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub saturday: bool,
    /// True if the service is active on Sundays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub sunday: bool,
    /// The service is active starting from this date
    #[serde(
        deserialize_with = "de_from_date_string",
        serialize_with = "ser_from_naive_date"
    )]
    #[derivative(Default(value = "chrono::NaiveDate::MIN"))]
    pub start_date: Date,
    /// The service is active until this date
    #[serde(
        deserialize_with = "de_from_date_string",
        serialize_with = "ser_from_naive_date"
    )]
    #[derivative(Default(value = "chrono::NaiveDate::MAX"))]
    pub end_date: Date,
}
impl_id!(ServiceCalendar);

impl ServiceCalendar {
    /// True when the weekly pattern makes the service operate on `date`:
    /// the date lies within the active range and the flag of its weekday is
    /// set. Exceptions are not taken into account here, see
    /// `Model::service_runs_on`.
    pub fn active_on(&self, date: Date) -> bool {
        if date < self.start_date || date > self.end_date {
            return false;
        }
        match date.weekday() {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// True when at least one weekday flag is set.
    pub fn has_active_weekday(&self) -> bool {
        self.monday
            || self.tuesday
            || self.wednesday
            || self.thursday
            || self.friday
            || self.saturday
            || self.sunday
    }
}

/// Exception type for `ServiceException`
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub enum ExceptionType {
    /// The service is added on the exception date
    #[serde(rename = "1")]
    Add,
    /// The service is removed on the exception date
    #[serde(rename = "2")]
    Remove,
}

/// A single-date override to a service's weekly pattern.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceException {
    /// Identifier of the overridden service.
    pub service_id: String,
    /// Date at which the exception applies.
    #[serde(
        deserialize_with = "de_from_date_string",
        serialize_with = "ser_from_naive_date"
    )]
    pub date: Date,
    /// Whether the service is added or removed on that date.
    pub exception_type: ExceptionType,
}

/// A validity period, as an inclusive date range.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityPeriod {
    /// First date of the period.
    pub start_date: Date,
    /// Last date of the period.
    pub end_date: Date,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod time {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn parse_and_display() {
            let time: Time = "08:05:30".parse().unwrap();
            assert_eq!(Time::new(8, 5, 30), time);
            assert_eq!(29130, time.total_seconds());
            assert_eq!("08:05:30", time.to_string());
        }

        #[test]
        fn over_midnight_hours_are_allowed() {
            let time: Time = "25:10:00".parse().unwrap();
            assert_eq!(Time::new(25, 10, 0), time);
            assert_eq!("25:10:00", time.to_string());
        }

        #[test]
        fn invalid_times_are_rejected() {
            assert_eq!(Err(TimeError::WrongFormat), "0810:00".parse::<Time>());
            assert_eq!(Err(TimeError::WrongFormat), "08:10".parse::<Time>());
            assert_eq!(Err(TimeError::WrongValue), "08:61:00".parse::<Time>());
        }

        #[test]
        fn arithmetic() {
            let sum = Time::new(8, 0, 0) + Time::new(0, 10, 30);
            assert_eq!(Time::new(8, 10, 30), sum);
            assert_eq!(Time::new(0, 10, 30), sum - Time::new(8, 0, 0));
        }
    }

    mod rgb {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn parse_and_display() {
            let color: Rgb = "FF4500".parse().unwrap();
            assert_eq!(
                Rgb {
                    red: 255,
                    green: 69,
                    blue: 0
                },
                color
            );
            assert_eq!("FF4500", color.to_string());
        }

        #[test]
        fn invalid_colors_are_rejected() {
            assert_eq!(Err(RgbError::NotHexa), "F45".parse::<Rgb>());
            assert_eq!(Err(RgbError::NotHexa), "GGGGGG".parse::<Rgb>());
        }
    }

    mod service_calendar {
        use super::*;

        fn weekday_calendar() -> ServiceCalendar {
            ServiceCalendar {
                id: String::from("service"),
                monday: true,
                tuesday: true,
                wednesday: true,
                thursday: true,
                friday: true,
                start_date: Date::from_ymd_opt(2025, 1, 1).unwrap(),
                end_date: Date::from_ymd_opt(2025, 12, 31).unwrap(),
                ..Default::default()
            }
        }

        #[test]
        fn weekday_flags_are_honored() {
            let calendar = weekday_calendar();
            // 2025-03-04 is a Tuesday, 2025-03-09 a Sunday
            assert!(calendar.active_on(Date::from_ymd_opt(2025, 3, 4).unwrap()));
            assert!(!calendar.active_on(Date::from_ymd_opt(2025, 3, 9).unwrap()));
        }

        #[test]
        fn date_range_is_inclusive() {
            let calendar = weekday_calendar();
            // both range bounds are Wednesdays
            assert!(calendar.active_on(Date::from_ymd_opt(2025, 1, 1).unwrap()));
            assert!(calendar.active_on(Date::from_ymd_opt(2025, 12, 31).unwrap()));
            assert!(!calendar.active_on(Date::from_ymd_opt(2024, 12, 31).unwrap()));
            assert!(!calendar.active_on(Date::from_ymd_opt(2026, 1, 1).unwrap()));
        }

        #[test]
        fn default_calendar_never_operates() {
            let calendar = ServiceCalendar::default();
            assert!(!calendar.has_active_weekday());
            assert!(!calendar.active_on(Date::from_ymd_opt(2025, 3, 4).unwrap()));
        }
    }

    mod trip {
        use super::*;
        use pretty_assertions::assert_eq;
        use typed_index_collection::CollectionWithId;

        fn visit(stops: &CollectionWithId<Stop>, sequence: u32, arrival: &str) -> StopVisit {
            StopVisit {
                stop_idx: stops.get_idx("sp1").unwrap(),
                sequence,
                arrival_time: arrival.parse().unwrap(),
                departure_time: arrival.parse().unwrap(),
            }
        }

        #[test]
        fn visits_are_sorted_by_sequence() {
            let stops = CollectionWithId::from(Stop {
                id: String::from("sp1"),
                ..Default::default()
            });
            let mut trip = Trip {
                id: String::from("trip"),
                stop_visits: vec![
                    visit(&stops, 1, "11:00:00"),
                    visit(&stops, 0, "10:00:00"),
                ],
                ..Default::default()
            };
            trip.sort_and_check_stop_visits().unwrap();
            assert_eq!(vec![0, 1], trip.stop_visits.iter().map(|v| v.sequence).collect::<Vec<_>>());
        }

        #[test]
        fn decreasing_times_are_rejected() {
            let stops = CollectionWithId::from(Stop {
                id: String::from("sp1"),
                ..Default::default()
            });
            let mut trip = Trip {
                id: String::from("trip"),
                stop_visits: vec![
                    visit(&stops, 0, "10:05:00"),
                    visit(&stops, 1, "10:00:00"),
                ],
                ..Default::default()
            };
            let error = trip.sort_and_check_stop_visits().unwrap_err();
            assert_eq!(
                "incoherent stop times '0' at time '10:05:00' for the trip 'trip'",
                error.to_string()
            );
        }
    }
}
