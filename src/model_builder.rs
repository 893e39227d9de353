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

//! Provides an easy way to create a `crate::Model`
//!
//! ```
//! # use transit_planner::model_builder::ModelBuilder;
//! # fn main() {
//!  let model = ModelBuilder::default()
//!      .trip("toto", |t| {
//!          t.line("1")
//!            .st("A", "10:00:00", "10:01:00")
//!            .st("B", "11:00:00", "11:01:00");
//!      })
//!      .trip("tata", |t| {
//!          t.st("A", "10:00:00", "10:01:00")
//!            .st("D", "11:00:00", "11:01:00");
//!      })
//!      .build();
//! # }
//! ```

use crate::model::{Collections, Model};
use crate::objects::{
    Date, ExceptionType, Line, ServiceCalendar, ServiceException, Stop, StopVisit, Time, Trip,
};
use typed_index_collection::Idx;

/// Builder used to easily create a `Model`, mostly for testing purposes.
#[derive(Default)]
pub struct ModelBuilder {
    collections: Collections,
}

/// Builder used to create and modify a new Trip
pub struct TripBuilder<'a> {
    model: &'a mut ModelBuilder,
    trip_idx: Idx<Trip>,
}

impl ModelBuilder {
    /// Add a new Stop to the model
    ///
    /// ```
    /// # use transit_planner::model_builder::ModelBuilder;
    /// # use transit_planner::objects::Coord;
    /// # fn main() {
    /// let model = ModelBuilder::default()
    ///      .stop("A", |s| {
    ///             s.name = "Central square".to_owned();
    ///             s.coord = Coord { lon: -7.86, lat: 42.34 };
    ///         })
    ///      .trip("toto", |t| {
    ///          t.st("A", "10:00:00", "10:01:00")
    ///            .st("B", "11:00:00", "11:01:00");
    ///      })
    ///      .build();
    /// # }
    /// ```
    pub fn stop<F>(mut self, id: &str, mut stop_initer: F) -> Self
    where
        F: FnMut(&mut Stop),
    {
        if self.collections.stops.get_idx(id).is_none() {
            let mut stop = Stop {
                id: id.to_owned(),
                name: id.to_owned(),
                ..Default::default()
            };
            stop_initer(&mut stop);
            stop.id = id.to_owned();
            self.collections
                .stops
                .push(stop)
                .expect(&format!("stop {} already exists", id));
        }
        self
    }

    /// Add a new Line to the model
    ///
    /// ```
    /// # use transit_planner::model_builder::ModelBuilder;
    /// # fn main() {
    /// let model = ModelBuilder::default()
    ///      .line("l1", |l| {
    ///             l.name = "line 1".to_owned();
    ///         })
    ///      .trip("toto", |t| {
    ///          t.line("l1")
    ///            .st("A", "10:00:00", "10:01:00")
    ///            .st("B", "11:00:00", "11:01:00");
    ///      })
    ///      .build();
    /// # }
    /// ```
    pub fn line<F>(mut self, id: &str, mut line_initer: F) -> Self
    where
        F: FnMut(&mut Line),
    {
        if self.collections.lines.get_idx(id).is_none() {
            let mut line = Line {
                id: id.to_owned(),
                name: id.to_owned(),
                ..Default::default()
            };
            line_initer(&mut line);
            line.id = id.to_owned();
            self.collections
                .lines
                .push(line)
                .expect(&format!("line {} already exists", id));
        }
        self
    }

    /// Add a new ServiceCalendar to the model
    ///
    /// ```
    /// # use transit_planner::model_builder::ModelBuilder;
    /// # use transit_planner::objects::Date;
    /// # fn main() {
    /// let model = ModelBuilder::default()
    ///      .calendar("c1", |c| {
    ///             c.monday = true;
    ///             c.start_date = Date::from_ymd_opt(2025, 1, 1).unwrap();
    ///             c.end_date = Date::from_ymd_opt(2025, 12, 31).unwrap();
    ///         })
    ///      .trip("toto", |t| {
    ///          t.service("c1")
    ///            .st("A", "10:00:00", "10:01:00")
    ///            .st("B", "11:00:00", "11:01:00");
    ///      })
    ///      .build();
    /// # }
    /// ```
    pub fn calendar<F>(mut self, id: &str, mut calendar_initer: F) -> Self
    where
        F: FnMut(&mut ServiceCalendar),
    {
        if self.collections.calendars.get_idx(id).is_none() {
            let mut calendar = ServiceCalendar {
                id: id.to_owned(),
                ..Default::default()
            };
            calendar_initer(&mut calendar);
            calendar.id = id.to_owned();
            self.collections
                .calendars
                .push(calendar)
                .expect(&format!("calendar {} already exists", id));
        }
        self
    }

    /// Add a single-date exception to a service
    pub fn exception(mut self, service_id: &str, date: Date, exception_type: ExceptionType) -> Self {
        self.collections.exceptions.push(ServiceException {
            service_id: service_id.to_owned(),
            date,
            exception_type,
        });
        self
    }

    /// Add a new Trip to the model
    ///
    /// ```
    /// # use transit_planner::model_builder::ModelBuilder;
    /// # fn main() {
    /// let model = ModelBuilder::default()
    ///        .trip("toto", |trip_builder| {
    ///            trip_builder
    ///                .st("A", "10:00:00", "10:01:00")
    ///                .st("B", "11:00:00", "11:01:00");
    ///        })
    ///        .build();
    /// # }
    /// ```
    pub fn trip<F>(mut self, id: &str, mut trip_initer: F) -> Self
    where
        F: FnMut(TripBuilder),
    {
        let mut new_trip = Trip::default();
        new_trip.id = id.into();
        let trip_idx = self
            .collections
            .trips
            .push(new_trip)
            .expect(&format!("trip {} already exists", id));
        let trip_builder = TripBuilder {
            model: &mut self,
            trip_idx,
        };

        trip_initer(trip_builder);
        self
    }

    /// Consume the builder to create a model
    pub fn build(self) -> Model {
        Model::new(self.collections).unwrap()
    }
}

/// Types convertible into a `Time`, to keep the builder calls short.
pub trait IntoTime {
    /// Convert `self` into a `Time`.
    fn into_time(self) -> Time;
}

impl IntoTime for Time {
    fn into_time(self) -> Time {
        self
    }
}

impl IntoTime for &Time {
    fn into_time(self) -> Time {
        *self
    }
}

impl IntoTime for &str {
    // Note: if the string is not in the right format, this conversion will fail
    fn into_time(self) -> Time {
        self.parse().unwrap()
    }
}

impl<'a> TripBuilder<'a> {
    fn find_or_create_stop(&mut self, stop: &str) -> Idx<Stop> {
        self.model
            .collections
            .stops
            .get_idx(stop)
            .unwrap_or_else(|| {
                let new_stop = Stop {
                    id: stop.to_owned(),
                    name: stop.to_owned(),
                    ..Default::default()
                };
                self.model
                    .collections
                    .stops
                    .push(new_stop)
                    .expect(&format!("stop {} already exists", stop))
            })
    }

    /// add a StopVisit to the trip
    ///
    /// ```
    /// # use transit_planner::model_builder::ModelBuilder;
    /// # fn main() {
    /// let model = ModelBuilder::default()
    ///        .trip("toto", |trip_builder| {
    ///            trip_builder
    ///                .st("A", "10:00:00", "10:01:00")
    ///                .st("B", "11:00:00", "11:01:00");
    ///        })
    ///        .build();
    /// # }
    /// ```
    pub fn st(mut self, name: &str, arrival: impl IntoTime, departure: impl IntoTime) -> Self {
        let stop_idx = self.find_or_create_stop(name);
        {
            let mut trip = self.model.collections.trips.index_mut(self.trip_idx);
            let sequence = trip.stop_visits.len() as u32;
            trip.stop_visits.push(StopVisit {
                stop_idx,
                sequence,
                arrival_time: arrival.into_time(),
                departure_time: departure.into_time(),
            });
        }

        self
    }

    /// Set the line of the trip
    pub fn line(self, id: &str) -> Self {
        {
            let mut trip = self.model.collections.trips.index_mut(self.trip_idx);
            trip.line_id = id.to_owned();
        }

        self
    }

    /// Set the service (calendar) of the trip
    pub fn service(self, id: &str) -> Self {
        {
            let mut trip = self.model.collections.trips.index_mut(self.trip_idx);
            trip.service_id = id.to_owned();
        }

        self
    }

    /// Set the headsign of the trip
    pub fn headsign(self, headsign: &str) -> Self {
        {
            let mut trip = self.model.collections.trips.index_mut(self.trip_idx);
            trip.headsign = Some(headsign.to_owned());
        }

        self
    }
}

impl<'a> Drop for TripBuilder<'a> {
    fn drop(&mut self) {
        let collections = &mut self.model.collections;
        // add the missing objects to the model (line, calendar, ...)
        let (line_id, service_id) = {
            let trip = &collections.trips[self.trip_idx];
            (trip.line_id.clone(), trip.service_id.clone())
        };
        if collections.lines.get_idx(&line_id).is_none() {
            collections
                .lines
                .push(Line {
                    id: line_id.clone(),
                    name: line_id,
                    ..Default::default()
                })
                .expect("line already exists");
        }
        if collections.calendars.get_idx(&service_id).is_none() {
            collections
                .calendars
                .push(ServiceCalendar {
                    id: service_id,
                    ..Default::default()
                })
                .expect("calendar already exists");
        }
    }
}

#[cfg(test)]
mod test {
    use super::ModelBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_model_creation() {
        let model = ModelBuilder::default()
            .trip("toto", |trip_builder| {
                trip_builder
                    .st("A", "10:00:00", "10:01:00")
                    .st("B", "11:00:00", "11:01:00");
            })
            .trip("tata", |trip_builder| {
                trip_builder
                    .st("A", "10:00:00", "10:01:00")
                    .st("D", "11:00:00", "11:01:00");
            })
            .build();

        let through_a: Vec<&str> = model
            .trips_through_stop(model.stops.get_idx("A").unwrap())
            .into_iter()
            .map(|idx| model.trips[idx].id.as_str())
            .collect();
        assert_eq!(vec!["toto", "tata"], through_a);
        assert_eq!(3, model.stops.len());
        // referenced lines and calendars are created on the fly
        assert_eq!(1, model.lines.len());
        assert_eq!(1, model.calendars.len());
    }

    #[test]
    fn model_creation_with_lines() {
        let model = ModelBuilder::default()
            .line("1", |l| {
                l.name = "bob".into();
            })
            .trip("toto", |trip_builder| {
                trip_builder
                    .line("1")
                    .st("A", "10:00:00", "10:01:00")
                    .st("B", "11:00:00", "11:01:00");
            })
            .trip("tata", |trip_builder| {
                trip_builder
                    .line("2")
                    .st("C", "10:00:00", "10:01:00")
                    .st("D", "11:00:00", "11:01:00");
            })
            .build();

        // there should be only 2 lines, the line '1' and the automatic '2'
        assert_eq!(2, model.lines.len());
        assert_eq!("bob", model.lines.get("1").unwrap().name);
        let of_line: Vec<&str> = model
            .trips_of_line(model.lines.get_idx("1").unwrap())
            .into_iter()
            .map(|idx| model.trips[idx].id.as_str())
            .collect();
        assert_eq!(vec!["toto"], of_line);
    }
}
