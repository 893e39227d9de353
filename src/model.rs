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

//! Definition of the schedule model consumed by the journey planner.

use crate::objects::*;
use crate::Result;
use anyhow::anyhow;
use relational_types::{IdxSet, ManyToMany, OneToMany, Relation};
use serde::{Deserialize, Serialize};
use skip_error::skip_error_and_warn;
use std::collections::{BTreeMap, BTreeSet};
use std::ops;
use tracing::warn;
use typed_index_collection::{Collection, CollectionWithId, Idx};

/// The set of collections representing the schedule.
#[derive(Serialize, Deserialize, Debug, Default)]
#[allow(missing_docs)]
pub struct Collections {
    pub stops: CollectionWithId<Stop>,
    pub lines: CollectionWithId<Line>,
    pub trips: CollectionWithId<Trip>,
    pub calendars: CollectionWithId<ServiceCalendar>,
    pub exceptions: Collection<ServiceException>,
}

impl Collections {
    /// Keep the collections consistent: order each trip's visits by
    /// sequence, discard trips with incoherent or missing visits or with an
    /// unknown line, and register a never-active calendar for every service
    /// identifier that has none, so such trips are simply never considered
    /// by the planner.
    fn sanitize(&mut self) {
        let trips = self.trips.take();
        let mut kept_trips = Vec::new();
        for mut trip in trips {
            if trip.stop_visits.is_empty() {
                warn!("trip '{}' has no stop visit, removed", trip.id);
                continue;
            }
            if trip.stop_visits.len() == 1 {
                warn!("trip '{}' only has 1 stop visit", trip.id);
            }
            if !self.lines.contains_id(&trip.line_id) {
                warn!(
                    "trip '{}' references the unknown line '{}', removed",
                    trip.id, trip.line_id
                );
                continue;
            }
            match trip.sort_and_check_stop_visits() {
                Ok(()) => kept_trips.push(trip),
                Err(e) => warn!("{}", e),
            }
        }
        self.trips = CollectionWithId::new(kept_trips)
            .expect("insert only trips that were in a CollectionWithId before");

        let unknown_services: BTreeSet<String> = self
            .trips
            .values()
            .filter(|trip| !self.calendars.contains_id(&trip.service_id))
            .map(|trip| trip.service_id.clone())
            .collect();
        for service_id in unknown_services {
            warn!(
                "service '{}' has no calendar, considered never active",
                service_id
            );
            skip_error_and_warn!(self.calendars.push(ServiceCalendar {
                id: service_id,
                ..Default::default()
            }));
        }
    }
}

/// The schedule model: an immutable, query-ready snapshot of the
/// collections, with the relations the planner needs.
///
/// The model performs no I/O and holds no interior mutability; a shared
/// reference can be used concurrently from several planning calls.
pub struct Model {
    collections: Collections,

    lines_to_trips: OneToMany<Line, Trip>,
    trips_to_stops: ManyToMany<Trip, Stop>,
    exceptions_by_service: BTreeMap<String, Vec<Idx<ServiceException>>>,
}

impl Model {
    /// Constructs a model from the given `Collections`. Incoherent trips
    /// are dropped with a warning; fails in case of invalid external
    /// references.
    ///
    /// # Examples
    ///
    /// ```
    /// # use transit_planner::model::*;
    /// # fn run() -> transit_planner::Result<()> {
    /// let _: Model = Model::new(Collections::default())?;
    /// # Ok(())
    /// # }
    /// # run().unwrap()
    /// ```
    pub fn new(mut c: Collections) -> Result<Self> {
        c.sanitize();

        let forward_trips_to_stops: BTreeMap<Idx<Trip>, IdxSet<Stop>> = c
            .trips
            .iter()
            .map(|(idx, trip)| {
                let stops = trip.stop_visits.iter().map(|visit| visit.stop_idx).collect();
                (idx, stops)
            })
            .collect();
        let trips_to_stops = ManyToMany::from_forward(forward_trips_to_stops);
        let lines_to_trips = OneToMany::new(&c.lines, &c.trips, "lines_to_trips")?;

        let mut exceptions_by_service = BTreeMap::<String, Vec<Idx<ServiceException>>>::new();
        for (idx, exception) in c.exceptions.iter() {
            exceptions_by_service
                .entry(exception.service_id.clone())
                .or_insert_with(Vec::new)
                .push(idx);
        }

        Ok(Model {
            lines_to_trips,
            trips_to_stops,
            exceptions_by_service,
            collections: c,
        })
    }

    /// Returns true when the schedule holds at least one stop and one trip;
    /// planning must not be attempted on an empty schedule.
    pub fn has_schedule(&self) -> bool {
        !self.stops.is_empty() && !self.trips.is_empty()
    }

    /// Identifiers of all the trips calling at the given stop.
    pub fn trips_through_stop(&self, stop_idx: Idx<Stop>) -> IdxSet<Trip> {
        let mut from = IdxSet::default();
        from.insert(stop_idx);
        self.trips_to_stops.get_corresponding_backward(&from)
    }

    /// Identifiers of all the trips operated by the given line.
    pub fn trips_of_line(&self, line_idx: Idx<Line>) -> IdxSet<Trip> {
        let mut from = IdxSet::default();
        from.insert(line_idx);
        self.lines_to_trips.get_corresponding_forward(&from)
    }

    /// All the exceptions registered for the given service.
    pub fn exceptions_for_service<'a>(
        &'a self,
        service_id: &str,
    ) -> impl Iterator<Item = &'a ServiceException> {
        self.exceptions_by_service
            .get(service_id)
            .into_iter()
            .flatten()
            .map(move |idx| &self.exceptions[*idx])
    }

    /// Calculate the validity period of the model, based on the minimum
    /// start date and the maximum end date of the operating calendars.
    /// If no calendar operates, an error is returned.
    pub fn calculate_validity_period(&self) -> Result<ValidityPeriod> {
        let start_date = self
            .calendars
            .values()
            .filter(|calendar| calendar.has_active_weekday())
            .map(|calendar| calendar.start_date)
            .min();
        let end_date = self
            .calendars
            .values()
            .filter(|calendar| calendar.has_active_weekday())
            .map(|calendar| calendar.end_date)
            .max();
        start_date
            .zip(end_date)
            .map(|(start_date, end_date)| ValidityPeriod {
                start_date,
                end_date,
            })
            .ok_or_else(|| anyhow!("Cannot calculate validity period because no calendar operates"))
    }
}

impl ::serde::Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ::serde::Serializer,
    {
        self.collections.serialize(serializer)
    }
}

impl<'de> ::serde::Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: ::serde::Deserializer<'de>,
    {
        use serde::de::Error;
        ::serde::Deserialize::deserialize(deserializer)
            .and_then(|c| Model::new(c).map_err(D::Error::custom))
    }
}

impl ops::Deref for Model {
    type Target = Collections;
    fn deref(&self) -> &Self::Target {
        &self.collections
    }
}
