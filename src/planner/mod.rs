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

//! The journey planner: evaluation of candidate stop pairs around the
//! origin and the destination.
//!
//! Planning is a pure, synchronous, read-only computation over a shared
//! [`Model`] snapshot; concurrent calls are independent. A planning call
//! performs no retries: finding no itinerary is a normal outcome
//! (`Ok(None)`), distinct from calling the planner without a schedule
//! loaded (`Err(PlanError::NoSchedule)`).

mod assemble;
mod search;

use crate::config::{PlannerConfig, SelectionStrategy};
use crate::geometry::walk_minutes;
use crate::journey::Journey;
use crate::model::Model;
use crate::nearby::nearest_stops;
use crate::objects::Coord;
use chrono::{NaiveDateTime, Timelike};
use self::search::PairContext;
use thiserror::Error;
use tracing::debug;

/// The failures that prevent a planning request from being evaluated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// The schedule store is empty; the caller is expected to fall back to
    /// another routing strategy.
    #[error("no schedule data loaded")]
    NoSchedule,
    /// A coordinate lies outside the valid ranges.
    #[error(
        "invalid coordinates ({lat};{lon}): latitude must be in [-90;90] and longitude in [-180;180]"
    )]
    InvalidCoordinates {
        /// Latitude of the rejected coordinate.
        lat: f64,
        /// Longitude of the rejected coordinate.
        lon: f64,
    },
}

/// Plans journeys over an immutable schedule snapshot.
pub struct JourneyPlanner<'m> {
    model: &'m Model,
    config: PlannerConfig,
}

impl<'m> JourneyPlanner<'m> {
    /// A planner with the default configuration.
    pub fn new(model: &'m Model) -> Self {
        Self::with_config(model, PlannerConfig::default())
    }

    /// A planner with the given configuration.
    pub fn with_config(model: &'m Model, config: PlannerConfig) -> Self {
        JourneyPlanner { model, config }
    }

    /// True when the schedule holds data; planning must not be attempted
    /// otherwise.
    pub fn has_schedule(&self) -> bool {
        self.model.has_schedule()
    }

    /// Plans a journey from `origin` to `destination`, leaving at
    /// `departure`.
    ///
    /// The date part of `departure` selects which services run; the time
    /// part is the instant the traveler starts walking. Returns `Ok(None)`
    /// when no candidate stop pair yields an itinerary within the transfer
    /// and wait bounds; the caller decides the fallback.
    pub fn plan_journey(
        &self,
        origin: &Coord,
        destination: &Coord,
        departure: NaiveDateTime,
    ) -> Result<Option<Journey>, PlanError> {
        if !self.has_schedule() {
            return Err(PlanError::NoSchedule);
        }
        check_coord(origin)?;
        check_coord(destination)?;

        let date = departure.date();
        let now_seconds = departure.time().num_seconds_from_midnight();
        let origin_candidates = nearest_stops(self.model, origin, self.config.candidate_stops);
        let destination_candidates =
            nearest_stops(self.model, destination, self.config.candidate_stops);
        debug!(
            "evaluating {}x{} candidate stop pairs departing {}",
            origin_candidates.len(),
            destination_candidates.len(),
            departure,
        );

        // key: arrival at the destination (final walk included), then
        // number of rides, then candidate rank
        let mut best: Option<((u32, usize, usize, usize), PairContext, search::Chain)> = None;
        for (origin_rank, &(origin_stop, _)) in origin_candidates.iter().enumerate() {
            let walk_to_stop = walk_minutes(origin, &self.model.stops[origin_stop].coord);
            let earliest_board = now_seconds + walk_to_stop * 60;
            for (destination_rank, &(destination_stop, _)) in
                destination_candidates.iter().enumerate()
            {
                let context = PairContext {
                    origin_stop,
                    destination_stop,
                    earliest_board,
                    latest_departure: earliest_board + self.config.max_wait_seconds,
                    walk_to_stop,
                };
                let chains = search::best_chains(self.model, date, &self.config, &context);
                match self.config.selection {
                    SelectionStrategy::FirstMatch => {
                        if let Some(chain) = chains.into_iter().flatten().next() {
                            let journey = assemble::assemble(
                                self.model,
                                origin,
                                destination,
                                now_seconds,
                                &context,
                                &chain,
                            );
                            debug!(
                                "journey found on stop pair ({}, {}) with {} transfer(s)",
                                self.model.stops[origin_stop].id,
                                self.model.stops[destination_stop].id,
                                journey.nb_of_transfers(),
                            );
                            return Ok(Some(journey));
                        }
                    }
                    SelectionStrategy::BestArrival => {
                        let final_walk =
                            walk_minutes(&self.model.stops[destination_stop].coord, destination);
                        for chain in chains.into_iter().flatten() {
                            let key = (
                                chain.final_arrival().total_seconds() + final_walk * 60,
                                chain.rides.len(),
                                origin_rank,
                                destination_rank,
                            );
                            if best.as_ref().map_or(true, |(current, _, _)| key < *current) {
                                best = Some((key, context.clone(), chain));
                            }
                        }
                    }
                }
            }
        }

        Ok(best.map(|(_, context, chain)| {
            let journey = assemble::assemble(
                self.model,
                origin,
                destination,
                now_seconds,
                &context,
                &chain,
            );
            debug!(
                "best journey arrives at {:?} with {} transfer(s)",
                journey.arrival(),
                journey.nb_of_transfers(),
            );
            journey
        }))
    }
}

fn check_coord(coord: &Coord) -> Result<(), PlanError> {
    if coord.is_valid() {
        Ok(())
    } else {
        Err(PlanError::InvalidCoordinates {
            lat: coord.lat,
            lon: coord.lon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Collections;

    #[test]
    fn planning_requires_a_schedule() {
        let model = Model::new(Collections::default()).unwrap();
        let planner = JourneyPlanner::new(&model);
        assert!(!planner.has_schedule());
        let origin = Coord { lon: 0.0, lat: 0.0 };
        let destination = Coord { lon: 0.1, lat: 0.1 };
        let departure = chrono::NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(
            Err(PlanError::NoSchedule),
            planner.plan_journey(&origin, &destination, departure)
        );
    }

    #[test]
    fn coordinates_are_validated() {
        let model = crate::model_builder::ModelBuilder::default()
            .trip("t1", |t| {
                t.st("A", "10:00:00", "10:01:00")
                    .st("B", "11:00:00", "11:01:00");
            })
            .build();
        let planner = JourneyPlanner::new(&model);
        let origin = Coord {
            lon: 0.0,
            lat: 91.0,
        };
        let destination = Coord { lon: 0.1, lat: 0.1 };
        let departure = chrono::NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        match planner.plan_journey(&origin, &destination, departure) {
            Err(PlanError::InvalidCoordinates { lat, .. }) => assert_eq!(91.0, lat),
            other => panic!("expected invalid coordinates, got {:?}", other),
        }
    }
}
