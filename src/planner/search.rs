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

//! Chain-extension search over scheduled trips.
//!
//! A candidate itinerary between two stops is a chain of rides; the search
//! starts one chain per feasible first boarding and extends it one ride at
//! a time, transferring at later visits of the current trip under the wait
//! bound, until the destination stop is reached or the transfer budget is
//! exhausted. For each ride count the chain with the earliest final
//! arrival is kept.

use crate::config::PlannerConfig;
use crate::model::Model;
use crate::objects::{Date, Stop, Time, Trip};
use std::collections::HashMap;
use typed_index_collection::Idx;

/// One vehicle section of a candidate itinerary.
#[derive(Debug, Clone)]
pub(crate) struct Ride {
    pub trip_idx: Idx<Trip>,
    pub board_stop: Idx<Stop>,
    pub alight_stop: Idx<Stop>,
    pub departure: Time,
    pub arrival: Time,
}

/// A complete chain of rides from the origin stop to the destination stop.
#[derive(Debug, Clone)]
pub(crate) struct Chain {
    pub rides: Vec<Ride>,
}

impl Chain {
    /// Arrival at the destination stop, on the last ride.
    pub(crate) fn final_arrival(&self) -> Time {
        self.rides
            .last()
            .map(|ride| ride.arrival)
            .unwrap_or_default()
    }
}

/// The fixed parameters of one candidate stop pair evaluation.
#[derive(Debug, Clone)]
pub(crate) struct PairContext {
    pub origin_stop: Idx<Stop>,
    pub destination_stop: Idx<Stop>,
    /// Instant the traveler can reach the origin stop on foot, in seconds
    /// since midnight.
    pub earliest_board: u32,
    /// Latest acceptable first departure, `earliest_board` plus the wait
    /// bound.
    pub latest_departure: u32,
    /// Walk from the origin point to the origin stop, in minutes.
    pub walk_to_stop: u32,
}

/// Best chain (earliest final arrival) per ride count for the given stop
/// pair: index 0 holds the direct itinerary, index `n` the itinerary with
/// `n` transfers, up to `config.max_transfers`.
pub(crate) fn best_chains(
    model: &Model,
    date: Date,
    config: &PlannerConfig,
    context: &PairContext,
) -> Vec<Option<Chain>> {
    let mut search = Search {
        model,
        date,
        max_wait: config.max_wait_seconds,
        destination_stop: context.destination_stop,
        service_active: HashMap::new(),
        best: vec![None; usize::from(config.max_transfers) + 1],
    };
    for trip_idx in model.trips_through_stop(context.origin_stop) {
        if !search.service_runs(trip_idx) {
            continue;
        }
        let trip = &model.trips[trip_idx];
        let board_pos = match trip.first_visit_of(context.origin_stop) {
            Some(pos) => pos,
            None => continue,
        };
        let departure = trip.stop_visits[board_pos].departure_time.total_seconds();
        if departure < context.earliest_board || departure > context.latest_departure {
            continue;
        }
        search.extend(&mut Vec::new(), trip_idx, board_pos);
    }
    search.best
}

struct Search<'m> {
    model: &'m Model,
    date: Date,
    max_wait: u32,
    destination_stop: Idx<Stop>,
    // service activity is looked up once per service and planning date
    service_active: HashMap<String, bool>,
    best: Vec<Option<Chain>>,
}

impl<'m> Search<'m> {
    fn service_runs(&mut self, trip_idx: Idx<Trip>) -> bool {
        let trip = &self.model.trips[trip_idx];
        if let Some(&known) = self.service_active.get(&trip.service_id) {
            return known;
        }
        let active = self.model.service_runs_on(&trip.service_id, self.date);
        self.service_active.insert(trip.service_id.clone(), active);
        active
    }

    /// Extends the chain in `rides` with one more ride boarding `trip_idx`
    /// at visit `board_pos`: alighting at the destination completes a
    /// chain, and every later visit is a transfer opportunity while the
    /// budget allows.
    fn extend(&mut self, rides: &mut Vec<Ride>, trip_idx: Idx<Trip>, board_pos: usize) {
        let model = self.model;
        let trip = &model.trips[trip_idx];
        let board = &trip.stop_visits[board_pos];

        if let Some(alight) = trip.stop_visits[board_pos + 1..]
            .iter()
            .find(|visit| visit.stop_idx == self.destination_stop)
        {
            let first_departure = rides
                .first()
                .map(|ride| ride.departure)
                .unwrap_or(board.departure_time);
            if alight.arrival_time > board.departure_time && alight.arrival_time > first_departure
            {
                let mut chain = rides.clone();
                chain.push(Ride {
                    trip_idx,
                    board_stop: board.stop_idx,
                    alight_stop: alight.stop_idx,
                    departure: board.departure_time,
                    arrival: alight.arrival_time,
                });
                self.record(Chain { rides: chain });
            }
        }

        // one more ride after the current one must fit in the budget
        if rides.len() + 2 > self.best.len() {
            return;
        }
        for mid_pos in board_pos + 1..trip.stop_visits.len() {
            let mid = &trip.stop_visits[mid_pos];
            for next_trip_idx in model.trips_through_stop(mid.stop_idx) {
                if next_trip_idx == trip_idx {
                    continue;
                }
                if !self.service_runs(next_trip_idx) {
                    continue;
                }
                let next_trip = &model.trips[next_trip_idx];
                let next_board_pos = match next_trip.first_visit_of(mid.stop_idx) {
                    Some(pos) => pos,
                    None => continue,
                };
                let next_departure = next_trip.stop_visits[next_board_pos].departure_time;
                if next_departure < mid.arrival_time {
                    continue;
                }
                if next_departure.total_seconds() - mid.arrival_time.total_seconds() > self.max_wait
                {
                    continue;
                }
                rides.push(Ride {
                    trip_idx,
                    board_stop: board.stop_idx,
                    alight_stop: mid.stop_idx,
                    departure: board.departure_time,
                    arrival: mid.arrival_time,
                });
                self.extend(rides, next_trip_idx, next_board_pos);
                rides.pop();
            }
        }
    }

    fn record(&mut self, chain: Chain) {
        let slot = chain.rides.len() - 1;
        let better = self.best[slot]
            .as_ref()
            .map_or(true, |current| chain.final_arrival() < current.final_arrival());
        if better {
            self.best[slot] = Some(chain);
        }
    }
}
