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

//! Rendering of a winning ride chain into a journey with concrete legs.

use super::search::{Chain, PairContext, Ride};
use crate::geometry::{distance_meters, walk_minutes};
use crate::journey::{Journey, Leg, LegKind, Place, RideInfo};
use crate::model::Model;
use crate::objects::{Coord, Stop, Time};

/// Renders `chain` as an ordered leg sequence: walk to the first stop,
/// then per ride an optional wait (when boarding a whole minute or more
/// after reaching the stop) followed by the ride, and a final walk to the
/// destination. Leg boundaries chain exactly: walks end when the traveler
/// reaches the stop, waits end at the departure they precede.
pub(crate) fn assemble(
    model: &Model,
    origin: &Coord,
    destination: &Coord,
    now_seconds: u32,
    context: &PairContext,
    chain: &Chain,
) -> Journey {
    let origin_place = Place {
        name: String::from("origin"),
        coord: *origin,
    };
    let destination_place = Place {
        name: String::from("destination"),
        coord: *destination,
    };

    let mut legs = Vec::new();
    let board_stop = &model.stops[context.origin_stop];
    let earliest_board = Time::from(context.earliest_board);
    legs.push(Leg {
        kind: LegKind::Walk,
        from: origin_place.clone(),
        to: place_of(board_stop),
        start: Time::from(now_seconds),
        end: earliest_board,
        distance: distance_meters(origin, &board_stop.coord).round() as u32,
        duration: context.walk_to_stop,
        instructions: format!("Walk to {}", board_stop.name),
    });

    let mut reached_stop_at = earliest_board;
    for ride in &chain.rides {
        let wait_minutes =
            (ride.departure.total_seconds() - reached_stop_at.total_seconds()) / 60;
        if wait_minutes > 0 {
            let stop = &model.stops[ride.board_stop];
            legs.push(Leg {
                kind: LegKind::Wait,
                from: place_of(stop),
                to: place_of(stop),
                start: reached_stop_at,
                end: ride.departure,
                distance: 0,
                duration: wait_minutes,
                instructions: format!("Wait {} min at {}", wait_minutes, stop.name),
            });
        }
        legs.push(ride_leg(model, ride));
        reached_stop_at = ride.arrival;
    }

    let alight_stop = &model.stops[chain
        .rides
        .last()
        .expect("a chain always contains at least one ride")
        .alight_stop];
    let final_walk_minutes = walk_minutes(&alight_stop.coord, destination);
    legs.push(Leg {
        kind: LegKind::Walk,
        from: place_of(alight_stop),
        to: destination_place.clone(),
        start: reached_stop_at,
        end: reached_stop_at + Time::from(final_walk_minutes * 60),
        distance: distance_meters(&alight_stop.coord, destination).round() as u32,
        duration: final_walk_minutes,
        instructions: String::from("Walk to destination"),
    });

    let journey = Journey::new(origin_place, destination_place, legs);
    debug_assert!(journey.is_coherent());
    journey
}

fn place_of(stop: &Stop) -> Place {
    Place {
        name: stop.name.clone(),
        coord: stop.coord,
    }
}

fn ride_leg(model: &Model, ride: &Ride) -> Leg {
    let trip = &model.trips[ride.trip_idx];
    let line = model.lines.get(&trip.line_id);
    let board = &model.stops[ride.board_stop];
    let alight = &model.stops[ride.alight_stop];
    let label = line
        .map(|line| line.code.clone().unwrap_or_else(|| line.name.clone()))
        .unwrap_or_else(|| trip.line_id.clone());
    let instructions = match &trip.headsign {
        Some(headsign) => format!(
            "Take {} towards {} from {} to {}",
            label, headsign, board.name, alight.name
        ),
        None => format!("Take {} from {} to {}", label, board.name, alight.name),
    };
    let duration_minutes =
        ((ride.arrival.total_seconds() - ride.departure.total_seconds()) / 60).max(1);
    Leg {
        kind: LegKind::Ride(RideInfo {
            line_id: trip.line_id.clone(),
            line_code: line.and_then(|line| line.code.clone()),
            line_name: line.map(|line| line.name.clone()).unwrap_or_default(),
            line_color: line.and_then(|line| line.color.clone()),
            board_stop_id: board.id.clone(),
            alight_stop_id: alight.id.clone(),
            headsign: trip.headsign.clone(),
        }),
        from: place_of(board),
        to: place_of(alight),
        start: ride.departure,
        end: ride.arrival,
        distance: distance_meters(&board.coord, &alight.coord).round() as u32,
        duration: duration_minutes,
        instructions,
    }
}
