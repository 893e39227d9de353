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

//! Journeys returned by the planner: ordered sequences of walking, waiting
//! and riding legs with concrete clock times.

use crate::objects::{Coord, Rgb, Time};
use serde::{Deserialize, Serialize};

/// A named geographic location.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Place {
    /// Display name of the location.
    pub name: String,
    /// Position of the location.
    pub coord: Coord,
}

/// The vehicle details carried by a ride leg.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct RideInfo {
    pub line_id: String,
    pub line_code: Option<String>,
    pub line_name: String,
    pub line_color: Option<Rgb>,
    pub board_stop_id: String,
    pub alight_stop_id: String,
    pub headsign: Option<String>,
}

/// What the traveler does during a leg.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum LegKind {
    /// Walking between two locations.
    Walk,
    /// Waiting at a stop for a vehicle.
    Wait,
    /// Riding a scheduled vehicle.
    Ride(RideInfo),
}

/// One atomic segment of a journey.
///
/// Legs chain in space and time: a leg starts where and no earlier than
/// the previous one ended.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Leg {
    /// What the traveler does during the leg.
    pub kind: LegKind,
    /// Where the leg starts.
    pub from: Place,
    /// Where the leg ends.
    pub to: Place,
    /// Clock time at which the leg starts.
    pub start: Time,
    /// Clock time at which the leg ends.
    pub end: Time,
    /// Distance covered, in meters.
    pub distance: u32,
    /// Estimated duration, in minutes.
    pub duration: u32,
    /// Human-readable description of the leg.
    pub instructions: String,
}

impl Leg {
    /// True for a vehicle leg.
    pub fn is_ride(&self) -> bool {
        matches!(self.kind, LegKind::Ride(_))
    }
}

/// A complete itinerary from an origin to a destination.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Journey {
    /// Where the journey starts.
    pub origin: Place,
    /// Where the journey ends.
    pub destination: Place,
    /// The ordered legs of the journey.
    pub legs: Vec<Leg>,
    /// Sum of the legs' distances, in meters.
    pub total_distance: u32,
    /// Sum of the legs' durations, in minutes.
    pub total_duration: u32,
}

impl Journey {
    /// Builds a journey from its legs, computing the totals.
    pub fn new(origin: Place, destination: Place, legs: Vec<Leg>) -> Self {
        let total_distance = legs.iter().map(|leg| leg.distance).sum();
        let total_duration = legs.iter().map(|leg| leg.duration).sum();
        Journey {
            origin,
            destination,
            legs,
            total_distance,
            total_duration,
        }
    }

    /// The ride legs of the journey.
    pub fn rides(&self) -> impl Iterator<Item = &Leg> {
        self.legs.iter().filter(|leg| leg.is_ride())
    }

    /// Number of vehicle changes.
    pub fn nb_of_transfers(&self) -> usize {
        self.rides().count().saturating_sub(1)
    }

    /// Clock time at which the journey starts.
    pub fn departure(&self) -> Option<Time> {
        self.legs.first().map(|leg| leg.start)
    }

    /// Clock time at which the journey ends.
    pub fn arrival(&self) -> Option<Time> {
        self.legs.last().map(|leg| leg.end)
    }

    /// True when the journey is non-empty and its legs chain in space and
    /// time.
    pub fn is_coherent(&self) -> bool {
        if self.legs.is_empty() {
            return false;
        }
        self.legs.iter().all(|leg| leg.start <= leg.end)
            && self
                .legs
                .windows(2)
                .all(|w| w[0].to == w[1].from && w[0].end <= w[1].start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn place(name: &str, lat: f64) -> Place {
        Place {
            name: name.to_string(),
            coord: Coord { lon: 0.0, lat },
        }
    }

    fn walk(from: Place, to: Place, start: &str, end: &str, minutes: u32) -> Leg {
        Leg {
            kind: LegKind::Walk,
            from,
            to,
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            distance: minutes * 80,
            duration: minutes,
            instructions: String::new(),
        }
    }

    #[test]
    fn totals_are_summed_over_legs() {
        let journey = Journey::new(
            place("origin", 0.0),
            place("destination", 0.2),
            vec![
                walk(place("origin", 0.0), place("A", 0.1), "08:00:00", "08:05:00", 5),
                walk(place("A", 0.1), place("destination", 0.2), "08:05:00", "08:15:00", 10),
            ],
        );
        assert_eq!(15, journey.total_duration);
        assert_eq!(15 * 80, journey.total_distance);
        assert_eq!(0, journey.nb_of_transfers());
        assert_eq!(Some("08:00:00".parse().unwrap()), journey.departure());
        assert_eq!(Some("08:15:00".parse().unwrap()), journey.arrival());
        assert!(journey.is_coherent());
    }

    #[test]
    fn an_empty_journey_is_not_coherent() {
        let journey = Journey::new(place("origin", 0.0), place("destination", 0.2), vec![]);
        assert!(!journey.is_coherent());
    }

    #[test]
    fn legs_must_chain_in_space() {
        let journey = Journey::new(
            place("origin", 0.0),
            place("destination", 0.3),
            vec![
                walk(place("origin", 0.0), place("A", 0.1), "08:00:00", "08:05:00", 5),
                walk(place("B", 0.2), place("destination", 0.3), "08:05:00", "08:15:00", 10),
            ],
        );
        assert!(!journey.is_coherent());
    }

    #[test]
    fn legs_must_chain_in_time() {
        let journey = Journey::new(
            place("origin", 0.0),
            place("destination", 0.2),
            vec![
                walk(place("origin", 0.0), place("A", 0.1), "08:00:00", "08:05:00", 5),
                walk(place("A", 0.1), place("destination", 0.2), "08:04:00", "08:15:00", 11),
            ],
        );
        assert!(!journey.is_coherent());
    }
}
