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

//! Ranking of stops by distance to a point.

use crate::geometry::distance_meters;
use crate::model::Model;
use crate::objects::{Coord, Stop};
use std::cmp::Ordering;
use typed_index_collection::Idx;

/// The `count` stops closest to `point`, nearest first, with their distance
/// in meters. Ties are broken by the stops' order in the schedule (the sort
/// is stable), so the ranking is deterministic. Returns fewer than `count`
/// entries when the schedule holds fewer stops.
pub fn nearest_stops(model: &Model, point: &Coord, count: usize) -> Vec<(Idx<Stop>, f64)> {
    let mut ranked: Vec<(Idx<Stop>, f64)> = model
        .stops
        .iter()
        .map(|(idx, stop)| (idx, distance_meters(&stop.coord, point)))
        .collect();
    ranked.sort_by(|left, right| left.1.partial_cmp(&right.1).unwrap_or(Ordering::Equal));
    ranked.truncate(count);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Collections;
    use pretty_assertions::assert_eq;
    use typed_index_collection::CollectionWithId;

    fn model_with_stops(stops: Vec<Stop>) -> Model {
        let collections = Collections {
            stops: CollectionWithId::new(stops).unwrap(),
            ..Default::default()
        };
        Model::new(collections).unwrap()
    }

    fn stop(id: &str, lon: f64, lat: f64) -> Stop {
        Stop {
            id: id.to_string(),
            name: id.to_string(),
            coord: Coord { lon, lat },
        }
    }

    #[test]
    fn stops_are_ranked_by_distance() {
        let model = model_with_stops(vec![
            stop("far", 0.0, 1.0),
            stop("near", 0.0, 0.001),
            stop("middle", 0.0, 0.1),
        ]);
        let point = Coord { lon: 0.0, lat: 0.0 };
        let ranked = nearest_stops(&model, &point, 20);
        let ids: Vec<&str> = ranked
            .iter()
            .map(|(idx, _)| model.stops[*idx].id.as_str())
            .collect();
        assert_eq!(vec!["near", "middle", "far"], ids);
        assert!(ranked.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn count_limits_the_result() {
        let model = model_with_stops(vec![
            stop("a", 0.0, 0.3),
            stop("b", 0.0, 0.1),
            stop("c", 0.0, 0.2),
        ]);
        let point = Coord { lon: 0.0, lat: 0.0 };
        assert_eq!(2, nearest_stops(&model, &point, 2).len());
        assert_eq!(3, nearest_stops(&model, &point, 20).len());
    }

    #[test]
    fn ties_keep_the_schedule_order() {
        let model = model_with_stops(vec![
            stop("east", 0.001, 0.0),
            stop("west", -0.001, 0.0),
        ]);
        let point = Coord { lon: 0.0, lat: 0.0 };
        let ranked = nearest_stops(&model, &point, 20);
        let ids: Vec<&str> = ranked
            .iter()
            .map(|(idx, _)| model.stops[*idx].id.as_str())
            .collect();
        assert_eq!(vec!["east", "west"], ids);
    }
}
