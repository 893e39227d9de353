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

//! Great-circle distances and walking-time estimation.

use crate::objects::Coord;

const EARTH_RADIUS_IN_METERS: f64 = 6_371_000.0;

// 4.8 km/h
const WALK_SPEED_IN_METERS_PER_MINUTE: f64 = 80.0;

/// Great-circle (haversine) distance between two coordinates, in meters.
pub fn distance_meters(from: &Coord, to: &Coord) -> f64 {
    let latitude_arc = (from.lat - to.lat).to_radians();
    let longitude_arc = (from.lon - to.lon).to_radians();
    let latitude_h = (latitude_arc * 0.5).sin();
    let latitude_h = latitude_h * latitude_h;
    let longitude_h = (longitude_arc * 0.5).sin();
    let longitude_h = longitude_h * longitude_h;
    let tmp = from.lat.to_radians().cos() * to.lat.to_radians().cos();
    EARTH_RADIUS_IN_METERS * 2.0 * (latitude_h + tmp * longitude_h).sqrt().asin()
}

/// Estimated walking time between two coordinates, in whole minutes, with a
/// floor of one minute.
pub fn walk_minutes(from: &Coord, to: &Coord) -> u32 {
    let minutes = (distance_meters(from, to) / WALK_SPEED_IN_METERS_PER_MINUTE).round();
    minutes.max(1.0) as u32
}
