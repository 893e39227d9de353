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

//! The `transit_planner` crate computes door-to-door journeys over a static
//! transit schedule: walking, waiting and vehicle legs honoring published
//! timetables, service-calendar validity and a maximum wait per boarding.
//!
//! The schedule is held in an immutable [`Model`] snapshot built from
//! [`model::Collections`]; planning requests go through
//! [`planner::JourneyPlanner`]. Feed parsing is out of scope: callers (or
//! tests, via [`model_builder::ModelBuilder`]) populate the collections
//! themselves.

#![deny(missing_docs)]

pub mod config;
pub mod geometry;
pub mod journey;
pub mod model;
#[doc(hidden)]
pub mod model_builder;
pub mod nearby;
#[macro_use]
pub mod objects;
pub mod planner;
pub(crate) mod serde_utils;
mod validity;

/// The error type used by the crate.
pub type Error = anyhow::Error;

/// The corresponding result type used by the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use crate::model::Model;
pub use crate::planner::{JourneyPlanner, PlanError};
