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

//! Tuning parameters of the journey planner.

use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Maximum wait before the first boarding and at each transfer, in seconds.
pub const DEFAULT_MAX_WAIT_SECONDS: u32 = 600;
/// Number of candidate stops considered around the origin and around the
/// destination.
pub const DEFAULT_CANDIDATE_STOPS: usize = 20;
/// Maximum number of vehicle changes in a journey.
pub const DEFAULT_MAX_TRANSFERS: u8 = 2;

/// How the planner chooses among the candidate stop pairs.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Return the journey of the first (nearest) stop pair yielding any
    /// itinerary, preferring fewer transfers within the pair.
    FirstMatch,
    /// Evaluate every candidate stop pair and keep the journey arriving
    /// earliest at the destination, final walk included.
    BestArrival,
}

impl std::str::FromStr for SelectionStrategy {
    type Err = SelectionStrategyConfigError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let strategy = match s {
            "first_match" => SelectionStrategy::FirstMatch,
            "best_arrival" => SelectionStrategy::BestArrival,
            _ => {
                return Err(SelectionStrategyConfigError {
                    strategy_name: s.to_string(),
                })
            }
        };
        Ok(strategy)
    }
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        Self::BestArrival
    }
}

impl std::fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionStrategy::FirstMatch => write!(f, "first_match"),
            SelectionStrategy::BestArrival => write!(f, "best_arrival"),
        }
    }
}

/// An unknown selection strategy name.
#[derive(Debug)]
pub struct SelectionStrategyConfigError {
    strategy_name: String,
}

impl std::fmt::Display for SelectionStrategyConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bad selection strategy : `{}`", self.strategy_name)
    }
}

impl std::error::Error for SelectionStrategyConfigError {}

/// Tuning parameters of a `JourneyPlanner`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// maximum wait before the first boarding and at each transfer, in
    /// seconds
    #[serde(default = "default_max_wait_seconds")]
    pub max_wait_seconds: u32,

    /// number of candidate stops considered around the origin and around
    /// the destination
    #[serde(default = "default_candidate_stops")]
    pub candidate_stops: usize,

    /// maximum number of vehicle changes in a journey
    #[serde(default = "default_max_transfers")]
    pub max_transfers: u8,

    /// how the planner chooses among the candidate stop pairs
    #[serde(default)]
    pub selection: SelectionStrategy,
}

fn default_max_wait_seconds() -> u32 {
    DEFAULT_MAX_WAIT_SECONDS
}

fn default_candidate_stops() -> usize {
    DEFAULT_CANDIDATE_STOPS
}

fn default_max_transfers() -> u8 {
    DEFAULT_MAX_TRANSFERS
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_wait_seconds: default_max_wait_seconds(),
            candidate_stops: default_candidate_stops(),
            max_transfers: default_max_transfers(),
            selection: SelectionStrategy::default(),
        }
    }
}

/// Read an optional JSON configuration file into a `PlannerConfig`,
/// defaulting every parameter when no path is given.
///
/// Below is an example of this file
/// ```text
/// {
///     "max_wait_seconds": 600,
///     "candidate_stops": 20,
///     "max_transfers": 2,
///     "selection": "best_arrival"
/// }
/// ```
pub fn read_config<P: AsRef<Path>>(config_path: Option<P>) -> Result<PlannerConfig> {
    if let Some(config_path) = config_path {
        let config_path = config_path.as_ref();
        info!("Reading planner configuration from {:?}", config_path);
        let json_config_file = File::open(config_path)
            .with_context(|| format!("Error opening {:?}", config_path))?;
        let config = serde_json::from_reader(json_config_file)
            .with_context(|| format!("Error reading {:?}", config_path))?;
        Ok(config)
    } else {
        Ok(PlannerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_values() {
        let config = PlannerConfig::default();
        assert_eq!(600, config.max_wait_seconds);
        assert_eq!(20, config.candidate_stops);
        assert_eq!(2, config.max_transfers);
        assert_eq!(SelectionStrategy::BestArrival, config.selection);
    }

    #[test]
    fn missing_fields_are_defaulted() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"max_wait_seconds": 300, "selection": "first_match"}"#)
                .unwrap();
        assert_eq!(300, config.max_wait_seconds);
        assert_eq!(20, config.candidate_stops);
        assert_eq!(SelectionStrategy::FirstMatch, config.selection);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let config: std::result::Result<PlannerConfig, _> =
            serde_json::from_str(r#"{"max_wait": 300}"#);
        assert!(config.is_err());
    }

    #[test]
    fn strategy_names_round_trip() {
        for strategy in &[SelectionStrategy::FirstMatch, SelectionStrategy::BestArrival] {
            assert_eq!(
                *strategy,
                strategy.to_string().parse::<SelectionStrategy>().unwrap()
            );
        }
        assert!("fastest".parse::<SelectionStrategy>().is_err());
    }

    #[test]
    fn no_path_means_default_configuration() {
        let config = read_config(None as Option<&Path>).unwrap();
        assert_eq!(PlannerConfig::default(), config);
    }
}
