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

//! Service-calendar validation: deciding whether a service operates on a
//! given date.

use crate::model::Model;
use crate::objects::{Date, ExceptionType};

impl Model {
    /// Returns true if the given service operates on `date`.
    ///
    /// The weekly pattern of the service calendar applies only within its
    /// validity range; a service without calendar never operates. An
    /// exception registered for the exact date takes precedence over the
    /// weekly pattern: `Add` forces the service to run, `Remove` forces it
    /// not to.
    pub fn service_runs_on(&self, service_id: &str, date: Date) -> bool {
        for exception in self.exceptions_for_service(service_id) {
            if exception.date == date {
                return exception.exception_type == ExceptionType::Add;
            }
        }
        self.calendars
            .get(service_id)
            .map_or(false, |calendar| calendar.active_on(date))
    }
}
