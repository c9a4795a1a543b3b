// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query modules.
//!
//! All queries use Diesel DSL against the `SQLite` connection and map
//! rows back into domain values at the boundary.

pub mod bookings;
pub mod catalog;
pub mod ledger;
pub mod summaries;

use courtdesk::State;
use diesel::SqliteConnection;

use crate::error::PersistenceError;

/// Loads the full operational state: schedule, courts, products and all
/// bookings.
///
/// # Errors
///
/// Returns an error if any collection cannot be read or mapped.
pub fn load_state(conn: &mut SqliteConnection) -> Result<State, PersistenceError> {
    Ok(State {
        schedule: catalog::load_schedule(conn)?,
        courts: catalog::list_courts(conn)?,
        products: catalog::list_products(conn)?,
        bookings: bookings::list_bookings(conn)?,
    })
}
