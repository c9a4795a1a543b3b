// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot reservation and transition persistence.
//!
//! Admission control lives here, not in the caller: a live booking row
//! may only land if no other live booking holds the same
//! `(court, date, slot)` triple. The check runs inside the insert's
//! transaction, and the partial unique index `idx_bookings_live_slot`
//! backs it at the storage layer, so two racing writers cannot both
//! succeed.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use courtdesk::{State, TransitionResult};
use courtdesk_domain::Booking;

use crate::data_models::{NewBookingRow, NewProductRow};
use crate::diesel_schema;
use crate::error::PersistenceError;
use crate::mutations::ledger;
use crate::sqlite::get_last_insert_rowid;

/// The database-side outcome of persisting one transition.
#[derive(Debug, Clone, Copy)]
pub struct PersistTransitionResult {
    /// The id assigned to the appended ledger entry.
    pub entry_id: i64,
    /// The id assigned to a newly created booking, if the transition
    /// created one.
    pub booking_id: Option<i64>,
}

fn slot_conflict_error(row: &NewBookingRow) -> PersistenceError {
    PersistenceError::SlotConflict {
        court_id: row.court_id,
        date: row.date.clone(),
        slot: row.slot_time.clone(),
    }
}

fn count_live_holders(
    conn: &mut SqliteConnection,
    row: &NewBookingRow,
    exclude_booking_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    let mut query = diesel_schema::bookings::table
        .filter(diesel_schema::bookings::court_id.eq(row.court_id))
        .filter(diesel_schema::bookings::date.eq(&row.date))
        .filter(diesel_schema::bookings::slot_time.eq(&row.slot_time))
        .filter(diesel_schema::bookings::status.ne("Cancelled"))
        .into_boxed();
    if let Some(booking_id) = exclude_booking_id {
        query = query.filter(diesel_schema::bookings::booking_id.ne(booking_id));
    }
    Ok(query.count().get_result(conn)?)
}

// The partial index reports as a plain unique violation; translate it
// back into the domain-shaped conflict.
fn map_unique_violation(error: diesel::result::Error, row: &NewBookingRow) -> PersistenceError {
    match error {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            slot_conflict_error(row)
        }
        other => other.into(),
    }
}

fn insert_booking_guarded(
    conn: &mut SqliteConnection,
    booking: &Booking,
) -> Result<i64, PersistenceError> {
    let row = NewBookingRow::from_booking(booking)?;
    if booking.status.holds_slot() && count_live_holders(conn, &row, None)? > 0 {
        return Err(slot_conflict_error(&row));
    }
    diesel::insert_into(diesel_schema::bookings::table)
        .values(&row)
        .execute(conn)
        .map_err(|error| map_unique_violation(error, &row))?;
    get_last_insert_rowid(conn)
}

fn update_booking_row(
    conn: &mut SqliteConnection,
    booking_id: i64,
    booking: &Booking,
) -> Result<(), PersistenceError> {
    let row = NewBookingRow::from_booking(booking)?;
    if booking.status.holds_slot() && count_live_holders(conn, &row, Some(booking_id))? > 0 {
        return Err(slot_conflict_error(&row));
    }
    diesel::update(
        diesel_schema::bookings::table
            .filter(diesel_schema::bookings::booking_id.eq(booking_id)),
    )
    .set(&row)
    .execute(conn)
    .map_err(|error| map_unique_violation(error, &row))?;
    Ok(())
}

/// Inserts one booking under the live-slot admission check, in its own
/// transaction.
///
/// # Returns
///
/// The booking ID assigned by the database.
///
/// # Errors
///
/// Returns [`PersistenceError::SlotConflict`] if another live booking
/// already holds the slot, or a database error otherwise.
pub fn reserve_slot(
    conn: &mut SqliteConnection,
    booking: &Booking,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| insert_booking_guarded(conn, booking))
}

/// Persists one state transition atomically: booking rows and product
/// stock are synchronized to the new state, and the transition's ledger
/// entry is appended, all in a single transaction. Either everything
/// lands or nothing does.
///
/// Only rows that differ from `previous` are written.
///
/// # Errors
///
/// Returns [`PersistenceError::SlotConflict`] if a created or edited
/// booking collides with a live booking, or a database error otherwise.
/// On error the transaction rolls back and no rows change.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    previous: &State,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    conn.transaction(|conn| {
        let mut created_booking_id = None;
        for booking in &result.new_state.bookings {
            match booking.booking_id {
                None => {
                    created_booking_id = Some(insert_booking_guarded(conn, booking)?);
                }
                Some(booking_id) => {
                    let unchanged = previous
                        .bookings
                        .iter()
                        .any(|prior| prior.booking_id == Some(booking_id) && prior == booking);
                    if !unchanged {
                        update_booking_row(conn, booking_id, booking)?;
                    }
                }
            }
        }
        for product in &result.new_state.products {
            if let Some(product_id) = product.product_id {
                let unchanged = previous
                    .products
                    .iter()
                    .any(|prior| prior.product_id == Some(product_id) && prior == product);
                if !unchanged {
                    diesel::update(
                        diesel_schema::products::table
                            .filter(diesel_schema::products::product_id.eq(product_id)),
                    )
                    .set(NewProductRow::from(product))
                    .execute(conn)?;
                }
            }
        }
        let entry_id = ledger::append_entry(conn, &result.entry)?;
        Ok(PersistTransitionResult {
            entry_id,
            booking_id: created_booking_id,
        })
    })
}
