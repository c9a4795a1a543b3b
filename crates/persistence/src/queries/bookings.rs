// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use courtdesk_domain::Booking;

use crate::data_models::BookingRow;
use crate::diesel_schema;
use crate::error::PersistenceError;

/// Lists all bookings, cancelled ones included.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be mapped.
pub fn list_bookings(conn: &mut SqliteConnection) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = diesel_schema::bookings::table
        .order(diesel_schema::bookings::booking_id.asc())
        .load::<BookingRow>(conn)?;
    rows.into_iter().map(Booking::try_from).collect()
}

/// Lists all bookings on one ISO calendar day.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be mapped.
pub fn bookings_for_day(
    conn: &mut SqliteConnection,
    day: &str,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = diesel_schema::bookings::table
        .filter(diesel_schema::bookings::date.eq(day))
        .order(diesel_schema::bookings::slot_time.asc())
        .load::<BookingRow>(conn)?;
    rows.into_iter().map(Booking::try_from).collect()
}

/// Retrieves one booking by id.
///
/// # Errors
///
/// Returns an error if the booking does not exist or cannot be mapped.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<Booking, PersistenceError> {
    let row: BookingRow = diesel_schema::bookings::table
        .filter(diesel_schema::bookings::booking_id.eq(booking_id))
        .first::<BookingRow>(conn)?;
    Booking::try_from(row)
}
