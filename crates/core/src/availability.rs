// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The availability engine.
//!
//! Occupancy is keyed on the booking's start slot alone: two bookings
//! collide exactly when their `(court, date, slot)` triples match,
//! regardless of duration. This check is advisory under concurrency;
//! the persistence layer enforces the same rule transactionally.

use courtdesk_domain::{Booking, Court, ScheduleGrid, SlotTime};
use time::Date;

/// First bookable start hour on the public grid.
pub const FIRST_START_HOUR: u8 = 8;

/// Last bookable start hour on the public grid (inclusive).
pub const LAST_START_HOUR: u8 = 22;

/// One cell of the public availability grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSlot {
    /// The court identifier.
    pub court_id: i64,
    /// The court's display name.
    pub court_name: String,
    /// The slot start time.
    pub slot: SlotTime,
    /// The effective price for this court in cents.
    pub price_cents: i64,
    /// Whether the slot can currently be booked.
    pub available: bool,
}

/// Returns whether a slot occupies the same start key as any live booking.
fn slot_taken(bookings: &[Booking], court_id: i64, date: Date, slot: SlotTime) -> bool {
    bookings.iter().any(|booking| {
        booking.status.holds_slot()
            && booking.court_id == court_id
            && booking.date == date
            && booking.slot == slot
    })
}

/// Determines whether a court/time slot is bookable.
///
/// A slot is unavailable when the court is under maintenance, the club is
/// closed at that hour, or a non-cancelled booking already holds the same
/// `(court, date, slot)` key. Cancelled bookings never block a slot.
#[must_use]
pub fn is_slot_available(
    schedule: &ScheduleGrid,
    bookings: &[Booking],
    court: &Court,
    date: Date,
    slot: SlotTime,
) -> bool {
    if court.maintenance {
        return false;
    }
    if !schedule.is_open_on(date, usize::from(slot.hour())) {
        return false;
    }
    let Some(court_id) = court.court_id else {
        return false;
    };
    !slot_taken(bookings, court_id, date, slot)
}

/// Renders the full availability grid for one day.
///
/// One cell per (court, start hour) pair across the public grid hours.
/// Courts under maintenance are omitted entirely rather than shown as
/// unavailable. With no courts the grid is empty.
#[must_use]
pub fn day_grid(
    schedule: &ScheduleGrid,
    courts: &[Court],
    bookings: &[Booking],
    date: Date,
) -> Vec<GridSlot> {
    let mut grid: Vec<GridSlot> = Vec::new();
    for court in courts {
        if court.maintenance {
            continue;
        }
        let Some(court_id) = court.court_id else {
            continue;
        };
        for hour in FIRST_START_HOUR..=LAST_START_HOUR {
            let Ok(slot) = SlotTime::on_the_hour(hour) else {
                continue;
            };
            grid.push(GridSlot {
                court_id,
                court_name: court.name.clone(),
                slot,
                price_cents: court.effective_price_cents(),
                available: is_slot_available(schedule, bookings, court, date, slot),
            });
        }
    }
    grid
}
