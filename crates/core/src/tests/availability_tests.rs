// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the availability engine.
//!
//! Occupancy keys on the booking's start slot only; cancelled bookings
//! release their slot; maintenance and closed hours block booking.

use crate::{Command, CoreError, FIRST_START_HOUR, LAST_START_HOUR, State, TransitionResult};
use crate::{apply, day_grid, is_slot_available};
use courtdesk_domain::{BookingStatus, DomainError, ScheduleGrid, SlotTime};

use super::helpers::{TEST_DAY, test_booking, test_court, test_operator, test_state, test_timestamp};

#[test]
fn test_open_slot_on_live_court_is_available() {
    let state: State = test_state();
    let slot: SlotTime = SlotTime::on_the_hour(10).unwrap();

    assert!(is_slot_available(
        &state.schedule,
        &state.bookings,
        &state.courts[0],
        TEST_DAY,
        slot
    ));
}

#[test]
fn test_identical_slot_collides() {
    let mut state: State = test_state();
    state.bookings.push(test_booking(Some(1), 1, 10));
    let slot: SlotTime = SlotTime::on_the_hour(10).unwrap();

    assert!(!is_slot_available(
        &state.schedule,
        &state.bookings,
        &state.courts[0],
        TEST_DAY,
        slot
    ));
}

#[test]
fn test_occupancy_ignores_duration_span() {
    let mut state: State = test_state();
    // A two-hour booking starting at 10:00 occupies only the 10:00 slot.
    let mut long: courtdesk_domain::Booking = test_booking(Some(1), 1, 10);
    long.duration_minutes = 120;
    state.bookings.push(long);

    let slot: SlotTime = SlotTime::on_the_hour(11).unwrap();
    assert!(is_slot_available(
        &state.schedule,
        &state.bookings,
        &state.courts[0],
        TEST_DAY,
        slot
    ));
}

#[test]
fn test_cancelled_booking_releases_slot() {
    let mut state: State = test_state();
    let mut cancelled: courtdesk_domain::Booking = test_booking(Some(1), 1, 10);
    cancelled.status = BookingStatus::Cancelled;
    state.bookings.push(cancelled);

    let slot: SlotTime = SlotTime::on_the_hour(10).unwrap();
    assert!(is_slot_available(
        &state.schedule,
        &state.bookings,
        &state.courts[0],
        TEST_DAY,
        slot
    ));
}

#[test]
fn test_maintenance_court_is_never_available() {
    let mut state: State = test_state();
    state.courts[0].maintenance = true;

    let slot: SlotTime = SlotTime::on_the_hour(10).unwrap();
    assert!(!is_slot_available(
        &state.schedule,
        &state.bookings,
        &state.courts[0],
        TEST_DAY,
        slot
    ));
}

#[test]
fn test_closed_hour_is_unavailable() {
    let mut state: State = test_state();
    state.schedule = ScheduleGrid::closed_all();

    let slot: SlotTime = SlotTime::on_the_hour(10).unwrap();
    assert!(!is_slot_available(
        &state.schedule,
        &state.bookings,
        &state.courts[0],
        TEST_DAY,
        slot
    ));
}

#[test]
fn test_malformed_schedule_row_fails_open() {
    let mut state: State = test_state();
    let mut rows: Vec<Vec<bool>> = ScheduleGrid::closed_all().rows().to_vec();
    // TEST_DAY is a Saturday (weekday index 5).
    rows[5] = Vec::new();
    state.schedule = ScheduleGrid::from_rows(rows);

    let slot: SlotTime = SlotTime::on_the_hour(10).unwrap();
    assert!(is_slot_available(
        &state.schedule,
        &state.bookings,
        &state.courts[0],
        TEST_DAY,
        slot
    ));
}

#[test]
fn test_day_grid_covers_public_hours() {
    let state: State = test_state();
    let grid = day_grid(&state.schedule, &state.courts, &state.bookings, TEST_DAY);

    let expected: usize = usize::from(LAST_START_HOUR - FIRST_START_HOUR + 1);
    assert_eq!(grid.len(), expected);
    assert_eq!(grid[0].slot, SlotTime::on_the_hour(FIRST_START_HOUR).unwrap());
    assert_eq!(
        grid.last().unwrap().slot,
        SlotTime::on_the_hour(LAST_START_HOUR).unwrap()
    );
    assert!(grid.iter().all(|cell| cell.available));
    assert!(grid.iter().all(|cell| cell.price_cents == 150_00));
}

#[test]
fn test_day_grid_skips_maintenance_courts() {
    let mut state: State = test_state();
    let mut closed_court: courtdesk_domain::Court = test_court(2, "Court 2");
    closed_court.maintenance = true;
    state.courts.push(closed_court);

    let grid = day_grid(&state.schedule, &state.courts, &state.bookings, TEST_DAY);
    assert!(grid.iter().all(|cell| cell.court_id == 1));
}

#[test]
fn test_day_grid_with_no_courts_is_empty() {
    let state: State = State::new();
    let grid = day_grid(&state.schedule, &state.courts, &state.bookings, TEST_DAY);
    assert!(grid.is_empty());
}

#[test]
fn test_create_booking_rejects_taken_slot() {
    let mut state: State = test_state();
    state.bookings.push(test_booking(Some(1), 1, 10));

    let result = apply(
        &state,
        Command::CreateBooking {
            booking: test_booking(None, 1, 10),
        },
        &test_operator(),
        test_timestamp(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::SlotUnavailable { .. }))
    ));
}

#[test]
fn test_create_booking_succeeds_after_cancellation() {
    let mut state: State = test_state();
    let mut cancelled: courtdesk_domain::Booking = test_booking(Some(1), 1, 10);
    cancelled.status = BookingStatus::Cancelled;
    state.bookings.push(cancelled);

    let result: TransitionResult = apply(
        &state,
        Command::CreateBooking {
            booking: test_booking(None, 1, 10),
        },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();

    assert_eq!(result.new_state.bookings.len(), 2);
}
