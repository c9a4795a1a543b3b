// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking persistence: slot admission, transition atomicity and the
//! change feed.

use courtdesk::{Command, SaleLine, apply};
use courtdesk_domain::{BookingStatus, PaymentMethod, ScheduleGrid};
use courtdesk_ledger::ActivityKind;

use crate::tests::helpers;
use crate::{ChangeEvent, Collection, PersistenceError};

const OPERATOR: &str = "front-desk";
const TIMESTAMP: &str = "2026-03-14T10:00:00Z";

#[test]
fn reserved_booking_round_trips() {
    let mut persistence = helpers::memory_persistence();
    let court_id = helpers::seed_court(&mut persistence);
    let booking = helpers::sample_booking(court_id, "2026-03-14", 10);

    let booking_id = persistence
        .reserve_slot(&booking)
        .expect("open slot should reserve");
    let fetched = persistence
        .get_booking(booking_id)
        .expect("booking should be retrievable");

    assert_eq!(fetched.booking_id, Some(booking_id));
    assert_eq!(fetched.court_id, court_id);
    assert_eq!(fetched.slot, helpers::parse_slot("10:00"));
    assert_eq!(fetched.customer_name, "Ana Torres");
    assert_eq!(fetched.status, BookingStatus::Pending);
    assert_eq!(fetched.price_cents, 150_00);
}

#[test]
fn second_live_booking_on_same_slot_is_rejected() {
    let mut persistence = helpers::memory_persistence();
    let court_id = helpers::seed_court(&mut persistence);
    let booking = helpers::sample_booking(court_id, "2026-03-14", 10);

    persistence
        .reserve_slot(&booking)
        .expect("first reservation should succeed");
    let error = persistence
        .reserve_slot(&booking)
        .expect_err("second reservation must lose the slot");

    match error {
        PersistenceError::SlotConflict {
            court_id: conflict_court,
            date,
            slot,
        } => {
            assert_eq!(conflict_court, court_id);
            assert_eq!(date, "2026-03-14");
            assert_eq!(slot, "10:00");
        }
        other => panic!("expected SlotConflict, got {other:?}"),
    }

    assert_eq!(
        persistence.list_bookings().expect("list should work").len(),
        1
    );
}

#[test]
fn cancelled_slot_can_be_rebooked() {
    let mut persistence = helpers::memory_persistence();
    let court_id = helpers::seed_court(&mut persistence);
    let booking = helpers::sample_booking(court_id, "2026-03-14", 10);
    let booking_id = persistence
        .reserve_slot(&booking)
        .expect("first reservation should succeed");

    let state = persistence.load_state().expect("state should load");
    let result = apply(
        &state,
        Command::CancelBooking { booking_id },
        OPERATOR,
        TIMESTAMP.to_string(),
    )
    .expect("cancellation should apply");
    persistence
        .persist_transition(&state, &result)
        .expect("cancellation should persist");

    persistence
        .reserve_slot(&helpers::sample_booking(court_id, "2026-03-14", 10))
        .expect("released slot should be bookable again");
}

#[test]
fn persist_transition_writes_booking_and_ledger_entry_together() {
    let mut persistence = helpers::memory_persistence();
    let court_id = helpers::seed_court(&mut persistence);

    let state = persistence.load_state().expect("state should load");
    let result = apply(
        &state,
        Command::CreateBooking {
            booking: helpers::sample_booking(court_id, "2026-03-14", 10),
        },
        OPERATOR,
        TIMESTAMP.to_string(),
    )
    .expect("creation should apply");
    let outcome = persistence
        .persist_transition(&state, &result)
        .expect("creation should persist");

    assert!(outcome.booking_id.is_some());
    let bookings = persistence.list_bookings().expect("list should work");
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].booking_id, outcome.booking_id);

    let entries = persistence.list_entries().expect("ledger should load");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_id, Some(outcome.entry_id));
    assert_eq!(entries[0].kind, ActivityKind::Booking);
    assert_eq!(entries[0].amount_cents, Some(150_00));
    assert_eq!(entries[0].operator, OPERATOR);
}

#[test]
fn losing_the_slot_race_rolls_back_the_whole_transition() {
    let mut persistence = helpers::memory_persistence();
    let court_id = helpers::seed_court(&mut persistence);
    persistence
        .reserve_slot(&helpers::sample_booking(court_id, "2026-03-14", 10))
        .expect("direct reservation should succeed");

    // A second writer computed its transition against a stale state that
    // did not yet contain the reservation above.
    let mut stale_state = persistence.load_state().expect("state should load");
    stale_state.bookings.clear();
    let result = apply(
        &stale_state,
        Command::CreateBooking {
            booking: helpers::sample_booking(court_id, "2026-03-14", 10),
        },
        OPERATOR,
        TIMESTAMP.to_string(),
    )
    .expect("stale creation applies in memory");

    let error = persistence
        .persist_transition(&stale_state, &result)
        .expect_err("persisting must lose the slot race");
    assert!(matches!(error, PersistenceError::SlotConflict { .. }));

    // Nothing landed: the prior booking is alone and no entry was logged.
    assert_eq!(
        persistence.list_bookings().expect("list should work").len(),
        1
    );
    assert_eq!(persistence.count_entries().expect("count should work"), 0);
}

#[test]
fn sale_transition_updates_stock_and_logs_amount() {
    let mut persistence = helpers::memory_persistence();
    let product_id = helpers::seed_product(&mut persistence);

    let state = persistence.load_state().expect("state should load");
    let result = apply(
        &state,
        Command::RecordSale {
            lines: vec![SaleLine {
                product_id,
                quantity: 3,
            }],
            method: PaymentMethod::Cash,
        },
        OPERATOR,
        TIMESTAMP.to_string(),
    )
    .expect("sale should apply");
    persistence
        .persist_transition(&state, &result)
        .expect("sale should persist");

    let products = persistence.list_products().expect("list should work");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].stock, 21);

    let entries = persistence.list_entries().expect("ledger should load");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, ActivityKind::Sale);
    assert_eq!(entries[0].amount_cents, Some(6_00));
    assert_eq!(entries[0].method, Some(PaymentMethod::Cash));
}

#[test]
fn committed_reservation_is_published_on_the_feed() {
    let mut persistence = helpers::memory_persistence();
    let court_id = helpers::seed_court(&mut persistence);
    let mut receiver = persistence.feed().subscribe();

    persistence
        .reserve_slot(&helpers::sample_booking(court_id, "2026-03-14", 10))
        .expect("reservation should succeed");

    assert_eq!(
        receiver.try_recv().expect("event should be published"),
        ChangeEvent::CollectionChanged(Collection::Bookings)
    );
}

#[test]
fn failed_reservation_publishes_nothing() {
    let mut persistence = helpers::memory_persistence();
    let court_id = helpers::seed_court(&mut persistence);
    persistence
        .reserve_slot(&helpers::sample_booking(court_id, "2026-03-14", 10))
        .expect("first reservation should succeed");

    let mut receiver = persistence.feed().subscribe();
    persistence
        .reserve_slot(&helpers::sample_booking(court_id, "2026-03-14", 10))
        .expect_err("duplicate must be rejected");

    assert!(receiver.try_recv().is_err());
}

#[test]
fn schedule_grid_round_trips_through_the_singleton_row() {
    let mut persistence = helpers::memory_persistence();

    // Unsaved databases fall back to fully open.
    let initial = persistence.load_schedule().expect("schedule should load");
    assert!(initial.is_open_on(
        courtdesk_domain::parse_iso_date("2026-03-14").expect("valid date"),
        10
    ));

    let mut grid = ScheduleGrid::closed_all();
    grid.set_open(5, 10, true);
    persistence
        .save_schedule(&grid)
        .expect("schedule should save");

    let loaded = persistence.load_schedule().expect("schedule should load");
    assert_eq!(loaded.to_keyed_map(), grid.to_keyed_map());

    // Saving again replaces rather than duplicates.
    persistence
        .save_schedule(&ScheduleGrid::open_all())
        .expect("second save should upsert");
    let replaced = persistence.load_schedule().expect("schedule should load");
    assert_eq!(replaced.to_keyed_map(), ScheduleGrid::open_all().to_keyed_map());
}
