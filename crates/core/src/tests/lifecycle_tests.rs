// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the booking lifecycle and the one-entry-per-transition rule.

use crate::{Command, CoreError, SaleLine, State, TransitionResult, apply};
use courtdesk_domain::{Booking, BookingStatus, DomainError, PaymentMethod};
use courtdesk_ledger::ActivityKind;

use super::helpers::{test_booking, test_operator, test_state, test_timestamp};

fn state_with_booking(status: BookingStatus) -> State {
    let mut state: State = test_state();
    let mut booking: Booking = test_booking(Some(1), 1, 10);
    booking.status = status;
    state.bookings.push(booking);
    state
}

#[test]
fn test_create_booking_logs_price_as_amount() {
    let state: State = test_state();

    let result: TransitionResult = apply(
        &state,
        Command::CreateBooking {
            booking: test_booking(None, 1, 10),
        },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();

    assert_eq!(result.new_state.bookings.len(), 1);
    assert_eq!(result.entry.kind, ActivityKind::Booking);
    assert_eq!(result.entry.amount_cents, Some(150_00));
    assert_eq!(result.entry.operator, "front-desk");
    assert!(result.entry.description.contains("Ana Torres"));
}

#[test]
fn test_create_booking_may_start_confirmed() {
    let state: State = test_state();
    let mut booking: Booking = test_booking(None, 1, 10);
    booking.status = BookingStatus::Confirmed;

    let result: TransitionResult = apply(
        &state,
        Command::CreateBooking { booking },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();

    assert_eq!(result.new_state.bookings[0].status, BookingStatus::Confirmed);
}

#[test]
fn test_create_booking_rejects_cancelled_status() {
    let state: State = test_state();
    let mut booking: Booking = test_booking(None, 1, 10);
    booking.status = BookingStatus::Cancelled;

    let result = apply(
        &state,
        Command::CreateBooking { booking },
        &test_operator(),
        test_timestamp(),
    );
    assert!(result.is_err());
}

#[test]
fn test_create_booking_rejects_unknown_court() {
    let state: State = test_state();

    let result = apply(
        &state,
        Command::CreateBooking {
            booking: test_booking(None, 99, 10),
        },
        &test_operator(),
        test_timestamp(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::CourtNotFound(99)))
    ));
}

#[test]
fn test_confirm_moves_pending_to_confirmed_without_amount() {
    let state: State = state_with_booking(BookingStatus::Pending);

    let result: TransitionResult = apply(
        &state,
        Command::ConfirmBooking { booking_id: 1 },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();

    assert_eq!(result.new_state.bookings[0].status, BookingStatus::Confirmed);
    // Revenue was recognized at creation; confirmation logs no amount.
    assert_eq!(result.entry.amount_cents, None);
    assert_eq!(result.entry.kind, ActivityKind::Booking);
}

#[test]
fn test_confirm_rejects_already_confirmed() {
    let state: State = state_with_booking(BookingStatus::Confirmed);

    let result = apply(
        &state,
        Command::ConfirmBooking { booking_id: 1 },
        &test_operator(),
        test_timestamp(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: "Confirmed",
                to: "Confirmed"
            }
        ))
    ));
}

#[test]
fn test_confirm_rejects_cancelled() {
    let state: State = state_with_booking(BookingStatus::Cancelled);

    let result = apply(
        &state,
        Command::ConfirmBooking { booking_id: 1 },
        &test_operator(),
        test_timestamp(),
    );
    assert!(result.is_err());
}

#[test]
fn test_cancel_is_a_soft_delete() {
    let state: State = state_with_booking(BookingStatus::Confirmed);

    let result: TransitionResult = apply(
        &state,
        Command::CancelBooking { booking_id: 1 },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();

    // The record stays; only the status changes.
    assert_eq!(result.new_state.bookings.len(), 1);
    assert_eq!(result.new_state.bookings[0].status, BookingStatus::Cancelled);
    assert_eq!(result.entry.amount_cents, None);
}

#[test]
fn test_set_payment_method_keeps_status() {
    let state: State = state_with_booking(BookingStatus::Pending);

    let result: TransitionResult = apply(
        &state,
        Command::SetPaymentMethod {
            booking_id: 1,
            method: Some(PaymentMethod::Qr),
        },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();

    assert_eq!(result.new_state.bookings[0].status, BookingStatus::Pending);
    assert_eq!(result.new_state.bookings[0].method, Some(PaymentMethod::Qr));
    assert_eq!(result.entry.amount_cents, None);
}

#[test]
fn test_toggle_recurring_flips_flag() {
    let state: State = state_with_booking(BookingStatus::Pending);

    let once: TransitionResult = apply(
        &state,
        Command::ToggleRecurring { booking_id: 1 },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();
    assert!(once.new_state.bookings[0].recurring);

    let twice: TransitionResult = apply(
        &once.new_state,
        Command::ToggleRecurring { booking_id: 1 },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();
    assert!(!twice.new_state.bookings[0].recurring);
}

#[test]
fn test_edit_replaces_record_wholesale() {
    let state: State = state_with_booking(BookingStatus::Confirmed);
    let mut replacement: Booking = test_booking(None, 1, 11);
    replacement.customer_name = String::from("Luis Vega");
    replacement.price_cents = 200_00;

    let result: TransitionResult = apply(
        &state,
        Command::EditBooking {
            booking_id: 1,
            booking: replacement,
        },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();

    let edited: &Booking = &result.new_state.bookings[0];
    assert_eq!(edited.booking_id, Some(1));
    assert_eq!(edited.customer_name, "Luis Vega");
    assert_eq!(edited.price_cents, 200_00);
    // Price changes never correct the ledger retroactively.
    assert_eq!(result.entry.amount_cents, None);
}

#[test]
fn test_unknown_booking_is_rejected() {
    let state: State = test_state();

    let result = apply(
        &state,
        Command::ConfirmBooking { booking_id: 42 },
        &test_operator(),
        test_timestamp(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::BookingNotFound(42)))
    ));
}

#[test]
fn test_record_sale_decrements_stock_and_totals() {
    let state: State = test_state();

    let result: TransitionResult = apply(
        &state,
        Command::RecordSale {
            lines: vec![SaleLine {
                product_id: 10,
                quantity: 3,
            }],
            method: PaymentMethod::Cash,
        },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();

    assert_eq!(result.new_state.products[0].stock, 21);
    assert_eq!(result.entry.kind, ActivityKind::Sale);
    assert_eq!(result.entry.amount_cents, Some(6_00));
    assert_eq!(result.entry.method, Some(PaymentMethod::Cash));
    assert!(result.entry.description.contains("3x Water 500ml"));
}

#[test]
fn test_record_sale_rejects_overdraw() {
    let state: State = test_state();

    let result = apply(
        &state,
        Command::RecordSale {
            lines: vec![SaleLine {
                product_id: 10,
                quantity: 25,
            }],
            method: PaymentMethod::Cash,
        },
        &test_operator(),
        test_timestamp(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InsufficientStock {
                requested: 25,
                available: 24,
                ..
            }
        ))
    ));
}

#[test]
fn test_record_sale_rejects_empty_and_non_positive_lines() {
    let state: State = test_state();

    let empty = apply(
        &state,
        Command::RecordSale {
            lines: Vec::new(),
            method: PaymentMethod::Cash,
        },
        &test_operator(),
        test_timestamp(),
    );
    assert!(matches!(
        empty,
        Err(CoreError::DomainViolation(DomainError::EmptySale))
    ));

    let zero = apply(
        &state,
        Command::RecordSale {
            lines: vec![SaleLine {
                product_id: 10,
                quantity: 0,
            }],
            method: PaymentMethod::Cash,
        },
        &test_operator(),
        test_timestamp(),
    );
    assert!(matches!(
        zero,
        Err(CoreError::DomainViolation(DomainError::InvalidQuantity {
            quantity: 0
        }))
    ));
}

#[test]
fn test_adjust_stock_rejects_negative_result() {
    let state: State = test_state();

    let result = apply(
        &state,
        Command::AdjustStock {
            product_id: 10,
            delta: -30,
        },
        &test_operator(),
        test_timestamp(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidStock {
            stock: -6
        }))
    ));
}

#[test]
fn test_adjust_stock_logs_a_stock_entry() {
    let state: State = test_state();

    let result: TransitionResult = apply(
        &state,
        Command::AdjustStock {
            product_id: 10,
            delta: 12,
        },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();

    assert_eq!(result.new_state.products[0].stock, 36);
    assert_eq!(result.entry.kind, ActivityKind::Stock);
    assert_eq!(result.entry.amount_cents, None);
}

#[test]
fn test_shift_entries_carry_counted_amounts() {
    let state: State = test_state();

    let opened: TransitionResult = apply(
        &state,
        Command::OpenShift {
            opening_float_cents: 100_00,
        },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();
    assert_eq!(opened.entry.kind, ActivityKind::Shift);
    assert_eq!(opened.entry.amount_cents, Some(100_00));
    assert_eq!(opened.new_state, state);

    let closed: TransitionResult = apply(
        &state,
        Command::CloseShift {
            counted_cents: 485_00,
        },
        &test_operator(),
        test_timestamp(),
    )
    .unwrap();
    assert_eq!(closed.entry.amount_cents, Some(485_00));
}
