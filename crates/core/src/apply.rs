// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::availability::is_slot_available;
use crate::command::{Command, SaleLine};
use crate::error::CoreError;
use crate::state::{State, TransitionResult};
use courtdesk_domain::{
    Booking, BookingStatus, DomainError, Product, format_iso_date, validate_booking_fields,
};
use courtdesk_ledger::{ActivityEntry, ActivityKind};

/// Applies a command to the current state, producing a new state and
/// exactly one ledger entry.
///
/// Revenue recognition happens here, once: only `CreateBooking` carries a
/// booking's price into the ledger. Confirming, paying, editing or
/// cancelling later logs a plain activity entry with no amount, so the
/// historical ledger is never retroactively corrected.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `operator` - The operator performing this action
/// * `timestamp` - The ISO-8601 instant recorded on the ledger entry
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and ledger entry
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if the command violates domain rules, references a
/// missing record, or requests an unavailable slot.
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &State,
    command: Command,
    operator: &str,
    timestamp: String,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::CreateBooking { booking } => create_booking(state, booking, operator, timestamp),
        Command::ConfirmBooking { booking_id } => {
            let (new_state, booking) =
                update_booking(state, booking_id, |booking: &mut Booking| {
                    if !booking.status.can_transition_to(BookingStatus::Confirmed) {
                        return Err(DomainError::InvalidStatusTransition {
                            from: booking.status.as_str(),
                            to: BookingStatus::Confirmed.as_str(),
                        });
                    }
                    booking.status = BookingStatus::Confirmed;
                    Ok(())
                })?;

            let entry: ActivityEntry = ActivityEntry::new(
                ActivityKind::Booking,
                format!("Booking confirmed: {}", booking.customer_name),
                timestamp,
                operator.to_string(),
            );
            Ok(TransitionResult { new_state, entry })
        }
        Command::CancelBooking { booking_id } => {
            let (new_state, booking) =
                update_booking(state, booking_id, |booking: &mut Booking| {
                    booking.status = BookingStatus::Cancelled;
                    Ok(())
                })?;

            let entry: ActivityEntry = ActivityEntry::new(
                ActivityKind::Booking,
                format!("Booking cancelled: {}", booking.customer_name),
                timestamp,
                operator.to_string(),
            );
            Ok(TransitionResult { new_state, entry })
        }
        Command::SetPaymentMethod { booking_id, method } => {
            let (new_state, booking) =
                update_booking(state, booking_id, |booking: &mut Booking| {
                    booking.method = method;
                    Ok(())
                })?;

            let entry: ActivityEntry = ActivityEntry::new(
                ActivityKind::Booking,
                format!("Booking modified: {}", booking.customer_name),
                timestamp,
                operator.to_string(),
            );
            Ok(TransitionResult { new_state, entry })
        }
        Command::ToggleRecurring { booking_id } => {
            let (new_state, booking) =
                update_booking(state, booking_id, |booking: &mut Booking| {
                    booking.recurring = !booking.recurring;
                    Ok(())
                })?;

            let entry: ActivityEntry = ActivityEntry::new(
                ActivityKind::Booking,
                format!("Booking modified: {}", booking.customer_name),
                timestamp,
                operator.to_string(),
            );
            Ok(TransitionResult { new_state, entry })
        }
        Command::EditBooking {
            booking_id,
            booking,
        } => {
            validate_booking_fields(&booking)?;

            let (new_state, replaced) =
                update_booking(state, booking_id, |current: &mut Booking| {
                    *current = Booking {
                        booking_id: Some(booking_id),
                        ..booking
                    };
                    Ok(())
                })?;

            let entry: ActivityEntry = ActivityEntry::new(
                ActivityKind::Booking,
                format!("Booking modified: {}", replaced.customer_name),
                timestamp,
                operator.to_string(),
            );
            Ok(TransitionResult { new_state, entry })
        }
        Command::RecordSale { lines, method } => {
            if lines.is_empty() {
                return Err(CoreError::DomainViolation(DomainError::EmptySale));
            }

            let mut new_state: State = state.clone();
            let mut total_cents: i64 = 0;
            let mut parts: Vec<String> = Vec::with_capacity(lines.len());

            for line in &lines {
                let (name, line_cents) = consume_stock(&mut new_state.products, line)?;
                total_cents += line_cents;
                parts.push(format!("{}x {name}", line.quantity));
            }

            let entry: ActivityEntry = ActivityEntry::new(
                ActivityKind::Sale,
                format!("Sale: {}", parts.join(", ")),
                timestamp,
                operator.to_string(),
            )
            .with_amount(total_cents)
            .with_method(method);
            Ok(TransitionResult { new_state, entry })
        }
        Command::AdjustStock { product_id, delta } => {
            let mut new_state: State = state.clone();
            let product: &mut Product = new_state
                .products
                .iter_mut()
                .find(|product| product.product_id == Some(product_id))
                .ok_or(DomainError::ProductNotFound(product_id))?;

            let new_stock: i64 = product.stock + delta;
            if new_stock < 0 {
                return Err(CoreError::DomainViolation(DomainError::InvalidStock {
                    stock: new_stock,
                }));
            }
            product.stock = new_stock;

            let entry: ActivityEntry = ActivityEntry::new(
                ActivityKind::Stock,
                format!("Stock adjusted: {} {delta:+} (now {new_stock})", product.name),
                timestamp,
                operator.to_string(),
            );
            Ok(TransitionResult {
                new_state,
                entry,
            })
        }
        Command::OpenShift {
            opening_float_cents,
        } => {
            let entry: ActivityEntry = ActivityEntry::new(
                ActivityKind::Shift,
                String::from("Shift opened"),
                timestamp,
                operator.to_string(),
            )
            .with_amount(opening_float_cents);
            Ok(TransitionResult {
                new_state: state.clone(),
                entry,
            })
        }
        Command::CloseShift { counted_cents } => {
            let entry: ActivityEntry = ActivityEntry::new(
                ActivityKind::Shift,
                String::from("Shift closed"),
                timestamp,
                operator.to_string(),
            )
            .with_amount(counted_cents);
            Ok(TransitionResult {
                new_state: state.clone(),
                entry,
            })
        }
    }
}

/// Admits a new booking after field, court, status and slot checks.
fn create_booking(
    state: &State,
    booking: Booking,
    operator: &str,
    timestamp: String,
) -> Result<TransitionResult, CoreError> {
    validate_booking_fields(&booking)?;

    if booking.status == BookingStatus::Cancelled {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidBookingStatus(String::from(
                "A booking cannot be created Cancelled",
            )),
        ));
    }

    let court = state
        .court(booking.court_id)
        .ok_or(DomainError::CourtNotFound(booking.court_id))?;

    if !is_slot_available(
        &state.schedule,
        &state.bookings,
        court,
        booking.date,
        booking.slot,
    ) {
        return Err(CoreError::DomainViolation(DomainError::SlotUnavailable {
            court_id: booking.court_id,
            date: format_iso_date(booking.date)?,
            slot: booking.slot.label(),
        }));
    }

    let date_label: String = format_iso_date(booking.date)?;
    let mut entry: ActivityEntry = ActivityEntry::new(
        ActivityKind::Booking,
        format!(
            "Booking created: {} on {date_label} at {} ({})",
            booking.customer_name,
            booking.slot.label(),
            court.name
        ),
        timestamp,
        operator.to_string(),
    )
    .with_amount(booking.price_cents);
    entry.method = booking.method;

    let mut new_state: State = state.clone();
    new_state.bookings.push(booking);

    Ok(TransitionResult { new_state, entry })
}

/// Applies a mutation to one booking, returning the new state and a clone
/// of the mutated record.
fn update_booking<F>(
    state: &State,
    booking_id: i64,
    mutate: F,
) -> Result<(State, Booking), CoreError>
where
    F: FnOnce(&mut Booking) -> Result<(), DomainError>,
{
    let mut new_state: State = state.clone();
    let booking: &mut Booking = new_state
        .bookings
        .iter_mut()
        .find(|booking| booking.booking_id == Some(booking_id))
        .ok_or(DomainError::BookingNotFound(booking_id))?;

    mutate(booking)?;
    let updated: Booking = booking.clone();
    Ok((new_state, updated))
}

/// Decrements stock for one sale line, returning the product name and the
/// line total in cents.
fn consume_stock(products: &mut [Product], line: &SaleLine) -> Result<(String, i64), CoreError> {
    if line.quantity <= 0 {
        return Err(CoreError::DomainViolation(DomainError::InvalidQuantity {
            quantity: line.quantity,
        }));
    }

    let product: &mut Product = products
        .iter_mut()
        .find(|product| product.product_id == Some(line.product_id))
        .ok_or(DomainError::ProductNotFound(line.product_id))?;

    if product.stock < line.quantity {
        return Err(CoreError::DomainViolation(DomainError::InsufficientStock {
            product: product.name.clone(),
            requested: line.quantity,
            available: product.stock,
        }));
    }

    product.stock -= line.quantity;
    Ok((product.name.clone(), line.quantity * product.price_cents))
}
