// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Input-boundary validation rules.
//!
//! These checks run before any operation is attempted; a failed check
//! surfaces as a validation error and the operation is never issued.

use crate::error::DomainError;
use crate::types::{Booking, Expense, Product};

/// Validates a booking's field constraints.
///
/// # Errors
///
/// Returns an error if the customer name is empty, the price is not
/// positive, or the duration is zero.
pub fn validate_booking_fields(booking: &Booking) -> Result<(), DomainError> {
    if booking.customer_name.trim().is_empty() {
        return Err(DomainError::InvalidCustomerName(String::from(
            "Customer name must not be empty",
        )));
    }
    if booking.price_cents <= 0 {
        return Err(DomainError::InvalidPrice {
            cents: booking.price_cents,
        });
    }
    if booking.duration_minutes == 0 {
        return Err(DomainError::InvalidDuration {
            minutes: booking.duration_minutes,
        });
    }
    Ok(())
}

/// Validates a product's field constraints.
///
/// # Errors
///
/// Returns an error if the name is empty, the price is not positive, or
/// the stock or threshold is negative.
pub fn validate_product_fields(product: &Product) -> Result<(), DomainError> {
    if product.name.trim().is_empty() {
        return Err(DomainError::InvalidProductName(String::from(
            "Product name must not be empty",
        )));
    }
    if product.price_cents <= 0 {
        return Err(DomainError::InvalidPrice {
            cents: product.price_cents,
        });
    }
    if product.stock < 0 {
        return Err(DomainError::InvalidStock {
            stock: product.stock,
        });
    }
    if product.low_stock_threshold < 0 {
        return Err(DomainError::InvalidStock {
            stock: product.low_stock_threshold,
        });
    }
    Ok(())
}

/// Validates an expense's field constraints.
///
/// # Errors
///
/// Returns an error if the description is empty or the amount is not
/// positive.
pub fn validate_expense_fields(expense: &Expense) -> Result<(), DomainError> {
    if expense.description.trim().is_empty() {
        return Err(DomainError::InvalidExpenseDescription(String::from(
            "Expense description must not be empty",
        )));
    }
    if expense.amount_cents <= 0 {
        return Err(DomainError::InvalidPrice {
            cents: expense.amount_cents,
        });
    }
    Ok(())
}
