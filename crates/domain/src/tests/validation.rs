// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Booking, BookingStatus, Expense, ExpenseCategory, Product, SlotTime};
use crate::validation::{validate_booking_fields, validate_expense_fields, validate_product_fields};
use time::macros::date;

fn valid_booking() -> Booking {
    Booking {
        booking_id: None,
        court_id: 1,
        date: date!(2026 - 03 - 14),
        slot: SlotTime::on_the_hour(9).unwrap(),
        duration_minutes: 90,
        customer_name: String::from("Luis Vega"),
        customer_phone: String::from("555-0102"),
        status: BookingStatus::Pending,
        method: None,
        price_cents: 150_00,
        recurring: false,
    }
}

fn valid_product() -> Product {
    Product {
        product_id: None,
        name: String::from("Water 500ml"),
        category: String::from("Drinks"),
        price_cents: 2_00,
        stock: 24,
        low_stock_threshold: 6,
        image: None,
    }
}

#[test]
fn test_valid_booking_passes() {
    assert!(validate_booking_fields(&valid_booking()).is_ok());
}

#[test]
fn test_blank_customer_name_is_rejected() {
    let mut booking: Booking = valid_booking();
    booking.customer_name = String::from("   ");
    assert!(matches!(
        validate_booking_fields(&booking),
        Err(DomainError::InvalidCustomerName(_))
    ));
}

#[test]
fn test_non_positive_booking_price_is_rejected() {
    let mut booking: Booking = valid_booking();
    booking.price_cents = 0;
    assert!(matches!(
        validate_booking_fields(&booking),
        Err(DomainError::InvalidPrice { cents: 0 })
    ));

    booking.price_cents = -5_00;
    assert!(validate_booking_fields(&booking).is_err());
}

#[test]
fn test_zero_duration_is_rejected() {
    let mut booking: Booking = valid_booking();
    booking.duration_minutes = 0;
    assert!(matches!(
        validate_booking_fields(&booking),
        Err(DomainError::InvalidDuration { minutes: 0 })
    ));
}

#[test]
fn test_valid_product_passes() {
    assert!(validate_product_fields(&valid_product()).is_ok());
}

#[test]
fn test_negative_stock_is_rejected() {
    let mut product: Product = valid_product();
    product.stock = -1;
    assert!(matches!(
        validate_product_fields(&product),
        Err(DomainError::InvalidStock { stock: -1 })
    ));
}

#[test]
fn test_negative_threshold_is_rejected() {
    let mut product: Product = valid_product();
    product.low_stock_threshold = -3;
    assert!(validate_product_fields(&product).is_err());
}

#[test]
fn test_expense_checks() {
    let expense: Expense = Expense {
        expense_id: None,
        date: date!(2026 - 03 - 01),
        category: ExpenseCategory::Utilities,
        description: String::from("Electricity bill"),
        amount_cents: 340_00,
    };
    assert!(validate_expense_fields(&expense).is_ok());

    let mut blank: Expense = expense.clone();
    blank.description = String::new();
    assert!(matches!(
        validate_expense_fields(&blank),
        Err(DomainError::InvalidExpenseDescription(_))
    ));

    let mut free: Expense = expense;
    free.amount_cents = 0;
    assert!(validate_expense_fields(&free).is_err());
}
