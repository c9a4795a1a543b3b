// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod error;
mod schedule;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use schedule::{DAYS_PER_WEEK, HOURS_PER_DAY, ScheduleGrid};
pub use types::{
    Booking, BookingStatus, Court, Expense, ExpenseCategory, ISO_DATE, OfferRate, PaymentMethod,
    Product, SlotTime, format_iso_date, parse_iso_date,
};
pub use validation::{validate_booking_fields, validate_expense_fields, validate_product_fields};
