// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Customer name is empty or invalid.
    InvalidCustomerName(String),
    /// A price or amount is not positive.
    InvalidPrice {
        /// The offending amount in cents.
        cents: i64,
    },
    /// Booking duration is not a positive number of minutes.
    InvalidDuration {
        /// The offending duration.
        minutes: u16,
    },
    /// A slot time label could not be parsed.
    InvalidSlotTime(String),
    /// A payment method label is not recognized.
    InvalidPaymentMethod(String),
    /// A booking status label is not recognized.
    InvalidBookingStatus(String),
    /// An activity kind label is not recognized.
    InvalidActivityKind(String),
    /// An expense category label is not recognized.
    InvalidExpenseCategory(String),
    /// A booking status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: &'static str,
        /// The requested status.
        to: &'static str,
    },
    /// The requested court does not exist.
    CourtNotFound(i64),
    /// The requested booking does not exist.
    BookingNotFound(i64),
    /// The requested product does not exist.
    ProductNotFound(i64),
    /// The slot is already taken by a non-cancelled booking or is closed.
    SlotUnavailable {
        /// The court identifier.
        court_id: i64,
        /// The calendar date (ISO form).
        date: String,
        /// The slot time label.
        slot: String,
    },
    /// A sale line requests more units than are in stock.
    InsufficientStock {
        /// The product name.
        product: String,
        /// The requested quantity.
        requested: i64,
        /// The available stock.
        available: i64,
    },
    /// A sale line quantity is not positive.
    InvalidQuantity {
        /// The offending quantity.
        quantity: i64,
    },
    /// A sale was submitted with no lines.
    EmptySale,
    /// Product name is empty or invalid.
    InvalidProductName(String),
    /// Stock or threshold would become negative.
    InvalidStock {
        /// The offending stock value.
        stock: i64,
    },
    /// Expense description is empty or invalid.
    InvalidExpenseDescription(String),
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCustomerName(msg) => write!(f, "Invalid customer name: {msg}"),
            Self::InvalidPrice { cents } => {
                write!(f, "Invalid price: {cents} cents. Must be greater than 0")
            }
            Self::InvalidDuration { minutes } => {
                write!(f, "Invalid duration: {minutes} minutes. Must be greater than 0")
            }
            Self::InvalidSlotTime(msg) => write!(f, "Invalid slot time: {msg}"),
            Self::InvalidPaymentMethod(msg) => write!(f, "Invalid payment method: {msg}"),
            Self::InvalidBookingStatus(msg) => write!(f, "Invalid booking status: {msg}"),
            Self::InvalidActivityKind(msg) => write!(f, "Invalid activity kind: {msg}"),
            Self::InvalidExpenseCategory(msg) => write!(f, "Invalid expense category: {msg}"),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Booking status cannot change from {from} to {to}")
            }
            Self::CourtNotFound(id) => write!(f, "Court {id} not found"),
            Self::BookingNotFound(id) => write!(f, "Booking {id} not found"),
            Self::ProductNotFound(id) => write!(f, "Product {id} not found"),
            Self::SlotUnavailable {
                court_id,
                date,
                slot,
            } => {
                write!(f, "Slot {date} {slot} on court {court_id} is not available")
            }
            Self::InsufficientStock {
                product,
                requested,
                available,
            } => {
                write!(
                    f,
                    "Insufficient stock for '{product}': requested {requested}, available {available}"
                )
            }
            Self::InvalidQuantity { quantity } => {
                write!(f, "Invalid quantity: {quantity}. Must be greater than 0")
            }
            Self::EmptySale => write!(f, "A sale must contain at least one line"),
            Self::InvalidProductName(msg) => write!(f, "Invalid product name: {msg}"),
            Self::InvalidStock { stock } => {
                write!(f, "Invalid stock: {stock}. Must not be negative")
            }
            Self::InvalidExpenseDescription(msg) => {
                write!(f, "Invalid expense description: {msg}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
