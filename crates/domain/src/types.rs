// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// ISO calendar date format (`YYYY-MM-DD`) used everywhere a date crosses
/// a serialization boundary.
pub const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Formats a date as its ISO calendar form (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns an error if the date cannot be formatted (practically unreachable
/// for valid dates).
pub fn format_iso_date(date: Date) -> Result<String, DomainError> {
    date.format(ISO_DATE).map_err(|e| DomainError::DateParseError {
        date_string: format!("{date:?}"),
        error: e.to_string(),
    })
}

/// Parses an ISO calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_iso_date(s: &str) -> Result<Date, DomainError> {
    Date::parse(s, ISO_DATE).map_err(|e| DomainError::DateParseError {
        date_string: s.to_string(),
        error: e.to_string(),
    })
}

/// Represents the lifecycle state of a booking.
///
/// A booking is created Pending or Confirmed (operator's choice).
/// Confirmed is reachable only from Pending. Cancelled is reachable from
/// any state and acts as a soft delete: the record is retained, the slot
/// is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BookingStatus {
    /// Initial state. Holds the slot but awaits confirmation.
    #[default]
    Pending,
    /// Confirmed by an operator or by payment.
    Confirmed,
    /// Soft-deleted. Releases the slot; the record remains retrievable.
    Cancelled,
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Confirmed" => Ok(Self::Confirmed),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidBookingStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl BookingStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Pending → Confirmed
    /// - any state → Cancelled
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed) | (_, Self::Cancelled)
        )
    }

    /// Returns whether this booking still occupies its slot.
    ///
    /// Cancelled bookings release the slot; all others hold it.
    #[must_use]
    pub const fn holds_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Represents a payment method.
///
/// The bucket set is fixed to exactly these three methods; entries with no
/// method are excluded from per-method breakdowns entirely, not lumped into
/// an "unknown" bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash at the counter.
    Cash,
    /// Bank transfer.
    Transfer,
    /// QR / mobile payment.
    #[serde(rename = "QR")]
    Qr,
}

impl PaymentMethod {
    /// Parses a payment method from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not match a valid method.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Cash" => Ok(Self::Cash),
            "Transfer" => Ok(Self::Transfer),
            "QR" => Ok(Self::Qr),
            _ => Err(DomainError::InvalidPaymentMethod(format!(
                "Unknown payment method: {s}"
            ))),
        }
    }

    /// Returns the string representation of this payment method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Transfer => "Transfer",
            Self::Qr => "QR",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A time-of-day label aligned to the hourly slot grid.
///
/// Slot times render as `HH:MM` and are the unit of booking admission:
/// two bookings collide exactly when their `(court, date, slot)` triples
/// are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotTime {
    /// The hour (0-23).
    hour: u8,
    /// The minute (0-59).
    minute: u8,
}

impl SlotTime {
    /// Creates a new `SlotTime`.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour or minute is out of range.
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour >= 24 || minute >= 60 {
            return Err(DomainError::InvalidSlotTime(format!(
                "{hour:02}:{minute:02} is out of range"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Creates a whole-hour slot time.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour is out of range.
    pub fn on_the_hour(hour: u8) -> Result<Self, DomainError> {
        Self::new(hour, 0)
    }

    /// Returns the hour component.
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute component.
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the `HH:MM` label used on the booking grid and in storage.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for SlotTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidSlotTime(s.to_string()))?;
        let hour: u8 = hour
            .parse()
            .map_err(|_| DomainError::InvalidSlotTime(s.to_string()))?;
        let minute: u8 = minute
            .parse()
            .map_err(|_| DomainError::InvalidSlotTime(s.to_string()))?;
        Self::new(hour, minute)
    }
}

impl std::fmt::Display for SlotTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// An optional discounted rate attached to a court.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRate {
    /// Whether this offer is currently active.
    pub active: bool,
    /// The discounted price in cents.
    pub price_cents: i64,
    /// A human-readable label (e.g., "Off-peak").
    pub label: String,
}

/// Represents a padel court.
///
/// A court carries a base price and up to two optional named offers.
/// The effective price is the first active offer in fixed priority order
/// (offer 1 before offer 2), else the base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the court has not been persisted yet.
    pub court_id: Option<i64>,
    /// The display name.
    pub name: String,
    /// Whether the court is under maintenance. Maintenance blocks the
    /// court from the public availability grid; it never deletes it.
    pub maintenance: bool,
    /// The base price per slot in cents.
    pub base_price_cents: i64,
    /// First optional offer. Takes priority over the second.
    pub offer1: Option<OfferRate>,
    /// Second optional offer.
    pub offer2: Option<OfferRate>,
}

impl Court {
    /// Creates a new `Court` without a persisted identifier.
    #[must_use]
    pub const fn new(name: String, base_price_cents: i64) -> Self {
        Self {
            court_id: None,
            name,
            maintenance: false,
            base_price_cents,
            offer1: None,
            offer2: None,
        }
    }

    /// Returns the effective price per slot in cents.
    ///
    /// The first active offer wins, in (offer 1, offer 2) order; otherwise
    /// the base price applies.
    #[must_use]
    pub fn effective_price_cents(&self) -> i64 {
        for offer in [&self.offer1, &self.offer2] {
            if let Some(offer) = offer
                && offer.active
            {
                return offer.price_cents;
            }
        }
        self.base_price_cents
    }
}

/// Represents a court booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the booking has not been persisted yet.
    pub booking_id: Option<i64>,
    /// The booked court.
    pub court_id: i64,
    /// The calendar date.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The slot start time.
    pub slot: SlotTime,
    /// Duration in minutes. Informational only: admission control keys on
    /// the start slot, never on the duration span.
    pub duration_minutes: u16,
    /// The customer's name.
    pub customer_name: String,
    /// The customer's phone number.
    pub customer_phone: String,
    /// The lifecycle status.
    pub status: BookingStatus,
    /// The payment method, if one has been set. Independent of status.
    pub method: Option<PaymentMethod>,
    /// The agreed price in cents, captured at creation.
    pub price_cents: i64,
    /// Whether this booking recurs weekly.
    pub recurring: bool,
}

impl Booking {
    /// Returns whether this booking counts toward live revenue.
    ///
    /// The dashboard predicate: Confirmed, or any payment method set even
    /// while still Pending. This is deliberately distinct from the
    /// ledger-based revenue computation and must stay so.
    #[must_use]
    pub const fn counts_as_live_revenue(&self) -> bool {
        matches!(self.status, BookingStatus::Confirmed) || self.method.is_some()
    }
}

/// Represents a product sold at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the product has not been persisted yet.
    pub product_id: Option<i64>,
    /// The product name.
    pub name: String,
    /// Free-text category.
    pub category: String,
    /// Unit price in cents.
    pub price_cents: i64,
    /// Units in stock.
    pub stock: i64,
    /// Low-stock warning threshold.
    pub low_stock_threshold: i64,
    /// Optional image reference.
    pub image: Option<String>,
}

impl Product {
    /// Returns whether the product is at or below its low-stock threshold.
    ///
    /// Derived on read, never stored.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

/// Represents an expense category.
///
/// Expense categories are a closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseCategory {
    /// Consumables and shop supplies.
    Supplies,
    /// Court and building maintenance.
    Maintenance,
    /// Electricity, water, internet.
    Utilities,
    /// Staff wages.
    Wages,
    /// Anything else.
    Other,
}

impl ExpenseCategory {
    /// Parses an expense category from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not match a valid category.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Supplies" => Ok(Self::Supplies),
            "Maintenance" => Ok(Self::Maintenance),
            "Utilities" => Ok(Self::Utilities),
            "Wages" => Ok(Self::Wages),
            "Other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidExpenseCategory(format!(
                "Unknown expense category: {s}"
            ))),
        }
    }

    /// Returns the string representation of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Supplies => "Supplies",
            Self::Maintenance => "Maintenance",
            Self::Utilities => "Utilities",
            Self::Wages => "Wages",
            Self::Other => "Other",
        }
    }
}

/// Represents an operating expense.
///
/// Expenses live outside the activity ledger: they are summed separately
/// and netted against ledger income for reporting. They are never compacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the expense has not been persisted yet.
    pub expense_id: Option<i64>,
    /// The calendar date.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The expense category.
    pub category: ExpenseCategory,
    /// Free-text description.
    pub description: String,
    /// The amount in cents.
    pub amount_cents: i64,
}
