// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use courtdesk_domain::{Booking, PaymentMethod};

/// One line of a counter sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLine {
    /// The product being sold.
    pub product_id: i64,
    /// How many units. Must be positive.
    pub quantity: i64,
}

/// A command represents operator or system intent as data only.
///
/// Commands are the only way to request state changes. Every successful
/// command produces exactly one activity ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new booking. The embedded status is operator-chosen and
    /// must be Pending or Confirmed; the ledger entry carries the price.
    CreateBooking {
        /// The booking to create. Its `booking_id` must be `None`.
        booking: Booking,
    },
    /// Confirm a pending booking. Guarded: only Pending bookings confirm.
    ConfirmBooking {
        /// The booking to confirm.
        booking_id: i64,
    },
    /// Cancel a booking from any state. A soft delete: the record stays,
    /// the slot is released.
    CancelBooking {
        /// The booking to cancel.
        booking_id: i64,
    },
    /// Set or clear a booking's payment method. Does not change status.
    SetPaymentMethod {
        /// The booking to update.
        booking_id: i64,
        /// The method, or `None` to clear it.
        method: Option<PaymentMethod>,
    },
    /// Flip a booking's weekly-recurring flag. Independent of status.
    ToggleRecurring {
        /// The booking to update.
        booking_id: i64,
    },
    /// Replace a booking wholesale. Last write wins.
    EditBooking {
        /// The booking to replace.
        booking_id: i64,
        /// The replacement record.
        booking: Booking,
    },
    /// Record a counter sale, decrementing stock per line.
    RecordSale {
        /// The sale lines. Must be non-empty.
        lines: Vec<SaleLine>,
        /// How the sale was paid.
        method: PaymentMethod,
    },
    /// Manually adjust a product's stock by a signed delta.
    AdjustStock {
        /// The product to adjust.
        product_id: i64,
        /// The signed change. The resulting stock must not go negative.
        delta: i64,
    },
    /// Open a cash-drawer shift with a counted opening float.
    OpenShift {
        /// The opening float in cents.
        opening_float_cents: i64,
    },
    /// Close the cash-drawer shift with a counted closing amount.
    CloseShift {
        /// The counted drawer amount in cents.
        counted_cents: i64,
    },
}
