// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment-link creation behind an opaque provider seam.
//!
//! The club hands customers a link to pay for a booking remotely. The
//! provider is external and may be unconfigured or down; its failures
//! surface to the caller as errors and never touch local state. No
//! booking field changes because a link was (or was not) created.

use serde::{Deserialize, Serialize};

use courtdesk_domain::Booking;

/// A payment link handed to the customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLink {
    /// The URL the customer opens to pay.
    pub url: String,
    /// The provider's reference for reconciliation.
    pub reference: String,
}

/// Why a payment link could not be created.
#[derive(Debug, Clone)]
pub enum PaymentLinkError {
    /// No provider is configured.
    NotConfigured,
    /// The provider rejected or failed the request.
    Provider(String),
}

impl std::fmt::Display for PaymentLinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => {
                write!(f, "No payment link provider is configured")
            }
            Self::Provider(message) => {
                write!(f, "Payment link provider failed: {message}")
            }
        }
    }
}

impl std::error::Error for PaymentLinkError {}

/// Creates payment links for bookings.
///
/// Implementations talk to an external payment service. They must not
/// mutate the booking; the server records nothing about link creation.
pub trait PaymentLinkProvider: Send + Sync {
    /// Creates a link for the given booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unavailable or rejects the
    /// request.
    fn create_link(&self, booking: &Booking) -> Result<PaymentLink, PaymentLinkError>;
}

/// The default provider: always reports itself unconfigured.
pub struct DisabledPaymentLinks;

impl PaymentLinkProvider for DisabledPaymentLinks {
    fn create_link(&self, _booking: &Booking) -> Result<PaymentLink, PaymentLinkError> {
        Err(PaymentLinkError::NotConfigured)
    }
}
