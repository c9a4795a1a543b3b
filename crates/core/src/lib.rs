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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod aggregation;
mod apply;
mod availability;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use aggregation::{
    DayRevenue, HistoricalTotals, MethodBreakdown, day_over_day_change, historical_totals,
    ledger_revenue, live_booking_revenue, operation_count, revenue_by_method, weekly_revenue,
};
pub use apply::apply;
pub use availability::{
    FIRST_START_HOUR, GridSlot, LAST_START_HOUR, day_grid, is_slot_available,
};
pub use command::{Command, SaleLine};
pub use error::CoreError;
pub use state::{State, TransitionResult};
