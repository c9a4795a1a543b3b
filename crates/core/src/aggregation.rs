// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The aggregation engine.
//!
//! "Revenue" is view-specific and deliberately not unified:
//!
//! * [`ledger_revenue`] sums ledger amounts (Sale, Booking and Shift
//!   kinds) for a day. The cashbox reads this.
//! * [`live_booking_revenue`] evaluates a status predicate against the
//!   live booking records, ignoring the ledger. The dashboard's today and
//!   yesterday cards read this.
//! * [`weekly_revenue`] combines the live booking predicate with Sale
//!   ledger entries, per day, for the 7-day chart.
//!
//! The two paths can and do disagree; keeping them separate preserves the
//! numbers each view shows.

use courtdesk_domain::{Booking, Expense, PaymentMethod, format_iso_date};
use courtdesk_ledger::{ActivityEntry, MonthlySummary};
use time::Date;

/// Revenue for one day of the 7-day chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRevenue {
    /// The ISO calendar day.
    pub day: String,
    /// Revenue in cents.
    pub revenue_cents: i64,
}

/// Per-payment-method revenue for one day.
///
/// Exactly three buckets. Entries without a method are excluded from the
/// breakdown entirely, never lumped into a catch-all bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MethodBreakdown {
    /// Cash revenue in cents.
    pub cash_cents: i64,
    /// QR revenue in cents.
    pub qr_cents: i64,
    /// Transfer revenue in cents.
    pub transfer_cents: i64,
}

/// All-time totals: the live ledger plus the compacted history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoricalTotals {
    /// Income in cents.
    pub income_cents: i64,
    /// Expenses in cents. Expenses are never compacted, so the compacted
    /// share of this is always 0.
    pub expense_cents: i64,
    /// Operation count.
    pub operation_count: i64,
}

/// Sums ledger income for one ISO calendar day.
///
/// Includes Sale, Booking and Shift amounts; System and Stock entries
/// never carry income. Day membership is a timestamp prefix match.
#[must_use]
pub fn ledger_revenue(entries: &[ActivityEntry], day: &str) -> i64 {
    entries
        .iter()
        .filter(|entry| entry.occurred_on(day))
        .map(ActivityEntry::daily_income_cents)
        .sum()
}

/// Counts ledger operations for one ISO calendar day, every kind included.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn operation_count(entries: &[ActivityEntry], day: &str) -> i64 {
    entries
        .iter()
        .filter(|entry| entry.occurred_on(day))
        .count() as i64
}

/// Breaks one day's ledger income down by payment method.
#[must_use]
pub fn revenue_by_method(entries: &[ActivityEntry], day: &str) -> MethodBreakdown {
    let mut breakdown: MethodBreakdown = MethodBreakdown::default();
    for entry in entries {
        if !entry.occurred_on(day) {
            continue;
        }
        let amount: i64 = entry.daily_income_cents();
        match entry.method {
            Some(PaymentMethod::Cash) => breakdown.cash_cents += amount,
            Some(PaymentMethod::Qr) => breakdown.qr_cents += amount,
            Some(PaymentMethod::Transfer) => breakdown.transfer_cents += amount,
            None => {}
        }
    }
    breakdown
}

/// Sums live booking revenue for one calendar day.
///
/// A booking counts when it is Confirmed or has any payment method set,
/// even while still Pending. Evaluated against current booking records,
/// not the ledger.
#[must_use]
pub fn live_booking_revenue(bookings: &[Booking], day: Date) -> i64 {
    bookings
        .iter()
        .filter(|booking| booking.date == day && booking.counts_as_live_revenue())
        .map(|booking| booking.price_cents)
        .sum()
}

/// Day-over-day percentage change, rounded to the nearest integer.
///
/// A zero-income yesterday reports 0% change, never a division error.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
pub fn day_over_day_change(today_cents: i64, yesterday_cents: i64) -> i64 {
    if yesterday_cents <= 0 {
        return 0;
    }
    let change: f64 =
        (today_cents - yesterday_cents) as f64 / yesterday_cents as f64 * 100.0;
    change.round() as i64
}

/// Builds the 7-day revenue series ending at `today`, oldest day first.
///
/// Each day sums the live booking predicate plus Sale ledger entries.
/// Shift entries are excluded here even though [`ledger_revenue`]
/// includes them.
///
/// # Errors
///
/// Returns an error if a chart day cannot be formatted as an ISO date.
pub fn weekly_revenue(
    bookings: &[Booking],
    entries: &[ActivityEntry],
    today: Date,
) -> Result<Vec<DayRevenue>, courtdesk_domain::DomainError> {
    let mut series: Vec<DayRevenue> = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let day: Date = today.saturating_sub(time::Duration::days(offset));
        let day_label: String = format_iso_date(day)?;

        let sales: i64 = entries
            .iter()
            .filter(|entry| {
                entry.kind == courtdesk_ledger::ActivityKind::Sale && entry.occurred_on(&day_label)
            })
            .map(|entry| entry.amount_cents.unwrap_or(0))
            .sum();

        series.push(DayRevenue {
            revenue_cents: live_booking_revenue(bookings, day) + sales,
            day: day_label,
        });
    }
    Ok(series)
}

/// Computes all-time totals from the live ledger, live expenses and the
/// compacted monthly summaries.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn historical_totals(
    entries: &[ActivityEntry],
    expenses: &[Expense],
    summaries: &[MonthlySummary],
) -> HistoricalTotals {
    let live_income: i64 = entries.iter().map(ActivityEntry::daily_income_cents).sum();
    let live_expenses: i64 = expenses.iter().map(|expense| expense.amount_cents).sum();

    let compacted_income: i64 = summaries
        .iter()
        .map(|summary| summary.total_income_cents)
        .sum();
    let compacted_expenses: i64 = summaries
        .iter()
        .map(|summary| summary.total_expenses_cents)
        .sum();
    let compacted_operations: i64 = summaries
        .iter()
        .map(|summary| summary.operation_count)
        .sum();

    HistoricalTotals {
        income_cents: live_income + compacted_income,
        expense_cents: live_expenses + compacted_expenses,
        operation_count: entries.len() as i64 + compacted_operations,
    }
}
