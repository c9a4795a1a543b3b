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

use courtdesk_domain::{DomainError, PaymentMethod};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Classifies an activity ledger entry.
///
/// The kind determines whether an entry's amount contributes to income
/// when its month is compacted: only `Sale` and `Booking` amounts do.
/// `Shift` amounts are counted by the live cashbox view but never by
/// compaction. Every entry, regardless of kind, counts as one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    /// A booking was created or modified.
    Booking,
    /// A counter sale was recorded.
    Sale,
    /// A cash-drawer shift was opened or closed.
    Shift,
    /// A system-level event (schedule change, maintenance run, ...).
    System,
    /// A manual stock adjustment.
    Stock,
}

impl ActivityKind {
    /// Returns the string representation of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Booking => "Booking",
            Self::Sale => "Sale",
            Self::Shift => "Shift",
            Self::System => "System",
            Self::Stock => "Stock",
        }
    }

    /// Returns whether this kind's amount is rolled into a monthly
    /// summary's income during compaction.
    #[must_use]
    pub const fn counts_toward_compacted_income(&self) -> bool {
        matches!(self, Self::Sale | Self::Booking)
    }

    /// Returns whether this kind's amount is included in the raw daily
    /// income sum used by the cashbox view.
    ///
    /// Shift entries are included here but excluded from compacted
    /// income; the two sums are intentionally different.
    #[must_use]
    pub const fn counts_toward_daily_income(&self) -> bool {
        matches!(self, Self::Sale | Self::Booking | Self::Shift)
    }
}

impl FromStr for ActivityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Booking" => Ok(Self::Booking),
            "Sale" => Ok(Self::Sale),
            "Shift" => Ok(Self::Shift),
            "System" => Ok(Self::System),
            "Stock" => Ok(Self::Stock),
            _ => Err(DomainError::InvalidActivityKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable activity ledger entry.
///
/// Entries are write-once: nothing mutates or deletes them except the
/// compaction run, which absorbs them into a monthly summary and deletes
/// them in the same atomic batch. Timestamps are stored as ISO-8601
/// strings and partitioned by calendar day via string-prefix match, so
/// day boundaries follow the timestamp's own offset, not any timezone
/// arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the entry has not been persisted yet.
    pub entry_id: Option<i64>,
    /// What class of activity this records.
    pub kind: ActivityKind,
    /// Human-readable description of what happened.
    pub description: String,
    /// ISO-8601 instant at which the activity occurred.
    pub timestamp: String,
    /// The operator who performed the action.
    pub operator: String,
    /// Monetary amount in cents, when the activity moved money.
    pub amount_cents: Option<i64>,
    /// Payment method, when one applies.
    pub method: Option<PaymentMethod>,
}

impl ActivityEntry {
    /// Creates a new entry with no amount and no method.
    #[must_use]
    pub const fn new(
        kind: ActivityKind,
        description: String,
        timestamp: String,
        operator: String,
    ) -> Self {
        Self {
            entry_id: None,
            kind,
            description,
            timestamp,
            operator,
            amount_cents: None,
            method: None,
        }
    }

    /// Attaches a monetary amount.
    #[must_use]
    pub const fn with_amount(mut self, amount_cents: i64) -> Self {
        self.amount_cents = Some(amount_cents);
        self
    }

    /// Attaches a payment method.
    #[must_use]
    pub const fn with_method(mut self, method: PaymentMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Returns whether this entry occurred on the given ISO calendar day
    /// (`YYYY-MM-DD`).
    ///
    /// Day partitioning is a string-prefix match against the stored
    /// timestamp, nothing more.
    #[must_use]
    pub fn occurred_on(&self, day: &str) -> bool {
        self.timestamp.starts_with(day)
    }

    /// Returns the `YYYY-MM` month key derived from the timestamp, or
    /// `None` if the timestamp is too short to carry one.
    #[must_use]
    pub fn month_key(&self) -> Option<&str> {
        self.timestamp.get(..7)
    }

    /// Returns this entry's contribution to a raw daily income sum.
    #[must_use]
    pub fn daily_income_cents(&self) -> i64 {
        if self.kind.counts_toward_daily_income() {
            self.amount_cents.unwrap_or(0)
        } else {
            0
        }
    }
}

/// Returns the current instant as the ISO-8601 string stored on ledger
/// entries.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted (practically
/// unreachable).
pub fn now_timestamp() -> Result<String, time::error::Format> {
    OffsetDateTime::now_utc().format(&Rfc3339)
}

/// Returns the human label for a `YYYY-MM` month key, e.g. `March 2026`.
///
/// An unparseable key falls back to the key itself so that a summary is
/// never left without a label.
#[must_use]
pub fn month_label(month_key: &str) -> String {
    let Some((year, month)) = month_key.split_once('-') else {
        return month_key.to_string();
    };
    let name: &str = match month {
        "01" => "January",
        "02" => "February",
        "03" => "March",
        "04" => "April",
        "05" => "May",
        "06" => "June",
        "07" => "July",
        "08" => "August",
        "09" => "September",
        "10" => "October",
        "11" => "November",
        "12" => "December",
        _ => return month_key.to_string(),
    };
    format!("{name} {year}")
}

/// A compacted rollup of one calendar month's ledger activity.
///
/// Created by the first compaction run that touches the month and
/// updated additively by every later run. Totals only ever grow;
/// a summary is never overwritten wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The `YYYY-MM` month key. Identity of the summary.
    pub month_key: String,
    /// Human-readable label, e.g. `March 2026`.
    pub label: String,
    /// Cumulative income in cents from compacted Sale and Booking entries.
    pub total_income_cents: i64,
    /// Cumulative expenses in cents. Expenses are never compacted, so
    /// this stays 0; the column exists for reporting symmetry.
    pub total_expenses_cents: i64,
    /// Count of all compacted entries for this month, every kind included.
    pub operation_count: i64,
    /// ISO-8601 instant of the last compaction run that touched this month.
    pub updated_at: String,
}

impl MonthlySummary {
    /// Initializes an empty summary for a month key.
    #[must_use]
    pub fn new_for_month(month_key: &str) -> Self {
        Self {
            month_key: month_key.to_string(),
            label: month_label(month_key),
            total_income_cents: 0,
            total_expenses_cents: 0,
            operation_count: 0,
            updated_at: String::new(),
        }
    }

    /// Folds one ledger entry into this summary.
    ///
    /// The amount is added to income only for Sale and Booking entries;
    /// the operation count is incremented for every entry.
    pub fn absorb(&mut self, entry: &ActivityEntry) {
        if entry.kind.counts_toward_compacted_income() {
            self.total_income_cents += entry.amount_cents.unwrap_or(0);
        }
        self.operation_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: ActivityKind, timestamp: &str, amount_cents: Option<i64>) -> ActivityEntry {
        let mut entry: ActivityEntry = ActivityEntry::new(
            kind,
            String::from("test entry"),
            timestamp.to_string(),
            String::from("operator"),
        );
        entry.amount_cents = amount_cents;
        entry
    }

    #[test]
    fn test_day_partition_is_a_prefix_match() {
        let entry: ActivityEntry =
            entry(ActivityKind::Sale, "2026-03-14T18:30:00Z", Some(12_00));

        assert!(entry.occurred_on("2026-03-14"));
        assert!(!entry.occurred_on("2026-03-15"));
    }

    #[test]
    fn test_month_key_is_first_seven_characters() {
        let entry: ActivityEntry =
            entry(ActivityKind::Booking, "2026-03-14T18:30:00Z", Some(150_00));
        assert_eq!(entry.month_key(), Some("2026-03"));

        let short: ActivityEntry = ActivityEntry::new(
            ActivityKind::System,
            String::from("bad clock"),
            String::from("2026"),
            String::from("operator"),
        );
        assert_eq!(short.month_key(), None);
    }

    #[test]
    fn test_kind_round_trips_through_string() {
        for kind in [
            ActivityKind::Booking,
            ActivityKind::Sale,
            ActivityKind::Shift,
            ActivityKind::System,
            ActivityKind::Stock,
        ] {
            let parsed: ActivityKind = ActivityKind::from_str(kind.as_str()).unwrap();
            assert_eq!(parsed, kind);
        }
        assert!(ActivityKind::from_str("Refund").is_err());
    }

    #[test]
    fn test_daily_income_includes_shift_entries() {
        assert_eq!(
            entry(ActivityKind::Shift, "2026-03-14T08:00:00Z", Some(200_00)).daily_income_cents(),
            200_00
        );
        assert_eq!(
            entry(ActivityKind::System, "2026-03-14T08:00:00Z", Some(99_00)).daily_income_cents(),
            0
        );
        assert_eq!(
            entry(ActivityKind::Sale, "2026-03-14T08:00:00Z", None).daily_income_cents(),
            0
        );
    }

    #[test]
    fn test_absorb_adds_income_only_for_sale_and_booking() {
        let mut summary: MonthlySummary = MonthlySummary::new_for_month("2026-03");

        summary.absorb(&entry(ActivityKind::Sale, "2026-03-01T10:00:00Z", Some(10_00)));
        summary.absorb(&entry(
            ActivityKind::Booking,
            "2026-03-02T10:00:00Z",
            Some(150_00),
        ));
        summary.absorb(&entry(ActivityKind::Shift, "2026-03-03T10:00:00Z", Some(500_00)));
        summary.absorb(&entry(ActivityKind::System, "2026-03-04T10:00:00Z", None));

        assert_eq!(summary.total_income_cents, 160_00);
        assert_eq!(summary.operation_count, 4);
        assert_eq!(summary.total_expenses_cents, 0);
    }

    #[test]
    fn test_absorb_is_additive_across_runs() {
        let mut summary: MonthlySummary = MonthlySummary::new_for_month("2026-02");
        summary.absorb(&entry(ActivityKind::Sale, "2026-02-01T10:00:00Z", Some(25_00)));
        let after_first: i64 = summary.total_income_cents;

        summary.absorb(&entry(ActivityKind::Sale, "2026-02-10T10:00:00Z", Some(5_00)));
        assert_eq!(summary.total_income_cents, after_first + 5_00);
        assert_eq!(summary.operation_count, 2);
    }

    #[test]
    fn test_month_label_formatting() {
        assert_eq!(month_label("2026-03"), "March 2026");
        assert_eq!(month_label("2025-12"), "December 2025");
        assert_eq!(month_label("garbage"), "garbage");
        assert_eq!(month_label("2026-13"), "2026-13");
    }

    #[test]
    fn test_now_timestamp_carries_a_day_prefix() {
        let stamp: String = now_timestamp().unwrap();
        assert_eq!(stamp.as_bytes()[4], b'-');
        assert_eq!(stamp.as_bytes()[7], b'-');
        assert!(stamp.len() >= 10);
    }
}
