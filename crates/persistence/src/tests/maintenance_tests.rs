// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ledger compaction: retention window, additive summaries, atomicity.

use time::OffsetDateTime;
use time::macros::datetime;

use crate::tests::helpers;
use crate::{ChangeEvent, Collection, PersistenceError};

const NOW: OffsetDateTime = datetime!(2026 - 03 - 14 10:00 UTC);

#[test]
fn old_entries_fold_into_monthly_summaries_and_are_deleted() {
    let mut persistence = helpers::memory_persistence();
    for entry in [
        helpers::booking_entry("2026-01-10T09:00:00Z", 150_00),
        helpers::sale_entry("2026-01-11T12:00:00Z", 6_00),
        helpers::shift_entry("2026-01-12T08:00:00Z", 100_00),
        helpers::system_entry("2026-01-12T09:00:00Z"),
        helpers::sale_entry("2026-02-05T12:00:00Z", 40_00),
        helpers::sale_entry("2026-03-13T12:00:00Z", 9_00),
    ] {
        persistence.append_entry(&entry).expect("append should work");
    }

    let report = persistence
        .run_maintenance(NOW)
        .expect("maintenance should run");

    assert_eq!(report.compacted_entries, 5);
    assert_eq!(report.months_touched, 2);
    assert!(!report.batch_full);
    assert!(report.cutoff.starts_with("2026-02-27"));

    // Only the entry inside the retention window survives.
    let remaining = persistence.list_entries().expect("ledger should load");
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].timestamp.starts_with("2026-03-13"));

    let summaries = persistence.list_summaries().expect("summaries should load");
    assert_eq!(summaries.len(), 2);

    // Newest month first.
    assert_eq!(summaries[0].month_key, "2026-02");
    assert_eq!(summaries[0].total_income_cents, 40_00);
    assert_eq!(summaries[0].operation_count, 1);

    // Shift and System entries count as operations, never as income.
    assert_eq!(summaries[1].month_key, "2026-01");
    assert_eq!(summaries[1].label, "January 2026");
    assert_eq!(summaries[1].total_income_cents, 156_00);
    assert_eq!(summaries[1].total_expenses_cents, 0);
    assert_eq!(summaries[1].operation_count, 4);
}

#[test]
fn second_run_over_a_drained_window_changes_nothing() {
    let mut persistence = helpers::memory_persistence();
    persistence
        .append_entry(&helpers::sale_entry("2026-01-11T12:00:00Z", 6_00))
        .expect("append should work");

    persistence
        .run_maintenance(NOW)
        .expect("first run should succeed");
    let before = persistence.list_summaries().expect("summaries should load");

    let report = persistence
        .run_maintenance(NOW)
        .expect("second run should succeed");
    assert_eq!(report.compacted_entries, 0);
    assert_eq!(report.months_touched, 0);

    let after = persistence.list_summaries().expect("summaries should load");
    assert_eq!(after.len(), before.len());
    assert_eq!(after[0].total_income_cents, before[0].total_income_cents);
    assert_eq!(after[0].operation_count, before[0].operation_count);
}

#[test]
fn later_batches_absorb_on_top_of_an_existing_summary() {
    let mut persistence = helpers::memory_persistence();
    persistence
        .append_entry(&helpers::sale_entry("2026-01-11T12:00:00Z", 6_00))
        .expect("append should work");
    persistence
        .run_maintenance(NOW)
        .expect("first run should succeed");

    // A backdated entry for the already-compacted month arrives later.
    persistence
        .append_entry(&helpers::sale_entry("2026-01-20T10:00:00Z", 10_00))
        .expect("append should work");
    let report = persistence
        .run_maintenance(NOW)
        .expect("second run should succeed");
    assert_eq!(report.compacted_entries, 1);

    let summaries = persistence.list_summaries().expect("summaries should load");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].total_income_cents, 16_00);
    assert_eq!(summaries[0].operation_count, 2);
}

#[test]
fn run_over_an_empty_window_is_a_no_op() {
    let mut persistence = helpers::memory_persistence();
    persistence
        .append_entry(&helpers::sale_entry("2026-03-13T12:00:00Z", 9_00))
        .expect("append should work");

    let report = persistence
        .run_maintenance(NOW)
        .expect("maintenance should run");
    assert_eq!(report.compacted_entries, 0);
    assert!(persistence
        .list_summaries()
        .expect("summaries should load")
        .is_empty());
    assert_eq!(persistence.count_entries().expect("count should work"), 1);
}

#[test]
fn malformed_timestamp_aborts_the_pass_with_nothing_deleted() {
    let mut persistence = helpers::memory_persistence();
    persistence
        .append_entry(&helpers::sale_entry("2026-01-11T12:00:00Z", 6_00))
        .expect("append should work");
    // Eligible (sorts before the cutoff) but too short to yield a month key.
    persistence
        .append_entry(&helpers::sale_entry("2026-0", 9_00))
        .expect("append should work");

    let mut receiver = persistence.feed().subscribe();
    let result = persistence.run_maintenance(NOW);

    assert!(matches!(
        result,
        Err(PersistenceError::CompactionAborted(_))
    ));

    // The whole batch aborts: the valid old entry survives too, no summary
    // is written, and nothing is published.
    assert_eq!(persistence.count_entries().expect("count should work"), 2);
    assert!(persistence
        .list_summaries()
        .expect("summaries should load")
        .is_empty());
    assert!(receiver.try_recv().is_err());
}

#[test]
fn compaction_publishes_ledger_and_summary_changes() {
    let mut persistence = helpers::memory_persistence();
    persistence
        .append_entry(&helpers::sale_entry("2026-01-11T12:00:00Z", 6_00))
        .expect("append should work");

    let mut receiver = persistence.feed().subscribe();
    persistence
        .run_maintenance(NOW)
        .expect("maintenance should run");

    assert_eq!(
        receiver.try_recv().expect("first event"),
        ChangeEvent::CollectionChanged(Collection::Ledger)
    );
    assert_eq!(
        receiver.try_recv().expect("second event"),
        ChangeEvent::CollectionChanged(Collection::Summaries)
    );
}

#[test]
fn no_op_run_publishes_nothing() {
    let mut persistence = helpers::memory_persistence();
    let mut receiver = persistence.feed().subscribe();

    persistence
        .run_maintenance(NOW)
        .expect("maintenance should run");

    assert!(receiver.try_recv().is_err());
}
