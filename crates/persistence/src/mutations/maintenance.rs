// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Compaction of old ledger entries into monthly summaries.
//!
//! Entries older than the retention window are folded into their month's
//! summary and deleted, in one transaction. Summaries are additive: a
//! month that already has a summary absorbs further batches on top of the
//! totals it already carries, so repeated runs never double-count and a
//! run over an empty window is a no-op.

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use courtdesk_ledger::MonthlySummary;

use crate::data_models::SummaryRow;
use crate::diesel_schema;
use crate::error::PersistenceError;
use crate::queries;

/// Days an entry stays in the raw ledger before it is eligible for
/// compaction.
pub const RETENTION_DAYS: i64 = 15;

/// Maximum entries folded per run. A full batch means another run is
/// needed to drain the backlog.
pub const BATCH_LIMIT: i64 = 500;

/// What one maintenance run did.
#[derive(Debug, Clone)]
pub struct MaintenanceReport {
    /// The cutoff timestamp; entries strictly older were eligible.
    pub cutoff: String,
    /// Number of ledger entries folded and deleted.
    pub compacted_entries: usize,
    /// Number of distinct monthly summaries written.
    pub months_touched: usize,
    /// True when the batch limit was hit and a backlog likely remains.
    pub batch_full: bool,
}

/// Runs one compaction pass as of `now`.
///
/// Entries timestamped before `now` minus the retention window are
/// absorbed into their month's summary (created on first touch) and then
/// deleted. The deletes and summary upserts share one transaction, so a
/// failure leaves the ledger untouched.
///
/// # Errors
///
/// Returns [`PersistenceError::CompactionAborted`] if any eligible entry
/// has a malformed timestamp or no id; nothing is deleted in that case.
/// Database failures roll the whole pass back.
pub fn run_maintenance(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<MaintenanceReport, PersistenceError> {
    let cutoff = (now - time::Duration::days(RETENTION_DAYS))
        .format(&Rfc3339)
        .map_err(|error| PersistenceError::CompactionAborted(error.to_string()))?;
    let updated_at = now
        .format(&Rfc3339)
        .map_err(|error| PersistenceError::CompactionAborted(error.to_string()))?;

    let entries = queries::ledger::entries_before(conn, &cutoff, BATCH_LIMIT)?;
    if entries.is_empty() {
        return Ok(MaintenanceReport {
            cutoff,
            compacted_entries: 0,
            months_touched: 0,
            batch_full: false,
        });
    }

    // Validate the whole batch before touching anything.
    let mut entry_ids = Vec::with_capacity(entries.len());
    let mut month_keys = Vec::with_capacity(entries.len());
    for entry in &entries {
        let entry_id = entry.entry_id.ok_or_else(|| {
            PersistenceError::CompactionAborted("Ledger entry without an id".to_string())
        })?;
        let month_key = entry.month_key().ok_or_else(|| {
            PersistenceError::CompactionAborted(format!(
                "Ledger entry {entry_id} has a malformed timestamp: {}",
                entry.timestamp
            ))
        })?;
        entry_ids.push(entry_id);
        month_keys.push(month_key.to_string());
    }

    let mut summaries: BTreeMap<String, MonthlySummary> = BTreeMap::new();
    for month_key in &month_keys {
        if !summaries.contains_key(month_key) {
            let summary = queries::summaries::get_summary(conn, month_key)?
                .unwrap_or_else(|| MonthlySummary::new_for_month(month_key));
            summaries.insert(month_key.clone(), summary);
        }
    }
    for (entry, month_key) in entries.iter().zip(&month_keys) {
        if let Some(summary) = summaries.get_mut(month_key) {
            summary.absorb(entry);
            summary.updated_at.clone_from(&updated_at);
        }
    }

    conn.transaction(|conn| {
        diesel::delete(
            diesel_schema::activity_log::table
                .filter(diesel_schema::activity_log::entry_id.eq_any(&entry_ids)),
        )
        .execute(conn)?;
        for summary in summaries.values() {
            let row = SummaryRow::from(summary);
            diesel::insert_into(diesel_schema::monthly_summaries::table)
                .values(&row)
                .on_conflict(diesel_schema::monthly_summaries::month_key)
                .do_update()
                .set(&row)
                .execute(conn)?;
        }
        Ok::<(), PersistenceError>(())
    })?;

    let report = MaintenanceReport {
        cutoff,
        compacted_entries: entries.len(),
        months_touched: summaries.len(),
        batch_full: entries.len() == usize::try_from(BATCH_LIMIT).unwrap_or(usize::MAX),
    };
    tracing::info!(
        cutoff = %report.cutoff,
        compacted = report.compacted_entries,
        months = report.months_touched,
        "Ledger compaction pass complete"
    );
    Ok(report)
}
