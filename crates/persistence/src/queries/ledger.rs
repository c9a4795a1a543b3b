// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use courtdesk_ledger::ActivityEntry;

use crate::data_models::ActivityRow;
use crate::diesel_schema;
use crate::error::PersistenceError;

/// Lists all ledger entries, newest first. Display order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be mapped.
pub fn list_entries(conn: &mut SqliteConnection) -> Result<Vec<ActivityEntry>, PersistenceError> {
    let rows: Vec<ActivityRow> = diesel_schema::activity_log::table
        .order(diesel_schema::activity_log::timestamp.desc())
        .load::<ActivityRow>(conn)?;
    rows.into_iter().map(ActivityEntry::try_from).collect()
}

/// Fetches up to `limit` entries strictly older than `cutoff`, oldest
/// first. Timestamp ordering is the ISO string's lexicographic order.
///
/// Compaction's batch selection: callers re-invoke if a full batch came
/// back, there is no automatic chaining.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be mapped.
pub fn entries_before(
    conn: &mut SqliteConnection,
    cutoff: &str,
    limit: i64,
) -> Result<Vec<ActivityEntry>, PersistenceError> {
    let rows: Vec<ActivityRow> = diesel_schema::activity_log::table
        .filter(diesel_schema::activity_log::timestamp.lt(cutoff))
        .order(diesel_schema::activity_log::timestamp.asc())
        .limit(limit)
        .load::<ActivityRow>(conn)?;
    rows.into_iter().map(ActivityEntry::try_from).collect()
}

/// Counts all ledger entries.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_entries(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel_schema::activity_log::table
        .count()
        .get_result(conn)?)
}
