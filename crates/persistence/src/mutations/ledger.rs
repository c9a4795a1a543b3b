// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use courtdesk_ledger::ActivityEntry;

use crate::data_models::NewActivityRow;
use crate::diesel_schema;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Appends one entry to the activity ledger.
///
/// Entries are write-once; there is no update path.
///
/// # Returns
///
/// The entry ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn append_entry(
    conn: &mut SqliteConnection,
    entry: &ActivityEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(diesel_schema::activity_log::table)
        .values(NewActivityRow::from(entry))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
