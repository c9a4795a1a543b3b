// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use courtdesk_ledger::MonthlySummary;

use crate::data_models::SummaryRow;
use crate::diesel_schema;
use crate::error::PersistenceError;

/// Lists all monthly summaries, newest month first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_summaries(
    conn: &mut SqliteConnection,
) -> Result<Vec<MonthlySummary>, PersistenceError> {
    let rows: Vec<SummaryRow> = diesel_schema::monthly_summaries::table
        .order(diesel_schema::monthly_summaries::month_key.desc())
        .load::<SummaryRow>(conn)?;
    Ok(rows.into_iter().map(MonthlySummary::from).collect())
}

/// Retrieves the summary for one `YYYY-MM` month key, if it exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_summary(
    conn: &mut SqliteConnection,
    month_key: &str,
) -> Result<Option<MonthlySummary>, PersistenceError> {
    let row: Option<SummaryRow> = diesel_schema::monthly_summaries::table
        .filter(diesel_schema::monthly_summaries::month_key.eq(month_key))
        .first::<SummaryRow>(conn)
        .optional()?;
    Ok(row.map(MonthlySummary::from))
}
