// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use courtdesk_domain::{Court, Expense, Product, ScheduleGrid};

use crate::data_models::{CourtRow, ExpenseRow, ProductRow, SCHEDULE_ROW_ID, ScheduleRow};
use crate::diesel_schema;
use crate::error::PersistenceError;

/// Lists all courts, maintenance ones included.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be mapped.
pub fn list_courts(conn: &mut SqliteConnection) -> Result<Vec<Court>, PersistenceError> {
    let rows: Vec<CourtRow> = diesel_schema::courts::table
        .order(diesel_schema::courts::court_id.asc())
        .load::<CourtRow>(conn)?;
    rows.into_iter().map(Court::try_from).collect()
}

/// Retrieves one court by id.
///
/// # Errors
///
/// Returns an error if the court does not exist or cannot be mapped.
pub fn get_court(conn: &mut SqliteConnection, court_id: i64) -> Result<Court, PersistenceError> {
    let row: CourtRow = diesel_schema::courts::table
        .filter(diesel_schema::courts::court_id.eq(court_id))
        .first::<CourtRow>(conn)?;
    Court::try_from(row)
}

/// Lists all products.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, PersistenceError> {
    let rows: Vec<ProductRow> = diesel_schema::products::table
        .order(diesel_schema::products::product_id.asc())
        .load::<ProductRow>(conn)?;
    Ok(rows.into_iter().map(Product::from).collect())
}

/// Lists all expenses, newest date first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be mapped.
pub fn list_expenses(conn: &mut SqliteConnection) -> Result<Vec<Expense>, PersistenceError> {
    let rows: Vec<ExpenseRow> = diesel_schema::expenses::table
        .order(diesel_schema::expenses::date.desc())
        .load::<ExpenseRow>(conn)?;
    rows.into_iter().map(Expense::try_from).collect()
}

/// Loads the opening-hours grid.
///
/// A missing singleton row yields the all-open default; the grid must
/// never read back as closed merely because it was never saved.
///
/// # Errors
///
/// Returns an error if the stored JSON cannot be parsed.
pub fn load_schedule(conn: &mut SqliteConnection) -> Result<ScheduleGrid, PersistenceError> {
    let row: Option<ScheduleRow> = diesel_schema::schedule::table
        .filter(diesel_schema::schedule::id.eq(SCHEDULE_ROW_ID))
        .first::<ScheduleRow>(conn)
        .optional()?;
    match row {
        Some(row) => row.to_grid(),
        None => Ok(ScheduleGrid::open_all()),
    }
}
