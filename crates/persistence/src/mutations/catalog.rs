// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes for courts, products, expenses and the schedule singleton.

use diesel::SqliteConnection;
use diesel::prelude::*;

use courtdesk_domain::{Court, Expense, Product, ScheduleGrid};

use crate::data_models::{NewCourtRow, NewExpenseRow, NewProductRow, ScheduleRow};
use crate::diesel_schema;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Inserts a new court or updates an existing one, keyed on whether the
/// court already carries an id.
///
/// # Returns
///
/// The court's database id.
///
/// # Errors
///
/// Returns an error if an offer rate cannot be serialized or the write
/// fails.
pub fn save_court(conn: &mut SqliteConnection, court: &Court) -> Result<i64, PersistenceError> {
    let row = NewCourtRow::from_court(court)?;
    match court.court_id {
        Some(court_id) => {
            let updated = diesel::update(
                diesel_schema::courts::table
                    .filter(diesel_schema::courts::court_id.eq(court_id)),
            )
            .set(&row)
            .execute(conn)?;
            if updated == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Court {court_id} does not exist"
                )));
            }
            Ok(court_id)
        }
        None => {
            diesel::insert_into(diesel_schema::courts::table)
                .values(&row)
                .execute(conn)?;
            get_last_insert_rowid(conn)
        }
    }
}

/// Deletes a court. Fails if bookings still reference it.
///
/// # Errors
///
/// Returns an error if the court does not exist or the foreign key
/// constraint rejects the delete.
pub fn delete_court(conn: &mut SqliteConnection, court_id: i64) -> Result<(), PersistenceError> {
    let deleted = diesel::delete(
        diesel_schema::courts::table.filter(diesel_schema::courts::court_id.eq(court_id)),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Court {court_id} does not exist"
        )));
    }
    Ok(())
}

/// Inserts a new product or updates an existing one.
///
/// # Returns
///
/// The product's database id.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save_product(
    conn: &mut SqliteConnection,
    product: &Product,
) -> Result<i64, PersistenceError> {
    let row = NewProductRow::from(product);
    match product.product_id {
        Some(product_id) => {
            let updated = diesel::update(
                diesel_schema::products::table
                    .filter(diesel_schema::products::product_id.eq(product_id)),
            )
            .set(&row)
            .execute(conn)?;
            if updated == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Product {product_id} does not exist"
                )));
            }
            Ok(product_id)
        }
        None => {
            diesel::insert_into(diesel_schema::products::table)
                .values(&row)
                .execute(conn)?;
            get_last_insert_rowid(conn)
        }
    }
}

/// Deletes a product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the delete fails.
pub fn delete_product(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> Result<(), PersistenceError> {
    let deleted = diesel::delete(
        diesel_schema::products::table
            .filter(diesel_schema::products::product_id.eq(product_id)),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Product {product_id} does not exist"
        )));
    }
    Ok(())
}

/// Records one expense.
///
/// # Returns
///
/// The expense's database id.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted or the insert fails.
pub fn add_expense(conn: &mut SqliteConnection, expense: &Expense) -> Result<i64, PersistenceError> {
    diesel::insert_into(diesel_schema::expenses::table)
        .values(NewExpenseRow::from_expense(expense)?)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Deletes one expense.
///
/// # Errors
///
/// Returns an error if the expense does not exist or the delete fails.
pub fn delete_expense(
    conn: &mut SqliteConnection,
    expense_id: i64,
) -> Result<(), PersistenceError> {
    let deleted = diesel::delete(
        diesel_schema::expenses::table
            .filter(diesel_schema::expenses::expense_id.eq(expense_id)),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Expense {expense_id} does not exist"
        )));
    }
    Ok(())
}

/// Replaces the opening-hours grid. The schedule is a singleton row;
/// the upsert keys on its fixed id.
///
/// # Errors
///
/// Returns an error if the grid cannot be serialized or the write fails.
pub fn save_schedule(
    conn: &mut SqliteConnection,
    grid: &ScheduleGrid,
) -> Result<(), PersistenceError> {
    let row = ScheduleRow::from_grid(grid)?;
    diesel::insert_into(diesel_schema::schedule::table)
        .values(&row)
        .on_conflict(diesel_schema::schedule::id)
        .do_update()
        .set(diesel_schema::schedule::grid_json.eq(&row.grid_json))
        .execute(conn)?;
    Ok(())
}
