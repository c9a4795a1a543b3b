// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the `CourtDesk` club management core.
//!
//! This crate stores the booking book, the catalog (courts, products,
//! expenses), the opening-hours schedule, the append-only activity ledger
//! and its compacted monthly summaries. It is built on Diesel over
//! `SQLite`.
//!
//! ## Storage Model
//!
//! - Bookings, courts, products and expenses are canonical row-per-entity
//!   tables. Bookings are never hard-deleted; cancellation flips their
//!   status and releases the slot.
//! - The activity ledger is append-only. The only thing that ever removes
//!   ledger rows is the maintenance pass, which folds rows older than the
//!   retention window into `monthly_summaries` inside one transaction.
//! - The schedule grid is a JSON singleton row.
//!
//! ## Concurrency
//!
//! Slot admission is enforced in the database: a partial unique index over
//! live bookings guarantees that two racing writers cannot both reserve the
//! same `(court, date, slot)`. The adapter surfaces that as
//! [`PersistenceError::SlotConflict`].
//!
//! ## Change Feed
//!
//! Every committed mutation publishes a [`ChangeEvent`] on the adapter's
//! broadcast feed so connected clients can refresh. Events fire only after
//! the transaction commits; a rolled-back write publishes nothing.
//!
//! ## Testing
//!
//! Tests run against unique shared in-memory `SQLite` databases, one per
//! adapter, so they are deterministic and need no external infrastructure.

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
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use time::OffsetDateTime;

use courtdesk::{State, TransitionResult};
use courtdesk_domain::{Booking, Court, Expense, Product, ScheduleGrid};
use courtdesk_ledger::{ActivityEntry, MonthlySummary};

mod data_models;
mod diesel_schema;
mod error;
mod feed;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use feed::{ChangeEvent, ChangeFeed, Collection};
pub use mutations::{BATCH_LIMIT, MaintenanceReport, PersistTransitionResult, RETENTION_DAYS};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID, so
/// tests are isolated without time-based collisions.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
///
/// The adapter owns the connection and the change feed. Callers drive it
/// through the typed API below; raw connections never escape.
pub struct Persistence {
    conn: SqliteConnection,
    feed: ChangeFeed,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            feed: ChangeFeed::default(),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn = sqlite::initialize_database(path_str)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            feed: ChangeFeed::default(),
        })
    }

    /// Returns a handle to the change feed for subscribing to committed
    /// mutations.
    #[must_use]
    pub const fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    // ========================================================================
    // State & Transitions
    // ========================================================================

    /// Loads the full operational state: schedule, courts, products and
    /// bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if any table cannot be read or a row cannot be
    /// mapped.
    pub fn load_state(&mut self) -> Result<State, PersistenceError> {
        queries::load_state(&mut self.conn)
    }

    /// Persists a state transition atomically and publishes the change.
    ///
    /// Booking and product rows that differ from `previous` are written,
    /// the transition's ledger entry is appended, and the feed announces
    /// both the changed collections and the new entry, in that order.
    ///
    /// # Arguments
    ///
    /// * `previous` - The state the transition was computed from
    /// * `result` - The transition result to persist
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::SlotConflict`] if a booking write loses
    /// the slot race, or a database error otherwise. Nothing is published
    /// on failure.
    pub fn persist_transition(
        &mut self,
        previous: &State,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        let outcome = mutations::persist_transition(&mut self.conn, previous, result)?;
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Bookings));
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Products));
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Ledger));
        let mut entry = result.entry.clone();
        entry.entry_id = Some(outcome.entry_id);
        self.feed.publish(ChangeEvent::EntryAppended(entry));
        Ok(outcome)
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Lists all bookings, cancelled ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings(&mut self) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_bookings(&mut self.conn)
    }

    /// Lists all bookings on one ISO calendar day.
    ///
    /// # Arguments
    ///
    /// * `day` - The day in `YYYY-MM-DD` form
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn bookings_for_day(&mut self, day: &str) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::bookings_for_day(&mut self.conn, day)
    }

    /// Retrieves one booking by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist.
    pub fn get_booking(&mut self, booking_id: i64) -> Result<Booking, PersistenceError> {
        queries::bookings::get_booking(&mut self.conn, booking_id)
    }

    /// Inserts one booking under the live-slot admission check and
    /// publishes the change.
    ///
    /// # Returns
    ///
    /// The booking ID assigned by the database.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::SlotConflict`] if another live booking
    /// holds the slot.
    pub fn reserve_slot(&mut self, booking: &Booking) -> Result<i64, PersistenceError> {
        let booking_id = mutations::reserve_slot(&mut self.conn, booking)?;
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Bookings));
        Ok(booking_id)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Lists all courts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_courts(&mut self) -> Result<Vec<Court>, PersistenceError> {
        queries::catalog::list_courts(&mut self.conn)
    }

    /// Inserts or updates a court and publishes the change.
    ///
    /// # Returns
    ///
    /// The court's database id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or an updated court does not
    /// exist.
    pub fn save_court(&mut self, court: &Court) -> Result<i64, PersistenceError> {
        let court_id = mutations::catalog::save_court(&mut self.conn, court)?;
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Courts));
        Ok(court_id)
    }

    /// Deletes a court and publishes the change. Fails while bookings
    /// still reference it.
    ///
    /// # Errors
    ///
    /// Returns an error if the court does not exist or is referenced.
    pub fn delete_court(&mut self, court_id: i64) -> Result<(), PersistenceError> {
        mutations::catalog::delete_court(&mut self.conn, court_id)?;
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Courts));
        Ok(())
    }

    /// Lists all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_products(&mut self) -> Result<Vec<Product>, PersistenceError> {
        queries::catalog::list_products(&mut self.conn)
    }

    /// Inserts or updates a product and publishes the change.
    ///
    /// # Returns
    ///
    /// The product's database id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or an updated product does not
    /// exist.
    pub fn save_product(&mut self, product: &Product) -> Result<i64, PersistenceError> {
        let product_id = mutations::catalog::save_product(&mut self.conn, product)?;
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Products));
        Ok(product_id)
    }

    /// Deletes a product and publishes the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist.
    pub fn delete_product(&mut self, product_id: i64) -> Result<(), PersistenceError> {
        mutations::catalog::delete_product(&mut self.conn, product_id)?;
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Products));
        Ok(())
    }

    /// Lists all expenses, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_expenses(&mut self) -> Result<Vec<Expense>, PersistenceError> {
        queries::catalog::list_expenses(&mut self.conn)
    }

    /// Records one expense and publishes the change.
    ///
    /// # Returns
    ///
    /// The expense's database id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_expense(&mut self, expense: &Expense) -> Result<i64, PersistenceError> {
        let expense_id = mutations::catalog::add_expense(&mut self.conn, expense)?;
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Expenses));
        Ok(expense_id)
    }

    /// Deletes one expense and publishes the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense does not exist.
    pub fn delete_expense(&mut self, expense_id: i64) -> Result<(), PersistenceError> {
        mutations::catalog::delete_expense(&mut self.conn, expense_id)?;
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Expenses));
        Ok(())
    }

    // ========================================================================
    // Schedule
    // ========================================================================

    /// Loads the opening-hours grid. A database with no stored schedule
    /// yields the fully-open default.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored JSON is corrupt.
    pub fn load_schedule(&mut self) -> Result<ScheduleGrid, PersistenceError> {
        queries::catalog::load_schedule(&mut self.conn)
    }

    /// Replaces the opening-hours grid and publishes the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid cannot be serialized or the write
    /// fails.
    pub fn save_schedule(&mut self, grid: &ScheduleGrid) -> Result<(), PersistenceError> {
        mutations::catalog::save_schedule(&mut self.conn, grid)?;
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Schedule));
        Ok(())
    }

    // ========================================================================
    // Ledger & Summaries
    // ========================================================================

    /// Lists all ledger entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_entries(&mut self) -> Result<Vec<ActivityEntry>, PersistenceError> {
        queries::ledger::list_entries(&mut self.conn)
    }

    /// Counts all ledger entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_entries(&mut self) -> Result<i64, PersistenceError> {
        queries::ledger::count_entries(&mut self.conn)
    }

    /// Appends one standalone ledger entry and publishes it.
    ///
    /// Transitions persist their own entry via [`Self::persist_transition`];
    /// this path is for system notes that have no state change attached.
    ///
    /// # Returns
    ///
    /// The entry ID assigned by the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn append_entry(&mut self, entry: &ActivityEntry) -> Result<i64, PersistenceError> {
        let entry_id = mutations::ledger::append_entry(&mut self.conn, entry)?;
        self.feed
            .publish(ChangeEvent::CollectionChanged(Collection::Ledger));
        let mut published = entry.clone();
        published.entry_id = Some(entry_id);
        self.feed.publish(ChangeEvent::EntryAppended(published));
        Ok(entry_id)
    }

    /// Lists all monthly summaries, newest month first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_summaries(&mut self) -> Result<Vec<MonthlySummary>, PersistenceError> {
        queries::summaries::list_summaries(&mut self.conn)
    }

    /// Runs one ledger compaction pass as of `now` and publishes the
    /// affected collections when anything was folded.
    ///
    /// # Errors
    ///
    /// Returns an error if the pass aborts or a database write fails; the
    /// ledger is left untouched in that case.
    pub fn run_maintenance(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<MaintenanceReport, PersistenceError> {
        let report = mutations::run_maintenance(&mut self.conn, now)?;
        if report.compacted_entries > 0 {
            self.feed
                .publish(ChangeEvent::CollectionChanged(Collection::Ledger));
            self.feed
                .publish(ChangeEvent::CollectionChanged(Collection::Summaries));
        }
        Ok(report)
    }
}
