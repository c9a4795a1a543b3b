// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! All mutations use Diesel DSL; multi-row invariants (slot reservation,
//! transition persistence, compaction) run inside a single transaction.
//!
//! ## Module Organization
//!
//! - `bookings` — slot reservation and transition persistence
//! - `catalog` — courts, products, expenses and the schedule singleton
//! - `ledger` — activity ledger appends
//! - `maintenance` — compaction of old ledger entries into summaries

pub mod bookings;
pub mod catalog;
pub mod ledger;
pub mod maintenance;

pub use bookings::{PersistTransitionResult, persist_transition, reserve_slot};
pub use maintenance::{BATCH_LIMIT, MaintenanceReport, RETENTION_DAYS, run_maintenance};
