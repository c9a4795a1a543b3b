// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use courtdesk_domain::{Booking, Court, Product, ScheduleGrid};
use courtdesk_ledger::ActivityEntry;

/// The club's complete operational state.
///
/// State is immutable from the perspective of [`crate::apply`]: a command
/// either yields a whole new state plus its ledger entry, or fails with
/// no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// The club-wide opening-hours grid.
    pub schedule: ScheduleGrid,
    /// All courts, including those under maintenance.
    pub courts: Vec<Court>,
    /// The product catalogue.
    pub products: Vec<Product>,
    /// All bookings, cancelled ones included.
    pub bookings: Vec<Booking>,
}

impl State {
    /// Creates an empty state with an all-open schedule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schedule: ScheduleGrid::open_all(),
            courts: Vec::new(),
            products: Vec::new(),
            bookings: Vec::new(),
        }
    }

    /// Finds a court by id.
    #[must_use]
    pub fn court(&self, court_id: i64) -> Option<&Court> {
        self.courts
            .iter()
            .find(|court| court.court_id == Some(court_id))
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects. Every transition carries exactly one ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// The ledger entry recording this transition.
    pub entry: ActivityEntry,
}
