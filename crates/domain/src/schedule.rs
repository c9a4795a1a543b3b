// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The club-wide opening-hours grid.
//!
//! The grid is a per-weekday, per-hour boolean matrix consulted by the
//! availability engine. It is persisted as a keyed map (`day0`..`day6`,
//! each a 24-length boolean array) and held in memory as an ordered
//! array-of-arrays. The two directions must round-trip exactly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// Days in the grid. `day0` is Monday.
pub const DAYS_PER_WEEK: usize = 7;

/// Hours in each day row.
pub const HOURS_PER_DAY: usize = 24;

/// The weekday×hour open/closed matrix.
///
/// Rows are weekday-indexed (Monday = 0); columns are hours of the day.
/// An *empty* row is a malformed-grid marker and is treated as open all
/// hours by [`ScheduleGrid::is_open`] (fail-open). This is distinct from
/// the wire-decoding default for a *missing* day key, which is a full
/// 24-length all-closed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleGrid {
    /// One row per weekday, Monday first.
    days: Vec<Vec<bool>>,
}

impl ScheduleGrid {
    /// Creates a grid that is open every hour of every day.
    #[must_use]
    pub fn open_all() -> Self {
        Self {
            days: vec![vec![true; HOURS_PER_DAY]; DAYS_PER_WEEK],
        }
    }

    /// Creates a grid that is closed every hour of every day.
    #[must_use]
    pub fn closed_all() -> Self {
        Self {
            days: vec![vec![false; HOURS_PER_DAY]; DAYS_PER_WEEK],
        }
    }

    /// Creates a grid from explicit rows. Rows are used as given; short or
    /// empty rows are permitted and resolve through the fail-open rule.
    #[must_use]
    pub const fn from_rows(days: Vec<Vec<bool>>) -> Self {
        Self { days }
    }

    /// Returns the weekday index (Monday = 0) for a date.
    #[must_use]
    pub const fn weekday_index(date: Date) -> usize {
        date.weekday().number_days_from_monday() as usize
    }

    /// Returns whether the club is open at the given weekday and hour.
    ///
    /// A missing or empty weekday row defaults to open all hours. This
    /// fail-open default is deliberate and safety-relevant: a malformed
    /// schedule must widen availability, never silently close the club.
    #[must_use]
    pub fn is_open(&self, weekday: usize, hour: usize) -> bool {
        match self.days.get(weekday) {
            None => true,
            Some(row) if row.is_empty() => true,
            Some(row) => row.get(hour).copied().unwrap_or(true),
        }
    }

    /// Returns whether the club is open at the given date and hour.
    #[must_use]
    pub fn is_open_on(&self, date: Date, hour: usize) -> bool {
        self.is_open(Self::weekday_index(date), hour)
    }

    /// Sets a single weekday/hour cell, growing the row to 24 entries if
    /// required.
    pub fn set_open(&mut self, weekday: usize, hour: usize, open: bool) {
        if weekday >= DAYS_PER_WEEK || hour >= HOURS_PER_DAY {
            return;
        }
        while self.days.len() < DAYS_PER_WEEK {
            self.days.push(vec![false; HOURS_PER_DAY]);
        }
        let row = &mut self.days[weekday];
        if row.len() < HOURS_PER_DAY {
            row.resize(HOURS_PER_DAY, false);
        }
        row[hour] = open;
    }

    /// Serializes the grid to its storage encoding: a keyed map
    /// `day0`..`day6`, each holding the weekday's hour array.
    #[must_use]
    pub fn to_keyed_map(&self) -> BTreeMap<String, Vec<bool>> {
        let mut map: BTreeMap<String, Vec<bool>> = BTreeMap::new();
        for (index, row) in self.days.iter().enumerate().take(DAYS_PER_WEEK) {
            map.insert(format!("day{index}"), row.clone());
        }
        map
    }

    /// Deserializes the grid from its storage encoding.
    ///
    /// A missing day key decodes to a 24-length all-closed row. This is an
    /// explicit default, never an error: partial maps produced by older
    /// writers must always read back.
    #[must_use]
    pub fn from_keyed_map(map: &BTreeMap<String, Vec<bool>>) -> Self {
        let days: Vec<Vec<bool>> = (0..DAYS_PER_WEEK)
            .map(|index| {
                map.get(&format!("day{index}"))
                    .cloned()
                    .unwrap_or_else(|| vec![false; HOURS_PER_DAY])
            })
            .collect();
        Self { days }
    }

    /// Returns the raw rows, Monday first.
    #[must_use]
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.days
    }
}

impl Default for ScheduleGrid {
    fn default() -> Self {
        Self::open_all()
    }
}
