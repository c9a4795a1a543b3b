// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::schedule::{DAYS_PER_WEEK, HOURS_PER_DAY, ScheduleGrid};
use std::collections::BTreeMap;
use time::macros::date;

#[test]
fn test_keyed_map_round_trip_is_exact() {
    let mut grid: ScheduleGrid = ScheduleGrid::closed_all();
    // Open a scattering of cells across the week.
    grid.set_open(0, 8, true);
    grid.set_open(2, 14, true);
    grid.set_open(6, 22, true);

    let map: BTreeMap<String, Vec<bool>> = grid.to_keyed_map();
    assert_eq!(map.len(), DAYS_PER_WEEK);

    let decoded: ScheduleGrid = ScheduleGrid::from_keyed_map(&map);
    assert_eq!(decoded, grid);
}

#[test]
fn test_missing_day_key_decodes_to_all_closed_row() {
    let mut map: BTreeMap<String, Vec<bool>> = ScheduleGrid::open_all().to_keyed_map();
    map.remove("day3");

    let decoded: ScheduleGrid = ScheduleGrid::from_keyed_map(&map);
    let row: &Vec<bool> = &decoded.rows()[3];
    assert_eq!(row.len(), HOURS_PER_DAY, "default row must be full length");
    assert!(row.iter().all(|open| !open), "default row must be closed");

    // The other days survive untouched.
    assert!(decoded.rows()[0].iter().all(|open| *open));
}

#[test]
fn test_empty_weekday_row_fails_open() {
    let mut rows: Vec<Vec<bool>> = vec![vec![false; HOURS_PER_DAY]; DAYS_PER_WEEK];
    rows[4] = Vec::new();
    let grid: ScheduleGrid = ScheduleGrid::from_rows(rows);

    // Malformed (empty) weekday row: open all hours.
    for hour in 0..HOURS_PER_DAY {
        assert!(grid.is_open(4, hour));
    }
    // Intact rows keep their closed state.
    assert!(!grid.is_open(0, 12));
}

#[test]
fn test_is_open_on_resolves_weekday_from_date() {
    let mut grid: ScheduleGrid = ScheduleGrid::closed_all();
    // 2026-03-14 is a Saturday (weekday index 5).
    grid.set_open(5, 10, true);

    assert!(grid.is_open_on(date!(2026 - 03 - 14), 10));
    assert!(!grid.is_open_on(date!(2026 - 03 - 14), 11));
    assert!(!grid.is_open_on(date!(2026 - 03 - 13), 10));
}

#[test]
fn test_closed_cell_stays_closed() {
    let grid: ScheduleGrid = ScheduleGrid::closed_all();
    assert!(!grid.is_open(1, 9));
}
