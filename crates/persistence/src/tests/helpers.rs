// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared builders for persistence tests.

use std::str::FromStr;

use courtdesk_domain::{Booking, BookingStatus, Court, Product, SlotTime, parse_iso_date};
use courtdesk_ledger::{ActivityEntry, ActivityKind};

use crate::Persistence;

pub fn memory_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database should initialize")
}

pub fn seed_court(persistence: &mut Persistence) -> i64 {
    let court = Court::new("Court 1".to_string(), 150_00);
    persistence.save_court(&court).expect("court should save")
}

pub fn seed_product(persistence: &mut Persistence) -> i64 {
    let product = Product {
        product_id: None,
        name: "Water 500ml".to_string(),
        category: "Drinks".to_string(),
        price_cents: 2_00,
        stock: 24,
        low_stock_threshold: 3,
        image: None,
    };
    persistence
        .save_product(&product)
        .expect("product should save")
}

pub fn sample_booking(court_id: i64, day: &str, hour: u8) -> Booking {
    Booking {
        booking_id: None,
        court_id,
        date: parse_iso_date(day).expect("valid test date"),
        slot: SlotTime::on_the_hour(hour).expect("valid test hour"),
        duration_minutes: 60,
        customer_name: "Ana Torres".to_string(),
        customer_phone: "555-0101".to_string(),
        status: BookingStatus::Pending,
        method: None,
        price_cents: 150_00,
        recurring: false,
    }
}

pub fn sale_entry(timestamp: &str, amount_cents: i64) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::Sale,
        "Sale: 3x Water 500ml".to_string(),
        timestamp.to_string(),
        "front-desk".to_string(),
    )
    .with_amount(amount_cents)
    .with_method(
        courtdesk_domain::PaymentMethod::parse("Cash").expect("valid method"),
    )
}

pub fn booking_entry(timestamp: &str, amount_cents: i64) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::Booking,
        "Booking created: Ana Torres".to_string(),
        timestamp.to_string(),
        "front-desk".to_string(),
    )
    .with_amount(amount_cents)
}

pub fn shift_entry(timestamp: &str, amount_cents: i64) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::Shift,
        "Shift opened".to_string(),
        timestamp.to_string(),
        "front-desk".to_string(),
    )
    .with_amount(amount_cents)
}

pub fn system_entry(timestamp: &str) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::System,
        "Schedule updated".to_string(),
        timestamp.to_string(),
        "front-desk".to_string(),
    )
}

pub fn parse_slot(label: &str) -> SlotTime {
    SlotTime::from_str(label).expect("valid slot label")
}
