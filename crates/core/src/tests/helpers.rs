// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::State;
use courtdesk_domain::{Booking, BookingStatus, Court, Product, SlotTime};
use time::Date;
use time::macros::date;

pub const TEST_DAY: Date = date!(2026 - 03 - 14);

pub fn test_operator() -> String {
    String::from("front-desk")
}

pub fn test_timestamp() -> String {
    String::from("2026-03-14T10:00:00Z")
}

pub fn test_court(court_id: i64, name: &str) -> Court {
    let mut court: Court = Court::new(name.to_string(), 150_00);
    court.court_id = Some(court_id);
    court
}

pub fn test_product(product_id: i64, name: &str, price_cents: i64, stock: i64) -> Product {
    Product {
        product_id: Some(product_id),
        name: name.to_string(),
        category: String::from("Drinks"),
        price_cents,
        stock,
        low_stock_threshold: 3,
        image: None,
    }
}

pub fn test_booking(booking_id: Option<i64>, court_id: i64, hour: u8) -> Booking {
    Booking {
        booking_id,
        court_id,
        date: TEST_DAY,
        slot: SlotTime::on_the_hour(hour).unwrap(),
        duration_minutes: 60,
        customer_name: String::from("Ana Torres"),
        customer_phone: String::from("555-0101"),
        status: BookingStatus::Pending,
        method: None,
        price_cents: 150_00,
        recurring: false,
    }
}

/// One court, one product, no bookings, schedule open all hours.
pub fn test_state() -> State {
    let mut state: State = State::new();
    state.courts.push(test_court(1, "Court 1"));
    state.products.push(test_product(10, "Water 500ml", 2_00, 24));
    state
}
