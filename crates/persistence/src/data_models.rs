// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversions to and from domain values.
//!
//! Dates, slot times, statuses and methods are stored as their string
//! forms; offer rates and the schedule grid are stored as JSON columns.

use std::collections::BTreeMap;
use std::str::FromStr;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use courtdesk_domain::{
    Booking, BookingStatus, Court, Expense, ExpenseCategory, OfferRate, PaymentMethod, Product,
    ScheduleGrid, SlotTime, format_iso_date, parse_iso_date,
};
use courtdesk_ledger::{ActivityEntry, ActivityKind, MonthlySummary};

use crate::diesel_schema;
use crate::error::PersistenceError;

/// Serializable representation of an offer rate JSON column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferRateData {
    pub active: bool,
    pub price_cents: i64,
    pub label: String,
}

impl From<&OfferRate> for OfferRateData {
    fn from(offer: &OfferRate) -> Self {
        Self {
            active: offer.active,
            price_cents: offer.price_cents,
            label: offer.label.clone(),
        }
    }
}

impl From<OfferRateData> for OfferRate {
    fn from(data: OfferRateData) -> Self {
        Self {
            active: data.active,
            price_cents: data.price_cents,
            label: data.label,
        }
    }
}

fn offer_to_json(offer: Option<&OfferRate>) -> Result<Option<String>, PersistenceError> {
    offer
        .map(|offer| serde_json::to_string(&OfferRateData::from(offer)))
        .transpose()
        .map_err(Into::into)
}

fn offer_from_json(json: Option<&str>) -> Result<Option<OfferRate>, PersistenceError> {
    json.map(|json| serde_json::from_str::<OfferRateData>(json).map(OfferRate::from))
        .transpose()
        .map_err(Into::into)
}

#[derive(Debug, Clone, Queryable)]
pub struct CourtRow {
    pub court_id: i64,
    pub name: String,
    pub maintenance: i32,
    pub base_price_cents: i64,
    pub offer1_json: Option<String>,
    pub offer2_json: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = diesel_schema::courts)]
pub struct NewCourtRow {
    pub name: String,
    pub maintenance: i32,
    pub base_price_cents: i64,
    pub offer1_json: Option<String>,
    pub offer2_json: Option<String>,
}

impl NewCourtRow {
    /// Builds an insertable row from a domain court.
    ///
    /// # Errors
    ///
    /// Returns an error if an offer rate cannot be serialized.
    pub fn from_court(court: &Court) -> Result<Self, PersistenceError> {
        Ok(Self {
            name: court.name.clone(),
            maintenance: i32::from(court.maintenance),
            base_price_cents: court.base_price_cents,
            offer1_json: offer_to_json(court.offer1.as_ref())?,
            offer2_json: offer_to_json(court.offer2.as_ref())?,
        })
    }
}

impl TryFrom<CourtRow> for Court {
    type Error = PersistenceError;

    fn try_from(row: CourtRow) -> Result<Self, Self::Error> {
        Ok(Self {
            court_id: Some(row.court_id),
            name: row.name,
            maintenance: row.maintenance != 0,
            base_price_cents: row.base_price_cents,
            offer1: offer_from_json(row.offer1_json.as_deref())?,
            offer2: offer_from_json(row.offer2_json.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct BookingRow {
    pub booking_id: i64,
    pub court_id: i64,
    pub date: String,
    pub slot_time: String,
    pub duration_minutes: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub status: String,
    pub method: Option<String>,
    pub price_cents: i64,
    pub recurring: i32,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = diesel_schema::bookings)]
pub struct NewBookingRow {
    pub court_id: i64,
    pub date: String,
    pub slot_time: String,
    pub duration_minutes: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub status: String,
    pub method: Option<String>,
    pub price_cents: i64,
    pub recurring: i32,
}

impl NewBookingRow {
    /// Builds an insertable row from a domain booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking date cannot be formatted.
    pub fn from_booking(booking: &Booking) -> Result<Self, PersistenceError> {
        Ok(Self {
            court_id: booking.court_id,
            date: format_iso_date(booking.date)?,
            slot_time: booking.slot.label(),
            duration_minutes: i32::from(booking.duration_minutes),
            customer_name: booking.customer_name.clone(),
            customer_phone: booking.customer_phone.clone(),
            status: booking.status.as_str().to_string(),
            method: booking.method.map(|method| method.as_str().to_string()),
            price_cents: booking.price_cents,
            recurring: i32::from(booking.recurring),
        })
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let duration_minutes: u16 = u16::try_from(row.duration_minutes)
            .map_err(|_| PersistenceError::CorruptRecord(format!(
                "Booking {} has an invalid duration: {}",
                row.booking_id, row.duration_minutes
            )))?;
        Ok(Self {
            booking_id: Some(row.booking_id),
            court_id: row.court_id,
            date: parse_iso_date(&row.date)?,
            slot: SlotTime::from_str(&row.slot_time)?,
            duration_minutes,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            status: BookingStatus::from_str(&row.status)?,
            method: row
                .method
                .as_deref()
                .map(PaymentMethod::parse)
                .transpose()?,
            price_cents: row.price_cents,
            recurring: row.recurring != 0,
        })
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct ProductRow {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
    pub low_stock_threshold: i64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = diesel_schema::products)]
pub struct NewProductRow {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
    pub low_stock_threshold: i64,
    pub image: Option<String>,
}

impl From<&Product> for NewProductRow {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price_cents: product.price_cents,
            stock: product.stock,
            low_stock_threshold: product.low_stock_threshold,
            image: product.image.clone(),
        }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            product_id: Some(row.product_id),
            name: row.name,
            category: row.category,
            price_cents: row.price_cents,
            stock: row.stock,
            low_stock_threshold: row.low_stock_threshold,
            image: row.image,
        }
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct ExpenseRow {
    pub expense_id: i64,
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = diesel_schema::expenses)]
pub struct NewExpenseRow {
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount_cents: i64,
}

impl NewExpenseRow {
    /// Builds an insertable row from a domain expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense date cannot be formatted.
    pub fn from_expense(expense: &Expense) -> Result<Self, PersistenceError> {
        Ok(Self {
            date: format_iso_date(expense.date)?,
            category: expense.category.as_str().to_string(),
            description: expense.description.clone(),
            amount_cents: expense.amount_cents,
        })
    }
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = PersistenceError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            expense_id: Some(row.expense_id),
            date: parse_iso_date(&row.date)?,
            category: ExpenseCategory::parse(&row.category)?,
            description: row.description,
            amount_cents: row.amount_cents,
        })
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct ActivityRow {
    pub entry_id: i64,
    pub kind: String,
    pub description: String,
    pub timestamp: String,
    pub operator: String,
    pub amount_cents: Option<i64>,
    pub method: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = diesel_schema::activity_log)]
pub struct NewActivityRow {
    pub kind: String,
    pub description: String,
    pub timestamp: String,
    pub operator: String,
    pub amount_cents: Option<i64>,
    pub method: Option<String>,
}

impl From<&ActivityEntry> for NewActivityRow {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            kind: entry.kind.as_str().to_string(),
            description: entry.description.clone(),
            timestamp: entry.timestamp.clone(),
            operator: entry.operator.clone(),
            amount_cents: entry.amount_cents,
            method: entry.method.map(|method| method.as_str().to_string()),
        }
    }
}

impl TryFrom<ActivityRow> for ActivityEntry {
    type Error = PersistenceError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            entry_id: Some(row.entry_id),
            kind: ActivityKind::from_str(&row.kind)?,
            description: row.description,
            timestamp: row.timestamp,
            operator: row.operator,
            amount_cents: row.amount_cents,
            method: row
                .method
                .as_deref()
                .map(PaymentMethod::parse)
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = diesel_schema::monthly_summaries)]
pub struct SummaryRow {
    pub month_key: String,
    pub label: String,
    pub total_income_cents: i64,
    pub total_expenses_cents: i64,
    pub operation_count: i64,
    pub updated_at: String,
}

impl From<&MonthlySummary> for SummaryRow {
    fn from(summary: &MonthlySummary) -> Self {
        Self {
            month_key: summary.month_key.clone(),
            label: summary.label.clone(),
            total_income_cents: summary.total_income_cents,
            total_expenses_cents: summary.total_expenses_cents,
            operation_count: summary.operation_count,
            updated_at: summary.updated_at.clone(),
        }
    }
}

impl From<SummaryRow> for MonthlySummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            month_key: row.month_key,
            label: row.label,
            total_income_cents: row.total_income_cents,
            total_expenses_cents: row.total_expenses_cents,
            operation_count: row.operation_count,
            updated_at: row.updated_at,
        }
    }
}

/// The schedule singleton's fixed row id.
pub const SCHEDULE_ROW_ID: i64 = 1;

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = diesel_schema::schedule)]
pub struct ScheduleRow {
    pub id: i64,
    pub grid_json: String,
}

impl ScheduleRow {
    /// Encodes a grid into its singleton row.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid cannot be serialized.
    pub fn from_grid(grid: &ScheduleGrid) -> Result<Self, PersistenceError> {
        Ok(Self {
            id: SCHEDULE_ROW_ID,
            grid_json: serde_json::to_string(&grid.to_keyed_map())?,
        })
    }

    /// Decodes the stored grid. Missing day keys decode to all-closed
    /// rows per the wire format's defaulting rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON column cannot be parsed.
    pub fn to_grid(&self) -> Result<ScheduleGrid, PersistenceError> {
        let map: BTreeMap<String, Vec<bool>> = serde_json::from_str(&self.grid_json)?;
        Ok(ScheduleGrid::from_keyed_map(&map))
    }
}
