// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use courtdesk::{
    Command, CoreError, GridSlot, SaleLine, TransitionResult, apply, day_grid,
    day_over_day_change, historical_totals, ledger_revenue, live_booking_revenue,
    operation_count, revenue_by_method, weekly_revenue,
};
use courtdesk_domain::{
    Booking, BookingStatus, Court, DomainError, Expense, ExpenseCategory, OfferRate,
    PaymentMethod, Product, ScheduleGrid, SlotTime, format_iso_date, parse_iso_date,
};
use courtdesk_ledger::{ActivityEntry, ActivityKind, MonthlySummary, now_timestamp};
use courtdesk_persistence::{
    MaintenanceReport, Persistence, PersistenceError, PersistTransitionResult,
};

use crate::payment::{DisabledPaymentLinks, PaymentLinkError, PaymentLinkProvider};

mod live;
mod payment;

/// `CourtDesk` Server - HTTP server for the padel club management system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence adapter behind a mutex for safe concurrent access.
    persistence: Arc<Mutex<Persistence>>,
    /// The payment link provider. External; its failures never touch
    /// local state.
    payment_links: Arc<dyn PaymentLinkProvider>,
}

// ============================================================================
// Request / Response types
// ============================================================================

/// API request for creating or editing a booking.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct BookingRequest {
    /// The operator performing this action.
    operator: String,
    /// The court to book.
    court_id: i64,
    /// The calendar date (`YYYY-MM-DD`).
    date: String,
    /// The slot start time (`HH:MM`).
    slot: String,
    /// Duration in minutes.
    duration_minutes: u16,
    /// The customer's name.
    customer_name: String,
    /// The customer's phone number.
    customer_phone: String,
    /// Initial status; defaults to Pending.
    #[serde(default)]
    status: Option<String>,
    /// Optional payment method.
    #[serde(default)]
    method: Option<String>,
    /// The agreed price in cents.
    price_cents: i64,
    /// Whether the booking recurs weekly.
    #[serde(default)]
    recurring: bool,
}

/// Serializable representation of a booking for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookingResponse {
    /// The booking id.
    booking_id: Option<i64>,
    /// The booked court.
    court_id: i64,
    /// The calendar date (`YYYY-MM-DD`).
    date: String,
    /// The slot start time (`HH:MM`).
    slot: String,
    /// Duration in minutes.
    duration_minutes: u16,
    /// The customer's name.
    customer_name: String,
    /// The customer's phone number.
    customer_phone: String,
    /// The lifecycle status.
    status: String,
    /// The payment method, if set.
    method: Option<String>,
    /// The agreed price in cents.
    price_cents: i64,
    /// Whether the booking recurs weekly.
    recurring: bool,
}

/// API request carrying only the acting operator.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct OperatorRequest {
    /// The operator performing this action.
    operator: String,
}

/// API request for setting or clearing a booking's payment method.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SetMethodRequest {
    /// The operator performing this action.
    operator: String,
    /// The payment method, or `null` to clear it.
    method: Option<String>,
}

/// One line of a counter sale.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SaleLineRequest {
    /// The product sold.
    product_id: i64,
    /// Units sold.
    quantity: i64,
}

/// API request for recording a counter sale.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SaleRequest {
    /// The operator performing this action.
    operator: String,
    /// The payment method.
    method: String,
    /// The sale lines.
    lines: Vec<SaleLineRequest>,
}

/// API request for a manual stock adjustment.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct StockAdjustRequest {
    /// The operator performing this action.
    operator: String,
    /// Signed stock delta.
    delta: i64,
}

/// API request for opening the cash register.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct OpenShiftRequest {
    /// The operator performing this action.
    operator: String,
    /// The opening float in cents.
    opening_float_cents: i64,
}

/// API request for closing the cash register.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CloseShiftRequest {
    /// The operator performing this action.
    operator: String,
    /// The counted drawer total in cents.
    counted_cents: i64,
}

/// API request for creating or updating a court.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CourtRequest {
    /// The court id; absent for creation.
    #[serde(default)]
    court_id: Option<i64>,
    /// The display name.
    name: String,
    /// Whether the court is under maintenance.
    #[serde(default)]
    maintenance: bool,
    /// The base price per slot in cents.
    base_price_cents: i64,
    /// First optional offer.
    #[serde(default)]
    offer1: Option<OfferRateBody>,
    /// Second optional offer.
    #[serde(default)]
    offer2: Option<OfferRateBody>,
}

/// Wire representation of an offer rate.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct OfferRateBody {
    /// Whether this offer is active.
    active: bool,
    /// The discounted price in cents.
    price_cents: i64,
    /// A human-readable label.
    label: String,
}

/// API request for creating or updating a product.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ProductRequest {
    /// The product id; absent for creation.
    #[serde(default)]
    product_id: Option<i64>,
    /// The product name.
    name: String,
    /// Free-text category.
    category: String,
    /// Unit price in cents.
    price_cents: i64,
    /// Units in stock.
    stock: i64,
    /// Low-stock warning threshold.
    low_stock_threshold: i64,
    /// Optional image reference.
    #[serde(default)]
    image: Option<String>,
}

/// Serializable representation of a product for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductResponse {
    /// The product id.
    product_id: Option<i64>,
    /// The product name.
    name: String,
    /// Free-text category.
    category: String,
    /// Unit price in cents.
    price_cents: i64,
    /// Units in stock.
    stock: i64,
    /// Low-stock warning threshold.
    low_stock_threshold: i64,
    /// Derived low-stock flag.
    low_stock: bool,
    /// Optional image reference.
    image: Option<String>,
}

/// API request for recording an expense.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ExpenseRequest {
    /// The calendar date (`YYYY-MM-DD`).
    date: String,
    /// The expense category.
    category: String,
    /// Free-text description.
    description: String,
    /// The amount in cents.
    amount_cents: i64,
}

/// Serializable representation of an expense for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExpenseResponse {
    /// The expense id.
    expense_id: Option<i64>,
    /// The calendar date (`YYYY-MM-DD`).
    date: String,
    /// The expense category.
    category: String,
    /// Free-text description.
    description: String,
    /// The amount in cents.
    amount_cents: i64,
}

/// API request for replacing the opening-hours grid.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ScheduleUpdateRequest {
    /// The operator performing this action.
    operator: String,
    /// The keyed grid: `day0`..`day6` to 24-length boolean arrays.
    days: BTreeMap<String, Vec<bool>>,
}

/// One cell of the public availability grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GridSlotResponse {
    /// The court id.
    court_id: i64,
    /// The court name.
    court_name: String,
    /// The slot start time (`HH:MM`).
    slot: String,
    /// The effective price in cents.
    price_cents: i64,
    /// Whether the slot can be booked.
    available: bool,
}

/// Per-method revenue split.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MethodBreakdownResponse {
    /// Cash revenue in cents.
    cash_cents: i64,
    /// QR revenue in cents.
    qr_cents: i64,
    /// Transfer revenue in cents.
    transfer_cents: i64,
}

/// One day of the weekly revenue series.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DayRevenueResponse {
    /// The day (`YYYY-MM-DD`).
    day: String,
    /// Revenue in cents.
    revenue_cents: i64,
}

/// API response for the dashboard aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DashboardResponse {
    /// The day the cards describe.
    date: String,
    /// Live booking revenue for the day, in cents.
    live_revenue_cents: i64,
    /// Rounded percent change against the previous day.
    day_over_day_percent: i64,
    /// Seven-day revenue series ending on `date`.
    weekly: Vec<DayRevenueResponse>,
    /// Per-method split of the day's ledger income.
    methods: MethodBreakdownResponse,
    /// Names of products at or below their low-stock threshold.
    low_stock: Vec<String>,
}

/// API response for the cashbox view.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CashboxResponse {
    /// The day the view describes.
    date: String,
    /// Ledger income for the day, in cents.
    income_cents: i64,
    /// Number of ledger operations on the day.
    operation_count: i64,
    /// Per-method split of the day's ledger income.
    methods: MethodBreakdownResponse,
}

/// API response for all-time totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistoryResponse {
    /// Income in cents, live ledger plus compacted summaries.
    income_cents: i64,
    /// Expenses in cents.
    expense_cents: i64,
    /// Total operation count.
    operation_count: i64,
}

/// Serializable representation of a ledger entry for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryResponse {
    /// The entry id.
    entry_id: Option<i64>,
    /// The entry kind.
    kind: String,
    /// Human-readable description.
    description: String,
    /// ISO-8601 timestamp.
    timestamp: String,
    /// The acting operator.
    operator: String,
    /// The amount in cents, if the entry carries one.
    amount_cents: Option<i64>,
    /// The payment method, if set.
    method: Option<String>,
}

/// Serializable representation of a monthly summary for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SummaryResponse {
    /// The month key (`YYYY-MM`).
    month_key: String,
    /// Human-readable label.
    label: String,
    /// Compacted income in cents.
    total_income_cents: i64,
    /// Compacted expenses in cents.
    total_expenses_cents: i64,
    /// Compacted operation count.
    operation_count: i64,
    /// Last compaction timestamp.
    updated_at: String,
}

/// API response for a maintenance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MaintenanceResponse {
    /// Success indicator.
    success: bool,
    /// The cutoff timestamp used.
    cutoff: String,
    /// Entries folded and deleted.
    compacted_entries: usize,
    /// Distinct months written.
    months_touched: usize,
    /// Whether the batch limit was hit.
    batch_full: bool,
}

/// API response for write operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// The ledger entry logged for this operation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    entry_id: Option<i64>,
    /// The id of a created booking, if the operation created one.
    #[serde(skip_serializing_if = "Option::is_none")]
    booking_id: Option<i64>,
    /// The id of a created record (court, product, expense), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    record_id: Option<i64>,
}

/// Query parameters selecting a day.
#[derive(Debug, Deserialize)]
struct DayQuery {
    /// The day (`YYYY-MM-DD`).
    date: String,
}

/// Query parameters optionally selecting a day.
#[derive(Debug, Deserialize)]
struct OptionalDayQuery {
    /// The day (`YYYY-MM-DD`).
    date: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        let status = match err {
            DomainError::CourtNotFound(_)
            | DomainError::BookingNotFound(_)
            | DomainError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::SlotUnavailable { .. }
            | DomainError::InvalidStatusTransition { .. }
            | DomainError::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(domain) => Self::from(domain),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::SlotConflict { .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            PersistenceError::NotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            other => {
                error!(error = %other, "Persistence error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: format!("Persistence error: {other}"),
                }
            }
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

fn booking_from_request(request: &BookingRequest) -> Result<Booking, HttpError> {
    let status = match request.status.as_deref() {
        Some(status) => BookingStatus::from_str(status)?,
        None => BookingStatus::default(),
    };
    Ok(Booking {
        booking_id: None,
        court_id: request.court_id,
        date: parse_iso_date(&request.date)?,
        slot: SlotTime::from_str(&request.slot)?,
        duration_minutes: request.duration_minutes,
        customer_name: request.customer_name.clone(),
        customer_phone: request.customer_phone.clone(),
        status,
        method: request
            .method
            .as_deref()
            .map(PaymentMethod::parse)
            .transpose()?,
        price_cents: request.price_cents,
        recurring: request.recurring,
    })
}

fn booking_to_response(booking: &Booking) -> Result<BookingResponse, HttpError> {
    Ok(BookingResponse {
        booking_id: booking.booking_id,
        court_id: booking.court_id,
        date: format_iso_date(booking.date)?,
        slot: booking.slot.label(),
        duration_minutes: booking.duration_minutes,
        customer_name: booking.customer_name.clone(),
        customer_phone: booking.customer_phone.clone(),
        status: booking.status.as_str().to_string(),
        method: booking.method.map(|method| method.as_str().to_string()),
        price_cents: booking.price_cents,
        recurring: booking.recurring,
    })
}

fn product_to_response(product: &Product) -> ProductResponse {
    ProductResponse {
        product_id: product.product_id,
        name: product.name.clone(),
        category: product.category.clone(),
        price_cents: product.price_cents,
        stock: product.stock,
        low_stock_threshold: product.low_stock_threshold,
        low_stock: product.is_low_stock(),
        image: product.image.clone(),
    }
}

fn expense_to_response(expense: &Expense) -> Result<ExpenseResponse, HttpError> {
    Ok(ExpenseResponse {
        expense_id: expense.expense_id,
        date: format_iso_date(expense.date)?,
        category: expense.category.as_str().to_string(),
        description: expense.description.clone(),
        amount_cents: expense.amount_cents,
    })
}

fn entry_to_response(entry: &ActivityEntry) -> EntryResponse {
    EntryResponse {
        entry_id: entry.entry_id,
        kind: entry.kind.as_str().to_string(),
        description: entry.description.clone(),
        timestamp: entry.timestamp.clone(),
        operator: entry.operator.clone(),
        amount_cents: entry.amount_cents,
        method: entry.method.map(|method| method.as_str().to_string()),
    }
}

fn summary_to_response(summary: &MonthlySummary) -> SummaryResponse {
    SummaryResponse {
        month_key: summary.month_key.clone(),
        label: summary.label.clone(),
        total_income_cents: summary.total_income_cents,
        total_expenses_cents: summary.total_expenses_cents,
        operation_count: summary.operation_count,
        updated_at: summary.updated_at.clone(),
    }
}

fn offer_from_body(body: Option<&OfferRateBody>) -> Option<OfferRate> {
    body.map(|offer| OfferRate {
        active: offer.active,
        price_cents: offer.price_cents,
        label: offer.label.clone(),
    })
}

fn current_timestamp() -> Result<String, HttpError> {
    now_timestamp().map_err(|e| HttpError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: format!("Clock error: {e}"),
    })
}

/// Runs one command through the pure core and persists the result.
///
/// The state is read, the transition computed and persisted atomically,
/// all under one lock acquisition so no other writer interleaves.
async fn execute_command(
    app_state: &AppState,
    command: Command,
    operator: &str,
) -> Result<(TransitionResult, PersistTransitionResult), HttpError> {
    let timestamp = current_timestamp()?;
    let mut persistence = app_state.persistence.lock().await;
    let state = persistence.load_state()?;
    let result = apply(&state, command, operator, timestamp)?;
    let outcome = persistence.persist_transition(&state, &result)?;
    drop(persistence);
    Ok((result, outcome))
}

// ============================================================================
// Availability & bookings
// ============================================================================

/// Handler for GET `/availability` endpoint.
///
/// Returns the public hourly booking grid for one day.
async fn handle_availability(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<Vec<GridSlotResponse>>, HttpError> {
    let date = parse_iso_date(&query.date)?;

    let mut persistence = app_state.persistence.lock().await;
    let state = persistence.load_state()?;
    drop(persistence);

    let grid: Vec<GridSlot> = day_grid(&state.schedule, &state.courts, &state.bookings, date);
    let cells = grid
        .into_iter()
        .map(|cell| GridSlotResponse {
            court_id: cell.court_id,
            court_name: cell.court_name,
            slot: cell.slot.label(),
            price_cents: cell.price_cents,
            available: cell.available,
        })
        .collect();

    Ok(Json(cells))
}

/// Handler for GET `/bookings` endpoint.
///
/// Lists bookings, optionally restricted to one day.
async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<OptionalDayQuery>,
) -> Result<Json<Vec<BookingResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let bookings = match &query.date {
        Some(day) => persistence.bookings_for_day(day)?,
        None => persistence.list_bookings()?,
    };
    drop(persistence);

    let response: Result<Vec<BookingResponse>, HttpError> =
        bookings.iter().map(booking_to_response).collect();
    Ok(Json(response?))
}

/// Handler for POST `/bookings` endpoint.
///
/// Creates a booking, subject to schedule and slot admission.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        operator = %request.operator,
        court_id = request.court_id,
        date = %request.date,
        slot = %request.slot,
        "Handling create_booking request"
    );

    let booking = booking_from_request(&request)?;
    let (_, outcome) = execute_command(
        &app_state,
        Command::CreateBooking { booking },
        &request.operator,
    )
    .await?;

    info!(
        booking_id = ?outcome.booking_id,
        entry_id = outcome.entry_id,
        "Successfully created booking"
    );

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Booked {} at {}", request.date, request.slot)),
        entry_id: Some(outcome.entry_id),
        booking_id: outcome.booking_id,
        record_id: None,
    }))
}

/// Handler for POST `/bookings/{booking_id}/confirm` endpoint.
///
/// Confirms a pending booking. Only Pending bookings may be confirmed.
async fn handle_confirm_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
    Json(request): Json<OperatorRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(booking_id, operator = %request.operator, "Handling confirm_booking request");

    let (_, outcome) = execute_command(
        &app_state,
        Command::ConfirmBooking { booking_id },
        &request.operator,
    )
    .await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Booking {booking_id} confirmed")),
        entry_id: Some(outcome.entry_id),
        booking_id: None,
        record_id: None,
    }))
}

/// Handler for POST `/bookings/{booking_id}/cancel` endpoint.
///
/// Cancels a booking. The record stays; the slot is released.
async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
    Json(request): Json<OperatorRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(booking_id, operator = %request.operator, "Handling cancel_booking request");

    let (_, outcome) = execute_command(
        &app_state,
        Command::CancelBooking { booking_id },
        &request.operator,
    )
    .await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Booking {booking_id} cancelled")),
        entry_id: Some(outcome.entry_id),
        booking_id: None,
        record_id: None,
    }))
}

/// Handler for POST `/bookings/{booking_id}/method` endpoint.
///
/// Sets or clears the booking's payment method. Status is unchanged.
async fn handle_set_payment_method(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
    Json(request): Json<SetMethodRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let method = request
        .method
        .as_deref()
        .map(PaymentMethod::parse)
        .transpose()?;
    let (_, outcome) = execute_command(
        &app_state,
        Command::SetPaymentMethod { booking_id, method },
        &request.operator,
    )
    .await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Booking {booking_id} updated")),
        entry_id: Some(outcome.entry_id),
        booking_id: None,
        record_id: None,
    }))
}

/// Handler for POST `/bookings/{booking_id}/recurring` endpoint.
///
/// Flips the booking's weekly-recurring flag.
async fn handle_toggle_recurring(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
    Json(request): Json<OperatorRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (_, outcome) = execute_command(
        &app_state,
        Command::ToggleRecurring { booking_id },
        &request.operator,
    )
    .await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Booking {booking_id} updated")),
        entry_id: Some(outcome.entry_id),
        booking_id: None,
        record_id: None,
    }))
}

/// Handler for PUT `/bookings/{booking_id}` endpoint.
///
/// Replaces the booking record wholesale. The ledger is never
/// retro-corrected by an edit.
async fn handle_edit_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(booking_id, operator = %request.operator, "Handling edit_booking request");

    let booking = booking_from_request(&request)?;
    let (_, outcome) = execute_command(
        &app_state,
        Command::EditBooking {
            booking_id,
            booking,
        },
        &request.operator,
    )
    .await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Booking {booking_id} updated")),
        entry_id: Some(outcome.entry_id),
        booking_id: None,
        record_id: None,
    }))
}

/// Handler for POST `/bookings/{booking_id}/payment_link` endpoint.
///
/// Asks the external provider for a payment link. Provider failures
/// surface as errors; nothing local changes either way.
async fn handle_payment_link(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<payment::PaymentLink>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let booking = persistence.get_booking(booking_id)?;
    drop(persistence);

    let link = app_state
        .payment_links
        .create_link(&booking)
        .map_err(|e: PaymentLinkError| HttpError {
            status: StatusCode::BAD_GATEWAY,
            message: e.to_string(),
        })?;

    Ok(Json(link))
}

// ============================================================================
// Catalog
// ============================================================================

/// Handler for GET `/courts` endpoint.
async fn handle_list_courts(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<Court>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let courts = persistence.list_courts()?;
    drop(persistence);
    Ok(Json(courts))
}

/// Handler for POST `/courts` endpoint.
///
/// Creates a court, or updates one when the request carries an id.
async fn handle_save_court(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<CourtRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let court = Court {
        court_id: request.court_id,
        name: request.name.clone(),
        maintenance: request.maintenance,
        base_price_cents: request.base_price_cents,
        offer1: offer_from_body(request.offer1.as_ref()),
        offer2: offer_from_body(request.offer2.as_ref()),
    };

    let mut persistence = app_state.persistence.lock().await;
    let court_id = persistence.save_court(&court)?;
    drop(persistence);

    info!(court_id, name = %request.name, "Saved court");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Saved court '{}'", request.name)),
        entry_id: None,
        booking_id: None,
        record_id: Some(court_id),
    }))
}

/// Handler for DELETE `/courts/{court_id}` endpoint.
async fn handle_delete_court(
    AxumState(app_state): AxumState<AppState>,
    Path(court_id): Path<i64>,
) -> Result<Json<WriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    persistence.delete_court(court_id)?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Deleted court {court_id}")),
        entry_id: None,
        booking_id: None,
        record_id: None,
    }))
}

/// Handler for GET `/products` endpoint.
async fn handle_list_products(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<ProductResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let products = persistence.list_products()?;
    drop(persistence);
    Ok(Json(products.iter().map(product_to_response).collect()))
}

/// Handler for POST `/products` endpoint.
///
/// Creates a product, or updates one when the request carries an id.
async fn handle_save_product(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let product = Product {
        product_id: request.product_id,
        name: request.name.clone(),
        category: request.category.clone(),
        price_cents: request.price_cents,
        stock: request.stock,
        low_stock_threshold: request.low_stock_threshold,
        image: request.image.clone(),
    };
    courtdesk_domain::validate_product_fields(&product)?;

    let mut persistence = app_state.persistence.lock().await;
    let product_id = persistence.save_product(&product)?;
    drop(persistence);

    info!(product_id, name = %request.name, "Saved product");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Saved product '{}'", request.name)),
        entry_id: None,
        booking_id: None,
        record_id: Some(product_id),
    }))
}

/// Handler for DELETE `/products/{product_id}` endpoint.
async fn handle_delete_product(
    AxumState(app_state): AxumState<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<WriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    persistence.delete_product(product_id)?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Deleted product {product_id}")),
        entry_id: None,
        booking_id: None,
        record_id: None,
    }))
}

// ============================================================================
// Sales, stock & shifts
// ============================================================================

/// Handler for POST `/sales` endpoint.
///
/// Records a counter sale: stock is decremented and one Sale entry with
/// the total amount lands on the ledger.
async fn handle_record_sale(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<SaleRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        operator = %request.operator,
        lines = request.lines.len(),
        method = %request.method,
        "Handling record_sale request"
    );

    let method = PaymentMethod::parse(&request.method)?;
    let lines = request
        .lines
        .iter()
        .map(|line| SaleLine {
            product_id: line.product_id,
            quantity: line.quantity,
        })
        .collect();

    let (result, outcome) = execute_command(
        &app_state,
        Command::RecordSale { lines, method },
        &request.operator,
    )
    .await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.entry.description),
        entry_id: Some(outcome.entry_id),
        booking_id: None,
        record_id: None,
    }))
}

/// Handler for POST `/stock/{product_id}` endpoint.
///
/// Applies a signed manual stock adjustment.
async fn handle_adjust_stock(
    AxumState(app_state): AxumState<AppState>,
    Path(product_id): Path<i64>,
    Json(request): Json<StockAdjustRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (result, outcome) = execute_command(
        &app_state,
        Command::AdjustStock {
            product_id,
            delta: request.delta,
        },
        &request.operator,
    )
    .await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.entry.description),
        entry_id: Some(outcome.entry_id),
        booking_id: None,
        record_id: None,
    }))
}

/// Handler for POST `/shifts/open` endpoint.
async fn handle_open_shift(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<OpenShiftRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (_, outcome) = execute_command(
        &app_state,
        Command::OpenShift {
            opening_float_cents: request.opening_float_cents,
        },
        &request.operator,
    )
    .await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("Shift opened")),
        entry_id: Some(outcome.entry_id),
        booking_id: None,
        record_id: None,
    }))
}

/// Handler for POST `/shifts/close` endpoint.
async fn handle_close_shift(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<CloseShiftRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (_, outcome) = execute_command(
        &app_state,
        Command::CloseShift {
            counted_cents: request.counted_cents,
        },
        &request.operator,
    )
    .await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("Shift closed")),
        entry_id: Some(outcome.entry_id),
        booking_id: None,
        record_id: None,
    }))
}

// ============================================================================
// Expenses & schedule
// ============================================================================

/// Handler for GET `/expenses` endpoint.
async fn handle_list_expenses(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<ExpenseResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let expenses = persistence.list_expenses()?;
    drop(persistence);

    let response: Result<Vec<ExpenseResponse>, HttpError> =
        expenses.iter().map(expense_to_response).collect();
    Ok(Json(response?))
}

/// Handler for POST `/expenses` endpoint.
async fn handle_add_expense(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<ExpenseRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let expense = Expense {
        expense_id: None,
        date: parse_iso_date(&request.date)?,
        category: ExpenseCategory::parse(&request.category)?,
        description: request.description.clone(),
        amount_cents: request.amount_cents,
    };
    courtdesk_domain::validate_expense_fields(&expense)?;

    let mut persistence = app_state.persistence.lock().await;
    let expense_id = persistence.add_expense(&expense)?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Recorded expense '{}'", request.description)),
        entry_id: None,
        booking_id: None,
        record_id: Some(expense_id),
    }))
}

/// Handler for DELETE `/expenses/{expense_id}` endpoint.
async fn handle_delete_expense(
    AxumState(app_state): AxumState<AppState>,
    Path(expense_id): Path<i64>,
) -> Result<Json<WriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    persistence.delete_expense(expense_id)?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Deleted expense {expense_id}")),
        entry_id: None,
        booking_id: None,
        record_id: None,
    }))
}

/// Handler for GET `/schedule` endpoint.
///
/// Returns the opening-hours grid in its keyed-map wire form.
async fn handle_get_schedule(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<BTreeMap<String, Vec<bool>>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let grid = persistence.load_schedule()?;
    drop(persistence);
    Ok(Json(grid.to_keyed_map()))
}

/// Handler for PUT `/schedule` endpoint.
///
/// Replaces the opening-hours grid and logs a System entry.
async fn handle_put_schedule(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<ScheduleUpdateRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(operator = %request.operator, "Handling schedule update");

    let grid = ScheduleGrid::from_keyed_map(&request.days);
    let entry = ActivityEntry::new(
        ActivityKind::System,
        String::from("Schedule updated"),
        current_timestamp()?,
        request.operator.clone(),
    );

    let mut persistence = app_state.persistence.lock().await;
    persistence.save_schedule(&grid)?;
    let entry_id = persistence.append_entry(&entry)?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("Schedule updated")),
        entry_id: Some(entry_id),
        booking_id: None,
        record_id: None,
    }))
}

// ============================================================================
// Aggregates, ledger & maintenance
// ============================================================================

fn method_breakdown_response(
    entries: &[ActivityEntry],
    day: &str,
) -> MethodBreakdownResponse {
    let breakdown = revenue_by_method(entries, day);
    MethodBreakdownResponse {
        cash_cents: breakdown.cash_cents,
        qr_cents: breakdown.qr_cents,
        transfer_cents: breakdown.transfer_cents,
    }
}

/// Handler for GET `/dashboard` endpoint.
///
/// Returns the operator dashboard cards for one day: live booking
/// revenue, day-over-day change, the weekly series, the per-method
/// split and low-stock warnings.
async fn handle_dashboard(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DashboardResponse>, HttpError> {
    let date = parse_iso_date(&query.date)?;

    let mut persistence = app_state.persistence.lock().await;
    let bookings = persistence.list_bookings()?;
    let products = persistence.list_products()?;
    let entries = persistence.list_entries()?;
    drop(persistence);

    let live_today = live_booking_revenue(&bookings, date);
    let live_yesterday = date
        .previous_day()
        .map_or(0, |yesterday| live_booking_revenue(&bookings, yesterday));

    let weekly = weekly_revenue(&bookings, &entries, date)?
        .into_iter()
        .map(|day| DayRevenueResponse {
            day: day.day,
            revenue_cents: day.revenue_cents,
        })
        .collect();

    let low_stock = products
        .iter()
        .filter(|product| product.is_low_stock())
        .map(|product| product.name.clone())
        .collect();

    Ok(Json(DashboardResponse {
        date: query.date.clone(),
        live_revenue_cents: live_today,
        day_over_day_percent: day_over_day_change(live_today, live_yesterday),
        weekly,
        methods: method_breakdown_response(&entries, &query.date),
        low_stock,
    }))
}

/// Handler for GET `/cashbox` endpoint.
///
/// Returns the day's ledger income and operation count. This is the
/// ledger-based view, deliberately distinct from the dashboard's
/// live-booking revenue.
async fn handle_cashbox(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<CashboxResponse>, HttpError> {
    // Validates the date format even though partitioning is by string.
    parse_iso_date(&query.date)?;

    let mut persistence = app_state.persistence.lock().await;
    let entries = persistence.list_entries()?;
    drop(persistence);

    Ok(Json(CashboxResponse {
        date: query.date.clone(),
        income_cents: ledger_revenue(&entries, &query.date),
        operation_count: operation_count(&entries, &query.date),
        methods: method_breakdown_response(&entries, &query.date),
    }))
}

/// Handler for GET `/history` endpoint.
///
/// Returns all-time totals across the live ledger and the compacted
/// summaries.
async fn handle_history(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<HistoryResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let entries = persistence.list_entries()?;
    let expenses = persistence.list_expenses()?;
    let summaries = persistence.list_summaries()?;
    drop(persistence);

    let totals = historical_totals(&entries, &expenses, &summaries);
    Ok(Json(HistoryResponse {
        income_cents: totals.income_cents,
        expense_cents: totals.expense_cents,
        operation_count: totals.operation_count,
    }))
}

/// Handler for GET `/ledger` endpoint.
async fn handle_list_ledger(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<EntryResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let entries = persistence.list_entries()?;
    drop(persistence);
    Ok(Json(entries.iter().map(entry_to_response).collect()))
}

/// Handler for GET `/summaries` endpoint.
async fn handle_list_summaries(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<SummaryResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let summaries = persistence.list_summaries()?;
    drop(persistence);
    Ok(Json(summaries.iter().map(summary_to_response).collect()))
}

/// Handler for POST `/maintenance` endpoint.
///
/// Runs one ledger compaction pass and reports what it did. This is the
/// only awaited, success-or-failure-reporting maintenance operation.
async fn handle_run_maintenance(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<MaintenanceResponse>, HttpError> {
    info!("Handling maintenance request");

    let mut persistence = app_state.persistence.lock().await;
    let report: MaintenanceReport =
        persistence.run_maintenance(time::OffsetDateTime::now_utc())?;
    drop(persistence);

    info!(
        compacted = report.compacted_entries,
        months = report.months_touched,
        "Maintenance run complete"
    );

    Ok(Json(MaintenanceResponse {
        success: true,
        cutoff: report.cutoff,
        compacted_entries: report.compacted_entries,
        months_touched: report.months_touched,
        batch_full: report.batch_full,
    }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/availability", get(handle_availability))
        .route("/bookings", get(handle_list_bookings))
        .route("/bookings", post(handle_create_booking))
        .route("/bookings/{booking_id}", put(handle_edit_booking))
        .route("/bookings/{booking_id}/confirm", post(handle_confirm_booking))
        .route("/bookings/{booking_id}/cancel", post(handle_cancel_booking))
        .route("/bookings/{booking_id}/method", post(handle_set_payment_method))
        .route(
            "/bookings/{booking_id}/recurring",
            post(handle_toggle_recurring),
        )
        .route(
            "/bookings/{booking_id}/payment_link",
            post(handle_payment_link),
        )
        .route("/courts", get(handle_list_courts))
        .route("/courts", post(handle_save_court))
        .route("/courts/{court_id}", delete(handle_delete_court))
        .route("/products", get(handle_list_products))
        .route("/products", post(handle_save_product))
        .route("/products/{product_id}", delete(handle_delete_product))
        .route("/sales", post(handle_record_sale))
        .route("/stock/{product_id}", post(handle_adjust_stock))
        .route("/shifts/open", post(handle_open_shift))
        .route("/shifts/close", post(handle_close_shift))
        .route("/expenses", get(handle_list_expenses))
        .route("/expenses", post(handle_add_expense))
        .route("/expenses/{expense_id}", delete(handle_delete_expense))
        .route("/schedule", get(handle_get_schedule))
        .route("/schedule", put(handle_put_schedule))
        .route("/dashboard", get(handle_dashboard))
        .route("/cashbox", get(handle_cashbox))
        .route("/history", get(handle_history))
        .route("/ledger", get(handle_list_ledger))
        .route("/summaries", get(handle_list_summaries))
        .route("/maintenance", post(handle_run_maintenance))
        .route("/live", get(live::live_stream_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing CourtDesk Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        payment_links: Arc::new(DisabledPaymentLinks),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
