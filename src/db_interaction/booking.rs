use std::{error::Error, fmt::Debug};

use anyhow::Context;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::prelude::Queryable;
use diesel::{Connection, ExpressionMethods, PgConnection, QueryDsl, QueryResult, RunQueryDsl};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_interaction::logs;
use crate::models::{NewActivityLogEntry, NewPayment, NewRentalLink, NewReservation, NewTransactionLogEntry};
use crate::schema::{cars, customers, payments, reservations};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

pub const CONFIRMED_STATUS: &str = "Confirmed";
pub const COMPLETED_STATUS: &str = "Completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType{
    Rent,
    Buy
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str{
        match self {
            TransactionType::Rent => "Rent",
            TransactionType::Buy => "Buy"
        }
    }
}

/// Whether a requested date range collides with an existing confirmed one.
///
/// Inclusive bounds, three clauses: the requested start falls inside the
/// existing range, the requested end falls inside it, or the existing start
/// falls inside the requested range. There is deliberately no fourth
/// "existing end inside requested" clause; callers depend on exactly this
/// check, so do not swap in a textbook symmetric interval test. See the
/// unit tests for where the two would differ.
pub fn range_conflicts(
    requested: (NaiveDate, NaiveDate),
    existing: (NaiveDate, NaiveDate)
) -> bool {
    let (start, end) = requested;
    let (existing_start, existing_end) = existing;

    (start >= existing_start && start <= existing_end)
        || (end >= existing_start && end <= existing_end)
        || (existing_start >= start && existing_start <= end)
}

// Day difference between the two dates; zero and negative spans are passed
// through untouched, callers validate ordering where they care
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

// days * (monthly_installment / 30)
pub fn rental_cost(monthly_installment: &BigDecimal, start: NaiveDate, end: NaiveDate) -> BigDecimal {
    let daily_rate = monthly_installment.clone() / BigDecimal::from(30);
    daily_rate * BigDecimal::from(rental_days(start, end))
}

#[derive(Serialize, Debug)]
pub struct AvailabilityResult{
    pub available: bool,
    pub message: String
}

fn confirmed_ranges(
    conn: &mut PgConnection,
    car_id: i32
) -> QueryResult<Vec<(NaiveDate, NaiveDate)>> {
    reservations::table
        .filter(reservations::car_id.eq(car_id))
        .filter(reservations::status.eq(CONFIRMED_STATUS))
        .select((reservations::start_date, reservations::end_date))
        .load::<(NaiveDate, NaiveDate)>(conn)
}

fn conflicts_with_confirmed(
    conn: &mut PgConnection,
    car_id: i32,
    start: NaiveDate,
    end: NaiveDate
) -> QueryResult<bool> {
    let ranges = confirmed_ranges(conn, car_id)?;
    Ok(ranges.into_iter().any(|existing| range_conflicts((start, end), existing)))
}

/// Availability check against confirmed reservations. Fails closed: a
/// storage error reports the car as not available instead of surfacing an
/// exception, so a double-booking is never silently permitted.
#[tracing::instrument(
    "Checking car availability",
    skip(conn)
)]
pub async fn check_availability(
    mut conn: DbConnection,
    car_id: i32,
    start: NaiveDate,
    end: NaiveDate
) -> AvailabilityResult {
    let outcome = spawn_blocking_with_tracing(move || {
        conflicts_with_confirmed(&mut conn, car_id, start, end)
    })
    .await;

    match outcome {
        Ok(Ok(false)) => AvailabilityResult{
            available: true,
            message: "Car is available for the selected dates".to_string()
        },
        Ok(Ok(true)) => AvailabilityResult{
            available: false,
            message: "Car is not available for the selected dates".to_string()
        },
        Ok(Err(e)) => {
            tracing::error!("Failed to check availability: {:?}", e);
            AvailabilityResult{
                available: false,
                message: "Could not verify availability, please try again".to_string()
            }
        },
        Err(e) => {
            tracing::error!("Failed due to threadpool error: {:?}", e);
            AvailabilityResult{
                available: false,
                message: "Could not verify availability, please try again".to_string()
            }
        }
    }
}

#[derive(Queryable, Serialize)]
pub struct DateRange{
    pub start_date: NaiveDate,
    pub end_date: NaiveDate
}

// Confirmed ranges for the rental calendar
#[tracing::instrument(
    "Getting booked dates for car",
    skip(conn)
)]
pub async fn get_booked_dates(
    mut conn: DbConnection,
    car_id: i32
) -> Result<Vec<DateRange>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        reservations::table
            .filter(reservations::car_id.eq(car_id))
            .filter(reservations::status.eq(CONFIRMED_STATUS))
            .order(reservations::start_date.asc())
            .select((reservations::start_date, reservations::end_date))
            .load::<DateRange>(&mut conn)
            .context("Failed to load booked dates")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Debug, Clone)]
pub struct BookingRequest{
    pub customer_id: i32,
    pub car_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub payment_method: String,
    pub amount: BigDecimal
}

// Which of the may-degrade steps actually landed, alongside the ids
#[derive(Serialize, Debug)]
pub struct BookingReceipt{
    pub reservation_id: i32,
    pub payment_id: i32,
    pub reservation_recorded: bool,
    pub link_recorded: bool
}

#[derive(Error)]
pub enum BookingError{
    #[error("car is no longer available for the selected dates")]
    NoLongerAvailable,
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to complete booking")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

enum BookingTxError{
    Conflict,
    Query(diesel::result::Error)
}

impl From<diesel::result::Error> for BookingTxError {
    fn from(e: diesel::result::Error) -> Self {
        BookingTxError::Query(e)
    }
}

/// The booking transaction. Runs serializable so that the availability
/// re-check and the inserts commute with concurrent bookings; two
/// overlapping rentals cannot both pass the check and both commit.
///
/// The reservation row and the buying/renting link are may-degrade steps:
/// each runs under a savepoint and a failure is logged and absorbed, the
/// booking carries on with the corresponding receipt flag cleared. The
/// payment insert is the must-succeed step; its failure rolls back the
/// whole transaction. Audit rows are written after commit and never undo
/// a booking that already went through.
#[tracing::instrument(
    "Creating reservation and payment",
    skip(conn, request)
)]
pub async fn create_booking(
    mut conn: DbConnection,
    request: BookingRequest
) -> Result<BookingReceipt, BookingError> {
    let receipt = spawn_blocking_with_tracing(move || {
        let tx_result = conn.build_transaction()
            .serializable()
            .run(|conn| -> Result<BookingReceipt, BookingTxError> {
                if request.transaction_type == TransactionType::Rent
                    && conflicts_with_confirmed(conn, request.car_id, request.start_date, request.end_date)?
                {
                    return Err(BookingTxError::Conflict)
                }

                // Savepoint: a failure here must not poison the outer
                // transaction
                let reservation_id = match conn.transaction::<i32, diesel::result::Error, _>(|conn| {
                    diesel::insert_into(reservations::table)
                        .values(NewReservation{
                            customer_id: request.customer_id,
                            car_id: request.car_id,
                            start_date: request.start_date,
                            end_date: request.end_date,
                            status: CONFIRMED_STATUS.to_string()
                        })
                        .returning(reservations::reservation_id)
                        .get_result(conn)
                }) {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::warn!("Failed to record reservation row, continuing with payment: {:?}", e);
                        0
                    }
                };

                let link_recorded = match conn.transaction::<_, diesel::result::Error, _>(|conn| {
                    diesel::insert_into(crate::schema::buying_renting::table)
                        .values(NewRentalLink{
                            customer_id: request.customer_id,
                            car_id: request.car_id,
                            transaction_type: request.transaction_type.as_str().to_string()
                        })
                        .execute(conn)
                }) {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::warn!("Failed to record buying/renting link, continuing with payment: {:?}", e);
                        false
                    }
                };

                let payment_id = diesel::insert_into(payments::table)
                    .values(NewPayment{
                        customer_id: request.customer_id,
                        method: request.payment_method.clone(),
                        status: COMPLETED_STATUS.to_string(),
                        amount: request.amount.clone()
                    })
                    .returning(payments::payment_id)
                    .get_result(conn)?;

                Ok(BookingReceipt{
                    reservation_id,
                    payment_id,
                    reservation_recorded: reservation_id != 0,
                    link_recorded
                })
            });

        match tx_result {
            Ok(receipt) => {
                write_audit_trail(&mut conn, &request, &receipt);
                Ok(receipt)
            },
            Err(BookingTxError::Conflict) => Err(BookingError::NoLongerAvailable),
            Err(BookingTxError::Query(e)) => {
                Err(anyhow::Error::from(e)
                    .context("Failed to run booking transaction")
                    .into())
            }
        }
    })
    .await??;

    Ok(receipt)
}

// Post-commit audit rows; every step here is best-effort since the booking
// has already committed
fn write_audit_trail(
    conn: &mut DbConnection,
    request: &BookingRequest,
    receipt: &BookingReceipt
) {
    let customer_name = customers::table
        .find(request.customer_id)
        .select((customers::first_name, customers::last_name))
        .get_result::<(String, String)>(conn)
        .map(|(first, last)| format!("{} {}", first, last))
        .unwrap_or_else(|_| format!("Customer #{}", request.customer_id));

    let car_name = cars::table
        .find(request.car_id)
        .select(cars::car_name)
        .get_result::<String>(conn)
        .ok();

    if let Err(e) = logs::record_transaction(conn, NewTransactionLogEntry{
        payment_id: receipt.payment_id,
        customer_name,
        car_name,
        amount: request.amount.clone(),
        status: COMPLETED_STATUS.to_string()
    }) {
        tracing::warn!("Failed to write transaction log entry: {:?}", e);
    }

    let (action, description) = match request.transaction_type {
        TransactionType::Rent => (
            "Rental Started",
            format!("Car rented from {} to {}", request.start_date, request.end_date)
        ),
        TransactionType::Buy => (
            "Purchase Completed",
            format!("Car #{} purchased", request.car_id)
        )
    };

    if let Err(e) = logs::record_activity(conn, NewActivityLogEntry{
        action: action.to_string(),
        description,
        kind: "success".to_string()
    }) {
        tracing::warn!("Failed to write activity log entry: {:?}", e);
    }
}
