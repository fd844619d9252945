use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::db_interaction::booking::{create_booking, BookingError, BookingRequest, TransactionType};
use crate::session_state::TypedSession;
use crate::utils::{error_fmt_chain, get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct BookingForm{
    pub car_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub payment_method: String,
    pub amount: BigDecimal
}

#[derive(Error)]
pub enum BookingApiError{
    #[error("{0}")]
    ValidationError(String),
    #[error("car is no longer available for the selected dates")]
    NoLongerAvailable(#[source] BookingError),
    #[error("not logged in")]
    NotLoggedIn,
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for BookingApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for BookingApiError{
    fn status_code(&self) -> StatusCode {
        match self {
            BookingApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            BookingApiError::NoLongerAvailable(_) => StatusCode::CONFLICT,
            BookingApiError::NotLoggedIn => StatusCode::FORBIDDEN,
            BookingApiError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).body(format!("{}", self))
    }
}

// Validation happens before the transaction is entered; the availability
// race itself is handled inside create_booking
#[tracing::instrument(
    "Posting booking",
    skip(pool, session, form)
)]
pub async fn post_booking(
    pool: web::Data<DbPool>,
    form: web::Json<BookingForm>,
    session: TypedSession
) -> Result<HttpResponse, actix_web::Error> {
    let customer_id = session.get_customer_id()
        .ok()
        .flatten()
        .ok_or(BookingApiError::NotLoggedIn)?;

    if form.amount <= BigDecimal::from(0) {
        return Err(BookingApiError::ValidationError(
            "amount must be greater than zero".to_string()
        ).into())
    }

    if form.transaction_type == TransactionType::Rent && form.end_date <= form.start_date {
        return Err(BookingApiError::ValidationError(
            "end_date must be after start_date".to_string()
        ).into())
    }

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(|e| BookingApiError::UnexpectedError(e.into()))?;

    let receipt = create_booking(conn, BookingRequest{
        customer_id,
        car_id: form.0.car_id,
        start_date: form.0.start_date,
        end_date: form.0.end_date,
        transaction_type: form.0.transaction_type,
        payment_method: form.0.payment_method,
        amount: form.0.amount
    })
    .await
    .map_err(|e| match e {
        BookingError::NoLongerAvailable => BookingApiError::NoLongerAvailable(e),
        other => BookingApiError::UnexpectedError(other.into())
    })?;

    Ok(HttpResponse::Ok().json(receipt))
}
