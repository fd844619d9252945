use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::db_interaction::booking::{rental_cost, rental_days};
use crate::db_interaction::cars::get_monthly_installment;
use crate::routes::booking::availability::DateRangeQuery;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Serialize)]
pub struct RentalQuote{
    pub days: i64,
    pub total_cost: BigDecimal
}

// Price preview only; nothing is reserved here
#[tracing::instrument(
    "Quoting rental cost for car",
    skip(pool)
)]
pub async fn quote(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    query: web::Query<DateRangeQuery>
) -> Result<HttpResponse, actix_web::Error> {
    let car_id = path.into_inner();

    if query.end_date < query.start_date {
        return Err(ErrorBadRequest("end_date must not be before start_date"))
    }

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    let installment = match get_monthly_installment(conn, car_id)
        .await
        .map_err(ErrorInternalServerError)?
    {
        Some(installment) => installment,
        None => return Err(ErrorNotFound(format!("No car with id {}", car_id)))
    };

    Ok(HttpResponse::Ok().json(RentalQuote{
        days: rental_days(query.start_date, query.end_date),
        total_cost: rental_cost(&installment, query.start_date, query.end_date)
    }))
}
