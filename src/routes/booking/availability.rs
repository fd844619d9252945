use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db_interaction::booking::check_availability;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct DateRangeQuery{
    pub start_date: NaiveDate,
    pub end_date: NaiveDate
}

// The check itself fails closed, so the only error surfaced here is not
// being able to reach the pool at all
#[tracing::instrument(
    "Checking availability for car",
    skip(pool)
)]
pub async fn availability(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    query: web::Query<DateRangeQuery>
) -> Result<HttpResponse, actix_web::Error> {
    let car_id = path.into_inner();

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    let result = check_availability(conn, car_id, query.start_date, query.end_date).await;

    Ok(HttpResponse::Ok().json(result))
}
