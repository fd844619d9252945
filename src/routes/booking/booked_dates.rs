use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::db_interaction::booking::get_booked_dates;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Getting booked dates for car",
    skip(pool)
)]
pub async fn booked_dates(
    pool: web::Data<DbPool>,
    path: web::Path<i32>
) -> Result<HttpResponse, actix_web::Error> {
    let car_id = path.into_inner();

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    let ranges = get_booked_dates(conn, car_id)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(ranges))
}
