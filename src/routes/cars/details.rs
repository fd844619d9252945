use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};

use crate::db_interaction::cars::get_car_profile;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Getting car details",
    skip(pool)
)]
pub async fn car_details(
    pool: web::Data<DbPool>,
    path: web::Path<i32>
) -> Result<HttpResponse, actix_web::Error> {
    let car_id = path.into_inner();

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    match get_car_profile(conn, car_id)
        .await
        .map_err(ErrorInternalServerError)?
    {
        Some(profile) => Ok(HttpResponse::Ok().json(profile)),
        None => Err(ErrorNotFound(format!("No car with id {}", car_id)))
    }
}
