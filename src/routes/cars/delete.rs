use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};

use crate::db_interaction::cars::{delete_car, CarWriteError};
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Deleting car listing",
    skip(pool)
)]
pub async fn delete_car_listing(
    pool: web::Data<DbPool>,
    path: web::Path<i32>
) -> Result<HttpResponse, actix_web::Error> {
    let car_id = path.into_inner();

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    delete_car(conn, car_id)
        .await
        .map_err(|e| match e {
            CarWriteError::NoCarIdError(_) => ErrorNotFound(format!("No car with id {}", car_id)),
            other => ErrorInternalServerError(other)
        })?;

    Ok(HttpResponse::Ok().finish())
}
