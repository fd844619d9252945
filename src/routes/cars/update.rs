use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};

use crate::db_interaction::cars::{update_car, CarWriteError};
use crate::routes::cars::post::CarForm;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Updating car listing",
    skip(pool, form)
)]
pub async fn update_car_listing(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    form: web::Json<CarForm>
) -> Result<HttpResponse, actix_web::Error> {
    let car_id = path.into_inner();

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    update_car(conn, car_id, form.0.car, form.0.images, form.0.features)
        .await
        .map_err(|e| match e {
            CarWriteError::NoCarIdError(_) => ErrorNotFound(format!("No car with id {}", car_id)),
            other => ErrorInternalServerError(other)
        })?;

    Ok(HttpResponse::Ok().finish())
}
