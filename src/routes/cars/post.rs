use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db_interaction::cars::insert_car;
use crate::models::NewCar;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize)]
pub struct CarForm{
    #[serde(flatten)]
    pub car: NewCar,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>
}

#[derive(Serialize)]
pub struct CarCreated{
    pub car_id: i32
}

#[tracing::instrument(
    "Posting car listing",
    skip_all
)]
pub async fn post_car(
    pool: web::Data<DbPool>,
    form: web::Json<CarForm>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    let car_id = insert_car(conn, form.0.car, form.0.images, form.0.features)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(CarCreated{car_id}))
}
