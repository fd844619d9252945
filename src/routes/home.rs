use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Serialize;

use crate::db_interaction::cars::{get_brand_counts, get_new_arrivals, get_trending_cars, BrandCount};
use crate::models::CarSummary;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Serialize)]
pub struct HomePage{
    pub new_arrivals: Vec<CarSummary>,
    pub trending: Vec<CarSummary>,
    pub brands: Vec<BrandCount>
}

#[tracing::instrument(
    "Getting homepage sections",
    skip_all
)]
pub async fn home(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;
    let new_arrivals = get_new_arrivals(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;
    let trending = get_trending_cars(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;
    let brands = get_brand_counts(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(HomePage{new_arrivals, trending, brands}))
}
