use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError}, web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::db_interaction::cars::{count_cars_filtered, get_cars_filtered, CarFilter, CarSort};
use crate::models::CarSummary;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct GalleryQuery{
    pub brand: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub sort: Option<String>
}

#[derive(Serialize)]
pub struct GalleryPage{
    pub cars: Vec<CarSummary>,
    pub total: i64
}

fn parse_sort(sort: Option<&str>) -> Result<CarSort, String> {
    match sort {
        None | Some("newest") => Ok(CarSort::Newest),
        Some("price_asc") => Ok(CarSort::PriceAsc),
        Some("price_desc") => Ok(CarSort::PriceDesc),
        Some(other) => Err(format!("{} is not a valid sort order", other))
    }
}

#[tracing::instrument(
    "Getting car gallery",
    skip(pool)
)]
pub async fn get_cars(
    pool: web::Data<DbPool>,
    query: web::Query<GalleryQuery>
) -> Result<HttpResponse, actix_web::Error> {
    let sort = parse_sort(query.sort.as_deref())
        .map_err(ErrorBadRequest)?;

    let filter = CarFilter{
        brand: query.brand.clone(),
        min_price: query.min_price.clone(),
        max_price: query.max_price.clone(),
        sort
    };

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;
    let cars = get_cars_filtered(conn, filter)
        .await
        .map_err(ErrorInternalServerError)?;

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;
    let total = count_cars_filtered(
        conn,
        query.0.brand,
        query.0.min_price,
        query.0.max_price
    )
    .await
    .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(GalleryPage{cars, total}))
}
