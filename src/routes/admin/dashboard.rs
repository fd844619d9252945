use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::db_interaction::dashboard::get_dashboard_data;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Getting admin dashboard",
    skip_all
)]
pub async fn dashboard(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let counters_conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;
    let activities_conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;
    let transactions_conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    let data = get_dashboard_data(counters_conn, activities_conn, transactions_conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(data))
}
