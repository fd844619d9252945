use actix_web::{error::{ErrorForbidden, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Serialize;

use crate::db_interaction::customers::{get_customer_profile, get_customer_transactions, CustomerProfile, TransactionHistoryEntry};
use crate::session_state::TypedSession;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Serialize)]
pub struct ProfilePage{
    pub profile: CustomerProfile,
    pub transactions: Vec<TransactionHistoryEntry>
}

#[tracing::instrument(
    "Getting customer profile page",
    skip(pool, session)
)]
pub async fn get_profile(
    pool: web::Data<DbPool>,
    session: TypedSession
) -> Result<HttpResponse, actix_web::Error> {
    let customer_id = session.get_customer_id()
        .ok()
        .flatten()
        .ok_or_else(|| ErrorForbidden("Not logged in"))?;

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    let profile = match get_customer_profile(conn, customer_id)
        .await
        .map_err(ErrorInternalServerError)?
    {
        Some(profile) => profile,
        // Session outlived the account
        None => return Err(ErrorNotFound("Account no longer exists"))
    };

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    let transactions = get_customer_transactions(conn, customer_id)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(ProfilePage{profile, transactions}))
}
