use actix_web::{error::{ErrorBadRequest, ErrorForbidden, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;

use crate::db_interaction::customers::{update_customer, CustomerUpdate, CustomerWriteError};
use crate::domain::CustomerPhone;
use crate::session_state::TypedSession;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct ProfileForm{
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub phone_number: String
}

#[tracing::instrument(
    "Updating customer profile",
    skip(pool, session, form)
)]
pub async fn update_profile(
    pool: web::Data<DbPool>,
    form: web::Form<ProfileForm>,
    session: TypedSession
) -> Result<HttpResponse, actix_web::Error> {
    let customer_id = session.get_customer_id()
        .ok()
        .flatten()
        .ok_or_else(|| ErrorForbidden("Not logged in"))?;

    let phone = CustomerPhone::parse(form.0.phone_number)
        .map_err(ErrorBadRequest)?;

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    update_customer(conn, customer_id, CustomerUpdate{
        first_name: form.0.first_name,
        last_name: form.0.last_name,
        address: form.0.address,
        phone_number: phone.inner()
    })
    .await
    .map_err(|e| match e {
        CustomerWriteError::NoCustomerIdError(_) => ErrorNotFound("Account no longer exists"),
        other => ErrorInternalServerError(other)
    })?;

    Ok(HttpResponse::Ok().finish())
}
