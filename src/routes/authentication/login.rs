use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError, ErrorUnauthorized}, web, HttpResponse};
use anyhow::Context;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::db_interaction::customers::get_customer_by_email;
use crate::domain::CustomerEmail;
use crate::models::CustomerRole;
use crate::password::verify_password;
use crate::session_state::TypedSession;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct LoginForm{
    pub email: String,
    pub password: SecretString
}

#[derive(Serialize)]
pub struct LoginReceipt{
    pub customer_id: i32,
    pub role: CustomerRole
}

#[tracing::instrument(
    "Logging in customer",
    skip(pool, session, form)
)]
pub async fn login(
    pool: web::Data<DbPool>,
    form: web::Form<LoginForm>,
    session: TypedSession
) -> Result<HttpResponse, actix_web::Error> {
    let email = CustomerEmail::parse(form.0.email)
        .map_err(ErrorBadRequest)?;

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    // Unknown email and wrong password collapse into the same response
    let customer = match get_customer_by_email(conn, email.0)
        .await
        .map_err(ErrorInternalServerError)?
    {
        Some(customer) => customer,
        None => return Err(ErrorUnauthorized("Email or password is incorrect"))
    };

    let verified = verify_password(form.0.password, customer.password_hash.clone())
        .await
        .map_err(ErrorInternalServerError)?;

    if !verified {
        tracing::info!("Passwords did not match");
        return Err(ErrorUnauthorized("Email or password is incorrect"))
    }

    let role = CustomerRole::parse(&customer.role)
        .map_err(|e| ErrorInternalServerError(anyhow::anyhow!(e)))?;

    session.renew();
    session.insert_customer_id(customer.customer_id)
        .context("Failed to insert customer_id into session")
        .map_err(ErrorInternalServerError)?;
    session.insert_role(role)
        .context("Failed to insert role into session")
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(LoginReceipt{customer_id: customer.customer_id, role}))
}
