use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError}, web, HttpResponse};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::db_interaction::customers::{reset_password, verify_phone_last4, PasswordResetError};
use crate::domain::CustomerEmail;
use crate::password::compute_password_hash;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct ForgotPasswordForm{
    pub email: String,
    pub phone_last4: String,
    pub new_password: SecretString,
    pub confirm_password: SecretString
}

// Self-service reset gated on knowing the tail of a registered phone
// number. Unknown emails and wrong digits get the same rejection so the
// endpoint doesn't leak which accounts exist.
#[tracing::instrument(
    "Resetting forgotten password",
    skip(pool, form)
)]
pub async fn forgot_password(
    pool: web::Data<DbPool>,
    form: web::Form<ForgotPasswordForm>
) -> Result<HttpResponse, actix_web::Error> {
    if form.new_password.expose_secret() != form.confirm_password.expose_secret(){
        return Err(ErrorBadRequest("the password and confirm passwords don't match"))
    }

    let email = CustomerEmail::parse(form.0.email)
        .map_err(ErrorBadRequest)?;

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    let verified = verify_phone_last4(conn, email.0.clone(), form.0.phone_last4)
        .await
        .map_err(ErrorInternalServerError)?;

    if !verified {
        return Err(ErrorBadRequest("Could not verify identity"))
    }

    let password = form.0.new_password;
    let password_hash = spawn_blocking_with_tracing(move || {
        compute_password_hash(password)
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(ErrorInternalServerError)?
    .map_err(ErrorInternalServerError)?;

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    reset_password(conn, email.0, password_hash.expose_secret().to_string())
        .await
        .map_err(|e| match e {
            PasswordResetError::UnknownEmailError => ErrorBadRequest("Could not verify identity"),
            other => ErrorInternalServerError(other)
        })?;

    Ok(HttpResponse::Ok().body("Password has been reset"))
}
