use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_interaction::customers::{insert_customer, CustomerStoreError};
use crate::domain::{CustomerEmail, CustomerPhone};
use crate::models::{CustomerRole, NewCustomer};
use crate::password::compute_password_hash;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct RegistrationForm{
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub password: SecretString,
    pub confirm_password: SecretString
}

#[derive(Serialize)]
pub struct RegistrationReceipt{
    pub customer_id: i32
}

#[derive(Error)]
pub enum RegisterError{
    #[error("the password and confirm passwords don't match")]
    PasswordNotMatching,
    #[error("{0}")]
    ValidationError(String),
    #[error("an account already exists under this email")]
    CustomerAlreadyExists(#[source] CustomerStoreError),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for RegisterError{
    fn status_code(&self) -> StatusCode {
        match self {
            RegisterError::PasswordNotMatching => StatusCode::BAD_REQUEST,
            RegisterError::ValidationError(_) => StatusCode::BAD_REQUEST,
            RegisterError::CustomerAlreadyExists(_) => StatusCode::CONFLICT,
            RegisterError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).body(format!("{}", self))
    }
}

// New accounts always start as plain users; staff roles are assigned
// directly in the database
#[tracing::instrument(
    "Customer registration started",
    skip(pool, form)
)]
pub async fn register(
    pool: web::Data<DbPool>,
    form: web::Form<RegistrationForm>
) -> Result<HttpResponse, actix_web::Error> {
    if form.password.expose_secret() != form.confirm_password.expose_secret(){
        return Err(RegisterError::PasswordNotMatching.into())
    }

    let email = CustomerEmail::parse(form.0.email)
        .map_err(RegisterError::ValidationError)?;
    let phone = CustomerPhone::parse(form.0.phone_number)
        .map_err(RegisterError::ValidationError)?;

    let password = form.0.password;
    let password_hash = spawn_blocking_with_tracing(move || {
        compute_password_hash(password)
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(RegisterError::UnexpectedError)?
    .map_err(RegisterError::UnexpectedError)?;

    let customer = NewCustomer{
        first_name: form.0.first_name,
        last_name: form.0.last_name,
        email: email.0,
        password_hash: password_hash.expose_secret().to_string(),
        address: form.0.address,
        role: CustomerRole::User.as_str().to_string()
    };

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(|e| RegisterError::UnexpectedError(e.into()))?;

    let customer_id = insert_customer(conn, customer, phone.inner())
        .await
        .map_err(|e| match e {
            CustomerStoreError::EmailNotUniqueError => RegisterError::CustomerAlreadyExists(e),
            other => RegisterError::UnexpectedError(other.into())
        })?;

    Ok(HttpResponse::Ok().json(RegistrationReceipt{customer_id}))
}
