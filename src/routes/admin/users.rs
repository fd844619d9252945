use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;

use crate::db_interaction::customers::{delete_customer, get_all_customers, update_customer, CustomerUpdate, CustomerWriteError};
use crate::domain::CustomerPhone;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Getting all customers",
    skip_all
)]
pub async fn get_users(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    let customers = get_all_customers(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(customers))
}

#[derive(Deserialize, Debug)]
pub struct UserUpdateForm{
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub phone_number: String
}

#[tracing::instrument(
    "Updating customer as staff",
    skip(pool, form)
)]
pub async fn update_user(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    form: web::Form<UserUpdateForm>
) -> Result<HttpResponse, actix_web::Error> {
    let customer_id = path.into_inner();

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
        CustomerWriteError::NoCustomerIdError(_) => {
            ErrorNotFound(format!("No customer with id {}", customer_id))
        }
        other => ErrorInternalServerError(other)
    })?;

    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(
    "Deleting customer as staff",
    skip(pool)
)]
pub async fn delete_user(
    pool: web::Data<DbPool>,
    path: web::Path<i32>
) -> Result<HttpResponse, actix_web::Error> {
    let customer_id = path.into_inner();

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    delete_customer(conn, customer_id)
        .await
        .map_err(|e| match e {
            CustomerWriteError::NoCustomerIdError(_) => {
                ErrorNotFound(format!("No customer with id {}", customer_id))
            }
            other => ErrorInternalServerError(other)
        })?;

    Ok(HttpResponse::Ok().finish())
}
