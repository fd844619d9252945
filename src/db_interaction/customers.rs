use std::{error::Error, fmt::Debug};

use anyhow::Context;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::{
    result::DatabaseErrorKind, Connection, ExpressionMethods, JoinOnDsl,
    NullableExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Customer, NewCustomer, NewPhoneNumber};
use crate::schema::{
    buying_renting, cars, complaints, customer_phone_numbers, customers, payments, reservations,
};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

#[derive(Error)]
pub enum CustomerStoreError{
    #[error("Email is already registered")]
    EmailNotUniqueError,
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for CustomerStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Relies on the unique index on customers.email rather than a prior
// existence check
#[tracing::instrument(
    "Inserting customer with phone number",
    skip_all
)]
pub async fn insert_customer(
    mut conn: DbConnection,
    customer: NewCustomer,
    phone_number: String
) -> Result<i32, CustomerStoreError> {
    let customer_id = spawn_blocking_with_tracing(move || {
        conn.transaction::<i32, diesel::result::Error, _>(|conn| {
            let customer_id = diesel::insert_into(customers::table)
                .values(&customer)
                .returning(customers::customer_id)
                .get_result::<i32>(conn)?;

            diesel::insert_into(customer_phone_numbers::table)
                .values(NewPhoneNumber{customer_id, phone_number})
                .execute(conn)?;

            Ok(customer_id)
        })
    })
    .await?
    .map_err(|e| match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CustomerStoreError::EmailNotUniqueError
        }
        other => CustomerStoreError::RunQueryError(other)
    })?;

    Ok(customer_id)
}

#[tracing::instrument(
    "Getting customer by email",
    skip_all
)]
pub async fn get_customer_by_email(
    mut conn: DbConnection,
    email: String
) -> Result<Option<Customer>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        customers::table
            .filter(customers::email.eq(email))
            .get_result::<Customer>(&mut conn)
            .optional()
            .context("Failed to load customer")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Serialize)]
pub struct CustomerProfile{
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Option<String>,
    pub role: String,
    pub phone_numbers: Vec<String>
}

#[tracing::instrument(
    "Getting customer profile",
    skip(conn)
)]
pub async fn get_customer_profile(
    mut conn: DbConnection,
    customer_id: i32
) -> Result<Option<CustomerProfile>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || -> Result<Option<CustomerProfile>, anyhow::Error> {
        let customer = customers::table
            .find(customer_id)
            .get_result::<Customer>(&mut conn)
            .optional()
            .context("Failed to load customer")?;

        let customer = match customer {
            Some(customer) => customer,
            None => return Ok(None)
        };

        let phone_numbers = customer_phone_numbers::table
            .filter(customer_phone_numbers::customer_id.eq(customer_id))
            .select(customer_phone_numbers::phone_number)
            .load::<String>(&mut conn)
            .context("Failed to load phone numbers")?;

        Ok(Some(CustomerProfile{
            customer_id: customer.customer_id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            address: customer.address,
            role: customer.role,
            phone_numbers
        }))
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Serialize)]
pub struct TransactionHistoryEntry{
    pub car_name: String,
    pub transaction_type: String,
    pub method: String,
    pub status: String,
    pub amount: BigDecimal,
    pub payment_date: DateTime<Utc>
}

// Rental and purchase links paired with the customer's payments, newest first
#[tracing::instrument(
    "Getting customer transaction history",
    skip(conn)
)]
pub async fn get_customer_transactions(
    mut conn: DbConnection,
    customer_id: i32
) -> Result<Vec<TransactionHistoryEntry>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        buying_renting::table
            .inner_join(cars::table)
            .inner_join(payments::table.on(payments::customer_id.eq(buying_renting::customer_id)))
            .filter(buying_renting::customer_id.eq(customer_id))
            .select((
                cars::car_name,
                buying_renting::transaction_type,
                payments::method,
                payments::status,
                payments::amount,
                payments::payment_date
            ))
            .order(payments::payment_date.desc())
            .load::<(String, String, String, String, BigDecimal, DateTime<Utc>)>(&mut conn)
            .context("Failed to load transaction history")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res
        .into_iter()
        .map(|(car_name, transaction_type, method, status, amount, payment_date)| {
            TransactionHistoryEntry{car_name, transaction_type, method, status, amount, payment_date}
        })
        .collect())
}

// Identity check for the password reset flow: the claimed digits must match
// the tail of one of the account's phone numbers
#[tracing::instrument(
    "Verifying phone digits for customer email",
    skip_all
)]
pub async fn verify_phone_last4(
    mut conn: DbConnection,
    email: String,
    last4: String
) -> Result<bool, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || -> Result<bool, anyhow::Error> {
        let phone_numbers = customer_phone_numbers::table
            .inner_join(customers::table)
            .filter(customers::email.eq(email))
            .select(customer_phone_numbers::phone_number)
            .load::<String>(&mut conn)
            .context("Failed to load phone numbers")?;

        Ok(phone_numbers.iter().any(|number| number.ends_with(&last4)))
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Error)]
pub enum PasswordResetError{
    #[error("No account registered under the given email")]
    UnknownEmailError,
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for PasswordResetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Resetting customer password",
    skip_all
)]
pub async fn reset_password(
    mut conn: DbConnection,
    email: String,
    password_hash: String
) -> Result<(), PasswordResetError> {
    spawn_blocking_with_tracing(move || {
        let affected_rows = diesel::update(customers::table.filter(customers::email.eq(email)))
            .set(customers::password_hash.eq(password_hash))
            .execute(&mut conn)?;

        if affected_rows == 0 {
            return Err(PasswordResetError::UnknownEmailError)
        }

        Ok(())
    })
    .await??;

    Ok(())
}

#[tracing::instrument(
    "Getting all customers with phone numbers",
    skip(conn)
)]
pub async fn get_all_customers(
    mut conn: DbConnection
) -> Result<Vec<CustomerProfile>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || -> Result<Vec<CustomerProfile>, anyhow::Error> {
        let rows = customers::table
            .left_join(customer_phone_numbers::table)
            .select((
                customers::customer_id,
                customers::first_name,
                customers::last_name,
                customers::email,
                customers::address,
                customers::role,
                customer_phone_numbers::phone_number.nullable()
            ))
            .order(customers::customer_id.asc())
            .load::<(i32, String, String, String, Option<String>, String, Option<String>)>(&mut conn)
            .context("Failed to load customers")?;

        // One row per phone number; collapse back into one record per customer
        let mut profiles: Vec<CustomerProfile> = Vec::new();
        for (customer_id, first_name, last_name, email, address, role, phone_number) in rows {
            match profiles.last_mut() {
                Some(last) if last.customer_id == customer_id => {
                    if let Some(phone_number) = phone_number {
                        last.phone_numbers.push(phone_number);
                    }
                }
                _ => {
                    profiles.push(CustomerProfile{
                        customer_id,
                        first_name,
                        last_name,
                        email,
                        address,
                        role,
                        phone_numbers: phone_number.into_iter().collect()
                    });
                }
            }
        }

        Ok(profiles)
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Error)]
pub enum CustomerWriteError{
    #[error("customer_id: {0} doesn't exist")]
    NoCustomerIdError(i32),
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for CustomerWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

pub struct CustomerUpdate{
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub phone_number: String
}

#[tracing::instrument(
    "Updating customer details",
    skip(conn, update)
)]
pub async fn update_customer(
    mut conn: DbConnection,
    customer_id: i32,
    update: CustomerUpdate
) -> Result<(), CustomerWriteError> {
    spawn_blocking_with_tracing(move || {
        conn.transaction::<(), CustomerWriteError, _>(|conn| {
            let affected_rows = diesel::update(customers::table.find(customer_id))
                .set((
                    customers::first_name.eq(update.first_name),
                    customers::last_name.eq(update.last_name),
                    customers::address.eq(update.address)
                ))
                .execute(conn)?;

            if affected_rows == 0 {
                return Err(CustomerWriteError::NoCustomerIdError(customer_id))
            }

            diesel::delete(
                customer_phone_numbers::table
                    .filter(customer_phone_numbers::customer_id.eq(customer_id))
            )
            .execute(conn)?;

            diesel::insert_into(customer_phone_numbers::table)
                .values(NewPhoneNumber{customer_id, phone_number: update.phone_number})
                .execute(conn)?;

            Ok(())
        })
    })
    .await??;

    Ok(())
}

// Complaints are kept with the customer reference cleared, the rest of the
// customer's rows go with the account
#[tracing::instrument(
    "Deleting customer and dependent rows",
    skip(conn)
)]
pub async fn delete_customer(
    mut conn: DbConnection,
    customer_id: i32
) -> Result<(), CustomerWriteError> {
    spawn_blocking_with_tracing(move || {
        conn.transaction::<(), CustomerWriteError, _>(|conn| {
            diesel::delete(
                customer_phone_numbers::table
                    .filter(customer_phone_numbers::customer_id.eq(customer_id))
            )
            .execute(conn)?;
            diesel::delete(reservations::table.filter(reservations::customer_id.eq(customer_id)))
                .execute(conn)?;
            diesel::delete(payments::table.filter(payments::customer_id.eq(customer_id)))
                .execute(conn)?;
            diesel::delete(buying_renting::table.filter(buying_renting::customer_id.eq(customer_id)))
                .execute(conn)?;

            diesel::update(complaints::table.filter(complaints::customer_id.eq(customer_id)))
                .set(complaints::customer_id.eq(None::<i32>))
                .execute(conn)?;

            let affected_rows = diesel::delete(customers::table.find(customer_id))
                .execute(conn)?;

            if affected_rows == 0 {
                return Err(CustomerWriteError::NoCustomerIdError(customer_id))
            }

            Ok(())
        })
    })
    .await??;

    Ok(())
}

#[tracing::instrument(
    "Recording customer complaint",
    skip(conn, description)
)]
pub async fn record_complaint(
    mut conn: DbConnection,
    customer_id: Option<i32>,
    description: String
) -> Result<i32, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        diesel::insert_into(complaints::table)
            .values(crate::models::NewComplaint{customer_id, description})
            .returning(complaints::complaint_id)
            .get_result::<i32>(&mut conn)
            .context("Failed to insert complaint")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
