use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::{AsChangeset, Insertable, Queryable};
use serde::Deserialize;
use serde::Serialize;

use crate::schema::{
    activity_log, buying_renting, car_features, car_images, cars, complaints,
    customer_phone_numbers, customers, insurance_plans, maintenance_records, payments,
    reservations, transaction_log,
};

#[derive(Queryable, Serialize)]
pub struct Car{
    pub car_id: i32,
    pub car_name: String,
    pub brand: String,
    pub year: i32,
    pub price: BigDecimal,
    pub color: Option<String>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub engine: Option<String>,
    pub seats: Option<i32>,
    pub mileage: Option<i32>,
    pub main_image: Option<String>,
    pub min_deposit: BigDecimal,
    pub monthly_installment: BigDecimal,
    pub description: Option<String>,
    pub date_added: DateTime<Utc>
}

// Insert and full-replace update share the same shape; every column the form
// carries is written, absent optionals become NULL
#[derive(Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = cars)]
#[diesel(treat_none_as_null = true)]
pub struct NewCar{
    pub car_name: String,
    pub brand: String,
    pub year: i32,
    pub price: BigDecimal,
    pub color: Option<String>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub engine: Option<String>,
    pub seats: Option<i32>,
    pub mileage: Option<i32>,
    pub main_image: Option<String>,
    pub min_deposit: BigDecimal,
    pub monthly_installment: BigDecimal,
    pub description: Option<String>
}

// Gallery card projection of a car row
#[derive(Queryable, Serialize)]
pub struct CarSummary{
    pub car_id: i32,
    pub car_name: String,
    pub brand: String,
    pub year: i32,
    pub price: BigDecimal,
    pub main_image: Option<String>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub min_deposit: BigDecimal,
    pub monthly_installment: BigDecimal
}

#[derive(Queryable, Clone)]
pub struct Customer{
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub address: Option<String>,
    pub role: String
}

#[derive(Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomer{
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub address: Option<String>,
    pub role: String
}

#[derive(Queryable, Serialize)]
pub struct PhoneNumberEntry{
    pub phone_id: i32,
    pub customer_id: i32,
    pub phone_number: String
}

#[derive(Insertable)]
#[diesel(table_name = customer_phone_numbers)]
pub struct NewPhoneNumber{
    pub customer_id: i32,
    pub phone_number: String
}

#[derive(Queryable, Serialize)]
pub struct Reservation{
    pub reservation_id: i32,
    pub customer_id: i32,
    pub car_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String
}

#[derive(Insertable)]
#[diesel(table_name = reservations)]
pub struct NewReservation{
    pub customer_id: i32,
    pub car_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String
}

#[derive(Queryable, Serialize)]
pub struct Payment{
    pub payment_id: i32,
    pub customer_id: i32,
    pub method: String,
    pub status: String,
    pub amount: BigDecimal,
    pub payment_date: DateTime<Utc>
}

#[derive(Insertable)]
#[diesel(table_name = payments)]
pub struct NewPayment{
    pub customer_id: i32,
    pub method: String,
    pub status: String,
    pub amount: BigDecimal
}

#[derive(Insertable)]
#[diesel(table_name = buying_renting)]
pub struct NewRentalLink{
    pub customer_id: i32,
    pub car_id: i32,
    pub transaction_type: String
}

// Denormalized audit snapshot of a payment, distinct from the database
// transaction mechanism
#[derive(Queryable, Serialize)]
pub struct TransactionLogEntry{
    pub log_id: i32,
    pub payment_id: i32,
    pub customer_name: String,
    pub car_name: Option<String>,
    pub amount: BigDecimal,
    pub status: String,
    pub logged_at: DateTime<Utc>
}

#[derive(Insertable)]
#[diesel(table_name = transaction_log)]
pub struct NewTransactionLogEntry{
    pub payment_id: i32,
    pub customer_name: String,
    pub car_name: Option<String>,
    pub amount: BigDecimal,
    pub status: String
}

#[derive(Queryable, Serialize)]
pub struct ActivityLogEntry{
    pub activity_id: i32,
    pub action: String,
    pub description: String,
    pub kind: String,
    pub logged_at: DateTime<Utc>
}

#[derive(Insertable)]
#[diesel(table_name = activity_log)]
pub struct NewActivityLogEntry{
    pub action: String,
    pub description: String,
    pub kind: String
}

#[derive(Queryable, Serialize)]
pub struct Complaint{
    pub complaint_id: i32,
    pub customer_id: Option<i32>,
    pub description: String,
    pub created_at: DateTime<Utc>
}

#[derive(Insertable)]
#[diesel(table_name = complaints)]
pub struct NewComplaint{
    pub customer_id: Option<i32>,
    pub description: String
}

#[derive(Queryable, Serialize)]
pub struct InsurancePlan{
    pub plan_id: i32,
    pub car_id: i32,
    pub plan_name: String,
    pub duration_months: i32,
    pub cost: BigDecimal
}

#[derive(Queryable, Serialize)]
pub struct MaintenanceRecord{
    pub record_id: i32,
    pub car_id: i32,
    pub service_type: String,
    pub service_date: NaiveDate,
    pub cost: BigDecimal,
    pub notes: Option<String>
}

#[derive(Insertable)]
#[diesel(table_name = car_images)]
pub struct NewCarImage{
    pub car_id: i32,
    pub image_url: String
}

#[derive(Insertable)]
#[diesel(table_name = car_features)]
pub struct NewCarFeature{
    pub car_id: i32,
    pub feature_name: String
}

/// Explicit role column on the customer record; replaces the original
/// email-shape heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerRole{
    User,
    Admin,
    Maintenance
}

impl CustomerRole {
    pub fn as_str(&self) -> &'static str{
        match self {
            CustomerRole::User => "user",
            CustomerRole::Admin => "admin",
            CustomerRole::Maintenance => "maintenance"
        }
    }

    pub fn parse(value: &str) -> Result<Self, String>{
        match value {
            "user" => Ok(CustomerRole::User),
            "admin" => Ok(CustomerRole::Admin),
            "maintenance" => Ok(CustomerRole::Maintenance),
            other => Err(format!("{} is not a valid customer role", other))
        }
    }

    pub fn is_staff(&self) -> bool{
        matches!(self, CustomerRole::Admin | CustomerRole::Maintenance)
    }
}
