use std::{error::Error, fmt::Debug};

use anyhow::Context;
use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use diesel::{Connection, ExpressionMethods, QueryDsl, RunQueryDsl};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Car, CarSummary, InsurancePlan, MaintenanceRecord, NewCar, NewCarFeature, NewCarImage};
use crate::schema::{buying_renting, car_features, car_images, cars, customers, insurance_plans, maintenance_records, payments, reservations};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarSort{
    Newest,
    PriceAsc,
    PriceDesc
}

#[derive(Debug, Clone)]
pub struct CarFilter{
    pub brand: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub sort: CarSort
}

#[tracing::instrument(
    "Getting filtered car gallery from db",
    skip_all
)]
pub async fn get_cars_filtered(
    mut conn: DbConnection,
    filter: CarFilter
) -> Result<Vec<CarSummary>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        let mut query = cars::table
            .select((
                cars::car_id,
                cars::car_name,
                cars::brand,
                cars::year,
                cars::price,
                cars::main_image,
                cars::transmission,
                cars::fuel_type,
                cars::min_deposit,
                cars::monthly_installment
            ))
            .into_boxed();

        if let Some(brand) = filter.brand {
            query = query.filter(cars::brand.eq(brand));
        }
        if let Some(min_price) = filter.min_price {
            query = query.filter(cars::price.ge(min_price));
        }
        if let Some(max_price) = filter.max_price {
            query = query.filter(cars::price.le(max_price));
        }

        query = match filter.sort {
            CarSort::Newest => query.order((cars::year.desc(), cars::car_id.desc())),
            CarSort::PriceAsc => query.order(cars::price.asc()),
            CarSort::PriceDesc => query.order(cars::price.desc())
        };

        query
            .load::<CarSummary>(&mut conn)
            .context("Failed to load cars")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Counting cars matching gallery filter",
    skip_all
)]
pub async fn count_cars_filtered(
    mut conn: DbConnection,
    brand: Option<String>,
    min_price: Option<BigDecimal>,
    max_price: Option<BigDecimal>
) -> Result<i64, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        let mut query = cars::table
            .select(diesel::dsl::count_star())
            .into_boxed();

        if let Some(brand) = brand {
            query = query.filter(cars::brand.eq(brand));
        }
        if let Some(min_price) = min_price {
            query = query.filter(cars::price.ge(min_price));
        }
        if let Some(max_price) = max_price {
            query = query.filter(cars::price.le(max_price));
        }

        query
            .get_result::<i64>(&mut conn)
            .context("Failed to count cars")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Serialize)]
pub struct BrandCount{
    pub brand: String,
    pub count: i64
}

#[tracing::instrument(
    "Getting brands with car counts",
    skip(conn)
)]
pub async fn get_brand_counts(
    mut conn: DbConnection
) -> Result<Vec<BrandCount>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        cars::table
            .group_by(cars::brand)
            .select((cars::brand, diesel::dsl::count_star()))
            .order(cars::brand.asc())
            .load::<(String, i64)>(&mut conn)
            .context("Failed to load brand counts")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res.into_iter().map(|(brand, count)| BrandCount{brand, count}).collect())
}

// Three most recently added cars for the homepage
#[tracing::instrument(
    "Getting new arrivals",
    skip(conn)
)]
pub async fn get_new_arrivals(
    mut conn: DbConnection
) -> Result<Vec<CarSummary>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        new_arrivals_query(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

fn new_arrivals_query(conn: &mut DbConnection) -> Result<Vec<CarSummary>, anyhow::Error> {
    cars::table
        .order(cars::date_added.desc())
        .limit(3)
        .select((
            cars::car_id,
            cars::car_name,
            cars::brand,
            cars::year,
            cars::price,
            cars::main_image,
            cars::transmission,
            cars::fuel_type,
            cars::min_deposit,
            cars::monthly_installment
        ))
        .load::<CarSummary>(conn)
        .context("Failed to load new arrivals")
}

// Top three cars by transactions in the last thirty days, falling back to
// new arrivals when there is no trending data yet
#[tracing::instrument(
    "Getting trending cars",
    skip(conn)
)]
pub async fn get_trending_cars(
    mut conn: DbConnection
) -> Result<Vec<CarSummary>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        let cutoff = Utc::now() - Duration::days(30);

        let trending = cars::table
            .inner_join(buying_renting::table.inner_join(customers::table.inner_join(payments::table)))
            .filter(payments::payment_date.ge(cutoff))
            .group_by((
                cars::car_id,
                cars::car_name,
                cars::brand,
                cars::year,
                cars::price,
                cars::main_image,
                cars::transmission,
                cars::fuel_type,
                cars::min_deposit,
                cars::monthly_installment
            ))
            .select((
                cars::car_id,
                cars::car_name,
                cars::brand,
                cars::year,
                cars::price,
                cars::main_image,
                cars::transmission,
                cars::fuel_type,
                cars::min_deposit,
                cars::monthly_installment
            ))
            .order(diesel::dsl::count(buying_renting::record_id).desc())
            .limit(3)
            .load::<CarSummary>(&mut conn)
            .context("Failed to load trending cars")?;

        if trending.is_empty() {
            new_arrivals_query(&mut conn)
        } else {
            Ok(trending)
        }
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Everything the car details page needs in one response
#[derive(Serialize)]
pub struct CarProfile{
    pub car: Car,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub insurance_plans: Vec<InsurancePlan>,
    pub maintenance_history: Vec<MaintenanceRecord>
}

#[tracing::instrument(
    "Getting car profile",
    skip(conn)
)]
pub async fn get_car_profile(
    mut conn: DbConnection,
    car_id: i32
) -> Result<Option<CarProfile>, anyhow::Error> {
    use diesel::OptionalExtension;

    let res = spawn_blocking_with_tracing(move || -> Result<Option<CarProfile>, anyhow::Error> {
        let car = cars::table
            .find(car_id)
            .get_result::<Car>(&mut conn)
            .optional()
            .context("Failed to load car")?;

        let car = match car {
            Some(car) => car,
            None => return Ok(None)
        };

        let images = car_images::table
            .filter(car_images::car_id.eq(car_id))
            .select(car_images::image_url)
            .load::<String>(&mut conn)
            .context("Failed to load car images")?;

        let features = car_features::table
            .filter(car_features::car_id.eq(car_id))
            .select(car_features::feature_name)
            .load::<String>(&mut conn)
            .context("Failed to load car features")?;

        let insurance = insurance_plans::table
            .filter(insurance_plans::car_id.eq(car_id))
            .order(insurance_plans::duration_months.asc())
            .load::<InsurancePlan>(&mut conn)
            .context("Failed to load insurance plans")?;

        let maintenance = maintenance_records::table
            .filter(maintenance_records::car_id.eq(car_id))
            .order(maintenance_records::service_date.desc())
            .load::<MaintenanceRecord>(&mut conn)
            .context("Failed to load maintenance history")?;

        Ok(Some(CarProfile{
            car,
            images,
            features,
            insurance_plans: insurance,
            maintenance_history: maintenance
        }))
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Error)]
pub enum CarWriteError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("car_id: {0} doesn't exist")]
    NoCarIdError(i32),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for CarWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting car with images and features",
    skip_all
)]
pub async fn insert_car(
    mut conn: DbConnection,
    car: NewCar,
    images: Vec<String>,
    features: Vec<String>
) -> Result<i32, CarWriteError> {
    let car_id = spawn_blocking_with_tracing(move || {
        conn.transaction::<i32, diesel::result::Error, _>(|conn| {
            let car_id = diesel::insert_into(cars::table)
                .values(&car)
                .returning(cars::car_id)
                .get_result::<i32>(conn)?;

            insert_media(conn, car_id, &images, &features)?;

            Ok(car_id)
        })
    })
    .await??;

    Ok(car_id)
}

#[tracing::instrument(
    "Updating car with images and features",
    skip(conn, car, images, features)
)]
pub async fn update_car(
    mut conn: DbConnection,
    car_id: i32,
    car: NewCar,
    images: Vec<String>,
    features: Vec<String>
) -> Result<(), CarWriteError> {
    spawn_blocking_with_tracing(move || {
        conn.transaction::<(), CarWriteError, _>(|conn| {
            let affected_rows = diesel::update(cars::table.find(car_id))
                .set(&car)
                .execute(conn)?;

            if affected_rows == 0 {
                return Err(CarWriteError::NoCarIdError(car_id))
            }

            // Media is replaced wholesale on every edit
            diesel::delete(car_images::table.filter(car_images::car_id.eq(car_id)))
                .execute(conn)?;
            diesel::delete(car_features::table.filter(car_features::car_id.eq(car_id)))
                .execute(conn)?;

            insert_media(conn, car_id, &images, &features)?;

            Ok(())
        })
    })
    .await??;

    Ok(())
}

fn insert_media(
    conn: &mut diesel::PgConnection,
    car_id: i32,
    images: &[String],
    features: &[String]
) -> Result<(), diesel::result::Error> {
    for image_url in images {
        diesel::insert_into(car_images::table)
            .values(NewCarImage{car_id, image_url: image_url.clone()})
            .execute(conn)?;
    }

    for feature_name in features {
        diesel::insert_into(car_features::table)
            .values(NewCarFeature{car_id, feature_name: feature_name.clone()})
            .execute(conn)?;
    }

    Ok(())
}

// Dependent rows go first; the schema carries no ON DELETE CASCADE
#[tracing::instrument(
    "Deleting car and dependent rows",
    skip(conn)
)]
pub async fn delete_car(
    mut conn: DbConnection,
    car_id: i32
) -> Result<(), CarWriteError> {
    spawn_blocking_with_tracing(move || {
        conn.transaction::<(), CarWriteError, _>(|conn| {
            diesel::delete(car_images::table.filter(car_images::car_id.eq(car_id)))
                .execute(conn)?;
            diesel::delete(car_features::table.filter(car_features::car_id.eq(car_id)))
                .execute(conn)?;
            diesel::delete(insurance_plans::table.filter(insurance_plans::car_id.eq(car_id)))
                .execute(conn)?;
            diesel::delete(maintenance_records::table.filter(maintenance_records::car_id.eq(car_id)))
                .execute(conn)?;
            diesel::delete(reservations::table.filter(reservations::car_id.eq(car_id)))
                .execute(conn)?;
            diesel::delete(buying_renting::table.filter(buying_renting::car_id.eq(car_id)))
                .execute(conn)?;

            let affected_rows = diesel::delete(cars::table.find(car_id))
                .execute(conn)?;

            if affected_rows == 0 {
                return Err(CarWriteError::NoCarIdError(car_id))
            }

            Ok(())
        })
    })
    .await??;

    Ok(())
}

// Monthly installment lookup for the rental quote
#[tracing::instrument(
    "Getting monthly installment for car",
    skip(conn)
)]
pub async fn get_monthly_installment(
    mut conn: DbConnection,
    car_id: i32
) -> Result<Option<BigDecimal>, anyhow::Error> {
    use diesel::OptionalExtension;

    let res = spawn_blocking_with_tracing(move || {
        cars::table
            .find(car_id)
            .select(cars::monthly_installment)
            .get_result::<BigDecimal>(&mut conn)
            .optional()
            .context("Failed to load monthly installment")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
