use anyhow::Context;
use bigdecimal::BigDecimal;
use chrono::{Datelike, Utc};
use diesel::{
    sql_types::{BigInt, Numeric, Text},
    ExpressionMethods, QueryDsl, QueryableByName, RunQueryDsl,
};
use serde::Serialize;

use crate::db_interaction::booking::{CONFIRMED_STATUS, COMPLETED_STATUS};
use crate::db_interaction::logs;
use crate::models::{ActivityLogEntry, TransactionLogEntry};
use crate::schema::{buying_renting, cars, customers, payments, reservations};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::DbConnection;

#[derive(Serialize)]
pub struct DashboardStats{
    pub total_cars: i64,
    pub total_sales: i64,
    pub active_rentals: i64,
    pub total_users: i64,
    pub total_revenue: BigDecimal,
    pub monthly_revenue: BigDecimal
}

#[derive(Serialize, QueryableByName)]
pub struct MonthlyRevenuePoint{
    #[diesel(sql_type = Text)]
    pub month: String,
    #[diesel(sql_type = Numeric)]
    pub revenue: BigDecimal
}

#[derive(Serialize, QueryableByName)]
pub struct TopCarEntry{
    #[diesel(sql_type = Text)]
    pub car_name: String,
    #[diesel(sql_type = BigInt)]
    pub transactions: i64
}

#[derive(Serialize)]
pub struct BrandSales{
    pub brand: String,
    pub sales: i64
}

#[derive(Serialize)]
pub struct DashboardData{
    pub stats: DashboardStats,
    pub revenue_by_month: Vec<MonthlyRevenuePoint>,
    pub top_cars: Vec<TopCarEntry>,
    pub sales_by_brand: Vec<BrandSales>,
    pub recent_activities: Vec<ActivityLogEntry>,
    pub recent_transactions: Vec<TransactionLogEntry>
}

fn current_month_start() -> chrono::DateTime<Utc> {
    let now = Utc::now();
    now.date_naive()
        .with_day(1)
        .unwrap_or_else(|| now.date_naive())
        .and_hms_opt(0, 0, 0)
        .unwrap_or_else(|| now.naive_utc())
        .and_utc()
}

fn load_stats(conn: &mut DbConnection) -> Result<DashboardStats, anyhow::Error> {
    let total_cars = cars::table
        .count()
        .get_result::<i64>(conn)
        .context("Failed to count cars")?;

    let total_sales = buying_renting::table
        .filter(buying_renting::transaction_type.eq("Buy"))
        .count()
        .get_result::<i64>(conn)
        .context("Failed to count sales")?;

    let active_rentals = reservations::table
        .filter(reservations::status.eq(CONFIRMED_STATUS))
        .filter(reservations::end_date.ge(Utc::now().date_naive()))
        .count()
        .get_result::<i64>(conn)
        .context("Failed to count active rentals")?;

    let total_users = customers::table
        .count()
        .get_result::<i64>(conn)
        .context("Failed to count customers")?;

    let total_revenue = payments::table
        .filter(payments::status.eq(COMPLETED_STATUS))
        .select(diesel::dsl::sum(payments::amount))
        .get_result::<Option<BigDecimal>>(conn)
        .context("Failed to sum revenue")?
        .unwrap_or_default();

    let monthly_revenue = payments::table
        .filter(payments::status.eq(COMPLETED_STATUS))
        .filter(payments::payment_date.ge(current_month_start()))
        .select(diesel::dsl::sum(payments::amount))
        .get_result::<Option<BigDecimal>>(conn)
        .context("Failed to sum monthly revenue")?
        .unwrap_or_default();

    Ok(DashboardStats{
        total_cars,
        total_sales,
        active_rentals,
        total_users,
        total_revenue,
        monthly_revenue
    })
}

fn load_revenue_by_month(conn: &mut DbConnection) -> Result<Vec<MonthlyRevenuePoint>, anyhow::Error> {
    diesel::sql_query(
        r#"
        SELECT to_char(date_trunc('month', payment_date), 'YYYY-MM') AS month,
               SUM(amount) AS revenue
        FROM payments
        WHERE status = 'Completed'
          AND payment_date >= date_trunc('month', NOW()) - INTERVAL '5 months'
        GROUP BY month
        ORDER BY month
        "#
    )
    .load::<MonthlyRevenuePoint>(conn)
    .context("Failed to load monthly revenue series")
}

fn load_top_cars(conn: &mut DbConnection) -> Result<Vec<TopCarEntry>, anyhow::Error> {
    diesel::sql_query(
        r#"
        SELECT c.car_name AS car_name, COUNT(*) AS transactions
        FROM buying_renting br
        JOIN cars c ON c.car_id = br.car_id
        GROUP BY c.car_name
        ORDER BY transactions DESC, c.car_name
        LIMIT 5
        "#
    )
    .load::<TopCarEntry>(conn)
    .context("Failed to load top cars")
}

fn load_sales_by_brand(conn: &mut DbConnection) -> Result<Vec<BrandSales>, anyhow::Error> {
    let rows = buying_renting::table
        .inner_join(cars::table)
        .filter(buying_renting::transaction_type.eq("Buy"))
        .group_by(cars::brand)
        .select((cars::brand, diesel::dsl::count_star()))
        .order(cars::brand.asc())
        .load::<(String, i64)>(conn)
        .context("Failed to load sales by brand")?;

    Ok(rows.into_iter().map(|(brand, sales)| BrandSales{brand, sales}).collect())
}

// Single round trip for everything the admin landing page renders, minus the
// recent-log panels which come from the async log queries
#[tracing::instrument(
    "Getting dashboard aggregates",
    skip(conn)
)]
pub async fn get_dashboard_counters(
    mut conn: DbConnection
) -> Result<(DashboardStats, Vec<MonthlyRevenuePoint>, Vec<TopCarEntry>, Vec<BrandSales>), anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        let stats = load_stats(&mut conn)?;
        let revenue_by_month = load_revenue_by_month(&mut conn)?;
        let top_cars = load_top_cars(&mut conn)?;
        let sales_by_brand = load_sales_by_brand(&mut conn)?;

        Ok::<_, anyhow::Error>((stats, revenue_by_month, top_cars, sales_by_brand))
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Assembling dashboard data",
    skip_all
)]
pub async fn get_dashboard_data(
    counters_conn: DbConnection,
    activities_conn: DbConnection,
    transactions_conn: DbConnection
) -> Result<DashboardData, anyhow::Error> {
    let (stats, revenue_by_month, top_cars, sales_by_brand) =
        get_dashboard_counters(counters_conn).await?;
    let recent_activities = logs::get_recent_activities(activities_conn).await?;
    let recent_transactions = logs::get_recent_transactions(transactions_conn).await?;

    Ok(DashboardData{
        stats,
        revenue_by_month,
        top_cars,
        sales_by_brand,
        recent_activities,
        recent_transactions
    })
}
