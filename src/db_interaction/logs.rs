use anyhow::Context;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, QueryResult, RunQueryDsl};

use crate::models::{ActivityLogEntry, NewActivityLogEntry, NewTransactionLogEntry, TransactionLogEntry};
use crate::schema::{activity_log, transaction_log};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::DbConnection;

// Audit writes are best-effort everywhere they are used: callers log the
// error and move on instead of failing the operation that triggered them

pub fn record_activity(
    conn: &mut PgConnection,
    entry: NewActivityLogEntry
) -> QueryResult<usize> {
    diesel::insert_into(activity_log::table)
        .values(entry)
        .execute(conn)
}

pub fn record_transaction(
    conn: &mut PgConnection,
    entry: NewTransactionLogEntry
) -> QueryResult<usize> {
    diesel::insert_into(transaction_log::table)
        .values(entry)
        .execute(conn)
}

#[tracing::instrument(
    "Getting recent activity log entries",
    skip(conn)
)]
pub async fn get_recent_activities(
    mut conn: DbConnection
) -> Result<Vec<ActivityLogEntry>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        activity_log::table
            .order(activity_log::logged_at.desc())
            .limit(10)
            .load::<ActivityLogEntry>(&mut conn)
            .context("Failed to load recent activities")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Getting recent transaction log entries",
    skip(conn)
)]
pub async fn get_recent_transactions(
    mut conn: DbConnection
) -> Result<Vec<TransactionLogEntry>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        transaction_log::table
            .order(transaction_log::logged_at.desc())
            .limit(10)
            .load::<TransactionLogEntry>(&mut conn)
            .context("Failed to load recent transactions")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
