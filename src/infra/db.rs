use sqlx::error::ErrorKind;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::info;

use crate::core::sql::SqlValue;
use crate::infra::config::Config;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

pub async fn init_db(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    info!("数据库连接池已建立: max_connections={}", config.db_max_connections);
    Ok(pool)
}

/// 建表 (幂等)
pub async fn ensure_schema(db: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(db).await?;
    Ok(())
}

/// 依次按位置绑定参数，顺序与片段中的 `$n` 一致
pub fn bind_values<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: &[SqlValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value {
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Decimal(v) => query.bind(*v),
        };
    }
    query
}

/// 数据库约束错误的类别 (非约束错误返回 None)
pub fn constraint_violation(err: &sqlx::Error) -> Option<ErrorKind> {
    match err.as_database_error()?.kind() {
        ErrorKind::Other => None,
        kind => Some(kind),
    }
}

#[cfg(test)]
static SCHEMA_READY: tokio::sync::Mutex<bool> = tokio::sync::Mutex::const_new(false);

/// 数据库用例标记为 #[ignore]，以 `cargo test -- --ignored` 配合 DATABASE_URL 运行
#[cfg(test)]
pub(crate) async fn test_pool() -> PgPool {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set to run the database tests (--ignored)");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DATABASE_URL");

    // 并发的 CREATE TABLE IF NOT EXISTS 会在系统表上冲突
    let mut ready = SCHEMA_READY.lock().await;
    if !*ready {
        ensure_schema(&pool).await.expect("Failed to create schema");
        *ready = true;
    }
    pool
}
