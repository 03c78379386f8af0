use sqlx::error::ErrorKind;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::core::sql::{build_update_clause, Clause};
use crate::error::{AppError, AppResult};
use crate::infra::db::{bind_values, constraint_violation};
use crate::models::job::{Job, JobPatch, JobSummary, NewJob, COLUMN_NAMES};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

fn constraint_message(err: &sqlx::Error) -> String {
    err.as_database_error()
        .map(|e| e.message().to_string())
        .unwrap_or_default()
}

/// 新建职位；所属公司不存在时返回 Validation
pub async fn create(db: &PgPool, data: &NewJob) -> AppResult<Job> {
    let job = sqlx::query_as::<_, Job>(&format!(
        "INSERT INTO jobs (title, salary, equity, company_handle)
         VALUES ($1, $2, $3, $4)
         RETURNING {JOB_COLUMNS}"
    ))
    .bind(&data.title)
    .bind(data.salary)
    .bind(data.equity)
    .bind(&data.company_handle)
    .fetch_one(db)
    .await
    .map_err(|e| match constraint_violation(&e) {
        Some(ErrorKind::ForeignKeyViolation) => {
            AppError::validation(format!("{} doesn't exist.", data.company_handle))
        }
        Some(_) => AppError::validation(constraint_message(&e)),
        None => AppError::Database(e),
    })?;

    info!("职位已创建: id={}, company={}", job.id, job.company_handle);
    Ok(job)
}

pub async fn find_all(db: &PgPool) -> AppResult<Vec<Job>> {
    let jobs = sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY id"))
        .fetch_all(db)
        .await?;
    Ok(jobs)
}

pub async fn search(db: &PgPool, clause: &Clause) -> AppResult<Vec<Job>> {
    if clause.is_empty() {
        return find_all(db).await;
    }

    let sql = format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE {} ORDER BY id",
        clause.fragment
    );
    debug!("职位搜索: {} {:?}", sql, clause.values);
    let jobs = bind_values(sqlx::query_as::<_, Job>(&sql), &clause.values)
        .fetch_all(db)
        .await?;
    Ok(jobs)
}

pub async fn get(db: &PgPool, id: i32) -> AppResult<Job> {
    sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No job: {}", id)))
}

/// 公司详情页使用
pub async fn for_company(db: &PgPool, handle: &str) -> AppResult<Vec<JobSummary>> {
    let jobs = sqlx::query_as::<_, JobSummary>(
        "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
    )
    .bind(handle)
    .fetch_all(db)
    .await?;
    Ok(jobs)
}

pub async fn update(db: &PgPool, id: i32, patch: JobPatch) -> AppResult<Job> {
    let clause = build_update_clause(&patch.into_fields(), COLUMN_NAMES)?;
    let sql = format!(
        "UPDATE jobs SET {} WHERE id = ${} RETURNING {JOB_COLUMNS}",
        clause.fragment,
        clause.next_placeholder()
    );

    let job = bind_values(sqlx::query_as::<_, Job>(&sql), &clause.values)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| match constraint_violation(&e) {
            Some(_) => AppError::validation(constraint_message(&e)),
            None => AppError::Database(e),
        })?
        .ok_or_else(|| AppError::not_found(format!("No job: {}", id)))?;

    info!("职位已更新: id={}", id);
    Ok(job)
}

pub async fn remove(db: &PgPool, id: i32) -> AppResult<()> {
    let deleted = sqlx::query_scalar::<_, i32>("DELETE FROM jobs WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(db)
        .await?;
    if deleted.is_none() {
        return Err(AppError::not_found(format!("No job: {}", id)));
    }
    info!("职位已删除: id={}", id);
    Ok(())
}
