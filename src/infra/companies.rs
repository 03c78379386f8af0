//! 公司数据访问层
//!
//! 搜索与更新的 SQL 片段来自 `core::sql` 的构造器；片段直接拼入语句，
//! 用户提供的值只通过位置参数绑定。

use sqlx::error::ErrorKind;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::core::sql::{build_update_clause, Clause};
use crate::error::{AppError, AppResult};
use crate::infra::db::{bind_values, constraint_violation};
use crate::models::company::{Company, CompanyPatch, NewCompany, COLUMN_NAMES};

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// 按违反的唯一约束区分主键 (handle) 与 name 重复
fn duplicate_message(constraint: Option<&str>, handle: &str) -> String {
    match constraint {
        Some("companies_name_key") => "Duplicate company name".to_string(),
        Some(c) if c != "companies_pkey" => format!("Duplicate company: {} ({})", handle, c),
        _ => format!("Duplicate company: {}", handle),
    }
}

fn map_write_error(err: sqlx::Error, handle: &str) -> AppError {
    match constraint_violation(&err) {
        Some(ErrorKind::UniqueViolation) => {
            let constraint = err.as_database_error().and_then(|e| e.constraint());
            AppError::conflict(duplicate_message(constraint, handle))
        }
        Some(_) => AppError::validation(
            err.as_database_error()
                .map(|e| e.message().to_string())
                .unwrap_or_default(),
        ),
        None => AppError::Database(err),
    }
}

/// 新建公司；handle 已存在时返回 Conflict
pub async fn create(db: &PgPool, data: &NewCompany) -> AppResult<Company> {
    let existing = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
        .bind(&data.handle)
        .fetch_optional(db)
        .await?;
    if existing.is_some() {
        return Err(AppError::conflict(format!("Duplicate company: {}", data.handle)));
    }

    let company = sqlx::query_as::<_, Company>(&format!(
        "INSERT INTO companies (handle, name, description, num_employees, logo_url)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COMPANY_COLUMNS}"
    ))
    .bind(&data.handle)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.num_employees)
    .bind(&data.logo_url)
    .fetch_one(db)
    .await
    .map_err(|e| map_write_error(e, &data.handle))?;

    info!("公司已创建: handle={}", company.handle);
    Ok(company)
}

pub async fn find_all(db: &PgPool) -> AppResult<Vec<Company>> {
    let companies = sqlx::query_as::<_, Company>(&format!(
        "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY name"
    ))
    .fetch_all(db)
    .await?;
    Ok(companies)
}

/// 按 WHERE 片段搜索；片段为空时等同于 find_all
pub async fn search(db: &PgPool, clause: &Clause) -> AppResult<Vec<Company>> {
    if clause.is_empty() {
        return find_all(db).await;
    }

    let sql = format!(
        "SELECT {COMPANY_COLUMNS} FROM companies WHERE {} ORDER BY name",
        clause.fragment
    );
    debug!("公司搜索: {} {:?}", sql, clause.values);
    let companies = bind_values(sqlx::query_as::<_, Company>(&sql), &clause.values)
        .fetch_all(db)
        .await?;
    Ok(companies)
}

pub async fn get(db: &PgPool, handle: &str) -> AppResult<Company> {
    sqlx::query_as::<_, Company>(&format!(
        "SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1"
    ))
    .bind(handle)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found(format!("No company: {}", handle)))
}

/// 部分更新；只修改 patch 中出现的字段
pub async fn update(db: &PgPool, handle: &str, patch: CompanyPatch) -> AppResult<Company> {
    let clause = build_update_clause(&patch.into_fields(), COLUMN_NAMES)?;
    let sql = format!(
        "UPDATE companies SET {} WHERE handle = ${} RETURNING {COMPANY_COLUMNS}",
        clause.fragment,
        clause.next_placeholder()
    );

    let company = bind_values(sqlx::query_as::<_, Company>(&sql), &clause.values)
        .bind(handle)
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, handle))?
        .ok_or_else(|| AppError::not_found(format!("No company: {}", handle)))?;

    info!("公司已更新: handle={}", handle);
    Ok(company)
}

pub async fn remove(db: &PgPool, handle: &str) -> AppResult<()> {
    let deleted = sqlx::query_scalar::<_, String>("DELETE FROM companies WHERE handle = $1 RETURNING handle")
        .bind(handle)
        .fetch_optional(db)
        .await?;
    if deleted.is_none() {
        return Err(AppError::not_found(format!("No company: {}", handle)));
    }
    info!("公司已删除: handle={}", handle);
    Ok(())
}
