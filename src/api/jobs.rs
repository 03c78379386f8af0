use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::api::{auth::Admin, decode};
use crate::ax_state::AppState;
use crate::core::{query, schema, sql};
use crate::error::AppResult;
use crate::infra::jobs;
use crate::models::job::{JobPatch, NewJob, QUERY_SHAPE, SEARCH_PREDICATES};

/// POST /jobs (管理员)
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    Admin(user): Admin,
    AppJson(body): AppJson<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    schema::validate(&schema::JOB_NEW, &body)?;
    let data: NewJob = decode(body)?;

    info!("创建职位请求: company={}, by={}", data.company_handle, user.username);
    let job = jobs::create(&state.db, &data).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

/// GET /jobs，可按 title / minSalary / hasEquity 过滤
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    AppQuery(raw): AppQuery<HashMap<String, String>>,
) -> AppResult<Json<Value>> {
    if raw.is_empty() {
        let jobs = jobs::find_all(&state.db).await?;
        return Ok(Json(json!({ "jobs": jobs })));
    }

    let filters = query::normalize(&raw, &QUERY_SHAPE)?;
    schema::validate(&schema::JOB_FILTER, &Value::Object(filters.clone()))?;

    let clause = sql::build_search_clause(&filters, SEARCH_PREDICATES);
    let jobs = jobs::search(&state.db, &clause).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

pub async fn get_job(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Value>> {
    let job = jobs::get(&state.db, id).await?;
    Ok(Json(json!({ "job": job })))
}

/// PATCH /jobs/{id} (管理员)；id 与 companyHandle 不可修改
pub async fn update_job(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    AppPath(id): AppPath<i32>,
    AppJson(body): AppJson<Value>,
) -> AppResult<Json<Value>> {
    schema::validate(&schema::JOB_UPDATE, &body)?;
    let patch: JobPatch = decode(body)?;

    let job = jobs::update(&state.db, id, patch).await?;
    Ok(Json(json!({ "job": job })))
}

pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Value>> {
    jobs::remove(&state.db, id).await?;
    Ok(Json(json!({ "deleted": id })))
}
