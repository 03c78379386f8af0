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
use crate::infra::{companies, jobs};
use crate::models::company::{
    CompanyDetail, CompanyPatch, NewCompany, QUERY_SHAPE, SEARCH_PREDICATES,
};

/// POST /companies (管理员)
pub async fn create_company(
    State(state): State<Arc<AppState>>,
    Admin(user): Admin,
    AppJson(body): AppJson<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    schema::validate(&schema::COMPANY_NEW, &body)?;
    let data: NewCompany = decode(body)?;

    info!("创建公司请求: handle={}, by={}", data.handle, user.username);
    let company = companies::create(&state.db, &data).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// GET /companies
/// 无查询参数时返回全部；否则按 nameLike / minEmployees / maxEmployees 过滤
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    AppQuery(raw): AppQuery<HashMap<String, String>>,
) -> AppResult<Json<Value>> {
    if raw.is_empty() {
        let companies = companies::find_all(&state.db).await?;
        return Ok(Json(json!({ "companies": companies })));
    }

    let filters = query::normalize(&raw, &QUERY_SHAPE)?;
    schema::validate(&schema::COMPANY_FILTER, &Value::Object(filters.clone()))?;

    let clause = sql::build_search_clause(&filters, SEARCH_PREDICATES);
    let companies = companies::search(&state.db, &clause).await?;
    Ok(Json(json!({ "companies": companies })))
}

/// GET /companies/{handle}，附带该公司的职位
pub async fn get_company(
    State(state): State<Arc<AppState>>,
    AppPath(handle): AppPath<String>,
) -> AppResult<Json<Value>> {
    let company = companies::get(&state.db, &handle).await?;
    let jobs = jobs::for_company(&state.db, &handle).await?;
    let detail = CompanyDetail { company, jobs };
    Ok(Json(json!({ "company": detail })))
}

/// PATCH /companies/{handle} (管理员)
pub async fn update_company(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    AppPath(handle): AppPath<String>,
    AppJson(body): AppJson<Value>,
) -> AppResult<Json<Value>> {
    schema::validate(&schema::COMPANY_UPDATE, &body)?;
    let patch: CompanyPatch = decode(body)?;

    let company = companies::update(&state.db, &handle, patch).await?;
    Ok(Json(json!({ "company": company })))
}

/// DELETE /companies/{handle} (管理员)
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    AppPath(handle): AppPath<String>,
) -> AppResult<Json<Value>> {
    companies::remove(&state.db, &handle).await?;
    Ok(Json(json!({ "deleted": handle })))
}
