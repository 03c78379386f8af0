//! 认证中间件与授权提取器

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::debug;

use crate::ax_state::AppState;
use crate::core::auth::{is_admin, is_logged_in, verify_token, Claims};
use crate::error::AppError;

static BEARER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[Bb]earer ").expect("bearer prefix regex"));

fn bearer_claims(headers: &HeaderMap, secret: &str) -> Option<Claims> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = BEARER_PREFIX.replace(value, "");
    match verify_token(token.trim(), secret) {
        Ok(claims) => Some(claims),
        Err(e) => {
            // 无效 token 不视为错误，只是不记录用户
            debug!("忽略无效 token: {}", e);
            None
        }
    }
}

/// 若请求携带有效 token，将载荷存入 request extensions
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(claims) = bearer_claims(request.headers(), &state.secret_key) {
        request.extensions_mut().insert(claims);
    }
    next.run(request).await
}

/// 当前用户 (可能为匿名)
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Claims>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<Claims>().cloned()))
    }
}

/// 必须已登录
#[derive(Debug, Clone)]
pub struct LoggedIn(pub Claims);

impl<S> FromRequestParts<S> for LoggedIn
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<Claims>();
        if !is_logged_in(user) {
            return Err(AppError::Unauthorized);
        }
        user.cloned().map(LoggedIn).ok_or(AppError::Unauthorized)
    }
}

/// 必须是已登录的管理员
#[derive(Debug, Clone)]
pub struct Admin(pub Claims);

impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<Claims>();
        if !is_admin(user) {
            return Err(AppError::Unauthorized);
        }
        user.cloned().map(Admin).ok_or(AppError::Unauthorized)
    }
}
