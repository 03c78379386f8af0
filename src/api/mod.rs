pub mod auth;
pub mod extract;
pub mod companies;
pub mod jobs;

use axum::{
    middleware,
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::ax_state::AppState;
use crate::error::{AppError, AppResult};

/// 已通过 schema 校验的请求体转为类型化结构
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    serde_json::from_value(body).map_err(|e| AppError::validation(e.to_string()))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> AppError {
    AppError::not_found("Not Found")
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route(
            "/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/companies/{handle}",
            get(companies::get_company)
                .patch(companies::update_company)
                .delete(companies::delete_company),
        )
        .route("/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/jobs/{id}",
            get(jobs::get_job).patch(jobs::update_job).delete(jobs::delete_job),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), auth::authenticate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{create_token, Claims};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    /// 连接池惰性建立，这些用例在访问数据库之前就会返回
    fn app() -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/jobly_unreachable")
            .unwrap();
        router(Arc::new(AppState {
            db,
            secret_key: SECRET.to_string(),
        }))
    }

    fn token(username: &str, is_admin: bool) -> String {
        create_token(&Claims::new(username, is_admin), SECRET).unwrap()
    }

    fn request(method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(request(Method::GET, "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_create_company_requires_admin() {
        let body = json!({ "handle": "new", "name": "New", "description": "D" });

        let response = app()
            .oneshot(request(Method::POST, "/companies", None, Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({ "error": { "message": "Unauthorized", "status": 401 } })
        );

        let user = token("u1", false);
        let response = app()
            .oneshot(request(Method::POST, "/companies", Some(&user), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_anonymous() {
        let forged = create_token(&Claims::new("admin", true), "wrong").unwrap();
        let response = app()
            .oneshot(request(Method::DELETE, "/jobs/1", Some(&forged), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_company_invalid_body() {
        let admin = token("admin", true);
        let body = json!({ "handle": "new", "numEmployees": 10 });
        let response = app()
            .oneshot(request(Method::POST, "/companies", Some(&admin), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"]["message"].is_array());
    }

    #[tokio::test]
    async fn test_filter_min_greater_than_max() {
        let response = app()
            .oneshot(request(
                Method::GET,
                "/companies?minEmployees=500&maxEmployees=10",
                None,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            json!("min needs to be less than max input")
        );
    }

    #[tokio::test]
    async fn test_filter_schema_errors() {
        let response = app()
            .oneshot(request(Method::GET, "/companies?minEmployees=lots", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app()
            .oneshot(request(Method::GET, "/companies?color=red", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app()
            .oneshot(request(Method::GET, "/jobs?hasEquity=maybe", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_patch_is_rejected() {
        let admin = token("admin", true);
        let response = app()
            .oneshot(request(Method::PATCH, "/companies/c1", Some(&admin), Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["message"], json!("No data"));
    }

    #[tokio::test]
    async fn test_patch_cannot_change_handle() {
        let admin = token("admin", true);
        let response = app()
            .oneshot(request(
                Method::PATCH,
                "/companies/c1",
                Some(&admin),
                Some(json!({ "handle": "c1-new" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app()
            .oneshot(request(Method::GET, "/nowhere", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["status"], json!(404));
    }

    #[tokio::test]
    async fn test_unparsable_path_id_is_json_400() {
        let response = app()
            .oneshot(request(Method::GET, "/jobs/abc", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = json_body(response).await;
        assert_eq!(body["error"]["status"], json!(400));
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_json_400() {
        let admin = token("admin", true);
        let malformed = Request::builder()
            .method(Method::POST)
            .uri("/companies")
            .header(header::AUTHORIZATION, format!("Bearer {admin}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{bad"))
            .unwrap();

        let response = app().oneshot(malformed).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["status"], json!(400));
        assert!(body["error"]["message"].is_string());

        // 缺少 content-type 同样走统一错误体
        let untyped = Request::builder()
            .method(Method::PATCH)
            .uri("/jobs/1")
            .header(header::AUTHORIZATION, format!("Bearer {admin}"))
            .body(Body::from(r#"{"title":"x"}"#))
            .unwrap();
        let response = app().oneshot(untyped).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["status"], json!(400));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_company_lifecycle_over_http() {
        let db = crate::infra::db::test_pool().await;
        let app = router(Arc::new(AppState {
            db,
            secret_key: SECRET.to_string(),
        }));
        let admin = token("admin", true);
        let handle = format!("h-{}", &uuid::Uuid::new_v4().simple().to_string()[..12]);
        let company = json!({
            "handle": handle,
            "name": format!("Http {handle}"),
            "description": "DescNew",
            "numEmployees": 10,
            "logoUrl": "http://new.img"
        });

        let response = app
            .clone()
            .oneshot(request(Method::POST, "/companies", Some(&admin), Some(company.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await, json!({ "company": company }));

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/jobs",
                Some(&admin),
                Some(json!({ "title": "J1", "salary": 1, "equity": "0.1", "companyHandle": handle })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let job = json_body(response).await;
        assert_eq!(job["job"]["equity"], json!("0.1"));

        let response = app
            .clone()
            .oneshot(request(Method::GET, &format!("/companies/{handle}"), None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["company"]["numEmployees"], json!(10));
        assert_eq!(body["company"]["jobs"][0]["title"], json!("J1"));

        let response = app
            .clone()
            .oneshot(request(
                Method::GET,
                &format!("/companies?nameLike={handle}&minEmployees=5&maxEmployees=10"),
                None,
                None,
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["companies"].as_array().map(Vec::len), Some(1));

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, &format!("/companies/{handle}"), Some(&admin), None))
            .await
            .unwrap();
        assert_eq!(json_body(response).await, json!({ "deleted": handle }));

        let response = app
            .oneshot(request(Method::GET, &format!("/companies/{handle}"), None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
