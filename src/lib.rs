pub mod api;
pub mod core;
pub mod error;
pub mod infra;
pub mod models;

pub mod ax_state {
    use sqlx::PgPool;

    pub struct AppState {
        pub db: PgPool,
        /// JWT 签名密钥
        pub secret_key: String,
    }
}
