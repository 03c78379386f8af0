pub mod auth;
pub mod query;
pub mod schema;
pub mod sql;
