pub mod companies;
pub mod config;
pub mod db;
pub mod jobs;
