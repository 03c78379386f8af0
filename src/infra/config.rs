use anyhow::Context;
use std::net::{IpAddr, SocketAddr};
use tracing::warn;

const DEFAULT_SECRET_KEY: &str = "secret-dev";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
}

impl Config {
    /// 读取 .env 与进程环境变量
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret_key = match lookup("SECRET_KEY") {
            Some(key) if !key.is_empty() => key,
            _ => {
                warn!("SECRET_KEY 未设置，使用开发默认值");
                DEFAULT_SECRET_KEY.to_string()
            }
        };

        let ip: IpAddr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse()
            .context("BIND_ADDR must be an IP address")?;
        let port: u16 = lookup("PORT")
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("PORT must be a number between 0 and 65535")?
            .unwrap_or(3001);
        let db_max_connections: u32 = lookup("DB_MAX_CONNECTIONS")
            .map(|n| n.parse::<u32>())
            .transpose()
            .context("DB_MAX_CONNECTIONS must be a positive number")?
            .unwrap_or(5);

        Ok(Self {
            database_url,
            secret_key,
            bind_addr: SocketAddr::new(ip, port),
            db_max_connections,
        })
    }
}
