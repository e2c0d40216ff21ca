use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: optional_var("DATABASE_MAX_CONNECTIONS")?.unwrap_or(5),
            seed: optional_var("DATABASE_SEED")?.unwrap_or(false),
        };
        let server = ServerConfig {
            host: optional_var("APP_HOST")?.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: optional_var("APP_PORT")?.unwrap_or(8080),
        };
        Ok(Self { database, server })
    }
}

pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// 起動時にサンプルの蔵書データを投入するかどうか
    pub seed: bool,
}

pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn optional_var<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(None),
    }
}
