use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub upload_dir: PathBuf,
    pub whatsapp_prefix: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("MATJAR_PORT", "8000"),
            database_path: try_load("MATJAR_DB", "shop.db"),
            upload_dir: try_load("MATJAR_UPLOAD_DIR", "uploads"),
            whatsapp_prefix: try_load("MATJAR_WHATSAPP_PREFIX", "2"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
