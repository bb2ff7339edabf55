use std::sync::Arc;

use tracing::info;

use crate::{
    config::Config,
    database,
    notify::{Notify, WhatsApp},
    uploads,
};

/// Shared per-process state. Handlers open their own database connection per
/// request through [`AppState::connect`]; nothing mutable lives here.
pub struct AppState {
    pub config: Config,
    pub notifier: Arc<dyn Notify>,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let notifier = Arc::new(WhatsApp {
            country_prefix: config.whatsapp_prefix.clone(),
        });

        Self::with_notifier(config, notifier)
    }

    pub fn with_notifier(config: Config, notifier: Arc<dyn Notify>) -> Arc<Self> {
        uploads::ensure_dirs(&config.upload_dir).expect("Upload directory misconfigured!");

        let conn = database::open(&config.database_path).expect("Database misconfigured!");
        database::init_schema(&conn).expect("Schema initialization failed!");

        info!(
            "Storage ready: {} + {}",
            config.database_path.display(),
            config.upload_dir.display()
        );

        Arc::new(Self { config, notifier })
    }

    pub fn connect(&self) -> rusqlite::Result<rusqlite::Connection> {
        database::open(&self.config.database_path)
    }
}
