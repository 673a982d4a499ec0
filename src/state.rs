use std::sync::Arc;

use crate::config::AppConfig;
use crate::infra::db::Db;
use crate::infra::images::ImageStore;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: AppConfig,
    pub images: ImageStore,
}

impl AppState {
    pub fn new(db: Db, config: AppConfig) -> Arc<Self> {
        let images = ImageStore::new(&config.public_dir);
        Arc::new(Self { db, config, images })
    }
}
