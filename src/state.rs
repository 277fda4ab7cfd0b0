use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{BookService, ImageService, SeaOrmBookService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub image_service: Arc<ImageService>,

    pub book_service: Arc<dyn BookService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let image_service = Arc::new(ImageService::new(config.public_root()));

        let book_service = Arc::new(SeaOrmBookService::new(
            store.clone(),
            image_service.clone(),
        )) as Arc<dyn BookService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            image_service,
            book_service,
        })
    }
}
