use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, CatalogService, ImageService, RecipeService, SeaOrmAccountService,
    SeaOrmCatalogService, SeaOrmRecipeService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub account_service: Arc<dyn AccountService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub recipe_service: Arc<dyn RecipeService>,

    pub image_service: ImageService,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already connected store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let image_service = ImageService::new(&config.general.media_root);

        let account_service = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AccountService + Send + Sync + 'static>;

        let catalog_service = Arc::new(SeaOrmCatalogService::new(store.clone()))
            as Arc<dyn CatalogService + Send + Sync + 'static>;

        let recipe_service = Arc::new(SeaOrmRecipeService::new(
            store.clone(),
            image_service.clone(),
        )) as Arc<dyn RecipeService + Send + Sync + 'static>;

        Self {
            config: Arc::new(config),
            store,
            account_service,
            catalog_service,
            recipe_service,
            image_service,
        }
    }
}
