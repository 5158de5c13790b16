use std::sync::Arc;

use crate::adapters::{fonts::Typeface, memory_store::InMemoryStore};
use crate::config::FoodgramConfig;
use crate::core::{renderer::ShoppingListRenderer, shopping_list::ShoppingListService, RecipeStore};
use crate::utils::error::Result;

pub struct AppState {
    pub config: FoodgramConfig,
    pub store: Arc<dyn RecipeStore>,
    pub shopping_list: ShoppingListService,
}

impl AppState {
    /// Builds the store from `store.fixtures_path` and loads the document font.
    pub fn new(config: FoodgramConfig) -> Result<Arc<Self>> {
        let store: Arc<dyn RecipeStore> = match &config.store.fixtures_path {
            Some(path) => {
                tracing::info!("Loading fixtures from {}", path.display());
                Arc::new(InMemoryStore::from_file(path)?)
            }
            None => {
                tracing::warn!("No fixtures configured, starting with an empty store");
                Arc::new(InMemoryStore::new())
            }
        };

        Self::with_store(config, store)
    }

    pub fn with_store(config: FoodgramConfig, store: Arc<dyn RecipeStore>) -> Result<Arc<Self>> {
        let typeface = Typeface::load(config.document.font_path.as_deref())?;
        let renderer = ShoppingListRenderer::new(config.layout_settings()?, typeface);
        let shopping_list = ShoppingListService::new(store.clone(), renderer);

        Ok(Arc::new(Self {
            config,
            store,
            shopping_list,
        }))
    }
}
