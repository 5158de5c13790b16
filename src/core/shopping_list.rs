use crate::core::aggregator::aggregate;
use crate::core::renderer::ShoppingListRenderer;
use crate::core::{IngredientLine, RecipeStore};
use crate::domain::model::User;
use crate::utils::error::{FoodgramError, Result};
use std::sync::Arc;
use std::time::Instant;

pub const CONTENT_TYPE: &str = "application/pdf";
pub const FILENAME: &str = "shopping_cart.pdf";

/// Aggregates a user's cart and renders it, one request at a time.
#[derive(Clone)]
pub struct ShoppingListService {
    store: Arc<dyn RecipeStore>,
    renderer: ShoppingListRenderer,
}

impl ShoppingListService {
    pub fn new(store: Arc<dyn RecipeStore>, renderer: ShoppingListRenderer) -> Self {
        Self { store, renderer }
    }

    pub async fn lines(&self, user: &User) -> Result<Vec<IngredientLine>> {
        aggregate(self.store.as_ref(), user.id).await
    }

    pub async fn build(&self, user: &User) -> Result<Vec<u8>> {
        let started = Instant::now();

        let lines = self.lines(user).await?;

        let renderer = self.renderer.clone();
        let display_name = user.display_name().to_string();
        let line_count = lines.len();
        let document = tokio::task::spawn_blocking(move || renderer.render(&display_name, &lines))
            .await
            .map_err(|e| FoodgramError::RenderError {
                message: format!("Render task failed: {}", e),
            })??;

        tracing::info!(
            "Built shopping list for {}: {} lines, {} bytes in {:?}",
            user.username,
            line_count,
            document.len(),
            started.elapsed()
        );

        Ok(document)
    }
}
