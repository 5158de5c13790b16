use crate::domain::model::{
    CartItem, Ingredient, Recipe, RecipeDetail, RecipeFilter, RecipeId, User, UserId,
};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn user_by_token(&self, token: &str) -> Result<Option<User>>;
    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn recipe(&self, id: RecipeId) -> Result<Option<Recipe>>;

    /// Recipes matching `filter`, newest first.
    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<RecipeDetail>>;
    async fn recipe_detail(
        &self,
        id: RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<RecipeDetail>>;

    /// Every ingredient row of every recipe in the user's cart, read as one snapshot.
    async fn cart_snapshot(&self, user_id: UserId) -> Result<Vec<CartItem>>;

    /// Returns `false` when the recipe was already in the cart.
    async fn add_to_cart(&self, user_id: UserId, recipe_id: RecipeId) -> Result<bool>;
    /// Returns `false` when the recipe was not in the cart.
    async fn remove_from_cart(&self, user_id: UserId, recipe_id: RecipeId) -> Result<bool>;

    async fn add_favorite(&self, user_id: UserId, recipe_id: RecipeId) -> Result<bool>;
    async fn remove_favorite(&self, user_id: UserId, recipe_id: RecipeId) -> Result<bool>;

    /// Case-insensitive "starts with" search, ordered by name.
    async fn search_ingredients(&self, prefix: Option<&str>) -> Result<Vec<Ingredient>>;
}

pub trait FontMetrics: Send + Sync {
    /// Width of `text` in points when set at `font_size`.
    fn string_width(&self, text: &str, font_size: f32) -> f32;
}
