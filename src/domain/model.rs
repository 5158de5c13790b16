use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type RecipeId = u64;
pub type IngredientId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub token: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_blocked: bool,
}

impl User {
    /// Name printed in the shopping list header.
    pub fn display_name(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub id: IngredientId,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub author: UserId,
    pub name: String,
    #[serde(default)]
    pub text: String,
    pub cooking_time: u32,
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
}

/// Short recipe form returned by the cart and favorite endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub cooking_time: u32,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Public part of a user shown as a recipe author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

/// Full recipe as read back by clients, with the viewer's cart and favorite flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeDetail {
    pub id: RecipeId,
    pub author: Author,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub text: String,
    pub cooking_time: u32,
}

/// Recipe list query. The two flags only ever narrow the list to the viewer's own
/// favorites or cart; an anonymous viewer has neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub viewer: Option<UserId>,
    pub author: Option<UserId>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// One `(recipe, ingredient, amount)` row reachable from a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub recipe_id: RecipeId,
    pub ingredient: Ingredient,
    pub amount: u32,
}

/// Aggregated shopping list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientLine {
    pub name: String,
    pub unit: String,
    pub amount: u32,
}

impl IngredientLine {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, amount: u32) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            amount,
        }
    }
}
