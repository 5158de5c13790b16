use crate::core::{CartItem, RecipeStore};
use crate::domain::model::{
    Author, Ingredient, IngredientId, Recipe, RecipeDetail, RecipeFilter, RecipeId,
    RecipeIngredient, User, UserId,
};
use crate::utils::error::{FoodgramError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Membership {
    pub user: UserId,
    pub recipe: RecipeId,
}

/// Seed data, usually read from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub shopping_cart: Vec<Membership>,
    #[serde(default)]
    pub favorites: Vec<Membership>,
}

impl Fixtures {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let fixtures: Fixtures = serde_json::from_str(content)?;
        Ok(fixtures)
    }

    fn invalid(message: String) -> FoodgramError {
        FoodgramError::StoreError { message }
    }

    pub fn check(&self) -> Result<()> {
        let user_ids: HashSet<UserId> = self.users.iter().map(|u| u.id).collect();
        if user_ids.len() != self.users.len() {
            return Err(Self::invalid("Duplicate user id".to_string()));
        }

        let mut tokens = HashSet::new();
        for user in &self.users {
            if !tokens.insert(user.token.as_str()) {
                return Err(Self::invalid(format!("Duplicate token for user {}", user.username)));
            }
        }

        let mut ingredient_ids = HashSet::new();
        let mut ingredient_keys = HashSet::new();
        for ingredient in &self.ingredients {
            if !ingredient_ids.insert(ingredient.id) {
                return Err(Self::invalid(format!("Duplicate ingredient id {}", ingredient.id)));
            }
            if !ingredient_keys.insert((&ingredient.name, &ingredient.measurement_unit)) {
                return Err(Self::invalid(format!(
                    "Ingredient '{}' ({}) declared twice",
                    ingredient.name, ingredient.measurement_unit
                )));
            }
        }

        let mut recipe_ids = HashSet::new();
        for recipe in &self.recipes {
            if !recipe_ids.insert(recipe.id) {
                return Err(Self::invalid(format!("Duplicate recipe id {}", recipe.id)));
            }
            if !user_ids.contains(&recipe.author) {
                return Err(Self::invalid(format!(
                    "Recipe {} has unknown author {}",
                    recipe.id, recipe.author
                )));
            }
            if recipe.cooking_time < 1 {
                return Err(Self::invalid(format!(
                    "Recipe {} cooking time must be at least 1",
                    recipe.id
                )));
            }

            let mut seen = HashSet::new();
            for entry in &recipe.ingredients {
                if !ingredient_ids.contains(&entry.id) {
                    return Err(Self::invalid(format!(
                        "Recipe {} references unknown ingredient {}",
                        recipe.id, entry.id
                    )));
                }
                if entry.amount == 0 {
                    return Err(Self::invalid(format!(
                        "Recipe {} has a zero amount for ingredient {}",
                        recipe.id, entry.id
                    )));
                }
                if !seen.insert(entry.id) {
                    return Err(Self::invalid(format!(
                        "Recipe {} lists ingredient {} twice",
                        recipe.id, entry.id
                    )));
                }
            }
        }

        for row in self.shopping_cart.iter().chain(&self.favorites) {
            if !user_ids.contains(&row.user) || !recipe_ids.contains(&row.recipe) {
                return Err(Self::invalid(format!(
                    "Membership ({}, {}) references unknown user or recipe",
                    row.user, row.recipe
                )));
            }
        }

        Ok(())
    }
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    recipes: BTreeMap<RecipeId, Recipe>,
    shopping_cart: BTreeSet<Membership>,
    favorites: BTreeSet<Membership>,
}

fn is_member(rows: &BTreeSet<Membership>, viewer: Option<UserId>, recipe: RecipeId) -> bool {
    viewer.is_some_and(|user| rows.contains(&Membership { user, recipe }))
}

impl Tables {
    fn detail(&self, recipe: &Recipe, viewer: Option<UserId>) -> Result<RecipeDetail> {
        let author = self
            .users
            .get(&recipe.author)
            .ok_or_else(|| FoodgramError::StoreError {
                message: format!("Author {} of recipe {} vanished", recipe.author, recipe.id),
            })?;

        let mut ingredients = recipe
            .ingredients
            .iter()
            .map(|entry| -> Result<RecipeIngredient> {
                let ingredient = self.ingredients.get(&entry.id).ok_or_else(|| {
                    FoodgramError::StoreError {
                        message: format!("Ingredient {} vanished from the store", entry.id),
                    }
                })?;
                Ok(RecipeIngredient {
                    id: ingredient.id,
                    name: ingredient.name.clone(),
                    measurement_unit: ingredient.measurement_unit.clone(),
                    amount: entry.amount,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(RecipeDetail {
            id: recipe.id,
            author: Author::from(author),
            ingredients,
            is_favorited: is_member(&self.favorites, viewer, recipe.id),
            is_in_shopping_cart: is_member(&self.shopping_cart, viewer, recipe.id),
            name: recipe.name.clone(),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
        })
    }
}

/// Process-local store; all state is lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixtures(fixtures: Fixtures) -> Result<Self> {
        fixtures.check()?;

        tracing::info!(
            "Loaded fixtures: {} users, {} ingredients, {} recipes, {} cart rows",
            fixtures.users.len(),
            fixtures.ingredients.len(),
            fixtures.recipes.len(),
            fixtures.shopping_cart.len()
        );

        let tables = Tables {
            users: fixtures.users.into_iter().map(|u| (u.id, u)).collect(),
            ingredients: fixtures.ingredients.into_iter().map(|i| (i.id, i)).collect(),
            recipes: fixtures.recipes.into_iter().map(|r| (r.id, r)).collect(),
            shopping_cart: fixtures.shopping_cart.into_iter().collect(),
            favorites: fixtures.favorites.into_iter().collect(),
        };

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_fixtures(Fixtures::from_file(path)?)
    }
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn user_by_token(&self, token: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.token == token).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn recipe(&self, id: RecipeId) -> Result<Option<Recipe>> {
        let tables = self.tables.read().await;
        Ok(tables.recipes.get(&id).cloned())
    }

    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<RecipeDetail>> {
        let tables = self.tables.read().await;

        // ids grow with creation time
        tables
            .recipes
            .values()
            .rev()
            .filter(|r| filter.author.map_or(true, |author| r.author == author))
            .filter(|r| !filter.is_favorited || is_member(&tables.favorites, filter.viewer, r.id))
            .filter(|r| {
                !filter.is_in_shopping_cart
                    || is_member(&tables.shopping_cart, filter.viewer, r.id)
            })
            .map(|r| tables.detail(r, filter.viewer))
            .collect()
    }

    async fn recipe_detail(
        &self,
        id: RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<RecipeDetail>> {
        let tables = self.tables.read().await;
        tables
            .recipes
            .get(&id)
            .map(|recipe| tables.detail(recipe, viewer))
            .transpose()
    }

    async fn cart_snapshot(&self, user_id: UserId) -> Result<Vec<CartItem>> {
        let tables = self.tables.read().await;
        let mut items = Vec::new();

        let rows = tables
            .shopping_cart
            .range(Membership { user: user_id, recipe: RecipeId::MIN }..=Membership {
                user: user_id,
                recipe: RecipeId::MAX,
            });

        for row in rows {
            let Some(recipe) = tables.recipes.get(&row.recipe) else {
                continue;
            };
            for entry in &recipe.ingredients {
                let ingredient = tables.ingredients.get(&entry.id).ok_or_else(|| {
                    FoodgramError::StoreError {
                        message: format!("Ingredient {} vanished from the store", entry.id),
                    }
                })?;
                items.push(CartItem {
                    recipe_id: recipe.id,
                    ingredient: ingredient.clone(),
                    amount: entry.amount,
                });
            }
        }

        Ok(items)
    }

    async fn add_to_cart(&self, user_id: UserId, recipe_id: RecipeId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.shopping_cart.insert(Membership {
            user: user_id,
            recipe: recipe_id,
        }))
    }

    async fn remove_from_cart(&self, user_id: UserId, recipe_id: RecipeId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.shopping_cart.remove(&Membership {
            user: user_id,
            recipe: recipe_id,
        }))
    }

    async fn add_favorite(&self, user_id: UserId, recipe_id: RecipeId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.favorites.insert(Membership {
            user: user_id,
            recipe: recipe_id,
        }))
    }

    async fn remove_favorite(&self, user_id: UserId, recipe_id: RecipeId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.favorites.remove(&Membership {
            user: user_id,
            recipe: recipe_id,
        }))
    }

    async fn search_ingredients(&self, prefix: Option<&str>) -> Result<Vec<Ingredient>> {
        let tables = self.tables.read().await;
        let prefix = prefix.map(str::to_lowercase);

        let mut found: Vec<Ingredient> = tables
            .ingredients
            .values()
            .filter(|i| match &prefix {
                Some(p) => i.name.to_lowercase().starts_with(p.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(found)
    }
}
