use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{auth::Caller, state::AppState};
use crate::core::permissions::Action;
use crate::core::shopping_list::{CONTENT_TYPE, FILENAME};
use crate::domain::model::{
    Ingredient, Recipe, RecipeDetail, RecipeFilter, RecipeId, RecipeSummary, UserId,
};
use crate::utils::error::{FoodgramError, Result};

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn download_shopping_cart_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Response> {
    let user = caller.require(Action::DownloadShoppingCart)?;
    let document = state.shopping_list.build(&user).await?;

    Ok((
        [
            (header::CONTENT_TYPE, CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", FILENAME),
            ),
        ],
        document,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct IngredientQuery {
    name: Option<String>,
}

pub async fn ingredients_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<Vec<Ingredient>>> {
    caller.allow(Action::ListIngredients)?;
    let ingredients = state.store.search_ingredients(query.name.as_deref()).await?;
    Ok(Json(ingredients))
}

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    author: Option<UserId>,
    is_favorited: Option<String>,
    is_in_shopping_cart: Option<String>,
}

/// Accepts the forms browsers and the web client send: `1`/`0` and `true`/`false`.
fn parse_flag(field: &str, value: Option<&str>) -> Result<bool> {
    match value {
        None | Some("") => Ok(false),
        Some("1" | "true" | "True") => Ok(true),
        Some("0" | "false" | "False") => Ok(false),
        Some(other) => Err(FoodgramError::BadRequest {
            message: format!("'{}' is not a valid value for {}", other, field),
        }),
    }
}

pub async fn recipes_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Query(query): Query<RecipeQuery>,
) -> Result<Json<Vec<RecipeDetail>>> {
    caller.allow(Action::ViewRecipes)?;
    let filter = RecipeFilter {
        viewer: caller.user_id(),
        author: query.author,
        is_favorited: parse_flag("is_favorited", query.is_favorited.as_deref())?,
        is_in_shopping_cart: parse_flag(
            "is_in_shopping_cart",
            query.is_in_shopping_cart.as_deref(),
        )?,
    };

    let recipes = state.store.list_recipes(&filter).await?;
    tracing::debug!("Listed {} recipes for {:?}", recipes.len(), filter);
    Ok(Json(recipes))
}

pub async fn recipe_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<RecipeId>,
) -> Result<Json<RecipeDetail>> {
    caller.allow(Action::ViewRecipes)?;
    state
        .store
        .recipe_detail(id, caller.user_id())
        .await?
        .map(Json)
        .ok_or_else(|| FoodgramError::not_found("Recipe"))
}

/// Per-user recipe lists toggled through POST/DELETE.
#[derive(Debug, Clone, Copy)]
enum RecipeList {
    ShoppingCart,
    Favorites,
}

impl RecipeList {
    fn action(self) -> Action {
        match self {
            RecipeList::ShoppingCart => Action::ShoppingCart,
            RecipeList::Favorites => Action::Favorite,
        }
    }

    fn label(self) -> &'static str {
        match self {
            RecipeList::ShoppingCart => "shopping cart",
            RecipeList::Favorites => "favorites",
        }
    }

    async fn insert(self, state: &AppState, user: UserId, recipe: RecipeId) -> Result<bool> {
        match self {
            RecipeList::ShoppingCart => state.store.add_to_cart(user, recipe).await,
            RecipeList::Favorites => state.store.add_favorite(user, recipe).await,
        }
    }

    async fn remove(self, state: &AppState, user: UserId, recipe: RecipeId) -> Result<bool> {
        match self {
            RecipeList::ShoppingCart => state.store.remove_from_cart(user, recipe).await,
            RecipeList::Favorites => state.store.remove_favorite(user, recipe).await,
        }
    }
}

async fn find_recipe(state: &AppState, id: RecipeId) -> Result<Recipe> {
    state
        .store
        .recipe(id)
        .await?
        .ok_or_else(|| FoodgramError::not_found("Recipe"))
}

async fn add_to_list(
    list: RecipeList,
    state: &AppState,
    caller: Caller,
    id: RecipeId,
) -> Result<(StatusCode, Json<RecipeSummary>)> {
    let user = caller.require(list.action())?;
    let recipe = find_recipe(state, id).await?;

    if !list.insert(state, user.id, recipe.id).await? {
        return Err(FoodgramError::AlreadyExists {
            message: format!("Recipe is already in your {}", list.label()),
        });
    }

    tracing::info!("{} added recipe {} to {}", user.username, recipe.id, list.label());
    Ok((StatusCode::CREATED, Json(RecipeSummary::from(&recipe))))
}

async fn remove_from_list(
    list: RecipeList,
    state: &AppState,
    caller: Caller,
    id: RecipeId,
) -> Result<StatusCode> {
    let user = caller.require(list.action())?;
    let recipe = find_recipe(state, id).await?;

    if !list.remove(state, user.id, recipe.id).await? {
        return Err(FoodgramError::not_found(format!("Recipe in {}", list.label())));
    }

    tracing::info!("{} removed recipe {} from {}", user.username, recipe.id, list.label());
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_to_cart_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<RecipeId>,
) -> Result<(StatusCode, Json<RecipeSummary>)> {
    add_to_list(RecipeList::ShoppingCart, &state, caller, id).await
}

pub async fn remove_from_cart_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode> {
    remove_from_list(RecipeList::ShoppingCart, &state, caller, id).await
}

pub async fn add_favorite_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<RecipeId>,
) -> Result<(StatusCode, Json<RecipeSummary>)> {
    add_to_list(RecipeList::Favorites, &state, caller, id).await
}

pub async fn remove_favorite_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode> {
    remove_from_list(RecipeList::Favorites, &state, caller, id).await
}
