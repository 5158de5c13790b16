//! Foodgram shopping list service.
//!
//! Users collect recipes in a shopping cart; the service sums the ingredient
//! amounts across the cart and serves them as a one-page PDF.
//!
//! - `domain`: models and the store/font ports
//! - `core`: aggregation, page layout, permission table, the shopping list service
//! - `adapters`: in-memory store, font loading, PDF serialization
//! - `api`: axum routes and token authentication
//! - `config`: TOML configuration and CLI overrides
pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{fonts::Typeface, memory_store::InMemoryStore};
pub use config::FoodgramConfig;
pub use self::core::{renderer::ShoppingListRenderer, shopping_list::ShoppingListService};
pub use domain::model::IngredientLine;
pub use utils::error::{FoodgramError, Result};
