pub mod aggregator;
pub mod layout;
pub mod permissions;
pub mod renderer;
pub mod shopping_list;

pub use crate::domain::model::{CartItem, IngredientLine};
pub use crate::domain::ports::{FontMetrics, RecipeStore};
pub use crate::utils::error::Result;
