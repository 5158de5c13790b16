use crate::core::{CartItem, IngredientLine, RecipeStore};
use crate::domain::model::UserId;
use crate::utils::error::Result;
use std::collections::BTreeMap;

/// Reads the user's cart snapshot and sums ingredient amounts per `(name, unit)`.
pub async fn aggregate(store: &dyn RecipeStore, user_id: UserId) -> Result<Vec<IngredientLine>> {
    let items = store.cart_snapshot(user_id).await?;
    tracing::debug!("Cart snapshot for user {}: {} rows", user_id, items.len());

    let lines = aggregate_items(&items);
    tracing::debug!("Aggregated into {} shopping list lines", lines.len());

    Ok(lines)
}

/// Groups cart rows by ingredient name and unit, ordered by name then unit.
pub fn aggregate_items(items: &[CartItem]) -> Vec<IngredientLine> {
    let mut totals: BTreeMap<(&str, &str), u32> = BTreeMap::new();

    for item in items {
        let key = (
            item.ingredient.name.as_str(),
            item.ingredient.measurement_unit.as_str(),
        );
        let total = totals.entry(key).or_insert(0);
        *total = total.saturating_add(item.amount);
    }

    totals
        .into_iter()
        .filter(|(_, amount)| *amount > 0)
        .map(|((name, unit), amount)| IngredientLine::new(name, unit, amount))
        .collect()
}
