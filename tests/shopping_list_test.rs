use anyhow::Result;
use foodgram::adapters::memory_store::Fixtures;
use foodgram::core::aggregator::aggregate;
use foodgram::core::layout::{LayoutSettings, Section};
use foodgram::core::RecipeStore;
use foodgram::{
    FoodgramConfig, FoodgramError, IngredientLine, InMemoryStore, ShoppingListRenderer,
    ShoppingListService, Typeface,
};
use std::sync::Arc;
use tempfile::TempDir;

const FIXTURES: &str = r#"{
    "users": [
        {"id": 1, "username": "Alice", "email": "alice@example.com", "token": "a"},
        {"id": 2, "username": "bob", "email": "bob@example.com", "token": "b"}
    ],
    "ingredients": [
        {"id": 1, "name": "Salt", "measurement_unit": "g"},
        {"id": 2, "name": "Flour", "measurement_unit": "g"},
        {"id": 3, "name": "Eggs", "measurement_unit": "pcs"},
        {"id": 4, "name": "Milk", "measurement_unit": "ml"}
    ],
    "recipes": [
        {"id": 1, "author": 2, "name": "Bread", "cooking_time": 60,
         "ingredients": [{"id": 1, "amount": 5}, {"id": 2, "amount": 200}]},
        {"id": 2, "author": 2, "name": "Pancakes", "cooking_time": 20,
         "ingredients": [{"id": 1, "amount": 10}, {"id": 3, "amount": 2}, {"id": 4, "amount": 300}]},
        {"id": 3, "author": 1, "name": "Omelette", "cooking_time": 10,
         "ingredients": [{"id": 3, "amount": 3}, {"id": 4, "amount": 50}]}
    ],
    "shopping_cart": [
        {"user": 1, "recipe": 1},
        {"user": 1, "recipe": 2},
        {"user": 1, "recipe": 3}
    ]
}"#;

fn store() -> InMemoryStore {
    InMemoryStore::from_fixtures(Fixtures::from_json_str(FIXTURES).unwrap()).unwrap()
}

fn renderer() -> ShoppingListRenderer {
    ShoppingListRenderer::new(LayoutSettings::default(), Typeface::Courier)
}

#[tokio::test]
async fn test_cart_is_aggregated_across_recipes() -> Result<()> {
    let store = store();

    let lines = aggregate(&store, 1).await?;

    assert_eq!(
        lines,
        vec![
            IngredientLine::new("Eggs", "pcs", 5),
            IngredientLine::new("Flour", "g", 200),
            IngredientLine::new("Milk", "ml", 350),
            IngredientLine::new("Salt", "g", 15),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_aggregation_is_repeatable() -> Result<()> {
    let store = store();

    let first = aggregate(&store, 1).await?;
    let second = aggregate(&store, 1).await?;

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_cart_changes_are_seen_by_next_request() -> Result<()> {
    let store = store();

    store.remove_from_cart(1, 2).await?;
    let lines = aggregate(&store, 1).await?;

    assert_eq!(
        lines,
        vec![
            IngredientLine::new("Eggs", "pcs", 3),
            IngredientLine::new("Flour", "g", 200),
            IngredientLine::new("Milk", "ml", 50),
            IngredientLine::new("Salt", "g", 5),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_empty_cart_renders_header_and_footer() -> Result<()> {
    let store = Arc::new(store());
    let bob = store.user_by_username("bob").await?.unwrap();
    let service = ShoppingListService::new(store, renderer());

    let lines = service.lines(&bob).await?;
    assert!(lines.is_empty());

    let layout = renderer().layout(bob.display_name(), &lines);
    assert!(layout.body_lines().is_empty());
    assert_eq!(layout.section(Section::Header).count(), 1);
    assert_eq!(layout.section(Section::Footer).count(), 2);

    let document = service.build(&bob).await?;
    assert!(document.starts_with(b"%PDF-"));
    Ok(())
}

#[tokio::test]
async fn test_body_lines_are_numbered() -> Result<()> {
    let store = store();
    let lines = aggregate(&store, 1).await?;

    let layout = renderer().layout("Alice", &lines);

    assert_eq!(
        layout.body_lines(),
        vec![
            "1. Eggs - 5 pcs",
            "2. Flour - 200 g",
            "3. Milk - 350 ml",
            "4. Salt - 15 g",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_single_line_document() -> Result<()> {
    let layout = renderer().layout("Alice", &[IngredientLine::new("Flour", "g", 200)]);

    assert_eq!(layout.body_lines(), vec!["1. Flour - 200 g"]);
    let header = layout.section(Section::Header).next().unwrap();
    assert_eq!(header.text, "Shopping list for Alice");

    let document = renderer().render("Alice", &[IngredientLine::new("Flour", "g", 200)])?;
    assert!(document.starts_with(b"%PDF-"));
    Ok(())
}

#[tokio::test]
async fn test_config_driven_renderer_writes_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let fixtures_path = temp_dir.path().join("fixtures.json");
    tokio::fs::write(&fixtures_path, FIXTURES).await?;

    let config = FoodgramConfig::from_toml_str(&format!(
        "[store]\nfixtures_path = \"{}\"\n\n[document]\nbody_font_size = 12\n",
        fixtures_path.to_string_lossy().replace('\\', "/")
    ))?;
    let store = Arc::new(InMemoryStore::from_file(config.store.fixtures_path.as_ref().unwrap())?);
    let alice = store.user_by_username("Alice").await?.unwrap();

    let renderer = ShoppingListRenderer::new(
        config.layout_settings()?,
        Typeface::load(config.document.font_path.as_deref())?,
    );
    let service = ShoppingListService::new(store, renderer.clone());

    let lines = service.lines(&alice).await?;
    let layout = renderer.layout(alice.display_name(), &lines);
    assert!(layout
        .section(Section::Body)
        .all(|run| run.font_size == 12.0));

    let output = temp_dir.path().join("shopping_cart.pdf");
    tokio::fs::write(&output, service.build(&alice).await?).await?;
    assert!(std::fs::metadata(&output)?.len() > 0);
    Ok(())
}

#[tokio::test]
async fn test_bundled_config_and_fixtures_load() -> Result<()> {
    use foodgram::utils::validation::Validate;

    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let config = FoodgramConfig::from_file(root.join("foodgram.toml"))?;
    match std::env::var("FOODGRAM_FONT") {
        Ok(_) => config.validate()?,
        Err(_) => assert!(matches!(
            config.validate(),
            Err(FoodgramError::MissingConfigError { .. })
        )),
    }
    assert_eq!(config.layout_settings()?, LayoutSettings::default());

    let store = InMemoryStore::from_file(root.join("data/fixtures.json"))?;
    let alice = store.user_by_username("alice").await?.unwrap();
    let lines = aggregate(&store, alice.id).await?;

    let eggs = lines.iter().find(|l| l.name == "Eggs").unwrap();
    assert_eq!(eggs.amount, 6);
    let flour = lines.iter().find(|l| l.name == "Flour").unwrap();
    assert_eq!(flour.amount, 450);
    Ok(())
}
