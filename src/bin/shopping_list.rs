use anyhow::{bail, Context};
use clap::Parser;
use foodgram::core::layout::format_line;
use foodgram::core::RecipeStore;
use foodgram::utils::{logger, validation::Validate};
use foodgram::{
    FoodgramConfig, InMemoryStore, ShoppingListRenderer, ShoppingListService, Typeface,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "shopping-list")]
#[command(about = "Render a user's shopping list to a PDF file")]
struct Args {
    /// Username whose cart is rendered
    #[arg(short, long)]
    user: String,

    /// JSON fixtures holding users, recipes and carts
    #[arg(short, long)]
    fixtures: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TrueType font to embed
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output file
    #[arg(short, long, default_value = "shopping_cart.pdf")]
    output: PathBuf,

    /// Print the aggregated lines without writing a PDF
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FoodgramConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
        None => FoodgramConfig::default(),
    };

    logger::init_logger(config.logging.json, args.verbose);
    if let Some(fixtures) = args.fixtures.clone() {
        config.store.fixtures_path = Some(fixtures);
    }
    if let Some(font) = args.font.clone() {
        config.document.font_path = Some(font);
    }
    config.validate().context("Configuration validation failed")?;

    let Some(fixtures_path) = config.store.fixtures_path.clone() else {
        bail!("No fixtures given; pass --fixtures or set store.fixtures_path");
    };
    let store = Arc::new(
        InMemoryStore::from_file(&fixtures_path)
            .with_context(|| format!("Failed to load fixtures '{}'", fixtures_path.display()))?,
    );

    let user = store
        .user_by_username(&args.user)
        .await?
        .with_context(|| format!("Unknown user '{}'", args.user))?;

    let typeface = Typeface::load(config.document.font_path.as_deref())?;
    let renderer = ShoppingListRenderer::new(config.layout_settings()?, typeface);
    let service = ShoppingListService::new(store, renderer);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no file will be written");
        let lines = service.lines(&user).await?;
        if lines.is_empty() {
            println!("Shopping cart of {} is empty", user.username);
        }
        for (i, line) in lines.iter().enumerate() {
            println!("{}", format_line(i + 1, line));
        }
        return Ok(());
    }

    let document = service.build(&user).await?;
    tokio::fs::write(&args.output, &document)
        .await
        .with_context(|| format!("Failed to write '{}'", args.output.display()))?;

    println!("✅ Shopping list saved to: {}", args.output.display());
    Ok(())
}
