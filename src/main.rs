use anyhow::{anyhow, Context, Result};
use shopping_list::cli::{parse_args, render_text, resolve_group_mode, OutputFormat};
use shopping_list::config::{AppConfig, ITEMS_FILE_ENV_VAR};
use shopping_list::feature_flags::{FeatureFlagService, StaticFlagStore};
use shopping_list::logging::LoggingConfig;
use shopping_list::shopping::{build_shopping_list, load_items, ShoppingListSummary};
use std::path::Path;
use tokio::fs;
use tracing::info;

async fn load_flag_service(path: &Path, config: &AppConfig) -> Result<FeatureFlagService<StaticFlagStore>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read feature flags file '{}'", path.display()))?;
    let store = StaticFlagStore::from_json(&content)
        .with_context(|| format!("Invalid feature flags file '{}'", path.display()))?;
    Ok(FeatureFlagService::new(store, config.feature_flag_ttl))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env before reading any configuration

    let cli_args = parse_args();

    let mut logging = LoggingConfig::from_env();
    if cli_args.verbose {
        logging.level = "debug".to_string();
    }
    logging.init()?;

    let config = AppConfig::from_env();

    let items_file = cli_args
        .items_file
        .clone()
        .or_else(|| config.items_file.clone())
        .ok_or_else(|| anyhow!("No items file given; pass --items-file or set {}", ITEMS_FILE_ENV_VAR))?;

    let mut flag_service = match cli_args.flags_file.as_deref() {
        Some(path) => Some(load_flag_service(path, &config).await?),
        None => None,
    };
    let mode = resolve_group_mode(
        cli_args.group_by,
        flag_service.as_mut(),
        cli_args.user_id.as_deref(),
        config.group_mode,
    )
    .context("Failed to resolve feature flags")?;

    info!(items_file = %items_file.display(), mode = %mode, "building shopping list");
    let items = load_items(&items_file)
        .await
        .with_context(|| format!("Failed to load shopping items from '{}'", items_file.display()))?;

    let groups = build_shopping_list(&items, mode);
    let summary = ShoppingListSummary::from_groups(items.len(), &groups);

    match cli_args.format {
        OutputFormat::Text => print!("{}", render_text(&groups, &summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
    }

    Ok(())
}
