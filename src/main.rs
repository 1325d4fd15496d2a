use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use til::app::{App, AppEvent};
use til::categories::CategoryFilter;
use til::config::Config;
use til::store::{StoreClient, StoreConfig};
use til::theme::ThemeVariant;
use til::ui;

/// Request timeout for board round trips.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "til", about = "Terminal client for a shared facts board")]
struct Args {
    /// Board endpoint root (overrides the config file)
    #[arg(long, value_name = "URL")]
    store_url: Option<String>,

    /// Category to open with: "all" or a category name
    #[arg(long, value_name = "NAME")]
    category: Option<String>,

    /// Theme to start in ("dark" or "light")
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,
}

/// Get the config directory path (~/.config/til/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("til"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    let config_path = config_dir.join("config.toml");
    let config = Config::load(&config_path).context("Failed to load configuration")?;

    let store_url = match args.store_url.or_else(|| config.store_url.clone()) {
        Some(url) => url,
        None => {
            eprintln!("No facts board configured.");
            eprintln!();
            eprintln!("Point til at one with either:");
            eprintln!("  til --store-url https://<project>.supabase.co");
            eprintln!(
                "  echo 'store_url = \"https://<project>.supabase.co\"' >> {}",
                config_path.display()
            );
            eprintln!();
            eprintln!("The board key goes in TIL_STORE_KEY or the store_key config entry.");
            std::process::exit(2);
        }
    };

    let api_key = config.resolved_store_key(std::env::var("TIL_STORE_KEY").ok());
    if api_key.is_none() {
        tracing::warn!("No board key configured, requests will go out without credentials");
    }

    // Startup filter: CLI wins, then the config file, then "all"
    let category_name = args
        .category
        .unwrap_or_else(|| config.default_category.clone());
    let filter = match CategoryFilter::parse(&category_name) {
        Some(filter) => filter,
        None => {
            eprintln!("Unknown category '{}', starting on 'all'", category_name);
            CategoryFilter::All
        }
    };

    let theme_name = args.theme.unwrap_or_else(|| config.theme.clone());
    let theme = match ThemeVariant::from_str_name(&theme_name) {
        Some(theme) => theme,
        None => {
            eprintln!("Unknown theme '{}', using 'dark'", theme_name);
            ThemeVariant::Dark
        }
    };

    let store = StoreClient::new(StoreConfig {
        base_url: store_url,
        api_key,
        timeout: REQUEST_TIMEOUT,
    })
    .context("Failed to set up the board client")?;

    // Create app state
    let mut app = App::new(Arc::new(store), filter, theme);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
