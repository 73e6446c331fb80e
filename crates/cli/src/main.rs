//! Tavola CLI - Menu and cart tools.
//!
//! # Usage
//!
//! ```bash
//! # List the menu, optionally filtered and sorted
//! tavola menu list --category desserts --sort price-low
//!
//! # Drive the persisted cart (same storage slot as the storefront)
//! tavola cart add 1
//! tavola cart set 1 3
//! tavola cart remove 1
//! tavola cart show
//! tavola cart clear [--purge]
//! ```
//!
//! # Commands
//!
//! - `menu list` - List menu items
//! - `cart` - Show or change the cart
//!
//! Configuration comes from the same `STOREFRONT_*` environment variables as
//! the storefront binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tavola_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "tavola")]
#[command(author, version, about = "Tavola restaurant storefront tools")]
struct Cli {
    /// Override the storage directory (`STOREFRONT_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the menu file (`STOREFRONT_MENU_PATH`)
    #[arg(long, global = true)]
    menu: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the menu
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum MenuAction {
    /// List menu items
    List {
        /// Category (`main-courses`, `appetizers`, `desserts`, `drinks`, `all`)
        #[arg(short, long)]
        category: Option<String>,

        /// Dietary option (`vegetarian`, `vegan`, `gluten-free`, `all`)
        #[arg(short, long)]
        dietary: Option<String>,

        /// Sort order (`recommended`, `price-low`, `price-high`, `rating`)
        #[arg(short, long)]
        sort: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and the order summary
    Show,
    /// Add one unit of a menu item
    Add {
        /// Menu item ID
        id: String,
    },
    /// Remove a cart line
    Remove {
        /// Menu item ID
        id: String,
    },
    /// Set the quantity of a cart line (0 or less removes it)
    Set {
        /// Menu item ID
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear {
        /// Delete the storage slot instead of saving an empty cart
        #[arg(long)]
        purge: bool,
    },
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tavola_cli=info,tavola_storefront=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.cart.data_dir = data_dir;
    }
    if let Some(menu) = cli.menu {
        config.menu_path = menu;
    }

    match cli.command {
        Commands::Menu { action } => match action {
            MenuAction::List {
                category,
                dietary,
                sort,
            } => commands::menu::list(
                &config,
                category.as_deref(),
                dietary.as_deref(),
                sort.as_deref(),
            )?,
        },
        Commands::Cart { action } => {
            let store = commands::cart::open_store(&config);
            let cart = match action {
                CartAction::Show => store.current(),
                CartAction::Add { id } => commands::cart::add(&store, &config, &id)?,
                CartAction::Remove { id } => store.remove_item(id.into()),
                CartAction::Set { id, quantity } => store.update_quantity(id.into(), quantity),
                CartAction::Clear { purge: false } => store.clear(),
                CartAction::Clear { purge: true } => store.purge()?,
            };
            commands::cart::report(&cart, config.tax_rate);
        }
    }
    Ok(())
}
