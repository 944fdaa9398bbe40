//! ClothingDrop CLI - browse the catalog, manage the cart and track orders.
//!
//! # Usage
//!
//! ```bash
//! # List on-sale products, cheapest first
//! cd-cli products list --on-sale --sort asc
//!
//! # Products between R500 and R1,000
//! cd-cli products list --band 2
//!
//! # Add two dresses in size M and place the order
//! cd-cli cart add 1 M
//! cd-cli cart add 1 M
//! cd-cli orders place
//!
//! # Track it
//! cd-cli orders track CD-20250614-001
//! ```
//!
//! State lives in `CLOTHINGDROP_DATA_DIR` (default `.clothingdrop`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use clothing_drop_core::ZAR_PRICE_BANDS;
use clothing_drop_storefront::Storefront;
use clothing_drop_storefront::catalog::{DEFAULT_LIMIT, PriceSort, ProductFilter};
use clothing_drop_storefront::config::StorefrontConfig;
use clothing_drop_storefront::storage::{FileStore, KeyValueStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cd-cli")]
#[command(author, version, about = "ClothingDrop storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place and track orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Exact category ("All" for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Search name and description
        #[arg(short, long)]
        search: Option<String>,

        /// Only products on sale
        #[arg(long)]
        on_sale: bool,

        /// Price band number (see `products bands`)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        band: Option<u8>,

        /// Sort by price
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Skip this many results
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Maximum results
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Show one product
    Show {
        /// Product ID
        id: i32,
    },
    /// List categories with their price ranges
    Categories,
    /// List price bands
    Bands,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: i32,
        /// Size
        size: String,
        /// Amount added to an existing line (new lines start at 1)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        /// Product ID
        id: i32,
        /// Size
        size: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: i32,
        /// Size
        size: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Place the cart as an order
    Place,
    /// List orders, newest first
    List,
    /// Show an order's timeline and delivery estimate
    Track {
        /// Order number (CD-YYYYMMDD-NNN)
        order_number: String,
    },
    /// Show the most recent order
    Latest,
    /// Move an order to a new status
    Status {
        /// Order number (CD-YYYYMMDD-NNN)
        order_number: String,
        /// New status (confirmed, preparing, `in_transit`, delivered, cancelled)
        status: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "clothing_drop_storefront=info,cd_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir.clone()));
    let mut storefront: Storefront = Storefront::init(config, storage, None);

    let result = match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List {
                category,
                search,
                on_sale,
                band,
                sort,
                offset,
                limit,
            } => {
                let price_band = band
                    .and_then(|band| ZAR_PRICE_BANDS.get(usize::from(band).saturating_sub(1)))
                    .copied();
                let sort = sort.map(|s| match s {
                    SortArg::Asc => PriceSort::Ascending,
                    SortArg::Desc => PriceSort::Descending,
                });
                commands::products::list(
                    &storefront,
                    ProductFilter {
                        category,
                        search,
                        price_band,
                        on_sale_only: on_sale,
                        sort,
                        offset,
                        limit,
                    },
                );
                Ok(())
            }
            ProductAction::Show { id } => commands::products::show(&storefront, id),
            ProductAction::Categories => {
                commands::products::categories(&storefront);
                Ok(())
            }
            ProductAction::Bands => {
                commands::products::bands();
                Ok(())
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show => {
                commands::cart::show(&storefront);
                Ok(())
            }
            CartAction::Add { id, size, quantity } => {
                commands::cart::add(&mut storefront, id, &size, quantity)
            }
            CartAction::Update { id, size, quantity } => {
                commands::cart::update(&mut storefront, id, &size, quantity);
                Ok(())
            }
            CartAction::Remove { id, size } => {
                commands::cart::remove(&mut storefront, id, &size);
                Ok(())
            }
            CartAction::Clear => {
                commands::cart::clear(&mut storefront);
                Ok(())
            }
        },
        Commands::Orders { action } => match action {
            OrderAction::Place => commands::orders::place(&mut storefront),
            OrderAction::List => {
                commands::orders::list(&storefront);
                Ok(())
            }
            OrderAction::Track { order_number } => {
                commands::orders::track(&storefront, &order_number).await
            }
            OrderAction::Latest => {
                commands::orders::latest(&storefront);
                Ok(())
            }
            OrderAction::Status {
                order_number,
                status,
            } => commands::orders::update_status(&mut storefront, &order_number, &status).await,
        },
    };

    storefront.dispose();
    result.map_err(Into::into)
}
