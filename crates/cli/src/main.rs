//! OmniCart CLI - operator tools that work directly against a data directory.
//!
//! # Usage
//!
//! ```bash
//! # List the merged catalog, filtered and sorted like the HTTP API
//! omnicart products list --category beauty --sort price_asc
//!
//! # Tombstone a product
//! omnicart products delete 7
//!
//! # Inspect orders and shipments
//! omnicart orders list --user 42
//! omnicart shipments list --seller dummy-seller-2
//!
//! # Advance a shipment
//! omnicart shipments status SHP-1700000000000-123 shipped
//!
//! # Rewrite stored documents in the current format
//! omnicart store migrate
//! ```
//!
//! Output is pretty JSON on stdout; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use omnicart_core::{OrderId, ProductId, SellerId, ShipmentId, ShipmentStatus, UserId};
use omnicart_storefront::catalog::ProductQuery;
use omnicart_storefront::config::StorefrontConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "omnicart")]
#[command(author, version, about = "OmniCart operator tools")]
struct Cli {
    /// Storage directory shared with the storefront server. Without one the
    /// command runs against an empty in-memory store.
    #[arg(long, env = "OMNICART_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Seed catalog URL (defaults to the storefront configuration)
    #[arg(long, env = "OMNICART_SEED_URL", global = true)]
    seed_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and manage the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Inspect and advance shipments
    Shipments {
        #[command(subcommand)]
        action: ShipmentAction,
    },
    /// Storage maintenance
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products from the merged catalog
    List(ProductFilter),
    /// Delete a product (tombstones seed products)
    Delete {
        /// Product id
        id: String,
    },
}

#[derive(Args)]
struct ProductFilter {
    /// Case-insensitive match on name or description
    #[arg(long)]
    search: Option<String>,

    /// Case-insensitive match on category name
    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    min_price: Option<String>,

    #[arg(long)]
    max_price: Option<String>,

    #[arg(long)]
    min_rating: Option<String>,

    /// `price_asc`, `price_desc`, `newest`, `popular`, or `rating`
    #[arg(long)]
    sort: Option<String>,

    /// Only products owned by this seller
    #[arg(long)]
    seller: Option<String>,
}

impl ProductFilter {
    fn into_query(self) -> (ProductQuery, Option<SellerId>) {
        let query = ProductQuery {
            search: self.search,
            category: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
            sort: self.sort,
        };
        (query, self.seller.map(SellerId::new))
    }
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders, newest first
    List {
        /// Only orders placed by this user
        #[arg(long)]
        user: Option<String>,
    },
    /// Show a single order
    Show {
        /// Order id
        id: String,
    },
}

#[derive(Subcommand)]
enum ShipmentAction {
    /// List shipments
    List {
        /// Only shipments for this seller
        #[arg(long)]
        seller: Option<String>,
    },
    /// Move a shipment to a new status
    Status {
        /// Shipment id
        shipment_id: String,

        /// `pending`, `shipped`, `delivered`, or `cancelled`
        status: ShipmentStatus,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Rewrite every stored document in the current format
    Migrate,
    /// List stored keys
    Keys,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(url) = cli.seed_url {
        config.seed_url = url;
    }
    let state = commands::open(config)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List(filter) => {
                let (query, seller) = filter.into_query();
                let products = commands::products::list(&state, &query, seller.as_ref()).await?;
                commands::print_json(&products)?;
            }
            ProductAction::Delete { id } => {
                let outcome = commands::products::delete(&state, &ProductId::new(id))?;
                commands::print_json(&outcome)?;
            }
        },
        Commands::Orders { action } => match action {
            OrderAction::List { user } => {
                let user = user.map(UserId::new);
                let orders = commands::orders::list(&state, user.as_ref())?;
                commands::print_json(&orders)?;
            }
            OrderAction::Show { id } => {
                let order = commands::orders::show(&state, &OrderId::new(id))?;
                commands::print_json(&order)?;
            }
        },
        Commands::Shipments { action } => match action {
            ShipmentAction::List { seller } => {
                let seller = seller.map(SellerId::new);
                let shipments = commands::shipments::list(&state, seller.as_ref())?;
                commands::print_json(&shipments)?;
            }
            ShipmentAction::Status {
                shipment_id,
                status,
            } => {
                let shipment =
                    commands::shipments::set_status(&state, &ShipmentId::new(shipment_id), status)?;
                commands::print_json(&shipment)?;
            }
        },
        Commands::Store { action } => match action {
            StoreAction::Migrate => {
                let report = commands::store::migrate(&state)?;
                commands::print_json(&report)?;
            }
            StoreAction::Keys => {
                let keys = commands::store::keys(&state)?;
                commands::print_json(&keys)?;
            }
        },
    }
    Ok(())
}
