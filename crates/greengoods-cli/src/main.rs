use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use greengoods_bigbuy::ProductFilter;
use greengoods_pipeline::{RunType, SyncOptions};

#[derive(Debug, Parser)]
#[command(name = "greengoods-cli")]
#[command(about = "GreenGoods catalog and stock maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a stock synchronization, optionally limited to specific ids.
    Sync {
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<String>>,
    },
    /// Search the BigBuy catalog.
    Search {
        query: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Import one product from BigBuy by its external id.
    Import { external_id: String },
    /// Remove a stored product.
    Remove { id: String },
    /// Set a product's price, optionally with a percentage markup.
    Price {
        id: String,
        price: Decimal,
        #[arg(long)]
        markup: Option<Decimal>,
    },
    /// Show recent sync runs.
    Logs {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = greengoods_core::load_app_config()?;
    let pool_config = greengoods_db::PoolConfig::from_app_config(&config);
    let pool = greengoods_db::connect_pool(&config.database_url, pool_config).await?;
    greengoods_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Sync { ids } => {
            let client = greengoods_pipeline::client_from_config(&config)?;
            let run_type = if ids.is_some() {
                RunType::BatchUpdate
            } else {
                RunType::BulkSync
            };
            let mut options = SyncOptions::from_config(&config, run_type, "cli");
            options.product_ids = ids;

            let outcome = greengoods_pipeline::sync_stock(&pool, &client, &options).await?;
            println!(
                "processed {} products: {} updated, {} unchanged, {} failed",
                outcome.processed, outcome.updated, outcome.unchanged, outcome.failed
            );
        }
        Commands::Search { query, limit } => {
            let client = greengoods_pipeline::client_from_config(&config)?;
            let filter = ProductFilter {
                query: Some(query),
                category: None,
                limit,
                offset: 0,
            };
            let page = greengoods_pipeline::search_products(&client, &filter).await?;
            for item in &page.items {
                println!(
                    "{}  {}  {} EUR  stock {}",
                    item.id, item.name, item.price, item.stock
                );
            }
            println!("{} of {} results", page.items.len(), page.total);
        }
        Commands::Import { external_id } => {
            let client = greengoods_pipeline::client_from_config(&config)?;
            let record =
                greengoods_pipeline::import_product(&pool, &client, &external_id).await?;
            println!("imported {} as {}", external_id, record.id);
        }
        Commands::Remove { id } => {
            if greengoods_pipeline::remove_product(&pool, &id).await? {
                println!("removed {id}");
            } else {
                println!("no product with id {id}");
            }
        }
        Commands::Price { id, price, markup } => {
            greengoods_pipeline::update_pricing(&pool, &id, price, markup).await?;
            println!("updated pricing for {id}");
        }
        Commands::Logs { limit } => {
            let logs = greengoods_db::list_sync_logs(&pool, limit).await?;
            for log in &logs {
                println!(
                    "{}  {}  processed {}  synced {}  updated {}  failed {}  by {}",
                    log.created_at.format("%Y-%m-%d %H:%M:%S"),
                    log.run_type,
                    log.products_processed,
                    log.synced_products,
                    log.successful_updates,
                    log.failed_updates,
                    log.performed_by
                );
            }
        }
    }

    Ok(())
}
