//! storecat - Browse a storefront catalog published as a spreadsheet
//!
//! Fetches the catalog sheet as CSV, caches it, falls back to the last
//! snapshot or placeholder data when the sheet is unreachable, and keeps a
//! local shopping cart.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use storecat::app::Storefront;
use storecat::cart::{format_price, CartStore};
use storecat::catalog::{CacheState, Catalog, CatalogFetcher, CatalogOrigin};
use storecat::cli::{CartCommand, Cli, Command};
use storecat::data::ProductRecord;
use storecat::refresh::{RefreshConfig, RefreshHandle, RefreshMessage};
use storecat::store::{LocalStore, SnapshotStore};

/// Sets up structured logging on stderr, filtered by `RUST_LOG`
fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("storecat=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints a one-line product listing
fn print_products(products: &[ProductRecord]) {
    for product in products {
        let marker = if product.featured { "*" } else { " " };
        println!(
            "{marker}{:>5}  {:<40} {:>10}  {:<20} stock {}",
            product.id,
            product.name,
            format_price(product.price),
            product.category,
            product.stock
        );
    }
}

/// Prints full details for one product
fn print_product(product: &ProductRecord) {
    println!("#{} {}", product.id, product.name);
    println!("  category:    {}", product.category);
    println!("  price:       {}", format_price(product.price));
    println!("  stock:       {}", product.stock);
    println!("  featured:    {}", product.featured);
    if !product.description.is_empty() {
        println!("  description: {}", product.description);
    }
    if !product.image_url.is_empty() {
        println!("  image:       {}", product.image_url);
    }
    for (column, value) in &product.extra {
        println!("  {column}: {value}");
    }
}

/// Tells the user when the data shown is not from a live fetch
fn report_origin(catalog: &Catalog) {
    match (catalog.origin, catalog.fetched_at) {
        (CatalogOrigin::Live, _) => {}
        (CatalogOrigin::Snapshot, Some(fetched_at)) => {
            eprintln!("note: catalog source unavailable, showing snapshot from {fetched_at}");
        }
        _ => eprintln!("note: catalog source unavailable, showing placeholder products"),
    }
}

fn origin_json(catalog: &Catalog) -> serde_json::Value {
    json!({
        "origin": catalog.origin,
        "fetchedAt": catalog.fetched_at.map(|t| t.timestamp_millis()),
    })
}

/// Runs a catalog or cart command against the storefront
async fn run(
    storefront: &mut Storefront,
    command: &Command,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Products { .. } => {
            storefront.set_selection(command.selection());
            let products = storefront.filtered_products().await;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&products)?);
            } else {
                report_origin(&storefront.catalog().await);
                print_products(&products);
            }
        }
        Command::Featured => {
            let products = storefront.get_featured_products().await;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&products)?);
            } else {
                report_origin(&storefront.catalog().await);
                print_products(&products);
            }
        }
        Command::Categories => {
            let categories = storefront.get_categories().await;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else {
                report_origin(&storefront.catalog().await);
                for category in categories {
                    println!("{category}");
                }
            }
        }
        Command::Show { id } => {
            let product = storefront
                .get_product_by_id(*id)
                .await
                .ok_or_else(|| format!("product {id} not found"))?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&product)?);
            } else {
                print_product(&product);
            }
        }
        Command::ClearCache => {
            storefront.clear_cache()?;
            println!("Catalog cache cleared");
        }
        Command::Refresh => {
            let catalog = storefront.refresh().await;
            if json_output {
                let mut summary = origin_json(&catalog);
                summary["records"] = json!(catalog.records.len());
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                report_origin(&catalog);
                println!("{} products loaded", catalog.records.len());
            }
        }
        Command::Watch { interval_secs } => {
            watch(storefront.fetcher(), *interval_secs, json_output).await?;
        }
        Command::Cart(cart_command) => run_cart(storefront, cart_command, json_output).await?,
    }
    Ok(())
}

async fn run_cart(
    storefront: &mut Storefront,
    command: &CartCommand,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        CartCommand::Add { product_id, qty } => storefront.add_to_cart(*product_id, *qty)?,
        CartCommand::Remove { product_id } => storefront.remove_from_cart(*product_id)?,
        CartCommand::Set { product_id, qty } => storefront.update_cart_quantity(*product_id, *qty)?,
        CartCommand::Clear => storefront.clear_cart()?,
        CartCommand::Summary => {
            println!("{}", storefront.order_summary().await);
            return Ok(());
        }
        CartCommand::List => {}
    }

    let catalog = storefront.catalog().await;
    let total = storefront.cart_total().await;
    if json_output {
        let listing = json!({
            "entries": storefront.cart_entries(),
            "itemCount": storefront.cart_item_count(),
            "total": total,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for entry in storefront.cart_entries() {
        let name = catalog
            .records
            .iter()
            .find(|p| p.id == entry.product_id)
            .map_or("(not in catalog)", |p| p.name.as_str());
        println!("{:>5}  {:<40} x{}", entry.product_id, name, entry.quantity);
    }
    println!(
        "{} items, total {}",
        storefront.cart_item_count(),
        format_price(total)
    );
    Ok(())
}

/// Refreshes on an interval until Ctrl-C
async fn watch(
    fetcher: Arc<CatalogFetcher>,
    interval_secs: u64,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = RefreshConfig {
        interval: Duration::from_secs(interval_secs.max(1)),
        enabled: true,
    };
    let mut handle = RefreshHandle::spawn(fetcher, config);

    loop {
        tokio::select! {
            message = handle.recv() => match message {
                Some(RefreshMessage::CatalogRefreshed { records, origin, fetched_at }) => {
                    if json_output {
                        let line = json!({
                            "records": records,
                            "origin": origin,
                            "fetchedAt": fetched_at.map(|t| t.timestamp_millis()),
                        });
                        println!("{line}");
                    } else {
                        let when = fetched_at.map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
                        println!("{records} products ({origin:?}, fetched {when})");
                    }
                }
                Some(RefreshMessage::RefreshStarted) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_tracing();

    let config = cli.global.catalog_config()?;
    let store = match &cli.global.data_dir {
        Some(dir) => LocalStore::with_dir(dir.clone()),
        None => LocalStore::new().ok_or("could not determine a data directory; pass --data-dir")?,
    };
    let fetcher = CatalogFetcher::new(
        config,
        Some(SnapshotStore::new(store.clone())),
        CacheState::new(),
    )?;

    let mut storefront = Storefront::new(fetcher, CartStore::load(store));
    run(&mut storefront, &cli.command, cli.global.json).await
}
