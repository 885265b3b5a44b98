//! # Seed Data Generator
//!
//! Populates the catalog with generated products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 100 products (default) at $CATALOG_DB_PATH or ./catalog.db
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p catalog-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! Logging follows `RUST_LOG`, e.g. `RUST_LOG=catalog_db=debug`.

use catalog_core::factory::ProductFactory;
use catalog_core::Category;
use catalog_db::{Database, DbConfig};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_COUNT: usize = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count = DEFAULT_COUNT;
    let mut db_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = parse_count(&args[i + 1])?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: {DEFAULT_COUNT})");
                println!("  -d, --db <PATH>    Database file path (default: $CATALOG_DB_PATH or ./catalog.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let config = match db_path {
        Some(path) => DbConfig::new(path),
        None => DbConfig::from_env()?,
    };

    println!("Catalog Seed Data Generator");
    println!("===========================");
    println!("Database: {}", config.database_path.display());
    println!("Products: {}", count);
    println!();

    let db = Database::new(config).await?;
    let repo = db.products();
    let mut session = db.session().await?;

    let existing = repo.count(&mut session).await?;
    if existing > 0 {
        println!("Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!("Generating products...");
    let start = std::time::Instant::now();
    let mut generated = 0;

    for mut product in ProductFactory::new().take(count) {
        if let Err(e) = repo.create(&mut session, &mut product).await {
            eprintln!("Failed to create {}: {}", product, e);
            continue;
        }
        generated += 1;
    }

    let elapsed = start.elapsed();
    info!(generated, ?elapsed, "Seed finished");
    println!("Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("Products per category:");
    for category in Category::ALL {
        let total = repo.find_by_category(category).count(&mut session).await?;
        println!("  {:<12} {}", category, total);
    }

    let available = repo.find_by_availability(true).count(&mut session).await?;
    println!("  available    {}", available);

    session.close();
    db.close().await;

    println!();
    println!("Seed complete!");

    Ok(())
}

/// Parses `--count`. Anything but a non-negative integer is rejected.
fn parse_count(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|e| format!("invalid --count {raw:?}: {e}"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalog_db=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("250"), Ok(250));
        assert_eq!(parse_count(" 0 "), Ok(0));
    }

    #[test]
    fn test_parse_count_rejects_garbage() {
        for raw in ["abc", "-5", "", "1.5"] {
            let err = parse_count(raw).unwrap_err();
            assert!(err.contains("--count"), "{raw}: {err}");
        }
    }
}
