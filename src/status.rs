// System status display: catalog summary and link store stats.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::catalog::loader::load_path;
use crate::config::Config;
use crate::db;

/// Display system status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    show_catalog(&config.catalog_path)?;
    show_links(&config.db_path)?;

    let options = config.recommend_options();
    println!(
        "Weights: review {:.2}, category {:.2} (limit {})",
        options.weights.review_weight, options.weights.category_weight, options.limit
    );

    Ok(())
}

fn show_catalog(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("Catalog: {} ({})", path.display(), "not found".yellow());
        println!("  Set HOWS_SEOUL_CATALOG to your place export");
        return Ok(());
    }

    let catalog = load_path(path)?;
    let with_review = catalog.iter().filter(|p| !p.review.trim().is_empty()).count();
    let regions = catalog.regions();

    println!(
        "Catalog: {} ({} places, {} with reviews)",
        path.display(),
        catalog.len(),
        with_review
    );
    if !regions.is_empty() {
        let shown: Vec<&str> = regions.iter().take(8).copied().collect();
        let more = regions.len().saturating_sub(shown.len());
        let suffix = if more > 0 { format!(" (+{more} more)") } else { String::new() };
        println!("  Regions: {}{}", shown.join(", "), suffix.dimmed());
    }

    Ok(())
}

fn show_links(db_path: &str) -> Result<()> {
    if !Path::new(db_path).exists() {
        println!("Link store: not initialized");
        println!("  Run `hows-seoul init` to set up the database.");
        return Ok(());
    }

    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Link store: {} ({})", db_path, file_size);

    let conn = db::open(db_path)?;
    println!("  Schema version: {}", db::schema::schema_version(&conn)?);
    for (kind, count) in db::queries::link_counts(&conn)? {
        println!("  {:<11} {}", format!("{kind}:"), count);
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_show_links_on_initialized_db() {
        let path = std::env::temp_dir().join(format!("hows-seoul-status-{}.db", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        let conn = db::initialize(&path_str).unwrap();
        assert_eq!(db::schema::schema_version(&conn).unwrap(), 2);
        drop(conn);

        let result = show_links(&path_str);
        let _ = std::fs::remove_file(&path);
        assert!(result.is_ok());
    }
}
