use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use hows_seoul::catalog::loader::load_path;
use hows_seoul::catalog::Catalog;
use hows_seoul::config::Config;
use hows_seoul::db;
use hows_seoul::db::models::PlaceKind;
use hows_seoul::enrich::{enrich, LinkCatalog};
use hows_seoul::filter::{filter_places, FilterQuery};
use hows_seoul::output::{html, terminal};
use hows_seoul::recommend::{Recommendation, Recommender};

/// hows-seoul: place recommendations for Seoul tourism data.
///
/// Finds places similar to one you already like (by review text and
/// category tags), or searches the catalog by region, category and review
/// keywords.
#[derive(Parser)]
#[command(name = "hows-seoul", version, about)]
struct Cli {
    /// Place catalog file (.csv or .json); overrides HOWS_SEOUL_CATALOG
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the link database
    Init,

    /// Import detail-page links for one kind of place from a CSV file
    ImportLinks {
        /// restaurant, hotel or cafe
        #[arg(long)]
        kind: PlaceKind,

        /// CSV file with TITLE and LINK columns
        file: PathBuf,
    },

    /// Recommend places similar to the given one
    Recommend {
        /// Exact title of the place (case-sensitive)
        name: String,

        /// Weight of review-text similarity
        #[arg(long)]
        review_weight: Option<f64>,

        /// Weight of category-tag similarity
        #[arg(long)]
        category_weight: Option<f64>,

        /// Maximum number of recommendations
        #[arg(long)]
        limit: Option<usize>,

        /// Also write the results as an HTML table to this path
        #[arg(long)]
        html: Option<String>,
    },

    /// Search places by region, category and review keywords
    Search {
        /// Region substring (e.g. 성수카페거리)
        #[arg(long)]
        region: Option<String>,

        /// Category pattern (e.g. 한식, 양식|일식)
        #[arg(long)]
        category: Option<String>,

        /// Review keywords (e.g. 맛, 가격)
        #[arg(long)]
        review: Option<String>,

        /// Number of places to show
        #[arg(long, default_value = "5")]
        limit: usize,

        /// Seed for the random top-up (omit for a fresh draw each run)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show how similar two places are
    Similarity {
        /// First place title
        a: String,
        /// Second place title
        b: String,
    },

    /// Show catalog and link store status
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hows_seoul=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(path) = cli.catalog {
        config.catalog_path = path;
    }

    match cli.command {
        Commands::Init => {
            info!("Initializing link database...");
            let conn = db::initialize(&config.db_path)?;
            let table_count = db::schema::table_count(&conn)?;
            let version = db::schema::schema_version(&conn)?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count} (schema v{version})");
            println!("\nNext step: import detail-page links, e.g.");
            println!("  hows-seoul import-links --kind restaurant restaurant_info.csv");
        }

        Commands::ImportLinks { kind, file } => {
            let conn = db::initialize(&config.db_path)?;
            let count = db::import::import_link_file(&conn, kind, &file)?;
            println!("Imported {count} {kind} links from {}", file.display());
        }

        Commands::Recommend {
            name,
            review_weight,
            category_weight,
            limit,
            html: html_path,
        } => {
            let mut options = config.recommend_options();
            if let Some(w) = review_weight {
                options.weights.review_weight = w;
            }
            if let Some(w) = category_weight {
                options.weights.category_weight = w;
            }
            if let Some(n) = limit {
                options.limit = n;
            }

            let catalog = load_catalog(&config)?;
            let recommender = Recommender::new(catalog)?;
            let recommendation = recommender.recommend(&name, &options)?;

            let links = load_links(&config);
            let enriched = enrich(&recommendation.summaries(), &links);
            match &recommendation {
                Recommendation::Fallback { reason, .. } => {
                    terminal::display_fallback(&name, *reason, &enriched)
                }
                Recommendation::Ranked { .. } => {
                    terminal::display_recommendations(&name, &enriched)
                }
            }

            if let Some(path) = html_path {
                let written = html::write_html_table(&enriched, &path)?;
                println!("{}", format!("HTML table saved to: {written}").bold());
            }
        }

        Commands::Search {
            region,
            category,
            review,
            limit,
            seed,
        } => {
            let query = FilterQuery {
                search_term: region,
                category_term: category,
                review_term: review,
                top_n: limit,
            };
            if !query.has_terms() {
                println!("Enter at least one of --region, --category or --review.");
                return Ok(());
            }

            let catalog = load_catalog(&config)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let hits = filter_places(&catalog, &query, &mut rng);
            terminal::display_filter_hits(&hits);
        }

        Commands::Similarity { a, b } => {
            let catalog = load_catalog(&config)?;
            let recommender = Recommender::new(catalog)?;
            let catalog = recommender.catalog();

            let i = catalog
                .position(&a)
                .with_context(|| format!("No place titled \"{a}\" in the catalog"))?;
            let j = catalog
                .position(&b)
                .with_context(|| format!("No place titled \"{b}\" in the catalog"))?;

            let index = recommender.index();
            let options = config.recommend_options();
            terminal::display_similarity(
                &a,
                &b,
                index.review.get(i, j),
                index.category.get(i, j),
                index.combined(
                    i,
                    j,
                    options.weights.review_weight,
                    options.weights.category_weight,
                ),
            );
        }

        Commands::Status => {
            hows_seoul::status::show(&config)?;
        }
    }

    Ok(())
}

/// Load the place catalog named by the config.
fn load_catalog(config: &Config) -> Result<Catalog> {
    config.require_catalog()?;
    Ok(load_path(&config.catalog_path)?)
}

/// Load the link catalog for enrichment.
///
/// Links are optional: without a database, results are shown without links.
fn load_links(config: &Config) -> LinkCatalog {
    let loaded = db::open(&config.db_path).and_then(|conn| db::queries::all_links(&conn));
    match loaded {
        Ok(links) => LinkCatalog::from_links(links),
        Err(e) => {
            warn!(error = %e, "Link store unavailable, showing results without links");
            LinkCatalog::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_flags_parse() {
        let cli = Cli::try_parse_from([
            "hows-seoul",
            "recommend",
            "어니언 성수",
            "--category-weight",
            "2.5",
            "--limit",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Recommend {
                name,
                category_weight,
                limit,
                review_weight,
                ..
            } => {
                assert_eq!(name, "어니언 성수");
                assert_eq!(category_weight, Some(2.5));
                assert_eq!(limit, Some(3));
                assert_eq!(review_weight, None);
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_import_kind_parses() {
        let cli =
            Cli::try_parse_from(["hows-seoul", "import-links", "--kind", "cafe", "cafe.csv"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::ImportLinks {
                kind: PlaceKind::Cafe,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(
            Cli::try_parse_from(["hows-seoul", "import-links", "--kind", "bar", "x.csv"]).is_err()
        );
    }

    #[test]
    fn test_fallback_is_not_ranked() {
        let recommender = Recommender::new(Catalog::new(vec![
            hows_seoul::catalog::Place::new("홍대", "A", "한식", "good"),
        ]))
        .unwrap();
        let result = recommender
            .recommend("missing", &Default::default())
            .unwrap();
        assert!(matches!(result, Recommendation::Fallback { .. }));
    }
}
