//! rvx-explorer - command-line driver for the review filtering engine
//!
//! Builds filter state from arguments, runs one fetch cycle against the
//! configured backend and prints the resulting view as JSON on stdout.
//! Logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rvx_common::config::{load_config, ExplorerConfig};
use rvx_common::{Catalog, Dimension};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter};

use rvx_explorer::{
    Bound, ComparisonController, ComparisonOptions, FacetStore, FilterState, HttpBackend, Metric,
    Polarity, ReviewBackend, ReviewFeed, Side, SortOrder,
};

#[derive(Parser, Debug)]
#[command(name = "rvx-explorer")]
#[command(about = "Faceted explorer for categorized player reviews")]
#[command(version)]
struct Cli {
    /// Config file (overrides RVX_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and RVX_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one page of reviews
    Reviews {
        #[command(flatten)]
        filters: FilterArgs,

        /// Free-text search
        #[arg(short, long)]
        query: Option<String>,

        /// Page to fetch (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Reviews per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,

        #[arg(long, value_parser = parse_sort, default_value = "newest")]
        sort: SortOrder,

        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,

        /// Last day (inclusive), YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,

        /// Lower bound, METRIC=N (votes_up, votes_funny, playtime_at_review, playtime_forever)
        #[arg(long, value_parser = parse_metric_bound)]
        min: Vec<(Metric, i64)>,

        /// Upper bound, METRIC=N
        #[arg(long, value_parser = parse_metric_bound)]
        max: Vec<(Metric, i64)>,

        #[arg(long, value_delimiter = ',')]
        aesthetic: Vec<u16>,

        #[arg(long, value_delimiter = ',')]
        feature: Vec<u16>,

        #[arg(long, value_delimiter = ',')]
        pain: Vec<u16>,

        /// Replace review text with HTML-highlighted quotes
        #[arg(long)]
        highlight: bool,
    },

    /// Compare two sides across every aggregate block
    Compare {
        #[arg(long, value_parser = parse_polarity, default_value = "any")]
        polarity: Polarity,

        #[arg(long = "language", value_delimiter = ',')]
        languages: Vec<String>,

        #[arg(long = "left-genre")]
        left_genres: Vec<String>,

        #[arg(long = "left-game", value_delimiter = ',')]
        left_games: Vec<u32>,

        #[arg(long = "right-genre")]
        right_genres: Vec<String>,

        #[arg(long = "right-game", value_delimiter = ',')]
        right_games: Vec<u32>,

        /// Also print the heatmap grids
        #[arg(long)]
        grids: bool,
    },

    /// List the genre catalog
    Genres,
}

/// Selection facets of the reviews list
#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long, value_parser = parse_polarity, default_value = "any")]
    polarity: Polarity,

    /// Genre bulk selection (repeatable)
    #[arg(long = "genre")]
    genres: Vec<String>,

    /// Game ids
    #[arg(long = "game", value_delimiter = ',')]
    games: Vec<u32>,

    /// Review languages
    #[arg(long = "language", value_delimiter = ',')]
    languages: Vec<String>,
}

fn parse_polarity(s: &str) -> std::result::Result<Polarity, String> {
    Polarity::parse(s).ok_or_else(|| format!("unknown polarity '{}'", s))
}

fn parse_sort(s: &str) -> std::result::Result<SortOrder, String> {
    SortOrder::parse(s).ok_or_else(|| format!("unknown sort order '{}'", s))
}

fn parse_metric_bound(s: &str) -> std::result::Result<(Metric, i64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected METRIC=N, got '{}'", s))?;
    let metric = Metric::parse(name).ok_or_else(|| format!("unknown metric '{}'", name))?;
    let value = rvx_explorer::filters::parse_bound(value)
        .ok_or_else(|| format!("'{}' is not a number", value))?;
    Ok((metric, value))
}

fn new_store(catalog: &Arc<Catalog>, config: &ExplorerConfig) -> FacetStore {
    let store = FacetStore::new(
        Arc::clone(catalog),
        FilterState::with_page_size(config.page_size),
    );
    for language in &config.languages {
        store.toggle_language(language);
    }
    store
}

fn select(
    store: &FacetStore,
    polarity: Polarity,
    genres: &[String],
    games: &[u32],
    languages: &[String],
) {
    store.set_polarity(polarity);
    for genre in genres {
        if store.catalog().games_in(genre).is_none() {
            tracing::warn!(genre = %genre, "Unknown genre ignored");
        }
        store.toggle_genre(genre);
    }
    for &game in games {
        store.toggle_game(game);
    }
    if !languages.is_empty() {
        store.edit(|state, _| {
            state.languages.clear();
            for language in languages {
                state.toggle_language(language);
            }
        });
    }
}

fn load_catalog(config: &ExplorerConfig) -> Arc<Catalog> {
    match &config.catalog_path {
        Some(path) => match Catalog::load(path) {
            Ok(catalog) => {
                info!("Loaded genre catalog from {}", path.display());
                Arc::new(catalog)
            }
            Err(e) => {
                tracing::warn!("Ignoring catalog file {}: {}", path.display(), e);
                Arc::new(Catalog::builtin().clone())
            }
        },
        None => Arc::new(Catalog::builtin().clone()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Filter starts at info and is swapped for the configured level once the
    // config is loaded, unless RUST_LOG is set
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting rvx-explorer v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("RVX_GIT_HASH"),
        env!("RVX_BUILD_TIMESTAMP"),
        env!("RVX_BUILD_PROFILE")
    );

    let mut config = load_config(cli.config.as_deref());
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }
    if !from_env {
        if let Err(e) = filter_handle.reload(EnvFilter::new(&config.logging.level)) {
            tracing::warn!("Could not apply log level '{}': {}", config.logging.level, e);
        }
    }
    info!("Backend: {}", config.backend_url);

    let catalog = load_catalog(&config);

    match cli.command {
        Command::Genres => {
            let genres: serde_json::Map<String, serde_json::Value> = catalog
                .genres()
                .map(|genre| {
                    let games = catalog
                        .games_in(genre)
                        .map(|games| {
                            games
                                .iter()
                                .map(|&id| {
                                    serde_json::json!({
                                        "app_id": id,
                                        "name": catalog.game_name(id),
                                    })
                                })
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default();
                    (genre.to_string(), serde_json::Value::Array(games))
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&genres)?);
        }

        Command::Reviews {
            filters,
            query,
            page,
            page_size,
            sort,
            from,
            to,
            min,
            max,
            aesthetic,
            feature,
            pain,
            highlight,
        } => {
            let backend: Arc<dyn ReviewBackend> = Arc::new(
                HttpBackend::from_config(&config).context("Failed to create HTTP client")?,
            );
            let store = new_store(&catalog, &config);
            select(
                &store,
                filters.polarity,
                &filters.genres,
                &filters.games,
                &filters.languages,
            );
            store.edit(|state, _| {
                if let Some(size) = page_size {
                    state.page_size = size.max(1);
                }
                state.set_search_text(query.unwrap_or_default());
                state.set_sort(sort);
                state.set_date_range(from.as_deref(), to.as_deref());
                for (metric, value) in min {
                    state.set_range(metric, Bound::Min, Some(value));
                }
                for (metric, value) in max {
                    state.set_range(metric, Bound::Max, Some(value));
                }
                for (dimension, codes) in [
                    (Dimension::Aesthetic, aesthetic),
                    (Dimension::Feature, feature),
                    (Dimension::Pain, pain),
                ] {
                    for code in codes {
                        state.toggle_code(dimension, code);
                    }
                }
            });
            store.set_page(page);

            let feed = ReviewFeed::new("reviews", backend, Arc::new(store));
            feed.load().await;

            let mut view = feed.view();
            if let Some(error) = &view.error {
                bail!("Reviews request failed: {}", error.display_message());
            }
            if highlight {
                for row in &mut view.rows {
                    row.text = row.highlighted_text();
                }
            }
            println!("{}", serde_json::to_string_pretty(&view)?);
        }

        Command::Compare {
            polarity,
            languages,
            left_genres,
            left_games,
            right_genres,
            right_games,
            grids,
        } => {
            let backend: Arc<dyn ReviewBackend> = Arc::new(
                HttpBackend::from_config(&config).context("Failed to create HTTP client")?,
            );
            let left = new_store(&catalog, &config);
            select(&left, polarity, &left_genres, &left_games, &languages);
            let right = new_store(&catalog, &config);
            select(&right, polarity, &right_genres, &right_games, &languages);

            let controller = ComparisonController::new(
                backend,
                Arc::new(left),
                Arc::new(right),
                ComparisonOptions::from(&config),
            );
            controller.load().await;

            let view = controller.view();
            if let Some(error) = &view.error {
                bail!("Comparison failed: {}", error.display_message());
            }

            if grids {
                let mut out = serde_json::Map::new();
                for side in Side::BOTH {
                    let Some(snapshot) = view.side(side) else {
                        continue;
                    };
                    let side_grids: serde_json::Map<String, serde_json::Value> = Dimension::ALL
                        .into_iter()
                        .map(|dimension| -> Result<(String, serde_json::Value)> {
                            let grid = snapshot.heatmaps.grid(dimension);
                            Ok((dimension.as_str().to_string(), serde_json::to_value(grid)?))
                        })
                        .collect::<Result<_>>()?;
                    out.insert(side.to_string(), serde_json::Value::Object(side_grids));
                }
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
        }
    }

    Ok(())
}
