use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use genmodel_core::present::publication_label;
use genmodel_core::{ChartConfig, ChartLayout, SearchState};
use genmodel_dataset::load_catalog_str;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "genmodel-cli",
    about = "Lay out a generative-model catalog on the timeline and print node positions."
)]
struct Args {
    /// Path to the model catalog JSON.
    #[arg(short, long)]
    input: PathBuf,

    /// Optional TOML chart configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the hits of a sidebar search with their scroll targets.
    #[arg(short, long)]
    search: Option<String>,

    /// Viewport width used for scroll targets.
    #[arg(long, default_value_t = 1200.0)]
    viewport_width: f64,

    /// Emit positioned nodes as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ChartConfig> {
    let Some(path) = path else {
        return Ok(ChartConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read config {}", path.display()))?;
    let config: ChartConfig = toml::from_str(&contents)
        .with_context(|| format!("Invalid chart config {}", path.display()))?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Could not read file {:?}", args.input))?;
    let catalog = load_catalog_str(&data)
        .with_context(|| format!("Could not load catalog {:?}", args.input))?;
    let layout = ChartLayout::new(config)?;
    tracing::info!(models = catalog.len(), "catalog loaded");

    if args.json {
        let nodes = layout.placed_nodes(&catalog);
        println!("{}", serde_json::to_string_pretty(&nodes)?);
        return Ok(());
    }

    println!(
        "Models: {}\nTimeline width: {:.0}px\nStrip height: {:.1}px",
        catalog.len(),
        layout.timeline_width(),
        layout.strips().first().map_or(0.0, |band| band.height),
    );

    for band in layout.strips() {
        println!(
            "\n{} {} (top {:.1}, {} models)",
            band.category.emoji(),
            band.category,
            band.top,
            catalog.strip_len(band.category)
        );
        // Highest citation count first, matching the top-down order on screen.
        let mut members: Vec<_> = catalog.ranking(band.category).collect();
        members.reverse();
        for record in members {
            let position = layout.position(&catalog, record);
            println!(
                "  {:<14} {:>9} {:>8} cites  x={:>8.1} y={:>6.1}",
                record.id,
                publication_label(record),
                record.citation_metric(),
                position.x,
                position.y
            );
        }
    }

    if let Some(query) = args.search.as_deref() {
        let search = SearchState::with_query(&catalog, query);
        println!("\nSearch {query:?}: {} hit(s)", search.results().len());
        for id in search.results() {
            if let Some(offset) = layout.scroll_target(&catalog, id, args.viewport_width) {
                println!("  {id:<14} scroll to {offset:.1}px");
            }
        }
    }

    Ok(())
}
