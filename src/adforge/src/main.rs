//! AdForge CLI: turns a product list into draft search-ad campaigns,
//! previews and validates them, and optionally writes Google Ads Editor CSV
//! exports.

use adforge_core::config::AppConfig;
use adforge_core::types::{PatternSet, Product};
use adforge_export::{export_google_ads_editor_csv, validate_for_export};
use adforge_generation::adgroups::RuleBasedAdGroupGenerator;
use adforge_generation::copy::RuleBasedRsaGenerator;
use adforge_generation::keywords::RuleBasedKeywordGenerator;
use adforge_generation::status::tracing_sink;
use adforge_generation::GenerationOrchestrator;
use adforge_preview::{transform_to_preview, PreviewStore};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "adforge")]
#[command(about = "Generate, preview, and export search-ad campaigns from a product list")]
#[command(version)]
struct Cli {
    /// JSON file with the input products
    #[arg(long)]
    products: PathBuf,

    /// Optional JSON file with patterns learned from past campaigns
    #[arg(long)]
    patterns: Option<PathBuf>,

    /// Directory to write one Google Ads Editor CSV per campaign into
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Units of work in flight at once (overrides config)
    #[arg(long, env = "ADFORGE__GENERATION__MAX_IN_FLIGHT")]
    max_in_flight: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adforge=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(max_in_flight) = cli.max_in_flight {
        config.generation.max_in_flight = max_in_flight;
    }

    let products: Vec<Product> =
        serde_json::from_str(&std::fs::read_to_string(&cli.products)?)?;
    let patterns: Option<PatternSet> = match &cli.patterns {
        Some(path) => Some(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        None => None,
    };

    info!(
        products = products.len(),
        with_patterns = patterns.is_some(),
        "AdForge starting"
    );

    let generation = config.generation.clone();
    let orchestrator = GenerationOrchestrator::new(
        Arc::new(RuleBasedAdGroupGenerator::new(generation.clone())),
        Arc::new(RuleBasedKeywordGenerator::new(generation.clone())),
        Arc::new(RuleBasedRsaGenerator::new(generation.clone())),
        tracing_sink(),
        generation,
    );

    let run = orchestrator.run(&products, patterns.as_ref()).await?;

    println!("Generated {} campaign(s)", run.campaigns.len());
    for summary in &run.summaries {
        println!(
            "  {}: {} ad group(s), {} keyword(s), {} ad(s)",
            summary.product_name, summary.ad_groups, summary.keywords, summary.ads
        );
    }
    if let Some(error) = &run.error {
        println!("Warning: {}", error);
    }

    let mut store = PreviewStore::new();
    for campaign in &run.campaigns {
        let preview = transform_to_preview(campaign);
        store.set_preview_data(preview);
        let report = store.validate_campaign();
        println!(
            "{}: {} ({} error(s), {} warning(s))",
            campaign.name,
            if report.is_valid { "valid" } else { "invalid" },
            report.errors.len(),
            report.warnings.len()
        );

        let Some(export_dir) = &cli.export_dir else {
            continue;
        };
        let Some(preview) = store.edited() else {
            continue;
        };

        let export_errors = validate_for_export(preview);
        if !export_errors.is_empty() {
            for error in &export_errors {
                warn!(campaign = %campaign.name, "export blocked: {}", error);
            }
            continue;
        }

        std::fs::create_dir_all(export_dir)?;
        let path = export_dir.join(format!("{}.csv", campaign.id));
        let csv = export_google_ads_editor_csv(preview)?;
        std::fs::write(&path, csv)?;
        println!("  exported {}", path.display());
    }

    Ok(())
}
