use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfcheck_core::{
    load_config, load_wishlist, validate_config, AvailabilityResolver, CatalogueKind,
    CataloguePipeline, Config, FailureStage, Matcher, MediaFilter, OnlineLibraryClient, Reporter,
    SanitizedConfig, ShelfFilter, WiseClient,
};

/// Check a reading wishlist against a library catalogue.
#[derive(Debug, Parser)]
#[command(name = "shelfcheck", version)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "SHELFCHECK_CONFIG", default_value = "shelfcheck.toml")]
    config: PathBuf,

    /// Only process the first N selected wishlist entries
    #[arg(long)]
    max_entries: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.log_json);

    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(args: Args) -> Result<()> {
    info!("Loading configuration from {:?}", args.config);
    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    if args.max_entries.is_some() {
        config.wishlist.max_entries = args.max_entries;
    }

    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        config = %serde_json::to_string(&sanitized).unwrap_or_default(),
        "Configuration loaded"
    );

    let filter = ShelfFilter::from(&config.wishlist);
    let entries = load_wishlist(&config.wishlist.export_path, &filter).with_context(|| {
        format!(
            "Failed to load wishlist from {:?}",
            config.wishlist.export_path
        )
    })?;

    let pipeline = build_pipeline(&config)?;
    let outcome = pipeline.run(&entries).await;

    let mut reporter = Reporter::new(&config.output.report_path);
    if let Some(table_path) = &config.output.table_path {
        reporter = reporter.with_table(table_path);
    }
    let mut stdout = std::io::stdout().lock();
    reporter
        .publish(&outcome.matches, &mut stdout)
        .context("Failed to publish report")?;

    if !outcome.failures.is_empty() {
        warn!(
            failures = outcome.failures.len(),
            "Some entries could not be checked"
        );
        for failure in &outcome.failures {
            warn!(
                title = %failure.title,
                author = %failure.author,
                stage = %failure.stage,
                error = %failure.message,
                "{}",
                failure_summary(failure.stage)
            );
        }
    }

    info!(
        entries = outcome.entries_processed,
        matches = outcome.matches.len(),
        "Done"
    );
    Ok(())
}

/// Log line for a recovered failure, by the stage it happened in.
fn failure_summary(stage: FailureStage) -> &'static str {
    match stage {
        FailureStage::Details => "Details unavailable, match reported without them",
        FailureStage::Search | FailureStage::Parse | FailureStage::Availability => {
            "Entry skipped"
        }
    }
}

fn build_pipeline(config: &Config) -> Result<CataloguePipeline> {
    let matcher = Matcher::new(config.matching.author_threshold);

    match config.catalogue.kind {
        CatalogueKind::OnlineLibrary => {
            let library_config = config
                .catalogue
                .online_library
                .clone()
                .context(
                    "online_library catalogue selected but [catalogue.online_library] is missing",
                )?;
            info!("Initializing online library client at {}", library_config.base_url);
            let media = library_config.media;
            let client = OnlineLibraryClient::new(library_config)
                .context("Failed to create online library client")?;
            Ok(CataloguePipeline::new(Arc::new(client), matcher, media))
        }
        CatalogueKind::Wise => {
            let wise_config = config
                .catalogue
                .wise
                .clone()
                .context("wise catalogue selected but [catalogue.wise] is missing")?;
            info!(
                "Initializing Wise client at {} (branch {})",
                wise_config.base_url, wise_config.branch_name
            );
            let resolver = AvailabilityResolver::new(wise_config.branch_name.clone());
            let client =
                Arc::new(WiseClient::new(wise_config).context("Failed to create Wise client")?);
            Ok(
                CataloguePipeline::new(client.clone(), matcher, MediaFilter::Any)
                    .with_holdings(client, resolver),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfcheck_core::load_config_from_str;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["shelfcheck"]).unwrap();
        assert!(!args.log_json);
        assert!(args.max_entries.is_none());
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "shelfcheck",
            "--config",
            "other.toml",
            "--max-entries",
            "5",
            "--log-json",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("other.toml"));
        assert_eq!(args.max_entries, Some(5));
        assert!(args.log_json);
    }

    #[test]
    fn test_failure_summary_keeps_details_failures_apart() {
        assert_eq!(failure_summary(FailureStage::Search), "Entry skipped");
        assert_eq!(failure_summary(FailureStage::Availability), "Entry skipped");
        assert_ne!(failure_summary(FailureStage::Details), "Entry skipped");
        assert!(failure_summary(FailureStage::Details).contains("match reported"));
    }

    #[test]
    fn test_build_pipeline_for_each_catalogue() {
        let online = load_config_from_str(
            r#"
[wishlist]
export_path = "export.csv"

[catalogue]
kind = "online_library"

[catalogue.online_library]
"#,
        )
        .unwrap();
        assert!(build_pipeline(&online).is_ok());

        let wise = load_config_from_str(
            r#"
[wishlist]
export_path = "export.csv"

[catalogue]
kind = "wise"

[catalogue.wise]
base_url = "https://obgz.hostedwise.nl"
branch_name = "Centrum"
"#,
        )
        .unwrap();
        assert!(build_pipeline(&wise).is_ok());
    }
}
