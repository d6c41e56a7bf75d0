//! varcache command-line entrypoint.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use mimalloc::MiMalloc;
use serde::Serialize;

use varcache::backend::{IndexFile, MemoryVariantIndex};
use varcache::cache::MemoryStore;
use varcache::config::Config;
use varcache::locus::GeneCatalog;
use varcache::search::{SearchError, SearchOrchestrator, SearchSettings};

use crate::cli::{Cli, Commands, load_search};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

type Orchestrator = SearchOrchestrator<MemoryStore, Arc<MemoryVariantIndex>>;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.index.clone() {
        config.index_path = Some(path);
    }
    config.validate()?;

    let orchestrator = build_orchestrator(&config)?;
    let user = cli.user.as_deref();

    let outcome = match cli.command {
        Commands::Query(args) => {
            let search = load_search(&args.search)?;
            let request = args.page_request(config.page_size);
            to_json(
                orchestrator
                    .query_variants(&search, args.sort.as_deref(), request, user)
                    .await,
            )
        }
        Commands::GeneCounts { search } => {
            let search = load_search(&search)?;
            to_json(orchestrator.gene_counts(&search, user).await)
        }
        Commands::Lookup(args) => match (args.variant_ids.as_slice(), args.dataset_type) {
            ([variant_id], None) => to_json(
                orchestrator
                    .lookup_single_variant(
                        &args.families,
                        variant_id,
                        args.all_queried_families,
                        user,
                    )
                    .await,
            ),
            (ids, dataset_type) => to_json(
                orchestrator
                    .lookup_variants(&args.families, ids, dataset_type, user)
                    .await,
            ),
        },
        Commands::Status => {
            let report = orchestrator.status().await;
            print_json(&report)?;
            return Ok(if report.status_code() == 200 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
    };

    match outcome {
        Ok(value) => {
            print_json(&value)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_json(&orchestrator.error_policy().response(&e))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let (index, catalog) = match &config.index_path {
        Some(path) => {
            let (index, catalog) = IndexFile::load(path)?.into_parts();
            tracing::info!(
                path = %path.display(),
                variants = index.len(),
                genes = catalog.len(),
                "Loaded variant index"
            );
            (index, catalog)
        }
        None => {
            tracing::warn!("No VARCACHE_INDEX_PATH configured, searching an empty index");
            (MemoryVariantIndex::default(), GeneCatalog::new())
        }
    };

    let store = MemoryStore::with_capacity(config.store_capacity);
    Ok(
        SearchOrchestrator::new(store, Arc::new(index), SearchSettings::from(config))
            .with_gene_catalog(catalog),
    )
}

fn to_json<T: Serialize>(result: Result<T, SearchError>) -> Result<serde_json::Value, SearchError> {
    result.and_then(|value| {
        serde_json::to_value(value)
            .map_err(|e| SearchError::from(varcache::backend::BackendError::from(e)))
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
