use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use stockmerge_core::{CatalogId, GroupingMode, MatchingConfig, RecordId};
use stockmerge_infra::{CatalogService, CatalogStore, InMemoryCatalogStore};
use stockmerge_inventory::{CatalogRecord, NewEntry, StockDirection, resolve};
use stockmerge_matching::{Cluster, Named, Stocked};
use stockmerge_observability::LogFormat;

#[derive(Parser)]
#[command(name = "stockmerge")]
#[command(about = "Find and fold near-duplicate inventory item names")]
#[command(version)]
struct Cli {
    /// Catalog snapshot: JSON array of records
    #[arg(long, global = true, default_value = "catalog.json")]
    catalog: PathBuf,

    /// Human-readable logs instead of JSON
    #[arg(long, global = true)]
    pretty_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active records similar to a name, best first
    Search {
        query: String,
        /// Minimum similarity (defaults to STOCKMERGE_SEARCH_THRESHOLD or 0.8)
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Cluster near-duplicate active records
    Group {
        /// Minimum similarity (defaults to STOCKMERGE_GROUP_THRESHOLD or 0.8)
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Show the merge-or-create decision for an entry without applying it
    Resolve(EntryArgs),
    /// Merge or create an entry and print the stored record
    Ingest {
        #[command(flatten)]
        entry: EntryArgs,
        /// Write the updated catalog back to --catalog
        #[arg(long)]
        write: bool,
    },
    /// Move stock in (entrada) or out (saida) of a record
    Adjust {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        delta: f64,
        /// inbound/entrada or outbound/saida
        #[arg(long)]
        direction: StockDirection,
        /// Write the updated catalog back to --catalog
        #[arg(long)]
        write: bool,
    },
    /// List active records at or below their minimum threshold
    LowStock,
}

#[derive(Args)]
struct EntryArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    quantity: f64,
    #[arg(long, default_value = stockmerge_inventory::DEFAULT_UNIT)]
    unit: String,
    #[arg(long, default_value_t = 0.0)]
    unit_price: f64,
    #[arg(long, default_value_t = 0.0)]
    minimum: f64,
    #[arg(long)]
    description: Option<String>,
}

impl EntryArgs {
    fn to_entry(&self) -> NewEntry {
        let entry = NewEntry::new(self.name.clone(), self.quantity, Utc::now())
            .with_unit(self.unit.clone())
            .with_unit_price(self.unit_price)
            .with_minimum_threshold(self.minimum);
        match &self.description {
            Some(description) => entry.with_description(description.clone()),
            None => entry,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum ModeArg {
    SingleLink,
    CompleteLink,
}

impl From<ModeArg> for GroupingMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::SingleLink => GroupingMode::SingleLink,
            ModeArg::CompleteLink => GroupingMode::CompleteLink,
        }
    }
}

#[derive(Serialize)]
struct SearchHit<'a> {
    id: RecordId,
    name: &'a str,
    score: f64,
}

#[derive(Serialize)]
struct ClusterView<'a> {
    representative_id: RecordId,
    suggested_name: &'a str,
    aggregated_quantity: f64,
    member_ids: Vec<RecordId>,
}

impl<'a> From<&'a Cluster<CatalogRecord>> for ClusterView<'a> {
    fn from(cluster: &'a Cluster<CatalogRecord>) -> Self {
        Self {
            representative_id: cluster.representative().record_id(),
            suggested_name: cluster.suggested_name(),
            aggregated_quantity: cluster
                .aggregated_quantity()
                .unwrap_or_else(|| cluster.representative().quantity_available()),
            member_ids: cluster.members().iter().map(CatalogRecord::record_id).collect(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    stockmerge_observability::init(if cli.pretty_logs {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    });

    let mut config = MatchingConfig::from_env().context("invalid STOCKMERGE_* configuration")?;
    if let Commands::Group {
        mode: Some(mode), ..
    } = &cli.command
    {
        config.grouping_mode = (*mode).into();
    }

    let catalog_id = CatalogId::new();
    let store = InMemoryCatalogStore::new();
    let records = load_catalog(&cli.catalog)?;
    info!(path = %cli.catalog.display(), records = records.len(), "loaded catalog");
    store.restore(catalog_id, records)?;

    let service = CatalogService::new(store, config);

    match &cli.command {
        Commands::Search { query, threshold } => {
            let hits = service.search(catalog_id, query, *threshold)?;
            let view: Vec<SearchHit<'_>> = hits
                .iter()
                .map(|h| SearchHit {
                    id: h.record.record_id(),
                    name: h.record.raw_name(),
                    score: h.score,
                })
                .collect();
            print_json(&view)?;
        }
        Commands::Group { threshold, .. } => {
            let clusters = service.group(catalog_id, *threshold)?;
            let view: Vec<ClusterView<'_>> = clusters.iter().map(ClusterView::from).collect();
            debug!(clusters = view.len(), "grouped catalog");
            print_json(&view)?;
        }
        Commands::Resolve(args) => {
            let snapshot = service.store().snapshot(catalog_id)?;
            let decision = resolve(
                &args.to_entry(),
                &snapshot.records,
                service.config().merge_threshold.value(),
            )?;
            print_json(&decision)?;
        }
        Commands::Ingest { entry, write } => {
            let outcome = service.ingest(catalog_id, &entry.to_entry())?;
            print_json(&outcome)?;
            if *write {
                save_catalog(&cli.catalog, &service, catalog_id)?;
            }
        }
        Commands::Adjust {
            id,
            delta,
            direction,
            write,
        } => {
            let record = service.adjust(catalog_id, RecordId::new(*id), *delta, *direction)?;
            print_json(&record)?;
            if *write {
                save_catalog(&cli.catalog, &service, catalog_id)?;
            }
        }
        Commands::LowStock => {
            print_json(&service.low_stock(catalog_id)?)?;
        }
    }

    Ok(())
}

fn load_catalog(path: &Path) -> Result<Vec<CatalogRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse catalog {}", path.display()))
}

fn save_catalog<S: CatalogStore>(
    path: &Path,
    service: &CatalogService<S>,
    catalog_id: CatalogId,
) -> Result<()> {
    let snapshot = service.store().snapshot(catalog_id)?;
    let json = serde_json::to_string_pretty(&snapshot.records)?;
    fs::write(path, json).with_context(|| format!("failed to write catalog {}", path.display()))?;
    info!(path = %path.display(), records = snapshot.records.len(), "saved catalog");
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
