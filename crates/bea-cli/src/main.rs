use anyhow::{anyhow, Result};
use bea_lib::{
    io as annot_io, resolve_prior_info, resolve_schema, BidsField, BidsInfo, Dataset, Registry,
    LEVEL_WARN_THRESHOLD,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "bea",
    version,
    about = "BEA: BIDS event annotation tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved native schema and the initialized registry as JSON
    Inspect {
        /// One or more tab-separated native event tables
        #[arg(required = true)]
        events: Vec<PathBuf>,
        /// Resume from a previously exported annotation sidecar
        #[arg(long)]
        prior: Option<PathBuf>,
    },
    /// List the distinct values of one native event field across all inputs
    Levels {
        #[arg(required = true)]
        events: Vec<PathBuf>,
        #[arg(long)]
        field: String,
    },
    /// Write the description dictionary and the field-mapping table
    Export {
        #[arg(required = true)]
        events: Vec<PathBuf>,
        #[arg(long)]
        prior: Option<PathBuf>,
        /// Additional mappings, e.g. --map trial_type=condition
        #[arg(long = "map", value_name = "BIDS=NATIVE")]
        map: Vec<String>,
        #[arg(long)]
        out_desc: PathBuf,
        #[arg(long)]
        out_map: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect { events, prior } => cmd_inspect(&events, prior.as_deref())?,
        Commands::Levels { events, field } => cmd_levels(&events, &field)?,
        Commands::Export {
            events,
            prior,
            map,
            out_desc,
            out_map,
        } => cmd_export(&events, prior.as_deref(), &map, &out_desc, &out_map)?,
    }
    Ok(())
}

fn load_datasets(paths: &[PathBuf]) -> Result<Vec<Dataset>> {
    paths.iter().map(|path| annot_io::read_events_tsv(path)).collect()
}

fn build_registry(datasets: &[Dataset], prior: Option<&Path>) -> Result<Registry> {
    let schema = resolve_schema(datasets);
    let prior_info: Option<BidsInfo> = match prior {
        Some(path) => Some(annot_io::read_bids_info(path)?),
        None => resolve_prior_info(datasets).cloned(),
    };
    Ok(Registry::initialize(&schema, prior_info.as_ref()))
}

fn cmd_inspect(events: &[PathBuf], prior: Option<&Path>) -> Result<()> {
    let datasets = load_datasets(events)?;
    let registry = build_registry(&datasets, prior)?;
    println!("{}", serde_json::to_string(&registry)?);
    Ok(())
}

fn cmd_levels(events: &[PathBuf], field: &str) -> Result<()> {
    let datasets = load_datasets(events)?;
    let values = bea_lib::collect_unique_values(&datasets, field)?;
    if values.len() > LEVEL_WARN_THRESHOLD {
        log::warn!(
            "field '{}' has {} distinct values; per-value editing may be unwieldy",
            field,
            values.len()
        );
    }
    println!("{}", serde_json::to_string(&values)?);
    Ok(())
}

fn cmd_export(
    events: &[PathBuf],
    prior: Option<&Path>,
    map: &[String],
    out_desc: &Path,
    out_map: &Path,
) -> Result<()> {
    let datasets = load_datasets(events)?;
    let mut registry = build_registry(&datasets, prior)?;
    for pair in map {
        let (bids, native) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("--map expects BIDS=NATIVE, got '{pair}'"))?;
        let field: BidsField = bids.parse()?;
        registry.set_native_mapping(field, native)?;
    }
    let info = registry.to_export_artifacts();
    annot_io::write_description_json(out_desc, &info)?;
    annot_io::write_field_map_tsv(out_map, &info)?;
    Ok(())
}
