use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rigdata::dataset::{ImuDataset, MatDataset, PositionDataset, RingDataset, SessionStore};
use rigdata::export::write_merged_parquet;
use rigdata::extract::Modality;

/// Merge every trial of one container into columnar form and write it as
/// Parquet (one row per trial).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Which modality the container holds
    #[arg(value_enum)]
    modality: Modality,

    /// Container file (e.g. data/ringDataset.bin)
    container: PathBuf,

    /// Output Parquet file
    #[arg(short, long, default_value = "merged.parquet")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store: Box<dyn SessionStore> = match args.modality {
        Modality::Ring => Box::new(RingDataset::open(&args.container)?),
        Modality::Imu => Box::new(ImuDataset::open(&args.container)?),
        Modality::Mat => Box::new(MatDataset::open(&args.container)?),
        Modality::Position => Box::new(PositionDataset::open(&args.container)?),
    };

    let merged = store.merge_all().context("merging trials")?;
    write_merged_parquet(&merged, &args.output)?;

    println!(
        "Wrote {} trials ({} columns) to {}",
        merged.ids.len(),
        merged.columns.len(),
        args.output.display()
    );
    Ok(())
}
