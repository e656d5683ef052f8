use std::path::PathBuf;

use clap::Parser;

use rigdata::extract::run_extraction;
use rigdata::ExtractConfig;

/// Extract every session's XML log under the corpus root into per-modality
/// container files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Corpus root: one directory per subject, one subdirectory per session
    corpus_root: Option<PathBuf>,

    /// Output directory for the container files
    #[arg(short, long, default_value = "data")]
    output_dir: PathBuf,

    /// Read both paths from a JSON config file instead
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = match (args.config, args.corpus_root) {
        (Some(path), _) => ExtractConfig::from_json_file(&path)?,
        (None, Some(root)) => ExtractConfig::new(root, args.output_dir),
        (None, None) => anyhow::bail!("either a corpus root or --config is required"),
    };

    let summary = run_extraction(&cfg)?;

    println!(
        "Extracted {} sessions ({} skipped) into {}",
        summary.sessions,
        summary.skipped,
        cfg.output_dir.display()
    );
    for (modality, count) in &summary.records {
        println!("  {modality}: {count} records");
    }
    Ok(())
}
