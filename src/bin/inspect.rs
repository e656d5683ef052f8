use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::Rng;

use rigdata::store::Container;

/// Show the layout of a container file: id list, session count, and the
/// record structure of one session (random unless --id is given).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Container file (e.g. data/ringDataset.bin)
    container: PathBuf,

    /// Session key to show instead of a random one
    #[arg(long)]
    id: Option<String>,

    /// Emit the record tree as JSON instead of the indented layout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let container = Container::open(&args.container)
        .with_context(|| format!("opening {}", args.container.display()))?;
    let ids = container.ids();
    if ids.is_empty() {
        bail!("{} holds no sessions", args.container.display());
    }

    println!("{}: {} sessions", args.container.display(), ids.len());
    for id in ids.iter().take(4) {
        println!("  {id}");
    }
    if ids.len() > 4 {
        println!("  ...");
    }

    let id = match args.id {
        Some(id) => id,
        None => ids[rand::thread_rng().gen_range(0..ids.len())].clone(),
    };
    let record = container
        .get(&id)
        .with_context(|| format!("no session '{id}' in container"))?;

    println!();
    if args.json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("|{id}/");
        print!("{}", record.describe());
    }
    Ok(())
}
