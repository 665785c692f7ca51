//! epg-weaver: folds EIT capture files into a persistent program guide.
//!
//! Every `.eit` file in the EPG directory is decoded and merged into the
//! guide store; events that have already ended are pruned and the store
//! is written back atomically. Running the tool repeatedly over a
//! directory that keeps receiving captures keeps the guide current.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use log::{debug, info, warn};

mod store;

use store::Store;

/// epg-weaver - Merge EIT capture files into a persistent EPG store
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding .eit capture files and the store
    epg_dir: PathBuf,

    /// Store file name inside the EPG directory
    #[arg(short, long, default_value = "epg.json")]
    store: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let store_path = args.epg_dir.join(&args.store);
    let mut store = Store::load(&store_path)?;
    let now = Utc::now().timestamp();

    let mut captures: Vec<PathBuf> = fs::read_dir(&args.epg_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "eit"))
        .collect();
    captures.sort();

    for path in captures {
        debug!("Collecting EIT data from {}", path.display());
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Skipping unreadable capture {}: {}", path.display(), e);
                continue;
            }
        };
        match eit_codec::parse_eit(&data) {
            Ok(buckets) => store.merge(&buckets, now),
            Err(e) => warn!("Skipping malformed capture {}: {}", path.display(), e),
        }
    }

    info!(
        "Found {} events in {} channels.",
        store.event_count(),
        store.service_count()
    );
    store.save(&store_path)?;

    Ok(())
}
