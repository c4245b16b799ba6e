use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use location_map::config::{DEFAULT_DEBOUNCE, DEFAULT_LOCATIONS_DIR, DEFAULT_OUTPUT};
use location_map::scanner::SkipReason;
use location_map::watch::watch_locations;
use location_map::{generate, logging, GeneratorConfig};

#[derive(Parser)]
#[command(name = "generate-locations")]
#[command(about = "Generate locations.json from the per-location asset folders")]
#[command(version)]
struct Args {
    /// Directory the image paths in the document are relative to
    #[arg(long, default_value = ".", env = "LOCATIONS_PROJECT_ROOT")]
    project_root: PathBuf,

    /// One subfolder per location (meta.json, descriere.txt, images)
    #[arg(short, long, default_value = DEFAULT_LOCATIONS_DIR, env = "LOCATIONS_DIR")]
    locations_dir: PathBuf,

    #[arg(short, long, default_value = DEFAULT_OUTPUT, env = "LOCATIONS_OUTPUT")]
    output: PathBuf,

    /// Keep running and regenerate on every change
    #[arg(short, long)]
    watch: bool,

    /// Quiet period after the last change before regenerating
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64, env = "LOCATIONS_DEBOUNCE_MS")]
    debounce_ms: u64,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let config = GeneratorConfig::new(args.project_root, &args.locations_dir, &args.output);

    if args.watch {
        return run_watch(config, Duration::from_millis(args.debounce_ms));
    }

    println!("🔍 Scanning locations in: {}", config.locations_dir.display());
    let report = generate(&config)
        .with_context(|| format!("failed to generate {}", config.output_display()))?;

    for skipped in &report.skipped {
        let why = match skipped.reason {
            SkipReason::MissingMetadata => "no meta.json",
            SkipReason::NoImages => "no images",
        };
        println!("  ⚠️  Skipped {} ({})", skipped.folder, why);
    }
    println!(
        "✅ Generated {} with {} locations",
        config.output_display(),
        report.location_count
    );
    Ok(())
}

fn run_watch(config: GeneratorConfig, debounce: Duration) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("cannot start async runtime")?;
    println!("👀 Watching {} (Ctrl-C to stop)", config.locations_dir.display());

    let stats = runtime
        .block_on(watch_locations(config, debounce))
        .context("cannot watch locations directory")?;
    println!("👋 Stopped after {} generation runs ({} failed)", stats.runs, stats.failures);
    Ok(())
}
