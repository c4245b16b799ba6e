use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use location_map::config::{DEFAULT_DEBOUNCE, DEFAULT_LOCATIONS_DIR, DEFAULT_OUTPUT};
use location_map::watch::watch_locations;
use location_map::{logging, server, GeneratorConfig};
use tracing::error;

#[derive(Parser)]
#[command(name = "dev-server")]
#[command(about = "Serve the map page and locations.json locally")]
struct Args {
    #[arg(long, default_value = "127.0.0.1:3000", env = "LOCATIONS_ADDR")]
    addr: SocketAddr,

    #[arg(long, default_value = ".", env = "LOCATIONS_PROJECT_ROOT")]
    project_root: PathBuf,

    #[arg(short, long, default_value = DEFAULT_LOCATIONS_DIR, env = "LOCATIONS_DIR")]
    locations_dir: PathBuf,

    #[arg(short, long, default_value = DEFAULT_OUTPUT, env = "LOCATIONS_OUTPUT")]
    output: PathBuf,

    /// Also regenerate locations.json on changes
    #[arg(short, long)]
    watch: bool,

    #[arg(long, default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64, env = "LOCATIONS_DEBOUNCE_MS")]
    debounce_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let config = GeneratorConfig::new(args.project_root, &args.locations_dir, &args.output);

    if args.watch {
        let watch_config = config.clone();
        let debounce = Duration::from_millis(args.debounce_ms);
        tokio::spawn(async move {
            if let Err(err) = watch_locations(watch_config, debounce).await {
                error!(error = %err, "Watcher stopped");
            }
        });
    }

    let app = server::router(config.clone())?;

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("cannot bind {}", args.addr))?;
    println!("🚀 Dev server running on http://{}", args.addr);
    println!("🗺️  Serving {}", config.project_root.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
