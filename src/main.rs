use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nats2es::{Collector, Config};

#[derive(Parser, Debug)]
#[command(name = "nats2es")]
#[command(about = "Ships NATS server monitoring snapshots to Elasticsearch")]
struct Args {
    /// Elasticsearch nodes as a semicolon-separated host:port list
    #[arg(long, default_value = nats2es::config::DEFAULT_ELASTICSEARCH)]
    elasticsearch: String,

    /// NATS monitoring address (host:port)
    #[arg(long, default_value = nats2es::config::DEFAULT_NATS)]
    nats: String,

    /// Sleep between cycles, in milliseconds. Malformed values fall
    /// back to the default.
    #[arg(long, default_value = "60000")]
    sleep: String,

    /// Run as a managed service: no interactive stop, terminate on
    /// SIGINT instead of a keypress
    #[arg(long)]
    service: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config::from_args(&args.elasticsearch, &args.nats, &args.sleep);

    info!("elasticsearch = {}", config.elasticsearch.join(";"));
    info!("nats = {}", config.nats);
    info!("sleep = {} ms", config.sleep.as_millis());

    let handle = Collector::new(&config)?.spawn();

    if args.service {
        tokio::signal::ctrl_c().await?;
    } else {
        info!("press Enter to stop");
        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    }

    handle.stop();
    handle.join().await;

    Ok(())
}
