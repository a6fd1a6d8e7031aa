use anyhow::{Context, Result};
use bucket_core::{BucketConfig, TokenBucket};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bucketctl", version, about = "Drive a token bucket and print admission outcomes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Tokens replenished per second.
    #[arg(long, global = true, default_value_t = 2.0)]
    rate: f64,

    /// Burst ceiling.
    #[arg(long, global = true, default_value_t = 5.0)]
    capacity: f64,

    /// TOML file with `rate` and `capacity`; overrides the flags.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue requests one after another with a fixed pause between them.
    Run {
        #[arg(long, default_value_t = 10)]
        requests: u32,

        #[arg(long, default_value_t = 50)]
        interval_ms: u64,
    },
    /// Hammer one shared bucket from many tasks at once.
    Stress {
        #[arg(long, default_value_t = 8)]
        workers: usize,

        #[arg(long, default_value_t = 100)]
        per_worker: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => BucketConfig::load(path)?,
        None => BucketConfig::new(cli.rate, cli.capacity),
    };
    let bucket = Arc::new(TokenBucket::from_config(&config).context("invalid bucket parameters")?);
    info!(rate = config.rate, capacity = config.capacity, "bucket ready");

    let command = cli.command.unwrap_or(Commands::Run {
        requests: 10,
        interval_ms: 50,
    });
    let (allowed, limited) = match command {
        Commands::Run {
            requests,
            interval_ms,
        } => run(&bucket, requests, Duration::from_millis(interval_ms)).await,
        Commands::Stress {
            workers,
            per_worker,
        } => stress(bucket, workers, per_worker).await?,
    };

    println!("allowed={allowed} limited={limited}");
    Ok(())
}

async fn run(bucket: &TokenBucket, requests: u32, interval: Duration) -> (usize, usize) {
    let mut allowed = 0;
    let mut limited = 0;
    for i in 1..=requests {
        if bucket.allow() {
            allowed += 1;
            println!("Request {i}: Allowed");
        } else {
            limited += 1;
            println!("Request {i}: Rate limited");
        }
        if i < requests {
            tokio::time::sleep(interval).await;
        }
    }
    (allowed, limited)
}

async fn stress(bucket: Arc<TokenBucket>, workers: usize, per_worker: usize) -> Result<(usize, usize)> {
    let mut tasks = Vec::with_capacity(workers);
    for worker in 0..workers {
        let bucket = bucket.clone();
        tasks.push(tokio::spawn(async move {
            let allowed = (0..per_worker).filter(|_| bucket.allow()).count();
            info!(worker, allowed, "worker finished");
            allowed
        }));
    }

    let mut allowed = 0;
    for task in tasks {
        allowed += task.await.context("stress worker panicked")?;
    }
    Ok((allowed, workers * per_worker - allowed))
}
