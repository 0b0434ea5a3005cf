use clap::{Parser, Subcommand};
use std::time::Duration;
use tokio::signal;
use tokio::sync::broadcast;

use powgrind::{config, crypto, difficulty, miner};

#[derive(Parser)]
#[command(author, version, about = "Concurrent proof-of-work nonce search")]
struct Cli {
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Suppress routine progress logs
    #[arg(long, default_value_t = false)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run one nonce search, with optional overrides over the config file
    Mine {
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long)]
        difficulty_bits: Option<u32>,
        /// 0 = one worker per available hardware thread
        #[arg(long)]
        workers: Option<usize>,
        /// 0 = unlimited
        #[arg(long)]
        max_attempts: Option<u64>,
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Recompute the digest for a (prefix, nonce) pair and re-check it
    Verify {
        #[arg(long)]
        prefix: String,
        #[arg(long)]
        nonce: u64,
        #[arg(long)]
        difficulty_bits: u32,
    },
    /// Measure raw hash throughput over the candidate framing
    Bench {
        #[arg(long, default_value_t = 1_000_000)]
        iterations: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    miner::set_routine_logging(!cli.quiet);

    // Config from the CLI path, else the embedded default so the binary can
    // run standalone.
    let cfg = match config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            const EMBEDDED_CONFIG: &str = include_str!("../config.toml");
            eprintln!(
                "⚠️  Could not read config from '{}' ({e}); using embedded defaults",
                cli.config
            );
            config::load_from_str(EMBEDDED_CONFIG)?
        }
    };

    match cli.cmd {
        None => run_search(miner::SearchConfig::from(&cfg.search)).await,
        Some(Cmd::Mine {
            prefix,
            difficulty_bits,
            workers,
            max_attempts,
            timeout_secs,
        }) => {
            let mut search_cfg = miner::SearchConfig::from(&cfg.search);
            if let Some(p) = prefix {
                search_cfg.prefix = p.into_bytes();
            }
            if let Some(d) = difficulty_bits {
                search_cfg.difficulty_bits = d;
            }
            if let Some(w) = workers {
                search_cfg.workers = w;
            }
            if let Some(m) = max_attempts {
                search_cfg.max_attempts = m;
            }
            if let Some(t) = timeout_secs {
                search_cfg.timeout = Some(Duration::from_secs(t));
            }
            run_search(search_cfg).await
        }
        Some(Cmd::Verify {
            prefix,
            nonce,
            difficulty_bits,
        }) => {
            let digest = crypto::pow_digest(prefix.as_bytes(), nonce);
            println!("🔎 Digest: {}", hex::encode(digest));
            if difficulty::meets_difficulty(&digest, difficulty_bits) {
                println!("✅ Nonce {nonce} meets {difficulty_bits} leading zero bits");
                Ok(())
            } else {
                Err(anyhow::anyhow!(
                    "nonce {nonce} does not meet {difficulty_bits} leading zero bits"
                ))
            }
        }
        Some(Cmd::Bench { iterations }) => run_bench(cfg.search.prefix.into_bytes(), iterations).await,
    }
}

async fn run_search(cfg: miner::SearchConfig) -> anyhow::Result<()> {
    println!(
        "⛏️  Searching (difficulty: {} bits, workers: {}, expected ≈{:.0} attempts)",
        cfg.difficulty_bits,
        if cfg.workers == 0 {
            "auto".to_string()
        } else {
            cfg.workers.to_string()
        },
        difficulty::expected_attempts(cfg.difficulty_bits)
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let ctrl_c_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n🛑 Shutdown signal received, stopping search...");
            let _ = ctrl_c_tx.send(());
        }
    });

    match miner::search(cfg, shutdown_rx).await {
        miner::SearchOutcome::Found(sol) => {
            let rate = sol.attempts as f64 / sol.elapsed.as_secs_f64().max(f64::EPSILON);
            println!(
                "✅ Found nonce {} after {} attempts in {:.2}s (≈{:.0}/s)",
                sol.nonce,
                sol.attempts,
                sol.elapsed.as_secs_f64(),
                rate
            );
            println!("   Digest: {}", hex::encode(sol.digest));
            Ok(())
        }
        miner::SearchOutcome::Stopped {
            reason,
            attempts,
            elapsed,
        } => {
            let why = match reason {
                miner::StopReason::Cancelled => "cancelled",
                miner::StopReason::AttemptsExhausted => "attempt budget exhausted",
            };
            println!(
                "⚠️  Search stopped ({why}) after {} attempts in {:.2}s",
                attempts,
                elapsed.as_secs_f64()
            );
            Ok(())
        }
    }
}

async fn run_bench(prefix: Vec<u8>, iterations: u64) -> anyhow::Result<()> {
    println!("📊 Benchmarking SHA-256 over {iterations} candidate messages...");
    let elapsed = tokio::task::spawn_blocking(move || {
        let start = std::time::Instant::now();
        for nonce in 0..iterations {
            std::hint::black_box(crypto::pow_digest(&prefix, nonce));
        }
        start.elapsed()
    })
    .await?;

    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 { iterations as f64 / secs } else { 0.0 };
    println!("📊 {iterations} hashes in {secs:.3}s (≈{rate:.0} H/s)");
    Ok(())
}
