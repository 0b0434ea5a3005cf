use crate::{config, crypto, difficulty};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::{
    sync::{broadcast, mpsc},
    task,
    time::{self, MissedTickBehavior},
};

// Routine miner logs: gated to reduce console noise during normal operation.
static ALLOW_ROUTINE_MINER: AtomicBool = AtomicBool::new(false);
macro_rules! miner_routine { ($($arg:tt)*) => { if ALLOW_ROUTINE_MINER.load(Ordering::Relaxed) { println!($($arg)*); } } }

/// Enable or disable the routine progress log lines printed while searching.
pub fn set_routine_logging(enabled: bool) {
    ALLOW_ROUTINE_MINER.store(enabled, Ordering::Relaxed);
}

const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Parameters for one nonce search. Immutable for the duration of the call.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Fixed part of the hashed message; may be empty.
    pub prefix: Vec<u8>,
    /// Required number of leading zero bits in the digest.
    pub difficulty_bits: u32,
    /// 0 = one worker per available hardware thread.
    pub workers: usize,
    /// How often progress is surfaced; `Duration::ZERO` = 2-second default.
    pub report_interval: Duration,
    /// Shared attempt budget across all workers; 0 = unlimited.
    pub max_attempts: u64,
    /// Overall deadline for the search; `None` = no deadline.
    pub timeout: Option<Duration>,
    /// Optional progress sink. Sends are fire-and-forget; a slow or dropped
    /// consumer never stalls the search.
    pub progress: Option<mpsc::UnboundedSender<Progress>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            prefix: Vec::new(),
            difficulty_bits: 0,
            workers: 0,
            report_interval: Duration::ZERO,
            max_attempts: 0,
            timeout: None,
            progress: None,
        }
    }
}

impl From<&config::Search> for SearchConfig {
    fn from(s: &config::Search) -> Self {
        SearchConfig {
            prefix: s.prefix.clone().into_bytes(),
            difficulty_bits: s.difficulty_bits,
            workers: s.workers,
            report_interval: Duration::from_secs(s.report_interval_secs),
            max_attempts: s.max_attempts,
            timeout: s.timeout_secs.map(Duration::from_secs),
            progress: None,
        }
    }
}

/// Periodic progress snapshot surfaced to the observability sink.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub attempts: u64,
    pub elapsed: Duration,
}

/// A winning nonce together with its digest and the cost of finding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u64,
    pub digest: [u8; 32],
    pub attempts: u64,
    pub elapsed: Duration,
}

/// Why a search ended without a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    AttemptsExhausted,
}

/// Every search returns exactly one outcome. Not finding a nonce within the
/// budget is an expected result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Solution),
    Stopped {
        reason: StopReason,
        attempts: u64,
        elapsed: Duration,
    },
}

impl SearchOutcome {
    pub fn attempts(&self) -> u64 {
        match self {
            SearchOutcome::Found(sol) => sol.attempts,
            SearchOutcome::Stopped { attempts, .. } => *attempts,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            SearchOutcome::Found(sol) => sol.elapsed,
            SearchOutcome::Stopped { elapsed, .. } => *elapsed,
        }
    }
}

enum Ended {
    Won(u64, [u8; 32]),
    Cancelled,
    Exhausted,
}

/// Races independent workers to find a nonce whose digest meets
/// `difficulty_bits`, and returns the first qualifying `(nonce, digest)`.
///
/// The search ends when a worker claims the win, when `shutdown_rx` fires
/// (or its sender is dropped), when the optional timeout elapses, or when
/// the shared attempt budget is spent. Every worker is joined before this
/// returns, on every path. A win claimed concurrently with cancellation is
/// still reported as `Found`: a valid nonce is never discarded.
pub async fn search(cfg: SearchConfig, mut shutdown_rx: broadcast::Receiver<()>) -> SearchOutcome {
    let workers = if cfg.workers == 0 {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    } else {
        cfg.workers
    };
    debug_assert!(workers > 0);
    let report_interval = if cfg.report_interval.is_zero() {
        DEFAULT_REPORT_INTERVAL
    } else {
        cfg.report_interval
    };

    let start = Instant::now();
    let attempts = Arc::new(AtomicU64::new(0));
    let claimed = Arc::new(AtomicBool::new(false));
    let stop = Arc::new(AtomicBool::new(false));
    let prefix = Arc::new(cfg.prefix);

    // Capacity 1 is enough: the claim flag guarantees a single publisher.
    // The senders double as the exhaustion signal: when every worker drops
    // its sender without a claim, the shared budget ran out.
    let (found_tx, mut found_rx) = mpsc::channel::<(u64, [u8; 32])>(1);

    let clock_seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut handles = Vec::with_capacity(workers);
    for id in 0..workers {
        let ctx = WorkerContext {
            prefix: Arc::clone(&prefix),
            difficulty_bits: cfg.difficulty_bits,
            max_attempts: cfg.max_attempts,
            // Per-worker seed so workers don't retrace each other's nonces.
            seed: clock_seed.wrapping_add(id as u64),
            attempts: Arc::clone(&attempts),
            claimed: Arc::clone(&claimed),
            stop: Arc::clone(&stop),
            found_tx: found_tx.clone(),
        };
        handles.push(task::spawn_blocking(move || run_worker(ctx)));
    }
    drop(found_tx);

    let mut ticker = time::interval_at(time::Instant::now() + report_interval, report_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let deadline_at = cfg.timeout.map(|t| time::Instant::now() + t);
    let deadline = time::sleep_until(deadline_at.unwrap_or_else(time::Instant::now));
    tokio::pin!(deadline);

    let mut last_report = (Instant::now(), 0u64);
    let ended = loop {
        tokio::select! {
            res = found_rx.recv() => match res {
                Some((nonce, digest)) => break Ended::Won(nonce, digest),
                None => break Ended::Exhausted,
            },
            _ = &mut deadline, if deadline_at.is_some() => break Ended::Cancelled,
            _ = shutdown_rx.recv() => break Ended::Cancelled,
            _ = ticker.tick() => {
                let total = attempts.load(Ordering::Relaxed);
                let elapsed = start.elapsed();
                let window = last_report.0.elapsed().as_secs_f64();
                let rate = if window > 0.0 {
                    total.saturating_sub(last_report.1) as f64 / window
                } else {
                    0.0
                };
                miner_routine!("⏳ Searching: {} attempts in {:.1}s (≈{:.1}/s)", total, elapsed.as_secs_f64(), rate);
                if let Some(tx) = &cfg.progress {
                    let _ = tx.send(Progress { attempts: total, elapsed });
                }
                last_report = (Instant::now(), total);
            }
        }
    };

    stop.store(true, Ordering::Relaxed);
    for handle in handles {
        let _ = handle.await;
    }

    // A claim that raced the shutdown still wins: drain the channel once
    // more now that every worker has exited.
    let late = found_rx.try_recv().ok();
    let total = attempts.load(Ordering::Relaxed);
    let elapsed = start.elapsed();

    match (ended, late) {
        (Ended::Won(nonce, digest), _) | (_, Some((nonce, digest))) => {
            miner_routine!("✅ Found nonce {} after {} attempts", nonce, total);
            SearchOutcome::Found(Solution {
                nonce,
                digest,
                attempts: total,
                elapsed,
            })
        }
        (Ended::Exhausted, None) => SearchOutcome::Stopped {
            reason: StopReason::AttemptsExhausted,
            attempts: total,
            elapsed,
        },
        (Ended::Cancelled, None) => SearchOutcome::Stopped {
            reason: StopReason::Cancelled,
            attempts: total,
            elapsed,
        },
    }
}

struct WorkerContext {
    prefix: Arc<Vec<u8>>,
    difficulty_bits: u32,
    max_attempts: u64,
    seed: u64,
    attempts: Arc<AtomicU64>,
    claimed: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
    found_tx: mpsc::Sender<(u64, [u8; 32])>,
}

/// Hot loop of one worker. Runs on a blocking thread so hashing never
/// starves the async runtime.
fn run_worker(ctx: WorkerContext) {
    let mut rng = StdRng::seed_from_u64(ctx.seed);

    while !ctx.stop.load(Ordering::Relaxed) {
        let nonce: u64 = rng.gen();
        let message = crypto::pow_message(&ctx.prefix, nonce);
        let digest = crypto::sha256(&message);
        let total = ctx.attempts.fetch_add(1, Ordering::Relaxed) + 1;

        if difficulty::meets_difficulty(&digest, ctx.difficulty_bits) {
            // Exactly one worker may publish; the losers just leave.
            if ctx
                .claimed
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                let _ = ctx.found_tx.blocking_send((nonce, digest));
                ctx.stop.store(true, Ordering::Relaxed);
            }
            return;
        }

        // The budget is shared across workers, so check the global counter.
        if ctx.max_attempts > 0 && total >= ctx.max_attempts {
            return;
        }
    }
}
