// Library interface for the powgrind nonce search engine
// This allows tests and external consumers to drive searches directly

pub mod config;
pub mod crypto;
pub mod difficulty;
pub mod miner;

pub use crypto::{pow_digest, pow_message, sha256};
pub use difficulty::{expected_attempts, meets_difficulty};
pub use miner::{search, Progress, SearchConfig, SearchOutcome, Solution, StopReason};
