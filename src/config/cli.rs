use std::{ops::RangeInclusive, path::PathBuf};

use clap::Parser;

use crate::error::config::ConfigError;

/// Command line arguments for the bot process.
#[derive(Parser, Debug)]
#[command(name = "botkit")]
#[command(version, about = "Runs a Discord bot from a TOML configuration file", long_about = None)]
pub struct Args {
    /// Path to the bot's configuration file
    #[arg(default_value = "config/config.toml")]
    pub config_file: PathBuf,

    /// Total number of shards the bot runs with across all instances
    #[arg(long = "shard-count", alias = "shardcount")]
    pub shard_count: Option<u32>,

    /// Lowest shard ID this instance runs (inclusive)
    #[arg(long)]
    pub min: Option<u32>,

    /// Highest shard ID this instance runs (inclusive)
    #[arg(long)]
    pub max: Option<u32>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long = "log-level", alias = "loglevel", default_value = "info", env = "BOTKIT_LOG_LEVEL")]
    pub log_level: String,
}

/// Shards run by this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardRange {
    /// Total shards across every instance of the bot.
    pub total: u32,
    pub min: u32,
    pub max: u32,
}

impl ShardRange {
    pub fn single() -> Self {
        Self {
            total: 1,
            min: 0,
            max: 0,
        }
    }

    pub fn ids(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }

    /// Number of shards run by this instance.
    pub fn local_count(&self) -> u32 {
        self.max - self.min + 1
    }

    /// Whether this instance runs every shard of the bot.
    pub fn is_complete(&self) -> bool {
        self.min == 0 && self.max + 1 == self.total
    }

    /// Only one instance posts bot-wide statistics: the one running shard 0.
    pub fn owns_shard_zero(&self) -> bool {
        self.min == 0
    }
}

impl Default for ShardRange {
    fn default() -> Self {
        Self::single()
    }
}

/// Checks the shard arguments and resolves them to the shards this instance runs.
///
/// # Arguments
/// - `shard_count` - Total shards, or `None` for an unsharded bot
/// - `min` / `max` - Inclusive shard IDs for this instance
///
/// # Returns
/// - `Ok(ShardRange)` - `0..=0` of 1 without a count, `0..=count-1` with only a count,
///   `min..=max` when all three are given
/// - `Err(ConfigError::InvalidSharding)` - Min/max without a count, only one of min/max,
///   or a range that doesn't fit inside the count
pub fn validate_sharding(
    shard_count: Option<u32>,
    min: Option<u32>,
    max: Option<u32>,
) -> Result<ShardRange, ConfigError> {
    let range = match (shard_count, min, max) {
        (None, None, None) => ShardRange::single(),
        (None, _, _) => {
            return Err(ConfigError::InvalidSharding(
                "You set a min/max shard handler but no shard count".to_string(),
            ))
        }
        (Some(0), _, _) => {
            return Err(ConfigError::InvalidSharding(
                "The shard count must be at least 1".to_string(),
            ))
        }
        (Some(total), None, None) => ShardRange {
            total,
            min: 0,
            max: total - 1,
        },
        (Some(total), Some(min), Some(max)) => ShardRange { total, min, max },
        (Some(_), _, _) => {
            return Err(ConfigError::InvalidSharding(
                "You set a shard count but not both min and max shards".to_string(),
            ))
        }
    };

    if range.min > range.max || range.max >= range.total {
        return Err(ConfigError::InvalidSharding(format!(
            "Shards {}..={} don't fit in a shard count of {}",
            range.min, range.max, range.total
        )));
    }

    Ok(range)
}
