//! Audit settings.
//!
//! Constants carry the defaults. A few can be overridden from the
//! environment (a `.env` file is loaded by `main`).

use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_REGION: &str = "ap-northeast-1";
pub const AWS_BIN: &str = "aws";

/// NAT gateway data processing charge per GiB.
pub const NAT_COST_PER_GIB: f64 = 0.064;
pub const BYTES_PER_GIB: f64 = 1_073_741_824.0;
pub const COST_WINDOW_DAYS: i64 = 30;
pub const METRIC_PERIOD_SECS: u32 = 86_400;

/// Largest `aws` CLI response accepted, in bytes.
pub const MAX_OUTPUT_BYTES: usize = 20_000_000;

pub const RETRY_MAX_ATTEMPTS: u32 = 5;
pub const RETRY_BASE_MSEC: u64 = 500;

/// How chatty diagnostics on stderr are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    Debug,
}

impl Verbosity {
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            Verbosity::Normal => log::LevelFilter::Warn,
            Verbosity::Debug => log::LevelFilter::Debug,
        }
    }
}

/// Exponential backoff for throttled provider calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): base, 2x base, 4x base ...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(RETRY_BASE_MSEC),
        }
    }
}

/// Everything a command needs besides the provider itself.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    pub region: String,
    pub aws_bin: String,
    pub nat_cost_per_gib: f64,
    pub retry: RetryPolicy,
    pub verbosity: Verbosity,
    /// Replay this captured topology instead of calling `aws`.
    pub snapshot: Option<PathBuf>,
}

impl AuditConfig {
    pub fn new(region: &str, verbosity: Verbosity) -> Self {
        AuditConfig {
            region: region.to_string(),
            aws_bin: AWS_BIN.to_string(),
            nat_cost_per_gib: NAT_COST_PER_GIB,
            retry: RetryPolicy::default(),
            verbosity,
            snapshot: None,
        }
    }

    /// Defaults, overridden by `VPC_AUDIT_*` environment variables.
    pub fn from_env(region: &str, verbosity: Verbosity) -> Result<Self, Box<dyn Error>> {
        AuditConfig::from_lookup(region, verbosity, |key| env::var(key).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns for each
    /// `VPC_AUDIT_*` key.
    pub fn from_lookup<F>(
        region: &str,
        verbosity: Verbosity,
        lookup: F,
    ) -> Result<Self, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AuditConfig::new(region, verbosity);
        config.aws_bin = parse_or(&lookup, "VPC_AUDIT_AWS_BIN", config.aws_bin)?;
        config.nat_cost_per_gib = parse_or(
            &lookup,
            "VPC_AUDIT_NAT_COST_PER_GIB",
            config.nat_cost_per_gib,
        )?;
        config.retry.max_attempts =
            parse_or(&lookup, "VPC_AUDIT_MAX_ATTEMPTS", config.retry.max_attempts)?;
        let base_msec = parse_or(&lookup, "VPC_AUDIT_RETRY_BASE_MSEC", RETRY_BASE_MSEC)?;
        config.retry.base_delay = Duration::from_millis(base_msec);
        config.snapshot = lookup("VPC_AUDIT_SNAPSHOT")
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        if config.retry.max_attempts == 0 {
            return Err("VPC_AUDIT_MAX_ATTEMPTS must be at least 1".into());
        }
        if !config.nat_cost_per_gib.is_finite() || config.nat_cost_per_gib < 0.0 {
            return Err("VPC_AUDIT_NAT_COST_PER_GIB must be a non-negative number".into());
        }
        Ok(config)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, Box<dyn Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| format!("Invalid {key}='{value}': {e}").into()),
        None => Ok(default),
    }
}
