//! AWS CLI command execution.
//!
//! Runs `aws` commands, classifies failures and retries throttled calls.

use super::AwsError;
use crate::config::{self, RetryPolicy};
use colored::Colorize;
use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();
/// Error codes the EC2 and CloudWatch APIs use for rate limiting.
static THROTTLE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

fn get_throttle_regex() -> &'static Regex {
    THROTTLE_REGEX.get_or_init(|| {
        Regex::new(r"Throttling|RequestLimitExceeded|TooManyRequestsException|Rate exceeded")
            .expect("Invalid Regex")
    })
}

/// Run a shell command and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err(AwsError::Throttled)` - If stderr carries a rate-limit error code
/// * `Err` - If the command fails or produces too much output
pub fn run(cmd: &str) -> Result<String, AwsError> {
    run_capped(cmd, config::MAX_OUTPUT_BYTES)
}

fn run_capped(cmd: &str, max_output_bytes: usize) -> Result<String, AwsError> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd);
    log::trace!("split cmds={:?}", cmds);

    let (program, args) = cmds.split_first().ok_or(AwsError::EmptyCommand)?;
    if program.is_empty() {
        return Err(AwsError::EmptyCommand);
    }
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| {
            log::error!("Command execution failed: {}", source);
            AwsError::Io {
                cmd: cmd.to_string(),
                source,
            }
        })?;

    if output.status.success() {
        log::debug!("Success output.stdout.len(): {}", output.stdout.len());

        if output.stdout.len() > max_output_bytes {
            return Err(AwsError::ResponseTooLarge {
                cmd: cmd.to_string(),
                len: output.stdout.len(),
            });
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(classify_failure(cmd, output.status.code(), stderr));
    }

    String::from_utf8(output.stdout).map_err(|e| AwsError::Parse {
        cmd: cmd.to_string(),
        path: ".".to_string(),
        message: format!("Invalid UTF-8: {e}"),
    })
}

/// Run `op` until it succeeds, fails with a non-throttling error, or the
/// policy's attempts are used up. Sleeps with exponential backoff in between.
pub fn retry_throttled<T, F>(policy: &RetryPolicy, mut op: F) -> Result<T, AwsError>
where
    F: FnMut() -> Result<T, AwsError>,
{
    let mut attempt = 1;
    loop {
        match op() {
            Err(e) if e.is_throttled() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                log::warn!(
                    "{throttled} attempt {attempt}/{max}, retry in {delay:?}",
                    throttled = "throttled".yellow(),
                    max = policy.max_attempts
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Run a command, retrying when the provider throttles it.
pub fn run_with_retry(cmd: &str, policy: &RetryPolicy) -> Result<String, AwsError> {
    retry_throttled(policy, || run(cmd))
}

fn classify_failure(cmd: &str, code: Option<i32>, stderr: String) -> AwsError {
    if get_throttle_regex().is_match(&stderr) {
        AwsError::Throttled {
            cmd: cmd.to_string(),
            message: stderr,
        }
    } else {
        AwsError::CommandFailed {
            cmd: cmd.to_string(),
            code,
            stderr,
        }
    }
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .filter(|s| !s.is_empty())
        .collect()
}
