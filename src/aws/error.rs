//! Errors raised while talking to the provider.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AwsError {
    /// The provider rejected the call with a rate-limit error.
    #[error("throttled by provider: {cmd}: {message}")]
    Throttled { cmd: String, message: String },

    #[error("command failed (code {code:?}): {cmd}: {stderr}")]
    CommandFailed {
        cmd: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("could not execute '{cmd}': {source}")]
    Io {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("response too large: {len} bytes for command: {cmd}")]
    ResponseTooLarge { cmd: String, len: usize },

    #[error("error parsing response of '{cmd}': path={path} error={message}")]
    Parse {
        cmd: String,
        path: String,
        message: String,
    },

    #[error("empty command line")]
    EmptyCommand,
}

impl AwsError {
    pub fn is_throttled(&self) -> bool {
        matches!(self, AwsError::Throttled { .. })
    }
}
