// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            BridgeError
//!                 |
//!   +------+------+------+-------+
//!   |      |      |      |       |
//!   v      v      v      v       v
//! Config Process Store Decode  Io/Other
//!  Box    Box    Box    Box     Box
//!
//! Sub-errors (unboxed internally):
//!   Config  ReadError, ParseError, InvalidValue
//!   Process ExecutableNotFound, SpawnFailed, Timeout, NonZeroExit, OutputError
//!   Store   MutationUnsupported
//!   Decode  Malformed
//!
//! All variants boxed => BridgeError stays small on the stack.
//! A missing .envrc is not an error: resolution returns Option.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BridgeError`].
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum small on the stack.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Environment store error.
    #[error("environment error: {0}")]
    Store(#[from] Box<StoreError>),

    /// Export output decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] Box<DecodeError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for BridgeError {
                fn from(err: $error) -> Self {
                    BridgeError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ProcessError => Process,
    StoreError => Store,
    DecodeError => Decode,
    std::io::Error => Io,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process timed out and was force-terminated.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Failed to read process output.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- Store Errors ---

/// Environment store errors.
///
/// `MutationUnsupported` signals that the process environment table cannot
/// represent the requested entry at all. It is fatal for the sync that raised
/// it and must stay distinguishable from transient process failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The process environment table cannot hold this entry.
    #[error("cannot write '{name}' to the process environment: {reason}")]
    MutationUnsupported { name: String, reason: String },
}

// --- Decode Errors ---

/// Errors decoding `direnv export json` output.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The export stream is not a well-formed JSON object.
    #[error("malformed export output: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests;
