/*
 * This file is part of mackerel-plugin-sensors.
 *
 * Copyright (C) 2025 mackerel-plugin-sensors contributors
 *
 * mackerel-plugin-sensors is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * mackerel-plugin-sensors is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with mackerel-plugin-sensors. If not, see <https://www.gnu.org/licenses/>.
 */

//! Error types for the sensors plugin
//!
//! Every failure ends up as a single line on stderr and exit status 1. Causes
//! are chained through `source()` rather than repeated in the message, so the
//! line is printed with `{:#}` to show the whole chain.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

/// Result type alias using PluginError
pub type Result<T> = std::result::Result<T, PluginError>;

#[derive(thiserror::Error, Debug)]
pub enum PluginError {
    // ============================================================================
    // Execution Errors (external commands)
    // ============================================================================
    #[error("failed to execute {command}")]
    Spawn {
        command: String,
        source: io::Error,
    },

    #[error("failed to wait for {command}")]
    Wait {
        command: String,
        source: io::Error,
    },

    #[error("{command} exited with {status}")]
    ExitStatus {
        command: String,
        status: ExitStatus,
    },

    #[error("{command} timed out after {}s", .timeout.as_secs())]
    Timeout {
        command: String,
        timeout: Duration,
    },

    #[error("{command} cancelled by signal")]
    Cancelled {
        command: String,
    },

    // ============================================================================
    // Decode Errors
    // ============================================================================
    #[error("failed to decode sensors output")]
    Decode(#[from] serde_json::Error),

    #[error("failed to obtain air temperature (気温の取得に失敗)")]
    AirTemperature {
        #[source]
        source: ProbeParseError,
    },

    // ============================================================================
    // Configuration and Output Errors
    // ============================================================================
    #[error("invalid value for {var}: {reason}")]
    Config {
        var: String,
        reason: String,
    },

    #[error("failed to write plugin output")]
    Io(#[from] io::Error),
}

impl PluginError {
    /// True for failures to run an external command to completion
    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            PluginError::Spawn { .. }
                | PluginError::Wait { .. }
                | PluginError::ExitStatus { .. }
                | PluginError::Timeout { .. }
                | PluginError::Cancelled { .. }
        )
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, PluginError::Decode(_) | PluginError::AirTemperature { .. })
    }

    /// Family name recorded with `fatal_error` events
    pub fn kind(&self) -> &'static str {
        if self.is_execution() {
            "execution"
        } else if self.is_decode() {
            "decode"
        } else if matches!(self, PluginError::Config { .. }) {
            "config"
        } else {
            "io"
        }
    }
}

/// Why the probe output did not yield a temperature
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProbeParseError {
    #[error("probe produced no output")]
    EmptyOutput,

    #[error("expected at least {expected} fields, got {found} in {line:?}")]
    MissingField {
        expected: usize,
        found: usize,
        line: String,
    },

    #[error("not a number: {token:?}")]
    InvalidNumber {
        token: String,
    },
}
